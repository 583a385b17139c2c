//! Observable resource state for cached values.
//!
//! A [`Resource`] describes where a cached value is in its lifecycle:
//! an operation is in flight ([`Resource::Loading`]), the last operation
//! produced a value ([`Resource::Success`]), or the last operation failed
//! ([`Resource::Error`]). Every variant carries the most recent known-good
//! payload, so consumers can keep rendering stale data while a refresh runs
//! or after one fails.
//!
//! # Combining resources
//!
//! Two independently cached resources can be merged into one view with
//! [`Resource::combine`]. The merged variant follows the priority
//! `Error > Loading > Success`: a view is only "ready" once both inputs are,
//! and any failure dominates.
//!
//! # Example
//!
//! ```ignore
//! use cacheflow::Resource;
//!
//! let profile: Resource<Profile> = profile_rx.borrow().clone();
//! let prefs: Resource<Prefs> = prefs_rx.borrow().clone();
//!
//! let view = profile.combine(prefs, |p, s| Some(ViewModel::new(p?, s?)));
//! ```

use std::sync::Arc;

/// Shared failure cause carried by [`Resource::Error`].
///
/// Stored behind an `Arc` so a `Resource` stays cheap to clone through a
/// `watch` channel regardless of the concrete error type.
pub type ResourceError = Arc<dyn std::error::Error + Send + Sync>;

/// Lifecycle state of a cached value.
///
/// The payload of every variant is the most recent value known to be good.
/// It is never discarded on failure: an [`Resource::Error`] published after a
/// failed refresh still carries the value that was readable before the
/// refresh started.
#[derive(Clone, Debug)]
pub enum Resource<T> {
    /// An operation is in flight; carries the last known-good value, if any.
    Loading(Option<T>),
    /// The last operation completed; `None` means "no value" is the result.
    Success(Option<T>),
    /// The last operation failed; carries the last known-good value and the
    /// failure cause.
    Error(Option<T>, ResourceError),
}

impl<T> Resource<T> {
    /// Returns the payload regardless of variant.
    pub fn value(&self) -> Option<&T> {
        match self {
            Resource::Loading(value) | Resource::Success(value) | Resource::Error(value, _) => {
                value.as_ref()
            }
        }
    }

    /// Consumes the resource, returning the payload regardless of variant.
    pub fn into_value(self) -> Option<T> {
        match self {
            Resource::Loading(value) | Resource::Success(value) | Resource::Error(value, _) => {
                value
            }
        }
    }

    /// Returns the failure cause if this is an [`Resource::Error`].
    pub fn error(&self) -> Option<&ResourceError> {
        match self {
            Resource::Error(_, cause) => Some(cause),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Resource::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resource::Error(_, _))
    }

    /// Applies `f` to the payload, preserving the variant.
    ///
    /// `Loading` stays `Loading`, `Success` stays `Success`, and `Error`
    /// keeps its cause unchanged.
    pub fn map<R>(self, f: impl FnOnce(Option<T>) -> Option<R>) -> Resource<R> {
        match self {
            Resource::Loading(value) => Resource::Loading(f(value)),
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(value, cause) => Resource::Error(f(value), cause),
        }
    }

    /// Remaps the failure cause of an [`Resource::Error`].
    ///
    /// `Loading` and `Success` pass through unchanged, payload untouched.
    pub fn map_error(self, f: impl FnOnce(ResourceError) -> ResourceError) -> Resource<T> {
        match self {
            Resource::Error(value, cause) => Resource::Error(value, f(cause)),
            other => other,
        }
    }

    /// Merges two independent resources into one.
    ///
    /// The resulting variant follows the priority `Error > Loading >
    /// Success`; `f` always receives both payloads. When both sides are
    /// errors the left operand's cause wins.
    pub fn combine<D, R>(
        self,
        other: Resource<D>,
        f: impl FnOnce(Option<T>, Option<D>) -> Option<R>,
    ) -> Resource<R> {
        match (self, other) {
            (Resource::Success(a), Resource::Success(b)) => Resource::Success(f(a, b)),
            (Resource::Success(a), Resource::Loading(b)) => Resource::Loading(f(a, b)),
            (Resource::Success(a), Resource::Error(b, cause)) => Resource::Error(f(a, b), cause),
            (Resource::Loading(a), Resource::Success(b)) => Resource::Loading(f(a, b)),
            (Resource::Loading(a), Resource::Loading(b)) => Resource::Loading(f(a, b)),
            (Resource::Loading(a), Resource::Error(b, cause)) => Resource::Error(f(a, b), cause),
            (Resource::Error(a, cause), Resource::Success(b)) => Resource::Error(f(a, b), cause),
            (Resource::Error(a, cause), Resource::Loading(b)) => Resource::Error(f(a, b), cause),
            (Resource::Error(a, cause), Resource::Error(b, _)) => Resource::Error(f(a, b), cause),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fmt;

    #[derive(Debug)]
    struct TestError(&'static str);

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestError {}

    fn cause(label: &'static str) -> ResourceError {
        Arc::new(TestError(label))
    }

    #[test]
    fn test_value_returns_payload_for_all_variants() {
        assert_eq!(Resource::Loading(Some(1)).value(), Some(&1));
        assert_eq!(Resource::Success(Some(2)).value(), Some(&2));
        assert_eq!(Resource::Error(Some(3), cause("boom")).value(), Some(&3));
        assert_eq!(Resource::<i32>::Loading(None).value(), None);
    }

    #[test]
    fn test_map_preserves_variant() {
        let loading = Resource::Loading(Some(1)).map(|v| v.map(|n| n * 10));
        assert!(loading.is_loading());
        assert_eq!(loading.value(), Some(&10));

        let success = Resource::Success(Some(2)).map(|v| v.map(|n| n * 10));
        assert!(success.is_success());
        assert_eq!(success.value(), Some(&20));

        let error = Resource::Error(Some(3), cause("boom")).map(|v| v.map(|n| n * 10));
        assert!(error.is_error());
        assert_eq!(error.value(), Some(&30));
    }

    #[test]
    fn test_map_keeps_error_cause() {
        let original = cause("boom");
        let mapped = Resource::Error(Some(1), Arc::clone(&original)).map(|v| v);
        let kept = mapped.error().unwrap();
        assert!(Arc::ptr_eq(kept, &original));
    }

    #[test]
    fn test_map_error_remaps_cause_only_for_error() {
        let remapped = Resource::Error(Some(1), cause("boom")).map_error(|_| cause("wrapped"));
        assert_eq!(remapped.error().unwrap().to_string(), "wrapped");
        assert_eq!(remapped.value(), Some(&1));

        let success = Resource::Success(Some(1)).map_error(|_| cause("wrapped"));
        assert!(success.is_success());

        let loading = Resource::<i32>::Loading(None).map_error(|_| cause("wrapped"));
        assert!(loading.is_loading());
    }

    #[test]
    fn test_combine_both_success() {
        let merged = Resource::Success(Some(1)).combine(Resource::Success(Some(2)), |a, b| {
            Some((a?, b?))
        });
        assert!(merged.is_success());
        assert_eq!(merged.value(), Some(&(1, 2)));
    }

    #[test]
    fn test_combine_loading_dominates_success() {
        let merged = Resource::Success(Some(1))
            .combine(Resource::<i32>::Loading(None), |a, _| a);
        assert!(merged.is_loading());
        assert_eq!(merged.value(), Some(&1));

        let merged = Resource::<i32>::Loading(Some(1))
            .combine(Resource::Success(Some(2)), |a, _| a);
        assert!(merged.is_loading());
    }

    #[test]
    fn test_combine_error_dominates_loading() {
        let merged = Resource::<i32>::Loading(Some(1))
            .combine(Resource::<i32>::Error(None, cause("right")), |a, _| a);
        assert!(merged.is_error());
        assert_eq!(merged.error().unwrap().to_string(), "right");

        let merged = Resource::<i32>::Error(Some(1), cause("left"))
            .combine(Resource::<i32>::Loading(None), |a, _| a);
        assert_eq!(merged.error().unwrap().to_string(), "left");
    }

    #[test]
    fn test_combine_double_error_is_left_biased() {
        let left = cause("left");
        let merged = Resource::<i32>::Error(Some(1), Arc::clone(&left))
            .combine(Resource::<i32>::Error(Some(2), cause("right")), |a, b| {
                Some(a.unwrap_or(0) + b.unwrap_or(0))
            });
        let kept = merged.error().unwrap();
        assert!(Arc::ptr_eq(kept, &left));
        assert_eq!(merged.value(), Some(&3));
    }

    #[test]
    fn test_combine_passes_both_payloads() {
        let merged = Resource::Success(Some(40)).combine(
            Resource::<i32>::Error(Some(2), cause("boom")),
            |a, b| Some(a.unwrap_or(0) + b.unwrap_or(0)),
        );
        assert!(merged.is_error());
        assert_eq!(merged.value(), Some(&42));
    }

    // Variant tag used to drive property tests.
    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Tag {
        Loading,
        Success,
        Error,
    }

    fn build(tag: Tag, payload: Option<i32>) -> Resource<i32> {
        match tag {
            Tag::Loading => Resource::Loading(payload),
            Tag::Success => Resource::Success(payload),
            Tag::Error => Resource::Error(payload, cause("prop")),
        }
    }

    fn tag_of<T>(resource: &Resource<T>) -> Tag {
        match resource {
            Resource::Loading(_) => Tag::Loading,
            Resource::Success(_) => Tag::Success,
            Resource::Error(_, _) => Tag::Error,
        }
    }

    fn any_tag() -> impl Strategy<Value = Tag> {
        prop_oneof![Just(Tag::Loading), Just(Tag::Success), Just(Tag::Error)]
    }

    proptest! {
        #[test]
        fn prop_map_preserves_tag(tag in any_tag(), payload in proptest::option::of(any::<i32>())) {
            let mapped = build(tag, payload).map(|v| v.map(|n| n.wrapping_mul(2)));
            prop_assert_eq!(tag_of(&mapped), tag);
        }

        #[test]
        fn prop_combine_follows_precedence(
            left in any_tag(),
            right in any_tag(),
            a in proptest::option::of(any::<i32>()),
            b in proptest::option::of(any::<i32>()),
        ) {
            let merged = build(left, a).combine(build(right, b), |x, y| {
                Some(x.unwrap_or(0).wrapping_add(y.unwrap_or(0)))
            });

            let expected = match (left, right) {
                (Tag::Error, _) | (_, Tag::Error) => Tag::Error,
                (Tag::Loading, _) | (_, Tag::Loading) => Tag::Loading,
                (Tag::Success, Tag::Success) => Tag::Success,
            };
            prop_assert_eq!(tag_of(&merged), expected);

            // The combiner always sees both payloads.
            prop_assert_eq!(
                merged.value().copied(),
                Some(a.unwrap_or(0).wrapping_add(b.unwrap_or(0)))
            );
        }
    }
}
