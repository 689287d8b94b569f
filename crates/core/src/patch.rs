//! Helpers for explicit partial updates.
//!
//! Update DTOs use `Option<T>` for required columns (absent = keep, present =
//! set) and `Option<Option<T>>` for nullable columns, where the outer option
//! records presence and the inner option carries an explicit `null`. A field
//! that is present but empty or zero is applied (after validation), never
//! silently skipped.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field so that `null` and "absent" stay distinct.
///
/// Use together with `#[serde(default)]`:
///
/// ```
/// use serde::Deserialize;
/// use gigboard_core::patch::double_option;
///
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "double_option")]
///     deadline: Option<Option<String>>,
/// }
///
/// let absent: Patch = serde_json::from_str("{}").unwrap();
/// assert_eq!(absent.deadline, None);
/// let cleared: Patch = serde_json::from_str(r#"{"deadline": null}"#).unwrap();
/// assert_eq!(cleared.deadline, Some(None));
/// ```
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Resolve a nullable patch field against the current value.
pub fn merge_nullable<T: Clone>(patch: &Option<Option<T>>, current: &Option<T>) -> Option<T> {
    match patch {
        Some(next) => next.clone(),
        None => current.clone(),
    }
}
