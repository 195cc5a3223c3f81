//! Structural comparison of attribute maps.

use crate::schema::Params;

/// Returns the entries of `a` that are missing from `b` or whose value
/// differs from `b`'s.
///
/// Keys present only in `b` are not reported: an alteration is described
/// from `a`'s own attribute set.
#[must_use]
pub fn compare_dicts(a: &Params, b: &Params) -> Params {
    a.iter()
        .filter(|(key, value)| b.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
