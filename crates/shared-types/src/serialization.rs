//! Inflation helpers for loosely-typed chain primitives.

use std::collections::HashSet;

use crate::errors::ValidationError;
use crate::values::ChallengeId;

/// Inflate a fixed-size, zero-padded identifier array returned by a contract.
///
/// Sentinel (`0`) entries and repeated identifiers are dropped; the remaining
/// identifiers keep their original order.
pub fn inflate_challenge_ids<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ChallengeId>, ValidationError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        let id = ChallengeId::parse(value.as_ref())?;
        if !id.is_sentinel() && seen.insert(id) {
            ids.push(id);
        }
    }
    Ok(ids)
}
