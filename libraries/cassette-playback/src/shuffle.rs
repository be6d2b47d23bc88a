//! Shuffled queue construction
//!
//! The shuffled order is always derived from scratch: the anchor (normally the
//! current track) first, then every other queue entry in a Fisher-Yates
//! permutation.

use crate::types::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Build a shuffled queue anchored at `anchor`
///
/// The anchor is prepended whether or not it appears in `queue`; every entry
/// of `queue` with the anchor's id is left out of the permuted remainder.
/// Deterministic for a seeded `rng`.
pub fn build_shuffled_queue<R>(queue: &[Track], anchor: &Track, rng: &mut R) -> Vec<Track>
where
    R: Rng + ?Sized,
{
    let mut rest: Vec<Track> = queue
        .iter()
        .filter(|t| t.id != anchor.id)
        .cloned()
        .collect();
    rest.shuffle(rng);

    let mut shuffled = Vec::with_capacity(rest.len() + 1);
    shuffled.push(anchor.clone());
    shuffled.extend(rest);
    shuffled
}
