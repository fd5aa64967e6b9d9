//! Random helpers used to order answers and pick distractors.

use rand::{seq::SliceRandom, Rng};

use crate::{Error, Result};

/// Returns a uniformly random permutation of `items`, leaving `items` as is.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Picks `k` distinct elements of `items` without replacement, in random
/// order.
///
/// Equal elements of `items` count once. Asking for more elements than there
/// are distinct ones is an error rather than a shorter result; callers that
/// want "up to `k`" clamp the request themselves.
pub fn random_choices<T: Clone + PartialEq, R: Rng + ?Sized>(
    items: &[T],
    k: usize,
    rng: &mut R,
) -> Result<Vec<T>> {
    let mut distinct: Vec<&T> = Vec::with_capacity(items.len());
    for item in items {
        if !distinct.contains(&item) {
            distinct.push(item);
        }
    }

    if k > distinct.len() {
        return Err(Error::NotEnoughChoices {
            requested: k,
            available: distinct.len(),
        });
    }

    Ok(distinct
        .choose_multiple(rng, k)
        .map(|item| (*item).clone())
        .collect())
}
