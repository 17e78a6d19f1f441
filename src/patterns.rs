//! Exhaustive input-pattern generation via a full-period linear congruential
//! generator.

use rand::Rng;

/// Generate every `length`-bit pattern exactly once, in an order fixed by a
/// full-period LCG (Hull–Dobell: modulus `m = 2^length`, multiplier `a = 5`,
/// increment `c = 1`, which divides `m` for all `length >= 1` and together
/// with `a - 1` being a multiple of every prime factor of `m` — here just 2
/// — guarantees period `m`).
///
/// The starting seed is drawn from the thread RNG, so two calls enumerate
/// the same set of patterns in different orders.
///
/// # Panics
///
/// Panics if `length` is 0 or greater than 63 (so `2^length` fits in a
/// `u64` with room for the multiply-by-5 step without overflow).
pub fn random_patterns(length: u32) -> impl Iterator<Item = String> {
    assert!(
        (1..=63).contains(&length),
        "random_patterns: length must be in 1..=63, got {length}"
    );
    let modulus: u64 = 1u64 << length;
    let mut state: u64 = rand::thread_rng().gen_range(0..modulus);
    let total = modulus;
    let mut emitted: u64 = 0;
    std::iter::from_fn(move || {
        if emitted >= total {
            return None;
        }
        state = (5u64.wrapping_mul(state).wrapping_add(1)) % modulus;
        emitted += 1;
        Some(format!("{state:0width$b}", width = length as usize))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exhaustive_no_repeats() {
        let patterns: Vec<String> = random_patterns(6).collect();
        assert_eq!(patterns.len(), 1 << 6);
        let unique: HashSet<&String> = patterns.iter().collect();
        assert_eq!(unique.len(), 1 << 6);
    }

    #[test]
    fn test_pattern_width() {
        for p in random_patterns(5) {
            assert_eq!(p.len(), 5);
            assert!(p.chars().all(|c| c == '0' || c == '1'));
        }
    }

    #[test]
    fn test_different_orders_across_calls() {
        let a: Vec<String> = random_patterns(8).collect();
        let b: Vec<String> = random_patterns(8).collect();
        let set_a: HashSet<&String> = a.iter().collect();
        let set_b: HashSet<&String> = b.iter().collect();
        assert_eq!(set_a, set_b);
    }

    #[test]
    #[should_panic]
    fn test_zero_length_panics() {
        let _ = random_patterns(0).next();
    }
}
