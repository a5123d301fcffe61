//! Prime generation.

use crate::error::{GapError, Result};

/// All primes `<= bound`, in increasing order (sieve of Eratosthenes).
///
/// A bound below 2 contains no prime and therefore no gap; it is rejected
/// rather than answered with an empty sequence. A bound whose table cannot
/// be allocated is [`GapError::BoundTooLarge`].
pub fn sieve_primes(bound: u64) -> Result<Vec<u64>> {
    if bound < 2 {
        return Err(GapError::InvalidBound { bound });
    }
    let too_large = || GapError::BoundTooLarge { bound };
    let limit = usize::try_from(bound).map_err(|_| too_large())?;
    let len = limit.checked_add(1).ok_or_else(too_large)?;

    let mut composite: Vec<bool> = Vec::new();
    composite.try_reserve_exact(len).map_err(|_| too_large())?;
    composite.resize(len, false);
    let mut primes: Vec<u64> = Vec::new();
    primes
        .try_reserve_exact(prime_count_estimate(limit))
        .map_err(|_| too_large())?;
    primes.push(2);

    let mut i = 3;
    while i * i <= limit {
        if !composite[i] {
            // Even multiples are never visited below.
            let mut j = i * i;
            while j <= limit {
                composite[j] = true;
                j += 2 * i;
            }
        }
        i += 2;
    }

    let mut n = 3;
    while n <= limit {
        if !composite[n] {
            primes.push(n as u64);
        }
        n += 2;
    }

    Ok(primes)
}

/// Deterministic trial-division primality check.
pub fn is_prime(n: u64) -> bool {
    match n {
        0 | 1 => false,
        2 | 3 => true,
        _ if n % 2 == 0 || n % 3 == 0 => false,
        _ => {
            let mut d = 5u64;
            while d.saturating_mul(d) <= n {
                if n % d == 0 || n % (d + 2) == 0 {
                    return false;
                }
                d += 6;
            }
            true
        }
    }
}

fn prime_count_estimate(limit: usize) -> usize {
    if limit < 17 {
        return 8;
    }
    let x = limit as f64;
    (1.26 * x / x.ln()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_bound_yields_known_primes() {
        let primes = sieve_primes(30).expect("bound 30 is valid");
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn bound_is_inclusive() {
        assert_eq!(sieve_primes(2).expect("bound 2 is valid"), vec![2]);
        assert_eq!(sieve_primes(3).expect("bound 3 is valid"), vec![2, 3]);
        assert_eq!(sieve_primes(97).expect("valid").last(), Some(&97));
    }

    #[test]
    fn bound_below_two_is_rejected() {
        for bound in [0, 1] {
            match sieve_primes(bound) {
                Err(GapError::InvalidBound { bound: b }) => assert_eq!(b, bound),
                other => panic!("expected invalid bound, got {other:?}"),
            }
        }
    }

    #[test]
    fn unallocatable_bound_is_an_error() {
        for bound in [u64::MAX, 1 << 60] {
            match sieve_primes(bound) {
                Err(GapError::BoundTooLarge { bound: b }) => assert_eq!(b, bound),
                other => panic!("expected bound too large, got {other:?}"),
            }
        }
        let err = sieve_primes(u64::MAX).expect_err("u64::MAX cannot be sieved");
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn sequence_is_strictly_increasing_and_prime() {
        for bound in [2, 10, 1_000, 65_537] {
            let primes = sieve_primes(bound).expect("valid bound");
            assert!(primes.windows(2).all(|w| w[0] < w[1]));
            assert!(primes.iter().all(|&p| is_prime(p) && p <= bound));
        }
    }

    #[test]
    fn sieve_is_complete() {
        let primes = sieve_primes(10_000).expect("valid bound");
        let expected: Vec<u64> = (0..=10_000).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, expected);
        assert_eq!(primes.len(), 1229);
    }

    #[test]
    fn trial_division_edge_cases() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(is_prime(1_000_003));
        assert!(!is_prime(1_000_001));
    }
}
