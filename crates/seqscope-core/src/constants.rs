//! Constants for cache growth, factorization limits, and process exit codes.

/// Default minimum number of entries materialized per cache growth event.
pub const DEFAULT_CACHE_BLOCK: u64 = 128;

/// Largest integer exactly representable in an IEEE-754 double (2^53 - 1).
///
/// Values beyond this magnitude may already have lost precision upstream,
/// so the trial-division factorizer refuses to certify them.
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Deepest nesting of parentheses, operators and unary minus accepted in a
/// formula. Parsing and evaluation recurse once per level.
pub const MAX_FORMULA_DEPTH: usize = 128;

/// Largest intermediate result, in bits, a formula may produce at any index.
pub const MAX_FORMULA_BITS: u64 = 1 << 20;

/// Upper bound (exclusive) of the sieve used to build [`SMALL_PRIMES`].
pub const SMALL_PRIME_LIMIT: usize = 1000;

/// Number of primes below [`SMALL_PRIME_LIMIT`].
pub const SMALL_PRIME_COUNT: usize = 168;

/// Smallest prime not present in [`SMALL_PRIMES`].
pub const FIRST_UNTABULATED_PRIME: u64 = 1009;

/// A cofactor with no prime divisor in [`SMALL_PRIMES`] that is below this
/// bound must itself be prime.
pub const CERTIFIED_PRIME_BOUND: u64 = FIRST_UNTABULATED_PRIME * FIRST_UNTABULATED_PRIME;

/// All primes below 1000, computed at compile time with a sieve.
#[allow(clippy::cast_possible_truncation)]
pub const SMALL_PRIMES: [u32; SMALL_PRIME_COUNT] = {
    let mut sieve = [true; SMALL_PRIME_LIMIT];
    sieve[0] = false;
    sieve[1] = false;
    let mut i = 2;
    while i * i < SMALL_PRIME_LIMIT {
        if sieve[i] {
            let mut j = i * i;
            while j < SMALL_PRIME_LIMIT {
                sieve[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    let mut table = [0u32; SMALL_PRIME_COUNT];
    let mut k = 0;
    let mut n = 0;
    while n < SMALL_PRIME_LIMIT {
        if sieve[n] {
            table[k] = n as u32;
            k += 1;
        }
        n += 1;
    }
    table
};

/// Process exit codes for the command-line front end.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A cache fill was requested while another was unfinished.
    pub const ERROR_CACHING: i32 = 5;
    /// Requested index lies outside the sequence bounds.
    pub const ERROR_RANGE: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_primes_first_values() {
        assert_eq!(&SMALL_PRIMES[..10], &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn small_primes_last_value() {
        assert_eq!(SMALL_PRIMES[SMALL_PRIME_COUNT - 1], 997);
    }

    #[test]
    fn small_primes_are_prime() {
        for &p in &SMALL_PRIMES {
            let p = u64::from(p);
            assert!((2..p).take_while(|d| d * d <= p).all(|d| p % d != 0), "{p}");
        }
    }

    #[test]
    fn certified_bound() {
        assert_eq!(CERTIFIED_PRIME_BOUND, 1_018_081);
    }

    #[test]
    fn exit_codes_are_distinct_and_skip_usage_code() {
        use exit_codes::*;
        let codes = [SUCCESS, ERROR_GENERIC, ERROR_RANGE, ERROR_CONFIG, ERROR_CACHING];
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| a != b));
        }
        // clap exits with 2 on usage errors.
        assert!(!codes.contains(&2));
    }
}
