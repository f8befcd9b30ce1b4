//! Codec for the catalog's textual factorization format.
//!
//! An entry is one of:
//! - a string starting with `no_fac`: no factorization is available;
//! - `[]`: no prime factors (the value is 1 or -1);
//! - `[[b1,e1],[b2,e2],...]`: base/exponent pairs.

use num_bigint::BigInt;
use seqscope_core::{Factor, Factorization};

use crate::error::CatalogError;

/// Prefix of the "no factorization available" sentinel.
pub const NO_FACTORIZATION: &str = "no_fac";

/// Decode one factorization entry.
///
/// ```
/// use seqscope_core::{Factor, Factorization};
/// use seqscope_oeis::factors::parse_factor_string;
///
/// let f = parse_factor_string("[[2,3],[5,1]]").unwrap();
/// assert_eq!(f, Factorization::Known(vec![Factor::new(2, 3), Factor::new(5, 1)]));
/// assert!(parse_factor_string("no_fac").unwrap().is_unknown());
/// ```
pub fn parse_factor_string(raw: &str) -> Result<Factorization, CatalogError> {
    let text = raw.trim();
    if text.starts_with(NO_FACTORIZATION) {
        return Ok(Factorization::Unknown);
    }
    if text == "[]" {
        return Ok(Factorization::Known(Vec::new()));
    }
    let bad = || CatalogError::BadFactorString(raw.to_string());
    let inner = text
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
        .ok_or_else(bad)?;
    inner
        .split("],[")
        .map(|pair| {
            let (base, exponent) = pair.split_once(',').ok_or_else(bad)?;
            let base: BigInt = base.trim().parse().map_err(|_| bad())?;
            let exponent: u32 = exponent.trim().parse().map_err(|_| bad())?;
            if exponent == 0 {
                return Err(bad());
            }
            Ok(Factor { base, exponent })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Factorization::Known)
}

/// Encode a factorization in the catalog's format.
pub fn encode_factor_string(factors: &Factorization) -> String {
    match factors {
        Factorization::Unknown => NO_FACTORIZATION.to_string(),
        Factorization::Known(pairs) => {
            let body = pairs
                .iter()
                .map(|f| format!("[{},{}]", f.base, f.exponent))
                .collect::<Vec<_>>()
                .join(",");
            format!("[{body}]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_variants() {
        assert_eq!(parse_factor_string("no_fac").unwrap(), Factorization::Unknown);
        assert_eq!(
            parse_factor_string("no_fac: too large").unwrap(),
            Factorization::Unknown
        );
        assert_eq!(parse_factor_string("[]").unwrap(), Factorization::one());
    }

    #[test]
    fn pairs_with_sign_and_big_bases() {
        let f = parse_factor_string("[[-1,1],[3,2],[1000000000000000000000007,1]]").unwrap();
        let pairs = f.factors().unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], Factor::new(-1, 1));
        assert_eq!(pairs[1], Factor::new(3, 2));
        assert_eq!(pairs[2].base.to_string(), "1000000000000000000000007");
    }

    #[test]
    fn single_pair_and_whitespace() {
        assert_eq!(
            parse_factor_string(" [[7, 2]] ").unwrap(),
            Factorization::Known(vec![Factor::new(7, 2)])
        );
        assert_eq!(parse_factor_string("[[0,1]]").unwrap(), Factorization::zero());
    }

    #[test]
    fn malformed_entries() {
        for bad in ["", "[", "[[2,3]", "[[2]]", "[[x,1]]", "[[2,0]]", "[[2,-1]]", "2^3"] {
            assert!(
                matches!(parse_factor_string(bad), Err(CatalogError::BadFactorString(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn encode_matches_catalog_format() {
        let f = Factorization::Known(vec![Factor::new(2, 3), Factor::new(5, 1)]);
        assert_eq!(encode_factor_string(&f), "[[2,3],[5,1]]");
        assert_eq!(encode_factor_string(&Factorization::one()), "[]");
        assert_eq!(encode_factor_string(&Factorization::Unknown), "no_fac");
        assert_eq!(parse_factor_string(&encode_factor_string(&f)).unwrap(), f);
    }
}
