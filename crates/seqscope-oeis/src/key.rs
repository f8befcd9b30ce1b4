//! Compact export key for remote-backed sequences.
//!
//! Format: `@` followed by external id, count, modulus and display name,
//! separated by `~`. The name is last and may itself contain `~`.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::error::CatalogError;

/// Leading marker of an export key.
pub const KEY_MARKER: char = '@';
/// Field separator of an export key.
pub const KEY_SEPARATOR: char = '~';

/// Decoded export key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportKey {
    pub id: String,
    pub count: u64,
    pub modulus: BigInt,
    pub name: String,
}

impl FromStr for ExportKey {
    type Err = CatalogError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| CatalogError::BadKey {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        let body = key
            .strip_prefix(KEY_MARKER)
            .ok_or_else(|| bad("missing leading '@'"))?;
        let fields: Vec<&str> = body.splitn(4, KEY_SEPARATOR).collect();
        let [id, count, modulus, name] = fields.as_slice() else {
            return Err(bad("expected 4 fields"));
        };
        Ok(Self {
            id: id.to_string(),
            count: count.parse().map_err(|_| bad("count is not a number"))?,
            modulus: modulus.parse().map_err(|_| bad("modulus is not an integer"))?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{KEY_MARKER}{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
            self.id, self.count, self.modulus, self.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fields() {
        let key: ExportKey = "@A000045~500~7~Fibonacci".parse().unwrap();
        assert_eq!(key.id, "A000045");
        assert_eq!(key.count, 500);
        assert_eq!(key.modulus, BigInt::from(7));
        assert_eq!(key.name, "Fibonacci");
    }

    #[test]
    fn name_may_contain_separator() {
        let key: ExportKey = "@A000040~10~0~primes ~ mod nothing".parse().unwrap();
        assert_eq!(key.name, "primes ~ mod nothing");
        assert_eq!(key.to_string(), "@A000040~10~0~primes ~ mod nothing");
    }

    #[test]
    fn empty_name_allowed() {
        let key: ExportKey = "@A000040~10~0~".parse().unwrap();
        assert_eq!(key.name, "");
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "A000045~1000~0~F",
            "@A000045~1000~0",
            "@A000045",
            "",
            "@A000045~many~0~F",
            "@A000045~10~x~F",
        ] {
            assert!(
                matches!(bad.parse::<ExportKey>(), Err(CatalogError::BadKey { .. })),
                "{bad:?}"
            );
        }
    }
}
