//! Property tests for the catalog's textual formats.

use proptest::prelude::*;

use seqscope_oeis::factors::{encode_factor_string, parse_factor_string};
use seqscope_oeis::ExportKey;

proptest! {
    #[test]
    fn factor_parser_never_panics(raw in "\\PC{0,40}") {
        let _ = parse_factor_string(&raw);
    }

    #[test]
    fn bracketed_noise_never_panics(raw in "\\[\\[[-0-9,\\[\\] ]{0,30}\\]\\]") {
        if let Ok(factors) = parse_factor_string(&raw) {
            prop_assert_eq!(parse_factor_string(&encode_factor_string(&factors)).unwrap(), factors);
        }
    }

    #[test]
    fn key_names_survive_printing(
        id in "A[0-9]{6}",
        count in 1u64..100_000,
        modulus in 0u32..1000,
        name in "[ -~]{0,20}",
    ) {
        let text = format!("@{id}~{count}~{modulus}~{name}");
        let key: ExportKey = text.parse().unwrap();
        prop_assert_eq!(&key.name, &name);
        prop_assert_eq!(key.to_string(), text);
    }
}
