#![no_main]

use libfuzzer_sys::fuzz_target;

use seqscope_oeis::factors::{encode_factor_string, parse_factor_string};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Anything that decodes must re-encode to something that decodes the same.
    if let Ok(factors) = parse_factor_string(text) {
        let again = parse_factor_string(&encode_factor_string(&factors))
            .expect("re-encoded factorization must parse");
        assert_eq!(factors, again);
    }
});
