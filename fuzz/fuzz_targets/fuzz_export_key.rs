#![no_main]

use libfuzzer_sys::fuzz_target;

use seqscope_oeis::ExportKey;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(key) = text.parse::<ExportKey>() {
        let reparsed: ExportKey = key.to_string().parse().expect("printed key must parse");
        assert_eq!(key, reparsed);
    }
});
