#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigInt;

use seqscope_core::formula::Expr;

// Nesting and result size are bounded by the parser and evaluator, so
// arbitrary input must come back as a value or an error.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > 4096 {
        return;
    }
    let n = BigInt::from(i8::from_le_bytes([data[0]]));
    let Ok(source) = std::str::from_utf8(&data[1..]) else {
        return;
    };
    if let Ok(expr) = Expr::parse(source) {
        let _ = expr.evaluate(&n);
    }
});
