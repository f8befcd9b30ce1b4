//! CLI output formatting.

use std::io::{self, Write};

use num_bigint::BigInt;
use seqscope_core::{Factorization, Index};
use serde::Serialize;

/// One printed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub index: Index,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<String>,
}

impl Row {
    #[must_use]
    pub fn new(index: Index, value: &BigInt, factors: Option<&Factorization>) -> Self {
        Self {
            index,
            value: value.to_string(),
            factors: factors.map(ToString::to_string),
        }
    }
}

/// Format a row as `index: value` with an optional `= factorization`.
#[must_use]
pub fn format_row(row: &Row) -> String {
    match &row.factors {
        Some(factors) => format!("{}: {} = {factors}", row.index, row.value),
        None => format!("{}: {}", row.index, row.value),
    }
}

/// Write all rows as text lines or as one JSON array.
pub fn write_rows(out: &mut dyn Write, rows: &[Row], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        writeln!(out)?;
    } else {
        for row in rows {
            writeln!(out, "{}", format_row(row))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use seqscope_core::Factor;

    use super::*;

    #[test]
    fn text_lines() {
        let f = Factorization::Known(vec![Factor::new(2, 3), Factor::new(5, 1)]);
        let rows = [
            Row::new(40, &BigInt::from(40), Some(&f)),
            Row::new(41, &BigInt::from(41), None),
        ];
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "40: 40 = 2^3 × 5\n41: 41\n");
    }

    #[test]
    fn json_array() {
        let rows = [
            Row::new(0, &BigInt::from(-7), Some(&Factorization::Unknown)),
            Row::new(1, &BigInt::from(3), None),
        ];
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["value"], "-7");
        assert_eq!(parsed[0]["factors"], "unknown");
        assert!(parsed[1].get("factors").is_none());
    }
}
