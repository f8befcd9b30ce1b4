//! Sequences defined by an integer formula in `n`.
//!
//! Formulas use `+ - * / % ^`, unary minus, parentheses, integer literals
//! and the variable `n`. Evaluation is exact over `BigInt`: `/` is floor
//! division, `%` is the nonnegative-divisor floor modulus, and dividing by
//! zero yields zero. Parsing happens at construction, so a malformed
//! formula is rejected before `initialize()` is ever called.
//!
//! Formulas nested deeper than [`MAX_FORMULA_DEPTH`] are rejected as invalid,
//! and an evaluation whose result would exceed [`MAX_FORMULA_BITS`] fails.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Pow, Signed, ToPrimitive, Zero};

use crate::cached::{Cached, TrialDivision, ValueHook};
use crate::constants::{MAX_FORMULA_BITS, MAX_FORMULA_DEPTH};
use crate::options::CacheOptions;
use crate::sequence::{Index, SequenceError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(BigInt),
    Var,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

/// Parsed formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(BigInt),
    Var,
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Parse `source` into an expression tree.
    pub fn parse(source: &str) -> Result<Self, SequenceError> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            tokens,
            index: 0,
            nesting: 0,
        };
        let (expr, _) = parser.parse_add_sub()?;
        if parser.index != parser.tokens.len() {
            return Err(invalid("unexpected trailing tokens"));
        }
        Ok(expr)
    }

    /// Evaluate at `n`.
    pub fn evaluate(&self, n: &BigInt) -> Result<BigInt, SequenceError> {
        match self {
            Self::Number(value) => Ok(value.clone()),
            Self::Var => Ok(n.clone()),
            Self::Negate(inner) => Ok(-inner.evaluate(n)?),
            Self::Binary { op, left, right } => {
                let a = left.evaluate(n)?;
                let b = right.evaluate(n)?;
                apply(*op, &a, &b)
            }
        }
    }
}

fn too_large() -> SequenceError {
    SequenceError::Calculation(format!(
        "result too large: formula values are limited to {MAX_FORMULA_BITS} bits"
    ))
}

fn apply(op: BinaryOp, a: &BigInt, b: &BigInt) -> Result<BigInt, SequenceError> {
    Ok(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => {
            if a.bits() + b.bits() > MAX_FORMULA_BITS {
                return Err(too_large());
            }
            a * b
        }
        BinaryOp::Divide if b.is_zero() => BigInt::zero(),
        BinaryOp::Divide => a.div_floor(b),
        BinaryOp::Modulo if b.is_zero() => BigInt::zero(),
        BinaryOp::Modulo => a.mod_floor(&b.abs()),
        BinaryOp::Power => {
            if b.is_negative() {
                return Err(SequenceError::Calculation(format!(
                    "negative exponent {b} in integer formula"
                )));
            }
            let exponent = b.to_u32().ok_or_else(|| {
                SequenceError::Calculation(format!("exponent {b} is too large"))
            })?;
            // 0, 1 and -1 stay small under any exponent.
            if a.bits() > 1 && a.bits().saturating_mul(u64::from(exponent)) > MAX_FORMULA_BITS {
                return Err(too_large());
            }
            Pow::pow(a, exponent)
        }
    })
}

fn invalid(message: &str) -> SequenceError {
    SequenceError::InvalidConfig(format!("could not parse formula: {message}"))
}

fn tokenize(source: &str) -> Result<Vec<Token>, SequenceError> {
    let bytes = source.as_bytes();
    let mut idx = 0usize;
    let mut tokens = Vec::new();
    while idx < bytes.len() {
        let b = bytes[idx];
        if b.is_ascii_whitespace() {
            idx += 1;
            continue;
        }
        let token = match b {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'%' => Token::Percent,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'n' => Token::Var,
            _ if b.is_ascii_digit() => {
                let start = idx;
                while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                    idx += 1;
                }
                let raw = &source[start..idx];
                let value = raw
                    .parse::<BigInt>()
                    .map_err(|e| invalid(&format!("invalid literal '{raw}': {e}")))?;
                tokens.push(Token::Number(value));
                continue;
            }
            _ => {
                return Err(invalid(&format!(
                    "unsupported character '{}'",
                    source[idx..].chars().next().unwrap_or('?')
                )))
            }
        };
        tokens.push(token);
        idx += 1;
    }
    if tokens.is_empty() {
        return Err(invalid("formula is empty"));
    }
    Ok(tokens)
}

/// An expression together with the depth of its tree.
type Parsed = (Expr, usize);

fn too_deep() -> SequenceError {
    invalid(&format!("formula nested too deeply (limit {MAX_FORMULA_DEPTH})"))
}

fn binary(op: BinaryOp, (left, ld): Parsed, (right, rd): Parsed) -> Result<Parsed, SequenceError> {
    let depth = ld.max(rd) + 1;
    if depth > MAX_FORMULA_DEPTH {
        return Err(too_deep());
    }
    let expr = Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    };
    Ok((expr, depth))
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    /// Run `rule` one nesting level down.
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<Parsed, SequenceError>,
    ) -> Result<Parsed, SequenceError> {
        if self.nesting >= MAX_FORMULA_DEPTH {
            return Err(too_deep());
        }
        self.nesting += 1;
        let parsed = rule(self)?;
        self.nesting -= 1;
        Ok(parsed)
    }

    fn parse_add_sub(&mut self) -> Result<Parsed, SequenceError> {
        let mut parsed = self.parse_mul_div()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => break,
            };
            let _ = self.consume();
            let rhs = self.parse_mul_div()?;
            parsed = binary(op, parsed, rhs)?;
        }
        Ok(parsed)
    }

    fn parse_mul_div(&mut self) -> Result<Parsed, SequenceError> {
        let mut parsed = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                Some(Token::Percent) => BinaryOp::Modulo,
                _ => break,
            };
            let _ = self.consume();
            let rhs = self.parse_unary()?;
            parsed = binary(op, parsed, rhs)?;
        }
        Ok(parsed)
    }

    fn parse_unary(&mut self) -> Result<Parsed, SequenceError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            let _ = self.consume();
            let (inner, depth) = self.nested(Self::parse_unary)?;
            if depth + 1 > MAX_FORMULA_DEPTH {
                return Err(too_deep());
            }
            return Ok((Expr::Negate(Box::new(inner)), depth + 1));
        }
        self.parse_power()
    }

    // Right-associative, binds tighter than unary minus on its left.
    fn parse_power(&mut self) -> Result<Parsed, SequenceError> {
        let base = self.parse_primary()?;
        if matches!(self.peek(), Some(Token::Caret)) {
            let _ = self.consume();
            let exponent = self.nested(Self::parse_unary)?;
            return binary(BinaryOp::Power, base, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Parsed, SequenceError> {
        match self.consume() {
            Some(Token::Number(value)) => Ok((Expr::Number(value), 0)),
            Some(Token::Var) => Ok((Expr::Var, 0)),
            Some(Token::LParen) => {
                let parsed = self.nested(Self::parse_add_sub)?;
                if !matches!(self.consume(), Some(Token::RParen)) {
                    return Err(invalid("missing ')'"));
                }
                Ok(parsed)
            }
            _ => Err(invalid("unexpected token")),
        }
    }
}

/// Value hook evaluating a parsed formula.
#[derive(Debug, Clone)]
pub struct FormulaValues {
    source: String,
    expr: Expr,
}

impl FormulaValues {
    pub fn new(source: &str) -> Result<Self, SequenceError> {
        Ok(Self {
            source: source.trim().to_string(),
            expr: Expr::parse(source)?,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl ValueHook for FormulaValues {
    fn calculate(&mut self, n: Index) -> Result<BigInt, SequenceError> {
        self.expr.evaluate(&BigInt::from(n))
    }
}

pub type FormulaSequence = Cached<FormulaValues, TrialDivision>;

/// A sequence whose value at `n` is `source` evaluated at `n`.
pub fn formula_sequence(source: &str, opts: CacheOptions) -> Result<FormulaSequence, SequenceError> {
    let values = FormulaValues::new(source)?;
    let name = format!("Formula: {}", values.source());
    Ok(Cached::new(values, TrialDivision::new(), opts)
        .with_name(name)
        .with_description("A sequence defined by a formula in n"))
}
