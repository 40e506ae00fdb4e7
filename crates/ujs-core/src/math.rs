//! Four-way arithmetic dispatcher.

use std::fmt;
use std::str::FromStr;

/// Arithmetic operation selector. Codes are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MathOp {
    /// `a + b`.
    Add = 0,
    /// `a - b`.
    Subtract = 1,
    /// `a * b`.
    Multiply = 2,
    /// `a / b`, or `0.0` when `b == 0.0`.
    Divide = 3,
}

impl MathOp {
    /// Look up an operation by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::Subtract),
            2 => Some(Self::Multiply),
            3 => Some(Self::Divide),
            _ => None,
        }
    }

    /// Apply the operation.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b != 0.0 {
                    a / b
                } else {
                    0.0
                }
            }
        }
    }

    /// Infix symbol for display.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error from parsing a [`MathOp`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMathOp(
    /// The rejected input.
    pub String,
);

impl fmt::Display for UnknownMathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown math operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownMathOp {}

impl FromStr for MathOp {
    type Err = UnknownMathOp;

    /// Accepts a name (`add`, `sub`, `mul`, `div` and long forms), a
    /// symbol, or a numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_lowercase().as_str() {
            "add" | "+" | "0" => Self::Add,
            "sub" | "subtract" | "-" | "1" => Self::Subtract,
            "mul" | "multiply" | "*" | "x" | "2" => Self::Multiply,
            "div" | "divide" | "/" | "3" => Self::Divide,
            _ => return Err(UnknownMathOp(s.to_string())),
        };
        Ok(op)
    }
}

/// Apply `op` to `a` and `b`.
pub fn fast_math(a: f64, b: f64, op: MathOp) -> f64 {
    op.apply(a, b)
}

/// Apply the operation with numeric code `code`; unknown codes yield `0.0`.
pub fn fast_math_code(a: f64, b: f64, code: i32) -> f64 {
    MathOp::from_code(code).map_or(0.0, |op| op.apply(a, b))
}
