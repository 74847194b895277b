//! Abstract Syntax Tree for point expressions
//!
//! Expressions compute a scalar from the point currently being surveyed:
//! `x`, `y`, `z` are its parsed coordinates, `rawx`, `rawy`, `rawz` the
//! numbers read from the unfiltered record, and `meta` the raw meta input.

use std::fmt;

/// An arithmetic expression over point identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Number literal
    Number(f64),
    /// Point identifier: x, rawy, meta, ...
    Var(PointVar),
    BinaryOp(Box<Expr>, BinaryOp, Box<Expr>),
    UnaryOp(UnaryOp, Box<Expr>),
    ParenExpr(Box<Expr>),
    FuncCall(FuncCall),
}

/// Identifiers resolved against the in-flight point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointVar {
    X,
    Y,
    Z,
    RawX,
    RawY,
    RawZ,
    Meta,
}

impl PointVar {
    pub fn from_name(name: &str) -> Option<PointVar> {
        Some(match name {
            "x" => PointVar::X,
            "y" => PointVar::Y,
            "z" => PointVar::Z,
            "rawx" => PointVar::RawX,
            "rawy" => PointVar::RawY,
            "rawz" => PointVar::RawZ,
            "meta" => PointVar::Meta,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PointVar::X => "x",
            PointVar::Y => "y",
            PointVar::Z => "z",
            PointVar::RawX => "rawx",
            PointVar::RawY => "rawy",
            PointVar::RawZ => "rawz",
            PointVar::Meta => "meta",
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

/// Function call
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub func: Function,
    pub args: Vec<Expr>,
}

/// Built-in functions. Trigonometry works in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Cos,
    Sin,
    Int,
    Sqrt,
    Max,
    Min,
    Ln,
    Exp,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Function> {
        Some(match name {
            "abs" => Function::Abs,
            "cos" => Function::Cos,
            "sin" => Function::Sin,
            "int" => Function::Int,
            "sqrt" => Function::Sqrt,
            "max" => Function::Max,
            "min" => Function::Min,
            "ln" => Function::Ln,
            "exp" => Function::Exp,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Cos => "cos",
            Function::Sin => "sin",
            Function::Int => "int",
            Function::Sqrt => "sqrt",
            Function::Max => "max",
            Function::Min => "min",
            Function::Ln => "ln",
            Function::Exp => "exp",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Max | Function::Min => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Var(v) => f.write_str(v.name()),
            Expr::ParenExpr(e) => write!(f, "({})", e),
            Expr::BinaryOp(l, op, r) => {
                let op_str = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                    BinaryOp::Pow => "^",
                };
                write!(f, "{}{}{}", l, op_str, r)
            }
            Expr::UnaryOp(op, e) => {
                let op_str = match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Pos => "+",
                };
                write!(f, "{}{}", op_str, e)
            }
            Expr::FuncCall(fc) => {
                write!(f, "{}(", fc.func.name())?;
                for (i, arg) in fc.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
