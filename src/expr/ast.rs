//! Expression tree and evaluator.

use std::f64::consts::{E, PI, TAU};

use crate::error::{LabSimError, Result};
use crate::scenario::unit_clamp;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Abs,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Floor,
    Ceil,
    Round,
    Sign,
    /// Unit square wave of a phase in radians
    Square,
    /// Unit triangle wave of a phase in radians
    Triangle,
    /// Unit sawtooth of a phase in radians
    Sawtooth,
    Min,
    Max,
    Pow,
    Clamp,
}

impl Function {
    /// Look up a function by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name.to_lowercase().as_str() {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "abs" => Self::Abs,
            "sqrt" => Self::Sqrt,
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "log" | "log10" => Self::Log10,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "sign" | "sgn" => Self::Sign,
            "square" | "sq" => Self::Square,
            "triangle" | "tri" => Self::Triangle,
            "sawtooth" | "saw" => Self::Sawtooth,
            "min" => Self::Min,
            "max" => Self::Max,
            "pow" => Self::Pow,
            "clamp" => Self::Clamp,
            _ => return None,
        };
        Some(f)
    }

    /// Number of arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Min | Self::Max | Self::Pow => 2,
            Self::Clamp => 3,
            _ => 1,
        }
    }

    /// Check an argument count against the arity.
    pub fn check_arity(&self, name: &str, found: usize) -> Result<()> {
        if found == self.arity() {
            Ok(())
        } else {
            Err(LabSimError::ArityMismatch {
                name: name.to_string(),
                expected: self.arity(),
                found,
            })
        }
    }

    fn apply(&self, args: &[f64]) -> f64 {
        let x = args[0];
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Asin => unit_clamp(x).asin(),
            Self::Acos => unit_clamp(x).acos(),
            Self::Atan => x.atan(),
            Self::Abs => x.abs(),
            Self::Sqrt => x.sqrt(),
            Self::Exp => x.exp(),
            Self::Ln => x.ln(),
            Self::Log10 => x.log10(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Round => x.round(),
            Self::Sign => {
                if x > 0.0 {
                    1.0
                } else if x < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            Self::Square => {
                if x.rem_euclid(TAU) < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => 2.0 / PI * unit_clamp(x.sin()).asin(),
            Self::Sawtooth => 2.0 * (x / TAU).rem_euclid(1.0) - 1.0,
            Self::Min => x.min(args[1]),
            Self::Max => x.max(args[1]),
            Self::Pow => x.powf(args[1]),
            Self::Clamp => {
                let (lo, hi) = (args[1].min(args[2]), args[1].max(args[2]));
                x.clamp(lo, hi)
            }
        }
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Evaluate with variables supplied by `lookup`.
    ///
    /// `pi` and `e` are built in unless `lookup` shadows them. Unknown
    /// variables evaluate to NaN.
    pub fn eval<F>(&self, lookup: &F) -> f64
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            Expr::Number(v) => *v,
            Expr::Variable(name) => lookup(name)
                .or_else(|| constant(name))
                .unwrap_or(f64::NAN),
            Expr::Unary { op, operand } => {
                let v = operand.eval(lookup);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let a = lhs.eval(lookup);
                let b = rhs.eval(lookup);
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Rem => a.rem_euclid(b),
                    BinaryOp::Pow => a.powf(b),
                }
            }
            Expr::Call { function, args } => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(lookup)).collect();
                function.apply(&values)
            }
        }
    }

    /// Names of all variables the expression reads.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => names.push(name.clone()),
            Expr::Unary { operand, .. } => operand.collect_variables(names),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "PI" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wave_functions() {
        let sq = Function::Square;
        assert_eq!(sq.apply(&[0.5]), 1.0);
        assert_eq!(sq.apply(&[PI + 0.5]), -1.0);

        let tri = Function::Triangle;
        assert_relative_eq!(tri.apply(&[PI / 2.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(tri.apply(&[PI / 4.0]), 0.5, epsilon = 1e-12);

        let saw = Function::Sawtooth;
        assert_relative_eq!(saw.apply(&[0.0]), -1.0);
        assert_relative_eq!(saw.apply(&[PI]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_asin_argument_is_clamped() {
        assert_relative_eq!(Function::Asin.apply(&[2.0]), PI / 2.0);
        assert!(Function::Acos.apply(&[-7.0]).is_finite());
    }

    #[test]
    fn test_unknown_variable_is_nan() {
        let e = Expr::Variable("nope".to_string());
        assert!(e.eval(&|_| None).is_nan());
    }

    #[test]
    fn test_lookup_shadows_constants() {
        let e = Expr::Variable("e".to_string());
        assert_relative_eq!(e.eval(&|_| None), E);
        assert_eq!(e.eval(&|n| (n == "e").then_some(3.0)), 3.0);
    }
}
