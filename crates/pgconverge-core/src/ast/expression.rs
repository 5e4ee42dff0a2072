//! Expression AST types.

use core::fmt;

use super::DataType;

/// An SQL identifier. Always rendered double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    /// The unquoted name.
    pub value: String,
}

impl Identifier {
    /// Creates an identifier from its unquoted name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Builds an identifier from token text: a quoted literal loses its
    /// surrounding quotes and `""` becomes `"`; anything else is kept as-is.
    #[must_use]
    pub fn from_literal(literal: &str) -> Self {
        match literal
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(inner) => Self::new(inner.replace("\"\"", "\"")),
            None => Self::new(literal),
        }
    }

    /// Returns the unquoted name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value.replace('"', "\"\""))
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `::`
    Typecast,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Typecast => "::",
            Self::Is => " IS ",
            Self::IsNot => " IS NOT ",
        }
    }
}

/// Unary (prefix) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Identity (+)
    Plus,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
        }
    }
}

/// An SQL expression, as found in `DEFAULT` clauses, index targets and
/// `SET` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Column, function or type name.
    Identifier(Identifier),
    /// String literal, kept verbatim including its quotes.
    String(String),
    /// Numeric literal, kept verbatim.
    Number(String),
    /// `TRUE` / `FALSE`.
    Boolean(bool),
    /// `NULL`.
    Null,
    /// `(expr)`.
    Grouped(Box<Expression>),
    /// `-expr` / `+expr`.
    Prefix {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    /// `left op right`.
    Infix {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
    /// `callee(args, ...)`.
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },
    /// A built-in type name on the right of `::`, e.g. `character varying`.
    Type(DataType),
}

impl Expression {
    /// Creates an identifier expression.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    /// Creates an infix expression.
    #[must_use]
    pub fn infix(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a function call expression.
    #[must_use]
    pub fn call(callee: Self, args: Vec<Self>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Returns true if the rendered expression starts with `-`.
    fn leads_with_minus(&self) -> bool {
        match self {
            Self::Prefix { op, .. } => *op == UnaryOp::Neg,
            Self::Infix { left, .. } | Self::Call { callee: left, .. } => left.leads_with_minus(),
            _ => false,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::String(literal) | Self::Number(literal) => f.write_str(literal),
            Self::Boolean(true) => f.write_str("true"),
            Self::Boolean(false) => f.write_str("false"),
            Self::Null => f.write_str("NULL"),
            Self::Grouped(inner) => write!(f, "({inner})"),
            // `- -1` and `a- -1` must not collapse into a `--` comment
            Self::Prefix { op, operand } => {
                if operand.leads_with_minus() {
                    write!(f, "{} {operand}", op.as_str())
                } else {
                    write!(f, "{}{operand}", op.as_str())
                }
            }
            Self::Infix { left, op, right } => {
                if right.leads_with_minus() {
                    write!(f, "{left}{} {right}", op.as_str())
                } else {
                    write!(f, "{left}{}{right}", op.as_str())
                }
            }
            Self::Call { callee, args } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Type(data_type) => write!(f, "{data_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(Identifier::new("users").to_string(), r#""users""#);
        assert_eq!(Identifier::new(r#"a"b"#).to_string(), r#""a""b""#);
    }

    #[test]
    fn test_identifier_from_literal() {
        assert_eq!(Identifier::from_literal("users").as_str(), "users");
        assert_eq!(Identifier::from_literal(r#""Users""#).as_str(), "Users");
        assert_eq!(Identifier::from_literal(r#""a""b""#).as_str(), r#"a"b"#);
    }

    #[test]
    fn test_infix_display() {
        let sum = Expression::infix(
            Expression::Number("1".into()),
            BinaryOp::Add,
            Expression::identifier("x"),
        );
        assert_eq!(sum.to_string(), r#"1+"x""#);

        let is_not = Expression::infix(
            Expression::identifier("x"),
            BinaryOp::IsNot,
            Expression::Null,
        );
        assert_eq!(is_not.to_string(), r#""x" IS NOT NULL"#);
    }

    #[test]
    fn test_negative_operand_keeps_space() {
        let expr = Expression::infix(
            Expression::identifier("a"),
            BinaryOp::Sub,
            Expression::Prefix {
                op: UnaryOp::Neg,
                operand: Box::new(Expression::Number("1".into())),
            },
        );
        assert_eq!(expr.to_string(), r#""a"- -1"#);
    }

    #[test]
    fn test_nested_negation_keeps_space() {
        let one = Expression::Number("1".into());
        let neg = |operand: Expression| Expression::Prefix {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        };
        assert_eq!(neg(neg(one.clone())).to_string(), "- -1");
        assert_eq!(neg(neg(neg(one.clone()))).to_string(), "- - -1");

        let product = Expression::infix(neg(one.clone()), BinaryOp::Mul, one);
        let diff = Expression::infix(Expression::identifier("a"), BinaryOp::Sub, product);
        assert_eq!(diff.to_string(), r#""a"- -1*1"#);
    }

    #[test]
    fn test_call_display() {
        let call = Expression::call(
            Expression::identifier("nextval"),
            vec![Expression::infix(
                Expression::String("'users_id_seq'".into()),
                BinaryOp::Typecast,
                Expression::identifier("regclass"),
            )],
        );
        assert_eq!(
            call.to_string(),
            r#""nextval"('users_id_seq'::"regclass")"#
        );
    }

    #[test]
    fn test_cast_to_builtin_type() {
        let cast = Expression::infix(
            Expression::String("''".into()),
            BinaryOp::Typecast,
            Expression::Type(DataType::Character {
                varying: true,
                length: None,
            }),
        );
        assert_eq!(cast.to_string(), "''::character varying");
    }
}
