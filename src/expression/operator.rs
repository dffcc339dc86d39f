//! Operator definitions for expressions.

use std::fmt;

/// Comparison operators used by comparison, BETWEEN and IN predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Lower,
    LowerOrEqual,
}

impl ComparisonOperator {
    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "<>",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::Lower => "<",
            ComparisonOperator::LowerOrEqual => "<=",
        }
    }

    /// Parse an operator symbol; `!=` is accepted as an alias of `<>`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(ComparisonOperator::Equal),
            "<>" | "!=" => Some(ComparisonOperator::NotEqual),
            ">" => Some(ComparisonOperator::Greater),
            ">=" => Some(ComparisonOperator::GreaterOrEqual),
            "<" => Some(ComparisonOperator::Lower),
            "<=" => Some(ComparisonOperator::LowerOrEqual),
            _ => None,
        }
    }

    /// Decide the operator from a three-way comparison result
    pub fn test(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering;
        match self {
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::NotEqual => ordering != Ordering::Equal,
            ComparisonOperator::Greater => ordering == Ordering::Greater,
            ComparisonOperator::GreaterOrEqual => ordering != Ordering::Less,
            ComparisonOperator::Lower => ordering == Ordering::Less,
            ComparisonOperator::LowerOrEqual => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators of a chaining arithmetic expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOperator {
    /// The domain operator handed to arithmetic capabilities
    pub fn domain_operator(&self) -> DomainOperator {
        match self {
            ArithmeticOperator::Plus => DomainOperator::Plus,
            ArithmeticOperator::Minus => DomainOperator::Minus,
            ArithmeticOperator::Multiply => DomainOperator::Multiplication,
            ArithmeticOperator::Divide => DomainOperator::Division,
            ArithmeticOperator::Modulo => DomainOperator::Modulo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.domain_operator().as_str()
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(ArithmeticOperator::Plus),
            "-" => Some(ArithmeticOperator::Minus),
            "*" => Some(ArithmeticOperator::Multiply),
            "/" => Some(ArithmeticOperator::Divide),
            "%" => Some(ArithmeticOperator::Modulo),
            _ => None,
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators understood by arithmetic capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainOperator {
    Plus,
    Minus,
    Multiplication,
    Division,
    Modulo,
    UnaryMinus,
    UnaryPlus,
    Not,
}

impl DomainOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainOperator::Plus => "+",
            DomainOperator::Minus => "-",
            DomainOperator::Multiplication => "*",
            DomainOperator::Division => "/",
            DomainOperator::Modulo => "%",
            DomainOperator::UnaryMinus => "-",
            DomainOperator::UnaryPlus => "+",
            DomainOperator::Not => "NOT",
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            DomainOperator::UnaryMinus | DomainOperator::UnaryPlus | DomainOperator::Not
        )
    }
}

impl fmt::Display for DomainOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
