use std::fmt;

/// Runtime value of an evaluated expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Booleans convert to 1 and 0, so a comparison can be used as a rate.
    pub fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
        }
    }

    /// Numbers are true when non-zero.
    pub fn as_bool(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0,
            Value::Bool(b) => b,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Built-in functions of the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Min,
    Max,
    Abs,
    Sqrt,
    Exp,
    Ln,
    Floor,
    Ceil,
    Round,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "min" => Some(Function::Min),
            "max" => Some(Function::Max),
            "abs" => Some(Function::Abs),
            "sqrt" => Some(Function::Sqrt),
            "exp" => Some(Function::Exp),
            "ln" | "log" => Some(Function::Ln),
            "floor" => Some(Function::Floor),
            "ceil" => Some(Function::Ceil),
            "round" => Some(Function::Round),
            _ => None,
        }
    }

    /// `min` and `max` are variadic, everything else takes one argument.
    pub fn accepts(&self, arguments: usize) -> bool {
        match self {
            Function::Min | Function::Max => arguments >= 1,
            _ => arguments == 1,
        }
    }
}

/// Abstract syntax tree of a parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Arithmetic operations
    Sum(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Modulo(Box<Expression>, Box<Expression>),
    Power(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),

    // Logical operations
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),

    // Comparison operations
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    SmallerThan(Box<Expression>, Box<Expression>),
    SmallerThanOrEqual(Box<Expression>, Box<Expression>),

    Call {
        function: Function,
        arguments: Vec<Expression>,
    },

    // Leaf nodes
    Literal(Value),
    Variable(String),
}

impl Expression {
    /// True when the tree references no variable, so its value is the same
    /// in every environment.
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) => true,
            Expression::Variable(_) => false,
            Expression::Negate(inner) | Expression::Not(inner) => inner.is_constant(),
            Expression::Call { arguments, .. } => arguments.iter().all(Expression::is_constant),
            Expression::Sum(a, b)
            | Expression::Subtract(a, b)
            | Expression::Multiply(a, b)
            | Expression::Divide(a, b)
            | Expression::Modulo(a, b)
            | Expression::Power(a, b)
            | Expression::And(a, b)
            | Expression::Or(a, b)
            | Expression::Equal(a, b)
            | Expression::NotEqual(a, b)
            | Expression::GreaterThan(a, b)
            | Expression::GreaterThanOrEqual(a, b)
            | Expression::SmallerThan(a, b)
            | Expression::SmallerThanOrEqual(a, b) => a.is_constant() && b.is_constant(),
        }
    }
}
