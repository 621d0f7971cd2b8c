use super::ast::{Expression, Function, Value};
use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LeftParen,
    RightParen,
    Comma,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Bang,
    End,
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).map_or(false, char::is_ascii_digit))
        {
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // Scientific notation, e.g. 1.5e-3
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let literal: String = chars[start..i].iter().collect();
            let number = literal
                .parse::<f64>()
                .map_err(|_| ParseError::new(start, format!("invalid number '{}'", literal)))?;
            tokens.push((Token::Number(number), start));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push((Token::Identifier(chars[start..i].iter().collect()), start));
            continue;
        }
        let next = chars.get(i + 1).copied();
        let (token, width) = match (c, next) {
            ('<', Some('=')) => (Token::LessEqual, 2),
            ('<', Some('>')) => (Token::NotEqual, 2),
            ('>', Some('=')) => (Token::GreaterEqual, 2),
            ('=', Some('=')) => (Token::Equal, 2),
            ('!', Some('=')) => (Token::NotEqual, 2),
            ('&', Some('&')) => (Token::And, 2),
            ('|', Some('|')) => (Token::Or, 2),
            ('<', _) => (Token::Less, 1),
            ('>', _) => (Token::Greater, 1),
            ('=', _) => (Token::Equal, 1),
            ('!', _) => (Token::Bang, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('^', _) => (Token::Caret, 1),
            ('(', _) => (Token::LeftParen, 1),
            (')', _) => (Token::RightParen, 1),
            (',', _) => (Token::Comma, 1),
            _ => {
                return Err(ParseError::new(
                    start,
                    format!("unexpected character '{}'", c),
                ))
            }
        };
        tokens.push((token, start));
        i += width;
    }
    tokens.push((Token::End, chars.len()));
    Ok(tokens)
}

/// Deepest nesting of parentheses, calls and prefix operators accepted.
const MAX_NESTING: usize = 256;

/// Recursive descent parser.  Precedence from loosest to tightest:
/// `||`, `&&`, comparisons, `+ -`, `* / %`, unary `- ! +`, `^`.
struct Parser {
    tokens: Vec<(Token, usize)>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.index].0
    }

    fn position(&self) -> usize {
        self.tokens[self.index].1
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.index].0.clone();
        if token != Token::End {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                self.position(),
                format!("expected {}", description),
            ))
        }
    }

    fn or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.and()?;
        while *self.peek() == Token::Or {
            self.advance();
            left = Expression::Or(Box::new(left), Box::new(self.and()?));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.comparison()?;
        while *self.peek() == Token::And {
            self.advance();
            left = Expression::And(Box::new(left), Box::new(self.comparison()?));
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.additive()?;
        loop {
            let build: fn(Box<Expression>, Box<Expression>) -> Expression = match self.peek() {
                Token::Less => Expression::SmallerThan,
                Token::LessEqual => Expression::SmallerThanOrEqual,
                Token::Greater => Expression::GreaterThan,
                Token::GreaterEqual => Expression::GreaterThanOrEqual,
                Token::Equal => Expression::Equal,
                Token::NotEqual => Expression::NotEqual,
                _ => return Ok(left),
            };
            self.advance();
            left = build(Box::new(left), Box::new(self.additive()?));
        }
    }

    fn additive(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let build: fn(Box<Expression>, Box<Expression>) -> Expression = match self.peek() {
                Token::Plus => Expression::Sum,
                Token::Minus => Expression::Subtract,
                _ => return Ok(left),
            };
            self.advance();
            left = build(Box::new(left), Box::new(self.multiplicative()?));
        }
    }

    fn multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.unary()?;
        loop {
            let build: fn(Box<Expression>, Box<Expression>) -> Expression = match self.peek() {
                Token::Star => Expression::Multiply,
                Token::Slash => Expression::Divide,
                Token::Percent => Expression::Modulo,
                _ => return Ok(left),
            };
            self.advance();
            left = build(Box::new(left), Box::new(self.unary()?));
        }
    }

    /// Every nested sub-expression passes through here, so this is where
    /// recursion depth is bounded.
    fn unary(&mut self) -> Result<Expression, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                self.position(),
                "expression is nested too deeply",
            ));
        }
        self.depth += 1;
        let result = self.prefixed();
        self.depth -= 1;
        result
    }

    fn prefixed(&mut self) -> Result<Expression, ParseError> {
        match self.peek() {
            Token::Minus => {
                self.advance();
                Ok(Expression::Negate(Box::new(self.unary()?)))
            }
            Token::Bang => {
                self.advance();
                Ok(Expression::Not(Box::new(self.unary()?)))
            }
            Token::Plus => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expression, ParseError> {
        let base = self.primary()?;
        if *self.peek() == Token::Caret {
            self.advance();
            // Right associative: 2^3^2 == 2^(3^2)
            let exponent = self.unary()?;
            return Ok(Expression::Power(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expression, ParseError> {
        let position = self.position();
        match self.advance() {
            Token::Number(n) => Ok(Expression::Literal(Value::Number(n))),
            Token::Identifier(name) => {
                if *self.peek() == Token::LeftParen {
                    return self.call(name, position);
                }
                match name.to_ascii_lowercase().as_str() {
                    "true" => Ok(Expression::Literal(Value::Bool(true))),
                    "false" => Ok(Expression::Literal(Value::Bool(false))),
                    _ => Ok(Expression::Variable(name)),
                }
            }
            Token::LeftParen => {
                let inner = self.or()?;
                self.expect(Token::RightParen, "')'")?;
                Ok(inner)
            }
            Token::End => Err(ParseError::new(position, "unexpected end of expression")),
            _ => Err(ParseError::new(position, "expected a value")),
        }
    }

    fn call(&mut self, name: String, position: usize) -> Result<Expression, ParseError> {
        let function = Function::from_name(&name)
            .ok_or_else(|| ParseError::new(position, format!("unknown function '{}'", name)))?;
        self.expect(Token::LeftParen, "'('")?;
        let mut arguments = Vec::new();
        if *self.peek() != Token::RightParen {
            arguments.push(self.or()?);
            while *self.peek() == Token::Comma {
                self.advance();
                arguments.push(self.or()?);
            }
        }
        self.expect(Token::RightParen, "')'")?;
        if !function.accepts(arguments.len()) {
            return Err(ParseError::new(
                position,
                format!(
                    "function '{}' does not accept {} arguments",
                    name,
                    arguments.len()
                ),
            ));
        }
        Ok(Expression::Call {
            function,
            arguments,
        })
    }
}

/// Parses a calculator expression into its syntax tree.  Errors carry the
/// character position of the first offending token.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        index: 0,
        depth: 0,
    };
    if *parser.peek() == Token::End {
        return Err(ParseError::new(0, "empty expression"));
    }
    let expression = parser.or()?;
    if *parser.peek() != Token::End {
        return Err(ParseError::new(parser.position(), "unexpected trailing input"));
    }
    Ok(expression)
}
