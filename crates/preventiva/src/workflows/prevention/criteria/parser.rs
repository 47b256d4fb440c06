//! Tokenizer and recursive-descent parser for catalog criterion expressions.
//!
//! The grammar is deliberately closed: comparisons, boolean connectives, and
//! basic arithmetic over numbers, quoted strings, and the fixed profile
//! variables. Anything outside the grammar is a parse error, which the
//! evaluator treats as "rule does not apply".

use super::CriterionError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Text(String),
    Ident(String),
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    And,
    Or,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, CriterionError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '=' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token::Eq);
                    }
                    _ => {
                        return Err(CriterionError::UnexpectedCharacter {
                            character: '=',
                            position,
                        })
                    }
                }
            }
            '!' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token::Ne);
                    }
                    _ => {
                        return Err(CriterionError::UnexpectedCharacter {
                            character: '!',
                            position,
                        })
                    }
                }
            }
            '<' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            quote @ ('"' | '\'') => {
                chars.next();
                let mut literal = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    literal.push(c);
                }
                if !closed {
                    return Err(CriterionError::UnterminatedString);
                }
                tokens.push(Token::Text(literal));
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CriterionError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match name.to_ascii_lowercase().as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    _ => tokens.push(Token::Ident(name)),
                }
            }
            other => {
                return Err(CriterionError::UnexpectedCharacter {
                    character: other,
                    position,
                })
            }
        }
    }

    if tokens.is_empty() {
        return Err(CriterionError::Empty);
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Number(f64),
    Text(String),
    Variable(String),
    Negate(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

pub(crate) fn parse(tokens: &[Token]) -> Result<Expr, CriterionError> {
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let expr = parser.or_expr()?;
    if parser.position != tokens.len() {
        return Err(CriterionError::TrailingInput);
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn or_expr(&mut self) -> Result<Expr, CriterionError> {
        let mut left = self.and_expr()?;
        while self.eat(&Token::Or) {
            let right = self.and_expr()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr, CriterionError> {
        let mut left = self.comparison()?;
        while self.eat(&Token::And) {
            let right = self.comparison()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // A single, non-chaining comparison: `a < b < c` is rejected as trailing
    // input rather than silently misread.
    fn comparison(&mut self) -> Result<Expr, CriterionError> {
        let left = self.additive()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinaryOp::Eq,
            Some(Token::Ne) => BinaryOp::Ne,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Ge) => BinaryOp::Ge,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Gt) => BinaryOp::Gt,
            _ => return Ok(left),
        };
        self.position += 1;
        let right = self.additive()?;
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn additive(&mut self) -> Result<Expr, CriterionError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.position += 1;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Expr, CriterionError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.position += 1;
            let right = self.unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Expr, CriterionError> {
        if self.eat(&Token::Minus) {
            let inner = self.unary()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, CriterionError> {
        let position = self.position;
        match self.bump() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Text(value)) => Ok(Expr::Text(value)),
            Some(Token::Ident(name)) => Ok(Expr::Variable(name)),
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    Err(CriterionError::UnexpectedEnd)
                }
            }
            Some(_) => Err(CriterionError::UnexpectedToken(position)),
            None => Err(CriterionError::UnexpectedEnd),
        }
    }
}
