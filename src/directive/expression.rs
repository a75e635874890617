//! Conditions of `if` directives.

use crate::{
    directive::{
        operand::{strip_braces, strip_quotes},
        variable::{is_truthy, parse_number, Variable, VariableSet},
    },
    error::SyntaxErrorKind,
};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Boolean condition over the session variables.
pub enum Expression {
    /// Single term, which is true if its value is truthy.
    Term(Term),
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    /// Comparison of two terms.
    Compare {
        lhs: Term,
        comparison: Comparison,
        rhs: Term,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Value in a condition.
pub enum Term {
    Literal(Variable),
    /// Variable, written as a bare name or as `{name}`.
    Variable(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Comparison operator.
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Expression {
    /// Evaluate the condition.
    ///
    /// Undefined variables never cause an error: on their own they are false, and when
    /// compared with a value they take the empty value of the same type (`false`, 0 or
    /// the empty string).
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::{Expression, Variable, VariableSet};
    /// let expression = Expression::parse("gold >= 10 and not cursed").unwrap();
    ///
    /// let mut variables = VariableSet::new();
    /// assert!(!expression.evaluate(&variables));
    ///
    /// variables.insert("gold".to_string(), Variable::from(12));
    /// assert!(expression.evaluate(&variables));
    ///
    /// variables.insert("cursed".to_string(), Variable::from(true));
    /// assert!(!expression.evaluate(&variables));
    /// ```
    pub fn evaluate(&self, variables: &VariableSet) -> bool {
        match self {
            Expression::Term(term) => is_truthy(term.resolve(variables).as_ref()),
            Expression::Not(inner) => !inner.evaluate(variables),
            Expression::And(lhs, rhs) => lhs.evaluate(variables) && rhs.evaluate(variables),
            Expression::Or(lhs, rhs) => lhs.evaluate(variables) || rhs.evaluate(variables),
            Expression::Compare {
                lhs,
                comparison,
                rhs,
            } => {
                let ordering = match (lhs.resolve(variables), rhs.resolve(variables)) {
                    (Some(lhs), Some(rhs)) => lhs.compare(&rhs),
                    (Some(lhs), None) => lhs.compare(&lhs.default_like()),
                    (None, Some(rhs)) => rhs.default_like().compare(&rhs),
                    (None, None) => Some(Ordering::Equal),
                };

                comparison.holds(ordering)
            }
        }
    }

    /// Parse a condition.
    pub fn parse(text: &str) -> Result<Self, SyntaxErrorKind> {
        let tokens = tokenize(text)?;

        if tokens.is_empty() {
            return Err(invalid("the condition is empty"));
        }

        let mut parser = Parser { tokens, index: 0 };
        let expression = parser.parse_or()?;

        match parser.peek() {
            None => Ok(expression),
            Some(token) => Err(invalid(&format!("unexpected '{}'", token.describe()))),
        }
    }
}

impl Term {
    fn resolve(&self, variables: &VariableSet) -> Option<Variable> {
        match self {
            Term::Literal(variable) => Some(variable.clone()),
            Term::Variable(name) => variables.get(name).cloned(),
        }
    }
}

impl Comparison {
    fn holds(self, ordering: Option<Ordering>) -> bool {
        use Comparison::*;

        match ordering {
            Some(ordering) => match self {
                Equal => ordering == Ordering::Equal,
                NotEqual => ordering != Ordering::Equal,
                Less => ordering == Ordering::Less,
                LessOrEqual => ordering != Ordering::Greater,
                Greater => ordering == Ordering::Greater,
                GreaterOrEqual => ordering != Ordering::Less,
            },
            None => self == NotEqual,
        }
    }
}

fn invalid(reason: &str) -> SyntaxErrorKind {
    SyntaxErrorKind::InvalidExpression(reason.to_string())
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    OpenParen,
    CloseParen,
    Not,
    And,
    Or,
    Compare(Comparison),
    Term(Term),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::OpenParen => "(".to_string(),
            Token::CloseParen => ")".to_string(),
            Token::Not => "not".to_string(),
            Token::And => "and".to_string(),
            Token::Or => "or".to_string(),
            Token::Compare(..) => "comparison".to_string(),
            Token::Term(Term::Literal(variable)) => variable.to_error_string(),
            Token::Term(Term::Variable(name)) => name.clone(),
        }
    }
}

const SYMBOL_CHARACTERS: &str = "()!<>=&|'\"{}";

fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxErrorKind> {
    let chars = text.chars().collect::<Vec<_>>();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let (token, length) = match (c, next) {
            ('(', _) => (Token::OpenParen, 1),
            (')', _) => (Token::CloseParen, 1),
            ('&', Some('&')) => (Token::And, 2),
            ('|', Some('|')) => (Token::Or, 2),
            ('!', Some('=')) => (Token::Compare(Comparison::NotEqual), 2),
            ('!', _) => (Token::Not, 1),
            ('=', Some('=')) => (Token::Compare(Comparison::Equal), 2),
            ('=', _) => (Token::Compare(Comparison::Equal), 1),
            ('<', Some('=')) => (Token::Compare(Comparison::LessOrEqual), 2),
            ('<', _) => (Token::Compare(Comparison::Less), 1),
            ('>', Some('=')) => (Token::Compare(Comparison::GreaterOrEqual), 2),
            ('>', _) => (Token::Compare(Comparison::Greater), 1),
            ('\'', _) | ('"', _) => {
                let length = chars[i + 1..]
                    .iter()
                    .position(|&d| d == c)
                    .map(|offset| offset + 2)
                    .ok_or_else(|| invalid("unterminated string"))?;

                let quoted = chars[i..i + length].iter().collect::<String>();
                let content = strip_quotes(&quoted).unwrap_or_default();

                (Token::Term(Term::Literal(Variable::from(content))), length)
            }
            ('{', _) => {
                let length = chars[i..]
                    .iter()
                    .position(|&d| d == '}')
                    .map(|offset| offset + 1)
                    .ok_or_else(|| invalid("unterminated variable reference"))?;

                let braced = chars[i..i + length].iter().collect::<String>();
                let name = strip_braces(&braced).unwrap_or_default().trim();

                if name.is_empty() {
                    return Err(invalid("empty variable reference"));
                }

                (Token::Term(Term::Variable(name.to_string())), length)
            }
            ('&', _) | ('|', _) | ('}', _) => {
                return Err(invalid(&format!("unexpected '{}'", c)));
            }
            _ => {
                let length = chars[i..]
                    .iter()
                    .position(|&d| d.is_whitespace() || SYMBOL_CHARACTERS.contains(d))
                    .unwrap_or(chars.len() - i);

                let word = chars[i..i + length].iter().collect::<String>();

                (read_word(&word), length)
            }
        };

        // `is not` is a single operator
        let is_not = c != '!'
            && token == Token::Not
            && tokens.last() == Some(&Token::Compare(Comparison::Equal));

        if is_not {
            if let Some(last) = tokens.last_mut() {
                *last = Token::Compare(Comparison::NotEqual);
            }
        } else {
            tokens.push(token);
        }

        i += length;
    }

    Ok(tokens)
}

fn read_word(word: &str) -> Token {
    match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "is" => Token::Compare(Comparison::Equal),
        "true" => Token::Term(Term::Literal(Variable::Bool(true))),
        "false" => Token::Term(Term::Literal(Variable::Bool(false))),
        _ => match parse_number(word) {
            Some(number) => Token::Term(Term::Literal(Variable::Number(number))),
            None => Token::Term(Term::Variable(word.to_string())),
        },
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        self.index += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Expression, SyntaxErrorKind> {
        let mut expression = self.parse_and()?;

        while self.peek() == Some(&Token::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            expression = Expression::Or(Box::new(expression), Box::new(rhs));
        }

        Ok(expression)
    }

    fn parse_and(&mut self) -> Result<Expression, SyntaxErrorKind> {
        let mut expression = self.parse_unary()?;

        while self.peek() == Some(&Token::And) {
            self.advance();
            let rhs = self.parse_unary()?;
            expression = Expression::And(Box::new(expression), Box::new(rhs));
        }

        Ok(expression)
    }

    fn parse_unary(&mut self) -> Result<Expression, SyntaxErrorKind> {
        match self.peek() {
            Some(Token::Not) => {
                self.advance();
                Ok(Expression::Not(Box::new(self.parse_unary()?)))
            }
            Some(Token::OpenParen) => {
                self.advance();
                let inner = self.parse_or()?;

                match self.advance() {
                    Some(Token::CloseParen) => Ok(inner),
                    _ => Err(invalid("missing ')'")),
                }
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, SyntaxErrorKind> {
        let lhs = self.parse_term()?;

        match self.peek() {
            Some(Token::Compare(comparison)) => {
                let comparison = *comparison;
                self.advance();
                let rhs = self.parse_term()?;

                Ok(Expression::Compare {
                    lhs,
                    comparison,
                    rhs,
                })
            }
            _ => Ok(Expression::Term(lhs)),
        }
    }

    fn parse_term(&mut self) -> Result<Term, SyntaxErrorKind> {
        match self.advance() {
            Some(Token::Term(term)) => Ok(term),
            Some(token) => Err(invalid(&format!("unexpected '{}'", token.describe()))),
            None => Err(invalid("missing value at the end of the condition")),
        }
    }
}
