//! Values of story variables and their coercion rules.

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use std::{cmp::Ordering, collections::BTreeMap, fmt};

/// Variables of a session, by name.
pub type VariableSet = BTreeMap<String, Variable>;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde_support", serde(untagged))]
/// Variable in a story.
///
/// Variables are dynamically typed. Stories never fail on a variable of the "wrong" type
/// or on a variable which has not been set: values are coerced where they are used.
///
/// *   In arithmetic, a number is used as is, `true` is 1, a string which reads as a number
///     is that number and everything else, including an undefined variable, is 0.
/// *   In conditions, `false`, 0, the empty string and undefined variables are falsy.
///
/// # Examples
/// The `From` trait is implemented for integer, floating point, boolean and string types.
/// ```
/// # use sceneflow::Variable;
/// assert_eq!(Variable::from(5), Variable::Number(5.0));
/// assert_eq!(Variable::from(true), Variable::Bool(true));
/// assert_eq!(Variable::from("💜"), Variable::String("💜".to_string()));
/// ```
pub enum Variable {
    /// True or false.
    Bool(bool),
    /// Number. Integral numbers print without decimals.
    Number(f64),
    /// Text string.
    String(String),
}

impl Variable {
    /// Numeric value used in arithmetic.
    ///
    /// # Examples
    /// ```
    /// # use sceneflow::Variable;
    /// assert_eq!(Variable::from(2.5).as_number(), 2.5);
    /// assert_eq!(Variable::from(true).as_number(), 1.0);
    /// assert_eq!(Variable::from(" 12 ").as_number(), 12.0);
    /// assert_eq!(Variable::from("twelve").as_number(), 0.0);
    /// ```
    pub fn as_number(&self) -> f64 {
        match self {
            Variable::Bool(value) => *value as u8 as f64,
            Variable::Number(value) => *value,
            Variable::String(value) => parse_number(value).unwrap_or(0.0),
        }
    }

    /// Whether the value counts as true in a condition.
    pub fn is_truthy(&self) -> bool {
        match self {
            Variable::Bool(value) => *value,
            Variable::Number(value) => *value != 0.0 && !value.is_nan(),
            Variable::String(value) => !value.is_empty(),
        }
    }

    /// Compare with another value.
    ///
    /// Numbers and numeric strings compare by value, booleans compare with numbers as 0 or 1
    /// and other strings compare case-insensitively. Returns `None` if the values cannot be
    /// ordered (`NaN`).
    pub fn compare(&self, other: &Variable) -> Option<Ordering> {
        use Variable::*;

        match (self, other) {
            (Bool(lhs), Bool(rhs)) => Some(lhs.cmp(rhs)),
            (Bool(value), String(text)) | (String(text), Bool(value)) => {
                let other = match parse_bool(text) {
                    Some(parsed) => parsed,
                    None => !text.is_empty(),
                };

                let ordering = value.cmp(&other);

                if let Bool(..) = self {
                    Some(ordering)
                } else {
                    Some(ordering.reverse())
                }
            }
            (String(lhs), String(rhs)) => match (parse_number(lhs), parse_number(rhs)) {
                (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs),
                _ => Some(lhs.to_lowercase().cmp(&rhs.to_lowercase())),
            },
            (Number(..), String(text)) if parse_number(text).is_none() => {
                Some(self.to_string().cmp(&text.to_lowercase()))
            }
            (String(text), Number(..)) if parse_number(text).is_none() => {
                Some(text.to_lowercase().cmp(&other.to_string()))
            }
            _ => self.as_number().partial_cmp(&other.as_number()),
        }
    }

    /// Value which an undefined variable takes when compared with this one.
    pub(crate) fn default_like(&self) -> Variable {
        match self {
            Variable::Bool(..) => Variable::Bool(false),
            Variable::Number(..) => Variable::Number(0.0),
            Variable::String(..) => Variable::String(String::new()),
        }
    }

    /// Return a string representation of the variable as it could be written in a story.
    ///
    /// Used for printing errors and directives.
    pub(crate) fn to_error_string(&self) -> String {
        match self {
            Variable::String(text) => format!("'{}'", text),
            _ => format!("{}", self),
        }
    }
}

/// Coerce a possibly undefined variable to a number.
pub(crate) fn number_or_zero(variable: Option<&Variable>) -> f64 {
    variable.map(|v| v.as_number()).unwrap_or(0.0)
}

/// Whether a possibly undefined variable counts as true.
pub(crate) fn is_truthy(variable: Option<&Variable>) -> bool {
    variable.map(|v| v.is_truthy()).unwrap_or(false)
}

/// Read a number written in a story, ignoring surrounding whitespace.
///
/// Only finite numbers are accepted, so that words such as `inf` stay strings.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();

    let looks_numeric = text
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
        && text.chars().any(|c| c.is_ascii_digit());

    if looks_numeric {
        text.parse::<f64>().ok().filter(|value| value.is_finite())
    } else {
        None
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variable::Bool(value) => write!(f, "{}", value),
            Variable::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Variable::Number(value) => write!(f, "{}", value),
            Variable::String(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_from_number {
    ($($number:ty),+) => {
        $(
            impl From<$number> for Variable {
                fn from(value: $number) -> Self {
                    Variable::Number(value as f64)
                }
            }
        )*
    }
}

impl_from_number![i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64];

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Variable::Bool(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::String(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::String(value)
    }
}
