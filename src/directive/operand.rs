//! Operands of variable directives: literals, variable references and dice rolls.

use crate::{
    consts::{MAX_DICE, MAX_DICE_SIDES},
    directive::variable::{parse_number, Variable, VariableSet},
    error::SyntaxErrorKind,
};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Value given to a variable directive.
pub enum Operand {
    /// Value written out in the story.
    Literal(Variable),
    /// Value of another variable, written as `{name}`.
    VariableRef(String),
    /// Random value, rolled every time the operand is evaluated.
    Dice(DiceRoll),
}

impl Operand {
    /// Evaluate the operand against the session variables.
    ///
    /// A reference to an undefined variable evaluates to `None`, which the caller coerces
    /// to whatever the directive needs.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        variables: &VariableSet,
        rng: &mut R,
    ) -> Option<Variable> {
        match self {
            Operand::Literal(variable) => Some(variable.clone()),
            Operand::VariableRef(name) => variables.get(name).cloned(),
            Operand::Dice(dice) => Some(Variable::from(dice.roll(rng))),
        }
    }
}

/// Read an operand as it is written after a variable directive.
///
/// *   `{name}` is a reference to a variable,
/// *   text in single or double quotes is a string,
/// *   `true` and `false` are booleans,
/// *   dice notation (`2d6`, `d20`, `4d6k3`, `1d20+3`) is a dice roll,
/// *   numbers are numbers,
/// *   any other text is a string.
pub(crate) fn parse_operand(text: &str) -> Result<Operand, SyntaxErrorKind> {
    let text = text.trim();

    if text.is_empty() {
        return Err(SyntaxErrorKind::MissingValue);
    }

    if let Some(name) = strip_braces(text) {
        let name = name.trim();

        if name.is_empty() {
            return Err(SyntaxErrorKind::MissingVariableName);
        }

        return Ok(Operand::VariableRef(name.to_string()));
    }

    if let Some(content) = strip_quotes(text) {
        return Ok(Operand::Literal(Variable::from(content)));
    }

    match text {
        "true" => return Ok(Operand::Literal(Variable::Bool(true))),
        "false" => return Ok(Operand::Literal(Variable::Bool(false))),
        _ => (),
    }

    if looks_like_dice(text) {
        return DiceRoll::parse(text).map(Operand::Dice);
    }

    match parse_number(text) {
        Some(number) => Ok(Operand::Literal(Variable::Number(number))),
        None => Ok(Operand::Literal(Variable::from(text))),
    }
}

/// Get the content between a pair of matching braces which enclose the whole text.
pub(crate) fn strip_braces(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('{') && text.ends_with('}') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

/// Get the content between a pair of matching quotes which enclose the whole text.
pub(crate) fn strip_quotes(text: &str) -> Option<&str> {
    let quote = text.chars().next()?;

    if (quote == '\'' || quote == '"') && text.len() >= 2 && text.ends_with(quote) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
/// Dice roll in the usual `NdM` notation.
///
/// A roll can keep only the highest dice (`4d6k3`) and add a constant (`1d20+3`).
///
/// # Examples
/// ```
/// # use sceneflow::DiceRoll;
/// let dice = DiceRoll::parse("4d6k3+1").unwrap();
///
/// assert_eq!(dice.count, 4);
/// assert_eq!(dice.sides, 6);
/// assert_eq!(dice.keep, Some(3));
/// assert_eq!(dice.modifier, 1);
///
/// assert_eq!(dice.min(), 4);
/// assert_eq!(dice.max(), 19);
/// ```
pub struct DiceRoll {
    /// Number of dice to roll.
    pub count: u32,
    /// Number of sides on every die.
    pub sides: u32,
    /// Number of the highest dice to sum, if not all.
    pub keep: Option<u32>,
    /// Constant added to the sum.
    pub modifier: i32,
}

impl DiceRoll {
    /// Parse a dice roll from its notation.
    ///
    /// The number of dice defaults to 1 if left out. Rolls with no dice, no sides or more
    /// dice or sides than the runtime limits allow are invalid.
    pub fn parse(text: &str) -> Result<Self, SyntaxErrorKind> {
        let invalid = || SyntaxErrorKind::InvalidDiceRoll(text.trim().to_string());

        let compact = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        let (count, rest) = compact.split_at(compact.find('d').ok_or_else(invalid)?);
        let rest = &rest[1..];

        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| invalid())?
        };

        let modifier_start = rest.find(|c| c == '+' || c == '-');
        let (dice, modifier) = match modifier_start {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        let modifier = if modifier.is_empty() {
            0
        } else {
            modifier
                .trim_start_matches('+')
                .parse::<i32>()
                .map_err(|_| invalid())?
        };

        let (sides, keep) = match dice.find('k') {
            Some(i) => (&dice[..i], Some(&dice[i + 1..])),
            None => (dice, None),
        };

        let sides = sides.parse::<u32>().map_err(|_| invalid())?;

        let keep = match keep {
            Some(keep) => Some(keep.parse::<u32>().map_err(|_| invalid())?),
            None => None,
        };

        let is_valid = count > 0
            && count <= MAX_DICE
            && sides > 0
            && sides <= MAX_DICE_SIDES
            && keep.map(|keep| keep > 0 && keep <= count).unwrap_or(true);

        if !is_valid {
            return Err(invalid());
        }

        Ok(DiceRoll {
            count,
            sides,
            keep,
            modifier,
        })
    }

    /// Roll the dice.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let mut rolls = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides) as i64)
            .collect::<Vec<_>>();

        if let Some(keep) = self.keep {
            rolls.sort_unstable_by(|a, b| b.cmp(a));
            rolls.truncate(keep as usize);
        }

        rolls.iter().sum::<i64>() + self.modifier as i64
    }

    /// Lowest possible result.
    pub fn min(&self) -> i64 {
        self.kept() as i64 + self.modifier as i64
    }

    /// Highest possible result.
    pub fn max(&self) -> i64 {
        self.kept() as i64 * self.sides as i64 + self.modifier as i64
    }

    fn kept(&self) -> u32 {
        self.keep.unwrap_or(self.count)
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;

        if let Some(keep) = self.keep {
            write!(f, "k{}", keep)?;
        }

        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }

        Ok(())
    }
}

/// Whether text is shaped like dice notation: optional digits, a `d` and a digit.
///
/// Only text of this shape is read as a roll, so that words like `dog` stay strings
/// while malformed rolls like `2d0` are reported.
pub(crate) fn looks_like_dice(text: &str) -> bool {
    let text = text.trim().to_lowercase();

    match text.find('d') {
        Some(i) => {
            text[..i].chars().all(|c| c.is_ascii_digit())
                && text[i + 1..].chars().next().map_or(false, |c| c.is_ascii_digit())
                && text[i + 1..]
                    .chars()
                    .all(|c| c.is_ascii_digit() || "k+- ".contains(c))
        }
        None => false,
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Literal(variable) => write!(f, "{}", variable.to_error_string()),
            Operand::VariableRef(name) => write!(f, "{{{}}}", name),
            Operand::Dice(dice) => write!(f, "{}", dice),
        }
    }
}
