//! Parse the directives of a `*then` block.
//!
//! Parsing is line oriented. Each line holds a single directive, except for `hear`, `otherwise`
//! and `if` which open brace-enclosed blocks of nested directives. Lines which cannot be
//! parsed produce a [`SyntaxError`] and parsing continues on the next line, so that a block
//! yields every directive it can along with every error in it.

use crate::{
    consts::{
        CLOSE_BRACE, CONTROL_MARKER, ELSE_KEYWORD, GOTO_MARKER, HEAR_KEYWORD, IF_KEYWORD,
        OTHERWISE_KEYWORD, RESERVED_VARIABLE_PREFIX, SAVE_AND_GO_MARKER,
    },
    directive::{
        directive::{Choice, Directive, DirectiveKind, Operation},
        expression::Expression,
        operand::{parse_operand, strip_braces, strip_quotes, DiceRoll, Operand},
        variable::{parse_number, Variable},
    },
    document::{
        locator::{mask_lines, Block, BlockLocator, EndRule, MaskedLines, StartPattern},
        Position, Range,
    },
    error::{StructuralError, SyntaxError, SyntaxErrorKind},
};

use std::sync::Arc;

/// Parse the directives of a block.
///
/// # Examples
/// ```
/// # use sceneflow::{parse_then_block, DirectiveKind, PropertyEnumerator, SceneEnumerator,
/// #     SourceDocument};
/// let document = SourceDocument::from_text("main", "\
/// @start
/// *then
///     increase visits by 1
///     hear yes {
///         -> hall
///     }
///     jump around
/// ");
///
/// let scene = SceneEnumerator::new(&document).next().unwrap().unwrap();
/// let then = PropertyEnumerator::new(&scene).next_of(Some("then")).unwrap().unwrap();
///
/// let (directives, errors) = parse_then_block(&then);
///
/// assert_eq!(directives.len(), 2);
/// assert!(matches!(directives[1].kind, DirectiveKind::Choice(_)));
///
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].line_number(), 7);
/// ```
pub fn parse_then_block(block: &Block) -> (Vec<Directive>, Vec<SyntaxError>) {
    let mut parser = DirectiveParser {
        lines: block.lines.clone(),
        errors: Vec::new(),
    };

    let directives = parser.parse_scope(block.body);

    if let Some(position) = mask_lines(&block.lines, &block.body).open_comment {
        parser
            .errors
            .push(SyntaxError::new(position, SyntaxErrorKind::UnterminatedComment));
    }

    let mut errors = parser.errors;
    errors.sort_by_key(|error| error.position);

    (directives, errors)
}

struct DirectiveParser {
    lines: Arc<[String]>,
    errors: Vec<SyntaxError>,
}

impl DirectiveParser {
    fn error(&mut self, position: Position, kind: SyntaxErrorKind) {
        self.errors.push(SyntaxError::new(position, kind));
    }

    /// Parse all directives in a scope.
    fn parse_scope(&mut self, scope: Range) -> Vec<Directive> {
        let masked = mask_lines(&self.lines, &scope);
        let mut directives = Vec::new();

        let mut cursor = scope.start;

        while cursor.row < masked.end_row() {
            let line = match masked.get(cursor.row) {
                Some(line) => line,
                None => break,
            };

            let column = match line.first_code_column(cursor.column) {
                Some(column) => column,
                None => {
                    cursor = Position::line_start(cursor.row + 1);
                    continue;
                }
            };

            let start = Position::new(cursor.row, column);

            if line.code[column] == CLOSE_BRACE {
                self.error(start, SyntaxErrorKind::UnexpectedClosingBrace);
                cursor = Position::new(cursor.row, column + 1);
                continue;
            }

            let word = first_word(&line.code[column..]);

            cursor = match word.as_str() {
                HEAR_KEYWORD | OTHERWISE_KEYWORD => {
                    match self.locate(&word, scope, start) {
                        Ok(block) => {
                            if let Some(directive) = self.parse_choice(&word, &block) {
                                directives.push(directive);
                            }

                            block.range.end
                        }
                        Err(()) => Position::line_start(start.row + 1),
                    }
                }
                IF_KEYWORD => match self.locate(&word, scope, start) {
                    Ok(block) => {
                        let expression = self.parse_expression(&block, &block.block_name);
                        let (directive, end) =
                            self.parse_conditional(expression, block, scope, &masked);

                        if let Some(directive) = directive {
                            directives.push(directive);
                        }

                        end
                    }
                    Err(()) => Position::line_start(start.row + 1),
                },
                ELSE_KEYWORD => {
                    self.error(start, SyntaxErrorKind::UnexpectedElse);

                    match self.locate(&word, scope, start) {
                        Ok(block) => block.range.end,
                        Err(()) => Position::line_start(start.row + 1),
                    }
                }
                _ => {
                    let text = line.text_from(column);
                    let end = line
                        .text
                        .iter()
                        .rposition(|c| !c.is_whitespace())
                        .map(|i| i + 1)
                        .unwrap_or(column);

                    let range = Range {
                        start,
                        end: Position::new(start.row, end.max(column)),
                    };

                    match parse_line(&text) {
                        Ok(kind) => directives.push(Directive { kind, range }),
                        Err(kind) => self.error(start, kind),
                    }

                    Position::line_start(start.row + 1)
                }
            };
        }

        directives
    }

    /// Locate the brace-enclosed block which opens at a position.
    ///
    /// Errors are recorded against the position and reported as `Err(())`.
    fn locate(&mut self, keyword: &str, scope: Range, start: Position) -> Result<Block, ()> {
        let result = BlockLocator::with_scope(
            self.lines.clone(),
            StartPattern::Keyword(keyword.to_string()),
            EndRule::BraceMatch,
            scope,
        )
        .starting_at(start)
        .next();

        match result {
            Some(Ok(block)) if block.range.start == start => Ok(block),
            Some(Err(StructuralError::UnterminatedBlock { .. })) => {
                self.error(start, SyntaxErrorKind::MissingClosingBrace);
                Err(())
            }
            _ => {
                self.error(start, SyntaxErrorKind::MissingOpeningBrace);
                Err(())
            }
        }
    }

    fn parse_choice(&mut self, keyword: &str, block: &Block) -> Option<Directive> {
        let is_fallback = keyword == OTHERWISE_KEYWORD || block.block_name == OTHERWISE_KEYWORD;

        let utterances = if is_fallback {
            Vec::new()
        } else {
            split_utterances(&block.block_name)
        };

        let directives = self.parse_scope(block.body);

        if !is_fallback && utterances.is_empty() {
            self.error(block.range.start, SyntaxErrorKind::EmptyChoice);
            return None;
        }

        Some(Directive {
            kind: DirectiveKind::Choice(Choice {
                utterances,
                save_to_history: !is_fallback,
                is_fallback,
                directives,
            }),
            range: block.range,
        })
    }

    /// Parse the condition of an `if` block.
    fn parse_expression(&mut self, block: &Block, condition: &str) -> Option<Expression> {
        match Expression::parse(condition) {
            Ok(expression) => Some(expression),
            Err(kind) => {
                self.error(block.range.start, kind);
                None
            }
        }
    }

    /// Parse a conditional block along with any `else` blocks which follow it.
    ///
    /// Returns the directive, if the condition could be read, and the position after the
    /// last block of the chain.
    fn parse_conditional(
        &mut self,
        expression: Option<Expression>,
        block: Block,
        scope: Range,
        masked: &MaskedLines,
    ) -> (Option<Directive>, Position) {
        let then_branch = self.parse_scope(block.body);
        let mut end = block.range.end;
        let mut else_branch = None;

        if let Some(else_start) = find_else(masked, end) {
            if let Ok(else_block) = self.locate(ELSE_KEYWORD, scope, else_start) {
                end = else_block.range.end;

                if is_else_if(&else_block.block_name) {
                    let condition = &else_block.block_name[IF_KEYWORD.len()..];
                    let else_expression = self.parse_expression(&else_block, condition);
                    let (nested, nested_end) =
                        self.parse_conditional(else_expression, else_block, scope, masked);

                    end = nested_end;
                    else_branch = Some(nested.into_iter().collect());
                } else {
                    if !else_block.block_name.is_empty() {
                        self.error(
                            else_start,
                            SyntaxErrorKind::InvalidExpression(format!(
                                "unexpected '{}' after 'else'",
                                else_block.block_name
                            )),
                        );
                    }

                    else_branch = Some(self.parse_scope(else_block.body));
                }
            } else {
                end = Position::line_start(else_start.row + 1);
            }
        }

        let directive = expression.map(|expression| Directive {
            kind: DirectiveKind::Conditional {
                expression,
                then_branch,
                else_branch,
            },
            range: Range {
                start: block.range.start,
                end,
            },
        });

        (directive, end)
    }
}

/// Find an `else` which directly follows a block that ends at the position: on the same
/// line or on the next line with code.
fn find_else(masked: &MaskedLines, end: Position) -> Option<Position> {
    let mut row = end.row;
    let mut from = end.column;

    while row < masked.end_row() {
        let line = masked.get(row)?;

        if let Some(column) = line.first_code_column(from) {
            return if first_word(&line.code[column..]) == ELSE_KEYWORD {
                Some(Position::new(row, column))
            } else {
                None
            };
        }

        row += 1;
        from = 0;
    }

    None
}

fn is_else_if(name: &str) -> bool {
    name == IF_KEYWORD
        || (name.starts_with(IF_KEYWORD)
            && name[IF_KEYWORD.len()..]
                .chars()
                .next()
                .map_or(false, |c| c.is_whitespace() || c == '('))
}

/// Read the first word of some code: characters up to whitespace or a brace.
fn first_word(code: &[char]) -> String {
    code.iter()
        .take_while(|c| !c.is_whitespace() && **c != '{')
        .collect()
}

/// Split the utterances of a `hear` header on commas.
fn split_utterances(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(|utterance| utterance.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|utterance| !utterance.is_empty())
        .collect()
}

/// Parse a single line directive from comment-free, trimmed text.
fn parse_line(text: &str) -> Result<DirectiveKind, SyntaxErrorKind> {
    if text.starts_with(SAVE_AND_GO_MARKER) {
        let target = parse_target(&text[SAVE_AND_GO_MARKER.len()..])?;
        return Ok(DirectiveKind::SaveAndGo { target });
    }

    if text.starts_with(GOTO_MARKER) {
        let target = parse_target(&text[GOTO_MARKER.len()..])?;
        return Ok(DirectiveKind::GoTo { target });
    }

    if text.starts_with(CONTROL_MARKER) {
        return parse_control(text, &text[CONTROL_MARKER.len()..]);
    }

    let (keyword, rest) = split_first_word(text);

    match keyword {
        "flag" => Ok(DirectiveKind::Flag {
            variable: parse_variable_name(rest)?,
        }),
        "unflag" => Ok(DirectiveKind::Unflag {
            variable: parse_variable_name(rest)?,
        }),
        "clear" if rest.trim() == "*" => Ok(DirectiveKind::Clear {
            variable: "*".to_string(),
        }),
        "clear" => Ok(DirectiveKind::Clear {
            variable: parse_variable_name(rest)?,
        }),
        "set" => {
            let (variable, value) = split_assignment(rest, &["to", "as", "="])?;

            Ok(DirectiveKind::Set {
                variable,
                operand: parse_operand(value)?,
            })
        }
        "slot" => {
            let (variable, value) = split_assignment(rest, &["to", "as"])?;

            Ok(DirectiveKind::Slot {
                variable,
                slot_type: parse_slot_type(value)?,
            })
        }
        "roll" if rest.trim().is_empty() => Err(SyntaxErrorKind::MissingValue),
        "roll" => Ok(DirectiveKind::Roll {
            dice: DiceRoll::parse(rest)?,
        }),
        "bgm" if rest.trim().is_empty() => Err(SyntaxErrorKind::MissingValue),
        "bgm" => Ok(DirectiveKind::Bgm {
            url: rest.trim().to_string(),
        }),
        _ => match Operation::from_keyword(keyword) {
            Some(operation) => {
                let (variable, value) = split_assignment(rest, &["by"])?;

                Ok(DirectiveKind::Arithmetic {
                    operation,
                    variable,
                    operand: parse_arithmetic_operand(value)?,
                })
            }
            None => Err(SyntaxErrorKind::UnknownDirective(text.to_string())),
        },
    }
}

fn parse_target(text: &str) -> Result<String, SyntaxErrorKind> {
    let target = text.trim();

    if target.is_empty() {
        Err(SyntaxErrorKind::MissingSceneName)
    } else {
        Ok(target.to_string())
    }
}

/// Parse a `>>` control directive. Control keywords are case-insensitive.
fn parse_control(line: &str, text: &str) -> Result<DirectiveKind, SyntaxErrorKind> {
    let mut words = text.split_whitespace();

    let name = words
        .next()
        .ok_or_else(|| SyntaxErrorKind::UnknownDirective(line.to_string()))?;
    let params = words.map(|word| word.to_string()).collect::<Vec<_>>();

    let kind = match name.to_uppercase().as_str() {
        "RETURN" => DirectiveKind::Return,
        "RESTART" => DirectiveKind::Restart,
        "PAUSE" => DirectiveKind::Pause,
        "RESUME" => DirectiveKind::Resume,
        "REPEAT" => DirectiveKind::Repeat,
        "REPROMPT" => DirectiveKind::RepeatReprompt,
        "END" => DirectiveKind::End,
        "BACK" | "GOBACK" => {
            let count = match params.first() {
                Some(count) => count
                    .parse::<usize>()
                    .ok()
                    .filter(|count| *count > 0)
                    .ok_or_else(|| SyntaxErrorKind::InvalidNumber(count.clone()))?,
                None => 1,
            };

            DirectiveKind::Back { count }
        }
        _ => DirectiveKind::Custom {
            name: name.to_string(),
            params,
        },
    };

    Ok(kind)
}

fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim();

    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

/// Validate a variable name, which may be wrapped in braces.
fn parse_variable_name(text: &str) -> Result<String, SyntaxErrorKind> {
    let text = text.trim();
    let name = strip_braces(text).unwrap_or(text).trim();

    if name.is_empty() {
        Err(SyntaxErrorKind::MissingVariableName)
    } else if name.starts_with(RESERVED_VARIABLE_PREFIX) {
        Err(SyntaxErrorKind::ReservedVariable(name.to_string()))
    } else {
        Ok(name.to_string())
    }
}

/// Split `name connector value` into the variable name and the value text.
///
/// The connector may be left out. A `=` connector may be attached to the name.
fn split_assignment<'a>(
    text: &'a str,
    connectors: &[&str],
) -> Result<(String, &'a str), SyntaxErrorKind> {
    let text = text.trim();

    let name_end = text
        .find(|c: char| c.is_whitespace() || (c == '=' && connectors.contains(&"=")))
        .unwrap_or(text.len());

    let variable = parse_variable_name(&text[..name_end])?;
    let mut value = text[name_end..].trim_start();

    for connector in connectors {
        if let Some(rest) = strip_connector(value, connector) {
            value = rest;
            break;
        }
    }

    if value.trim().is_empty() {
        return Err(SyntaxErrorKind::MissingValue);
    }

    Ok((variable, value.trim()))
}

fn strip_connector<'a>(text: &'a str, connector: &str) -> Option<&'a str> {
    if !text.starts_with(connector) {
        return None;
    }

    let rest = &text[connector.len()..];

    if connector == "=" || rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// Operands of arithmetic must be numbers, references, dice or quoted text.
fn parse_arithmetic_operand(text: &str) -> Result<Operand, SyntaxErrorKind> {
    match parse_operand(text)? {
        Operand::Literal(Variable::String(value))
            if strip_quotes(text).is_none() && parse_number(&value).is_none() =>
        {
            Err(SyntaxErrorKind::InvalidNumber(value))
        }
        operand => Ok(operand),
    }
}

/// Slot types are names, optionally quoted, or references to a variable holding the name.
fn parse_slot_type(text: &str) -> Result<Operand, SyntaxErrorKind> {
    if strip_braces(text).is_some() {
        return parse_operand(text);
    }

    let name = strip_quotes(text).unwrap_or(text).trim();

    if name.is_empty() {
        Err(SyntaxErrorKind::MissingValue)
    } else {
        Ok(Operand::Literal(Variable::from(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::{PropertyEnumerator, SceneEnumerator, SourceDocument};

    fn parse(body: &str) -> (Vec<Directive>, Vec<SyntaxError>) {
        let content = format!("@start\n*then\n{}", body);
        let document = SourceDocument::from_text("test", &content);

        let scene = SceneEnumerator::new(&document).next().unwrap().unwrap();
        let then = PropertyEnumerator::new(&scene)
            .next_of(Some("then"))
            .unwrap()
            .unwrap();

        parse_then_block(&then)
    }

    fn kinds(body: &str) -> Vec<DirectiveKind> {
        let (directives, errors) = parse(body);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        directives.into_iter().map(|d| d.kind).collect()
    }

    fn error_kinds(body: &str) -> Vec<(usize, SyntaxErrorKind)> {
        parse(body)
            .1
            .into_iter()
            .map(|error| (error.line_number(), error.kind))
            .collect()
    }

    #[test]
    fn navigation_directives_read_their_target() {
        assert_eq!(
            kinds("-> hall\n<->  side room  "),
            vec![
                DirectiveKind::GoTo {
                    target: "hall".to_string()
                },
                DirectiveKind::SaveAndGo {
                    target: "side room".to_string()
                }
            ]
        );
    }

    #[test]
    fn control_keywords_are_case_insensitive() {
        assert_eq!(
            kinds(">> restart\n>> End\n>>RETURN\n>> back 2\n>> GoBack\n>> reprompt"),
            vec![
                DirectiveKind::Restart,
                DirectiveKind::End,
                DirectiveKind::Return,
                DirectiveKind::Back { count: 2 },
                DirectiveKind::Back { count: 1 },
                DirectiveKind::RepeatReprompt,
            ]
        );
    }

    #[test]
    fn unknown_control_keywords_are_custom_instructions() {
        assert_eq!(
            kinds(">> SHAKE hard twice"),
            vec![DirectiveKind::Custom {
                name: "SHAKE".to_string(),
                params: vec!["hard".to_string(), "twice".to_string()],
            }]
        );
    }

    #[test]
    fn bare_keywords_are_case_sensitive() {
        assert_eq!(
            error_kinds("Flag ready"),
            vec![(
                3,
                SyntaxErrorKind::UnknownDirective("Flag ready".to_string())
            )]
        );
    }

    #[test]
    fn variable_directives_accept_all_connectors() {
        let expected = DirectiveKind::Set {
            variable: "mood".to_string(),
            operand: Operand::Literal(Variable::from("happy")),
        };

        assert_eq!(kinds("set mood to happy"), vec![expected.clone()]);
        assert_eq!(kinds("set mood as happy"), vec![expected.clone()]);
        assert_eq!(kinds("set mood = happy"), vec![expected.clone()]);
        assert_eq!(kinds("set mood=happy"), vec![expected]);
    }

    #[test]
    fn operands_are_disambiguated_by_braces_and_quotes() {
        assert_eq!(
            kinds("set a to {b}\nset a to '5'\nset a to 5"),
            vec![
                DirectiveKind::Set {
                    variable: "a".to_string(),
                    operand: Operand::VariableRef("b".to_string()),
                },
                DirectiveKind::Set {
                    variable: "a".to_string(),
                    operand: Operand::Literal(Variable::from("5")),
                },
                DirectiveKind::Set {
                    variable: "a".to_string(),
                    operand: Operand::Literal(Variable::from(5)),
                },
            ]
        );
    }

    #[test]
    fn arithmetic_directives_read_operation_and_operand() {
        assert_eq!(
            kinds("increase counter by 1\nmodulus counter by {base}\ndecrease hp by 1d6"),
            vec![
                DirectiveKind::Arithmetic {
                    operation: Operation::Increase,
                    variable: "counter".to_string(),
                    operand: Operand::Literal(Variable::from(1)),
                },
                DirectiveKind::Arithmetic {
                    operation: Operation::Modulus,
                    variable: "counter".to_string(),
                    operand: Operand::VariableRef("base".to_string()),
                },
                DirectiveKind::Arithmetic {
                    operation: Operation::Decrease,
                    variable: "hp".to_string(),
                    operand: Operand::Dice(DiceRoll::parse("1d6").unwrap()),
                },
            ]
        );
    }

    #[test]
    fn malformed_variable_directives_are_reported_per_line() {
        assert_eq!(
            error_kinds("set\nset x to\nincrease x by lots\nflag system_turn\nroll 2d0\n-> "),
            vec![
                (3, SyntaxErrorKind::MissingVariableName),
                (4, SyntaxErrorKind::MissingValue),
                (5, SyntaxErrorKind::InvalidNumber("lots".to_string())),
                (6, SyntaxErrorKind::ReservedVariable("system_turn".to_string())),
                (7, SyntaxErrorKind::InvalidDiceRoll("2d0".to_string())),
                (8, SyntaxErrorKind::MissingSceneName),
            ]
        );
    }

    #[test]
    fn flags_slots_and_audio() {
        assert_eq!(
            kinds("flag has key\nunflag door\nclear *\nslot name to 'AMAZON.FirstName'\nbgm https://example.com/rain.mp3"),
            vec![
                DirectiveKind::Flag {
                    variable: "has key".to_string()
                },
                DirectiveKind::Unflag {
                    variable: "door".to_string()
                },
                DirectiveKind::Clear {
                    variable: "*".to_string()
                },
                DirectiveKind::Slot {
                    variable: "name".to_string(),
                    slot_type: Operand::Literal(Variable::from("AMAZON.FirstName")),
                },
                DirectiveKind::Bgm {
                    url: "https://example.com/rain.mp3".to_string()
                },
            ]
        );
    }

    #[test]
    fn hear_blocks_hold_utterances_and_nested_directives() {
        let (directives, errors) = parse("hear yes, sure thing , {\n\t-> hall\n}\notherwise {\n\t>> REPEAT\n}");
        assert!(errors.is_empty(), "{:?}", errors);

        match &directives[0].kind {
            DirectiveKind::Choice(choice) => {
                assert_eq!(choice.utterances, vec!["yes", "sure thing"]);
                assert!(choice.save_to_history);
                assert!(!choice.is_fallback);
                assert_eq!(choice.directives.len(), 1);
            }
            other => panic!("expected a choice but got {:?}", other),
        }

        match &directives[1].kind {
            DirectiveKind::Choice(choice) => {
                assert!(choice.is_fallback);
                assert!(!choice.save_to_history);
            }
            other => panic!("expected a choice but got {:?}", other),
        }

        assert_eq!(directives[0].range, Range::from((2, 0, 4, 1)));
    }

    #[test]
    fn hear_otherwise_is_a_fallback() {
        match &kinds("hear otherwise {\n-> a\n}")[0] {
            DirectiveKind::Choice(choice) => assert!(choice.is_fallback),
            other => panic!("expected a choice but got {:?}", other),
        }
    }

    #[test]
    fn empty_hear_is_an_error() {
        assert_eq!(
            error_kinds("hear , {\n-> a\n}"),
            vec![(3, SyntaxErrorKind::EmptyChoice)]
        );
    }

    #[test]
    fn conditionals_take_else_on_the_same_or_next_line() {
        let same_line = kinds("if ready {\n-> a\n} else {\n-> b\n}");
        let next_line = kinds("if ready {\n-> a\n}\nelse\n{\n-> b\n}");

        for parsed in &[same_line, next_line] {
            match &parsed[0] {
                DirectiveKind::Conditional {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    assert_eq!(then_branch[0].target(), Some("a"));
                    assert_eq!(else_branch.as_ref().unwrap()[0].target(), Some("b"));
                }
                other => panic!("expected a conditional but got {:?}", other),
            }

            assert_eq!(parsed.len(), 1);
        }
    }

    #[test]
    fn else_if_chains_nest_conditionals() {
        let parsed = kinds("if a {\n-> a\n} else if b {\n-> b\n} else {\n-> c\n}\n-> d");

        assert_eq!(parsed.len(), 2);

        match &parsed[0] {
            DirectiveKind::Conditional { else_branch, .. } => {
                let nested = &else_branch.as_ref().unwrap()[0];

                match &nested.kind {
                    DirectiveKind::Conditional {
                        then_branch,
                        else_branch,
                        ..
                    } => {
                        assert_eq!(then_branch[0].target(), Some("b"));
                        assert_eq!(else_branch.as_ref().unwrap()[0].target(), Some("c"));
                    }
                    other => panic!("expected a conditional but got {:?}", other),
                }
            }
            other => panic!("expected a conditional but got {:?}", other),
        }
    }

    #[test]
    fn missing_braces_are_pinned_to_the_if_line() {
        assert_eq!(
            error_kinds("-> a\nif ready\n-> b"),
            vec![(4, SyntaxErrorKind::MissingOpeningBrace)]
        );

        assert_eq!(
            error_kinds("-> a\nif ready {\n-> b\n"),
            vec![(4, SyntaxErrorKind::MissingClosingBrace)]
        );
    }

    #[test]
    fn stray_braces_and_else_are_errors() {
        assert_eq!(
            error_kinds("}\nelse {\n-> a\n}"),
            vec![
                (3, SyntaxErrorKind::UnexpectedClosingBrace),
                (4, SyntaxErrorKind::UnexpectedElse),
            ]
        );
    }

    #[test]
    fn comments_are_ignored_and_unterminated_comments_reported() {
        assert_eq!(
            kinds("// -> nowhere\n-> a // trailing\n/* -> b\n-> c */\n-> d"),
            vec![
                DirectiveKind::GoTo {
                    target: "a".to_string()
                },
                DirectiveKind::GoTo {
                    target: "d".to_string()
                },
            ]
        );

        assert_eq!(
            error_kinds("-> a\n/* open"),
            vec![(4, SyntaxErrorKind::UnterminatedComment)]
        );
    }

    #[test]
    fn errors_in_nested_blocks_do_not_stop_parsing() {
        let (directives, errors) = parse("hear yes {\n\tjump\n\t-> a\n}\n-> b");

        assert_eq!(directives.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line_number(), 4);
    }

    #[test]
    fn invalid_conditions_are_reported_and_skipped() {
        let (directives, errors) = parse("if a and {\n-> a\n}\n-> b");

        assert_eq!(directives.len(), 1);
        assert!(matches!(
            errors[0].kind,
            SyntaxErrorKind::InvalidExpression(_)
        ));
    }
}
