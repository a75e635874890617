//! Assembly of speech from the text produced during a turn.

use crate::directive::VariableSet;

#[derive(Clone, Debug, Default)]
/// Text produced during a turn, in order.
pub(crate) struct OutputBuffer {
    items: Vec<String>,
}

impl OutputBuffer {
    /// Add text to the buffer. Blank text is skipped.
    pub fn push(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.items.push(text.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Join the text into speech, with variables filled in.
    pub fn finalize(&self, variables: &VariableSet) -> String {
        render(&self.items.join(" "), variables)
    }
}

/// Fill in variables and trim the text to single spaces between words.
pub(crate) fn render(text: &str, variables: &VariableSet) -> String {
    trim_extra_whitespace(&interpolate(text, variables))
}

/// Replace `{name}` with the value of the variable, or nothing if it is not set.
///
/// Snippet references (`{{name}}`) and braces around anything but a name are kept.
fn interpolate(text: &str, variables: &VariableSet) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let from_brace = &rest[start..];

        if from_brace.starts_with("{{") {
            let end = from_brace.find("}}").map_or(from_brace.len(), |end| end + 2);

            result.push_str(&from_brace[..end]);
            rest = &from_brace[end..];

            continue;
        }

        match from_brace[1..].find('}') {
            Some(length) if is_variable_name(&from_brace[1..1 + length]) => {
                let name = from_brace[1..1 + length].trim();

                if let Some(variable) = variables.get(name) {
                    result.push_str(&variable.to_string());
                }

                rest = &from_brace[length + 2..];
            }
            _ => {
                result.push('{');
                rest = &from_brace[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn is_variable_name(text: &str) -> bool {
    let name = text.trim();

    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Trim multiple whitespace characters between words.
fn trim_extra_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
