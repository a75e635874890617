//! Substitution of reusable text snippets.

use crate::{
    consts::MAX_SNIPPET_DEPTH,
    extension::{rewrite_spans, ExtensionContext, ImportExtension},
    log::Warning,
    story::Program,
};

use std::collections::BTreeMap;

const SNIPPET_BEGIN: &str = "{{";
const SNIPPET_END: &str = "}}";

#[derive(Clone, Copy, Debug, Default)]
/// Replaces `{{name}}` in scene text with the snippet of that name.
///
/// Snippets may use other snippets. A snippet which uses itself, directly or through
/// others, or which nests deeper than 8 levels has the offending reference removed.
/// Unknown snippets are left in the text. Both cases are logged.
pub struct SnippetExtension;

impl ImportExtension for SnippetExtension {
    fn name(&self) -> &'static str {
        "snippets"
    }

    fn extend_imported_content(&self, program: &mut Program, context: &mut ExtensionContext) {
        for scene in program.scenes.iter_mut() {
            let mut warnings = Vec::new();

            for content in scene.contents.iter_mut() {
                let texts = std::iter::once(&mut content.narration)
                    .chain(content.reprompt.iter_mut())
                    .chain(content.recap.iter_mut());

                for text in texts {
                    *text = expand(text, &context.snippets, &mut Vec::new(), &mut warnings);
                }
            }

            for warning in warnings {
                context.logger.add_warning(
                    warning,
                    Some(&scene.document),
                    Some(scene.range.start),
                );
            }
        }
    }
}

/// Expand the snippets in a text. The stack holds the snippets being expanded.
fn expand(
    text: &str,
    snippets: &BTreeMap<String, String>,
    stack: &mut Vec<String>,
    warnings: &mut Vec<Warning>,
) -> String {
    rewrite_spans(text, SNIPPET_BEGIN, SNIPPET_END, |name| {
        let snippet = match snippets.get(name) {
            Some(snippet) => snippet,
            None => {
                warnings.push(Warning::UnknownSnippet {
                    name: name.to_string(),
                });

                return None;
            }
        };

        if stack.iter().any(|outer| outer == name) || stack.len() >= MAX_SNIPPET_DEPTH {
            warnings.push(Warning::RecursiveSnippet {
                name: name.to_string(),
            });

            return Some(String::new());
        }

        stack.push(name.to_string());
        let expanded = expand(snippet, snippets, &mut *stack, &mut *warnings);
        stack.pop();

        Some(expanded)
    })
}
