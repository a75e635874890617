//! Authoring operations on documents: finding scenes and the navigation which leads to them,
//! and renaming, deleting or inserting scenes.
//!
//! Edits never modify a document in place. Each operation returns a new document version.

use crate::{
    consts::{SCENE_MARKER, THEN_PROPERTY},
    directive::{parse_then_block, Directive, DirectiveKind},
    document::{
        enumerate::{PropertyEnumerator, SceneEnumerator},
        position::{Position, Range},
        source::SourceDocument,
    },
    error::StructuralError,
};

use tracing::debug;

/// Find the range of the scene with the given id.
///
/// # Examples
/// ```
/// # use sceneflow::{document::find_scene, Range, SourceDocument};
/// let document = SourceDocument::from_text("main", "@start\n*say\n\tHi\n@end\n*say\n\tBye");
///
/// assert_eq!(find_scene(&document, "end"), Some(Range::rows(3, 5).unwrap()));
/// assert_eq!(find_scene(&document, "middle"), None);
/// ```
pub fn find_scene(document: &SourceDocument, id: &str) -> Option<Range> {
    SceneEnumerator::new(document)
        .filter_map(|scene| scene.ok())
        .find(|scene| scene.block_name == id)
        .map(|scene| scene.range)
}

/// Get every navigation to the scene with the given id, in document order.
///
/// Navigation which sits inside a `hear` block is reported with the range of the innermost
/// enclosing block, since that is what an author has to change to reroute the choice.
pub fn get_references(document: &SourceDocument, id: &str) -> Vec<Range> {
    let mut references = Vec::new();

    for directives in then_blocks(document) {
        collect_references(&directives, id, None, &mut references);
    }

    references
}

/// Rename a scene and every navigation to it.
///
/// Navigation in other documents is not touched: rename the scene in every document of a
/// story to keep it consistent. Fails if an edit falls outside of the document.
///
/// # Examples
/// ```
/// # use sceneflow::{document::{find_scene, get_references, rename_scene}, SourceDocument};
/// let document = SourceDocument::from_text("main", "\
/// @start
/// *then
///     hear cellar {
///         -> cellar
///     }
/// @cellar
/// *then
///     -> start
/// ");
///
/// let renamed = rename_scene(&document, "cellar", "basement").unwrap();
///
/// assert!(find_scene(&renamed, "basement").is_some());
/// assert!(find_scene(&renamed, "cellar").is_none());
/// assert_eq!(get_references(&renamed, "basement").len(), 1);
/// assert!(renamed.text().contains("-> basement"));
/// ```
pub fn rename_scene(
    document: &SourceDocument,
    old_id: &str,
    new_id: &str,
) -> Result<SourceDocument, StructuralError> {
    let mut edits = Vec::new();

    for directives in then_blocks(document) {
        collect_navigation(&directives, old_id, new_id, &mut edits);
    }

    let headers = SceneEnumerator::new(document)
        .filter_map(|scene| scene.ok())
        .filter(|scene| scene.block_name == old_id)
        .map(|scene| {
            let start = scene.range.start;
            let end = Position::new(
                start.row,
                start.column + SCENE_MARKER.chars().count() + old_id.chars().count(),
            );

            (Range { start, end }, format!("{}{}", SCENE_MARKER, new_id))
        })
        .collect::<Vec<_>>();

    edits.extend(headers);

    debug!(
        document = %document.id,
        old_id,
        new_id,
        edits = edits.len(),
        "renaming scene"
    );

    apply_edits(document, edits)
}

/// Remove a scene, from its header to the line before the next scene.
///
/// Returns the document unchanged if the scene does not exist.
pub fn delete_scene(document: &SourceDocument, id: &str) -> SourceDocument {
    match find_scene(document, id) {
        Some(range) => document.remove_rows(range.row_span()),
        None => document.clone(),
    }
}

/// Insert a new scene with the given content at the end of the document.
///
/// The content is the text below the header, such as `*say` and `*then` properties.
pub fn insert_scene(document: &SourceDocument, id: &str, content: &str) -> SourceDocument {
    let mut lines = Vec::new();

    let ends_with_blank = document
        .line(document.num_lines().saturating_sub(1))
        .map_or(true, |line| line.trim().is_empty());

    if !ends_with_blank {
        lines.push(String::new());
    }

    lines.push(format!("{}{}", SCENE_MARKER, id));
    lines.extend(content.lines().map(|line| line.to_string()));

    document.insert_lines(document.num_lines(), &lines)
}

/// Parse the directives of every `*then` block in the document.
fn then_blocks(document: &SourceDocument) -> Vec<Vec<Directive>> {
    SceneEnumerator::new(document)
        .filter_map(|scene| scene.ok())
        .flat_map(|scene| {
            let mut properties = PropertyEnumerator::new(&scene);
            let mut blocks = Vec::new();

            while let Some(property) = properties.next_of(Some(THEN_PROPERTY)) {
                if let Ok(block) = property {
                    blocks.push(parse_then_block(&block).0);
                }
            }

            blocks
        })
        .collect()
}

fn collect_references(
    directives: &[Directive],
    id: &str,
    enclosing: Option<Range>,
    references: &mut Vec<Range>,
) {
    for directive in directives {
        match &directive.kind {
            DirectiveKind::Choice(choice) => {
                collect_references(&choice.directives, id, Some(directive.range), references);
            }
            DirectiveKind::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                collect_references(then_branch, id, enclosing, references);

                if let Some(branch) = else_branch {
                    collect_references(branch, id, enclosing, references);
                }
            }
            _ if directive.target() == Some(id) => {
                references.push(enclosing.unwrap_or(directive.range));
            }
            _ => (),
        }
    }
}

/// Collect edits which point the navigation directives to a scene at its new id.
fn collect_navigation(
    directives: &[Directive],
    old_id: &str,
    new_id: &str,
    edits: &mut Vec<(Range, String)>,
) {
    for directive in directives.iter().flat_map(|directive| directive.walk()) {
        let replacement = match &directive.kind {
            DirectiveKind::GoTo { target } if target == old_id => DirectiveKind::GoTo {
                target: new_id.to_string(),
            },
            DirectiveKind::SaveAndGo { target } if target == old_id => DirectiveKind::SaveAndGo {
                target: new_id.to_string(),
            },
            _ => continue,
        };

        edits.push((directive.range, replacement.to_string()));
    }
}

/// Apply edits from the bottom of the document up, so that earlier positions stay valid.
fn apply_edits(
    document: &SourceDocument,
    mut edits: Vec<(Range, String)>,
) -> Result<SourceDocument, StructuralError> {
    edits.sort_by_key(|(range, _)| range.start);

    let mut edited = document.clone();

    for (range, replacement) in edits.into_iter().rev() {
        edited = edited.replace(&range, &replacement)?;
    }

    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_outside_of_the_document_fail_the_whole_edit() {
        let document = SourceDocument::from_text("main", "@start\n*then\n    -> hall\n");

        let edits = vec![
            (Range::rows(2, 2).unwrap(), "    -> lobby".to_string()),
            (
                Range {
                    start: Position::new(40, 0),
                    end: Position::new(41, 0),
                },
                "@lobby".to_string(),
            ),
        ];

        assert_eq!(
            apply_edits(&document, edits),
            Err(StructuralError::InvalidRange {
                start: Position::new(40, 0),
                end: Position::new(41, 0),
            })
        );
    }

    #[test]
    fn renaming_edits_headers_and_navigation() {
        let document =
            SourceDocument::from_text("main", "@start\n*then\n    -> hall\n@hall\n*say\n    Hi\n");

        let renamed = rename_scene(&document, "hall", "lobby").unwrap();

        assert_eq!(renamed.line(2).map(str::trim), Some("-> lobby"));
        assert_eq!(renamed.line(3), Some("@lobby"));
    }
}
