//! Enumeration of scenes and their properties in a document.

use crate::{
    consts::{PROPERTY_MARKER, SCENE_MARKER},
    document::{
        locator::{Block, BlockLocator, EndRule, StartPattern},
        source::SourceDocument,
    },
    error::StructuralError,
};

/// Lazy, one-pass sequence of the `@scene` blocks in a document.
///
/// Each scene extends to the line before the next scene header or to the end of the
/// document.
///
/// # Examples
/// ```
/// # use sceneflow::{SceneEnumerator, SourceDocument};
/// let document = SourceDocument::from_text("main", "\
/// @start
/// *say
///     The door is locked.
///
/// @cellar
/// *say
///     It is dark.
/// ");
///
/// let ids = SceneEnumerator::new(&document)
///     .map(|scene| scene.unwrap().block_name)
///     .collect::<Vec<_>>();
///
/// assert_eq!(ids, vec!["start", "cellar"]);
/// ```
pub struct SceneEnumerator {
    locator: BlockLocator,
}

impl SceneEnumerator {
    pub fn new(document: &SourceDocument) -> Self {
        SceneEnumerator {
            locator: BlockLocator::new(
                document.lines(),
                StartPattern::Marker(SCENE_MARKER.to_string()),
                EndRule::UntilNext,
            ),
        }
    }
}

impl Iterator for SceneEnumerator {
    type Item = Result<Block, StructuralError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.locator.next()
    }
}

/// Lazy sequence of the `*property` blocks inside a scene.
///
/// Each property extends to the line before the next property header or to the end of
/// the scene.
pub struct PropertyEnumerator {
    locator: BlockLocator,
}

impl PropertyEnumerator {
    pub fn new(scene: &Block) -> Self {
        PropertyEnumerator {
            locator: BlockLocator::with_scope(
                scene.lines.clone(),
                StartPattern::Marker(PROPERTY_MARKER.to_string()),
                EndRule::UntilNext,
                scene.body,
            ),
        }
    }

    /// Get the next property block, only yielding blocks of the given type if one is set.
    ///
    /// Property types are compared case-insensitively.
    pub fn next_of(&mut self, kind: Option<&str>) -> Option<Result<Block, StructuralError>> {
        loop {
            match self.locator.next()? {
                Ok(block) => match kind {
                    Some(kind) if !block.block_name.eq_ignore_ascii_case(kind) => continue,
                    _ => return Some(Ok(block)),
                },
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl Iterator for PropertyEnumerator {
    type Item = Result<Block, StructuralError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_of(None)
    }
}
