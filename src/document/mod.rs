//! Story documents and how their structure is located.

pub(crate) mod authoring;
pub(crate) mod enumerate;
pub(crate) mod locator;
pub(crate) mod position;
pub(crate) mod source;

pub use authoring::{delete_scene, find_scene, get_references, insert_scene, rename_scene};
pub use enumerate::{PropertyEnumerator, SceneEnumerator};
pub use locator::{Block, BlockLocator, EndRule, StartPattern};
pub use position::{Position, Range};
pub use source::SourceDocument;
