//! Compile a set of documents into a program.

use crate::{
    consts::{
        BLOCK_COMMENT_BEGIN, BLOCK_COMMENT_END, BUILTIN_SLOT_TYPE_PREFIX, LINE_COMMENT_MARKER,
        RECAP_PROPERTY, REPROMPT_PROPERTY, SAY_PROPERTY, START_SCENE, THEN_PROPERTY,
        TODO_COMMENT_MARKER,
    },
    directive::{parse_then_block, DirectiveKind, Operand, Variable},
    document::{
        locator::{mask_lines, Block},
        source::char_suffix,
        Position, PropertyEnumerator, Range, SceneEnumerator, SourceDocument,
    },
    error::{CompileError, CompileErrorKind, StructuralError},
    extension::{default_extensions, is_global_scene, ExtensionContext, LanguageStrings},
    external::{AudioResolver, NoAudio},
    log::{Logger, Warning},
    story::program::{Metadata, Program, Scene, SceneContent},
};

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use tracing::{debug, instrument};

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Identifier of the document read by [`compile_story`].
const DEFAULT_DOCUMENT_ID: &str = "main";

#[derive(Clone, Debug, Default)]
/// Everything a story is compiled from.
pub struct CompileInput {
    pub documents: Vec<SourceDocument>,
    /// Identifiers of the documents which make up the story, in order. If empty, all
    /// documents are used.
    pub manifest: Vec<String>,
    /// Custom slot types by name, with their values.
    pub slot_types: BTreeMap<String, Vec<String>>,
    /// String tables from previous compiles.
    pub strings: LanguageStrings,
    /// Snippets by name.
    pub snippets: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde_support", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
/// Settings of a compile.
pub struct CompileOptions {
    /// Locale to translate the story to, if any.
    pub locale: Option<String>,
    /// Locale the story is written in.
    pub source_locale: String,
    /// How translated strings are refreshed from the source. See
    /// [`LocalizationExtension`][crate::extension::LocalizationExtension].
    pub localization_overwrite: Option<bool>,
    /// Scenes which global scenes are not injected into.
    pub global_exceptions: Vec<String>,
    pub plugin_name: String,
    pub story_id: String,
    pub title: String,
    #[cfg_attr(feature = "serde_support", serde(skip, default = "default_audio"))]
    /// Lookup of voice-overs and sound effects.
    pub audio: Arc<dyn AudioResolver>,
}

fn default_audio() -> Arc<dyn AudioResolver> {
    Arc::new(NoAudio)
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            locale: None,
            source_locale: "en-US".to_string(),
            localization_overwrite: None,
            global_exceptions: Vec::new(),
            plugin_name: String::new(),
            story_id: String::new(),
            title: String::new(),
            audio: default_audio(),
        }
    }
}

#[derive(Clone, Debug)]
/// Result of a compile.
pub struct CompileOutput {
    /// Compiled program, unless a fatal error was found.
    pub program: Option<Program>,
    /// Every error found, fatal or not.
    pub errors: Vec<CompileError>,
    /// String tables, brought in sync with the story.
    pub strings: LanguageStrings,
    /// Warnings and to-do comments.
    pub log: Logger,
}

/// Compile a single story text with default options.
///
/// Returns the program if it compiled without any errors.
///
/// # Examples
/// ```
/// # use sceneflow::{compile_story, DirectiveKind};
/// let program = compile_story("@start\n*say\n\tHello\n*then\n\t-> start").unwrap();
///
/// let content = &program.scenes[0].contents[0];
///
/// assert_eq!(content.narration, "Hello");
/// assert_eq!(content.directives[0].kind, DirectiveKind::GoTo { target: "start".to_string() });
/// ```
pub fn compile_story(text: &str) -> Result<Program, Vec<CompileError>> {
    let input = CompileInput {
        documents: vec![SourceDocument::from_text(DEFAULT_DOCUMENT_ID, text)],
        ..Default::default()
    };

    let output = compile(&input, &CompileOptions::default());

    match output.program {
        Some(program) if output.errors.is_empty() => Ok(program),
        _ => Err(output.errors),
    }
}

/// Compile a set of documents into a program.
///
/// All errors are collected rather than returned at the first one. Syntax errors and
/// undeclared slot types leave a best-effort program behind. Any other error means that
/// no program is returned. Extensions only run on programs without fatal errors.
#[instrument(skip_all, fields(documents = input.documents.len()))]
pub fn compile(input: &CompileInput, options: &CompileOptions) -> CompileOutput {
    let mut errors = Vec::new();
    let mut context =
        ExtensionContext::new(options, input.strings.clone(), input.snippets.clone());

    let mut documents = select_documents(input, &mut errors);
    let extensions = default_extensions();

    for extension in extensions.iter() {
        extension.extend_source_content(&mut documents, &mut context);
    }

    let mut scenes = Vec::new();

    for document in documents.iter() {
        read_document(document, &mut scenes, &mut errors, &mut context.logger);
    }

    validate_scenes(
        &scenes,
        documents.first().map(|document| document.id.as_str()),
        input,
        &mut errors,
        &mut context.logger,
    );

    let program = if errors.iter().any(|error| error.is_fatal()) {
        debug!(errors = errors.len(), "story has fatal errors");
        None
    } else {
        let mut program = Program {
            scenes,
            metadata: Metadata {
                plugin_name: options.plugin_name.clone(),
                story_id: options.story_id.clone(),
                title: options.title.clone(),
                locale: None,
            },
        };

        for extension in extensions.iter() {
            debug!(extension = extension.name(), "extending story");
            extension.extend_imported_content(&mut program, &mut context);
        }

        Some(program)
    };

    context.logger.sort();

    CompileOutput {
        program,
        errors,
        strings: context.strings,
        log: context.logger,
    }
}

/// Pick the documents listed in the manifest, in its order, or all of them.
fn select_documents(input: &CompileInput, errors: &mut Vec<CompileError>) -> Vec<SourceDocument> {
    if input.manifest.is_empty() {
        return input.documents.clone();
    }

    input
        .manifest
        .iter()
        .filter_map(|id| {
            let document = input.documents.iter().find(|document| &document.id == id);

            if document.is_none() {
                errors.push(CompileError {
                    document: id.clone(),
                    scene: None,
                    position: None,
                    kind: CompileErrorKind::UnknownDocument { id: id.clone() },
                });
            }

            document.cloned()
        })
        .collect()
}

fn read_document(
    document: &SourceDocument,
    scenes: &mut Vec<Scene>,
    errors: &mut Vec<CompileError>,
    logger: &mut Logger,
) {
    for scene in SceneEnumerator::new(document) {
        match scene {
            Ok(block) => scenes.push(read_scene(document, &block, errors)),
            Err(err) => errors.push(CompileError::from_structural(&document.id, None, err)),
        }
    }

    let scope = Range {
        start: Position::default(),
        end: Position::line_start(document.num_lines()),
    };

    // An open comment masks the rest of the document, also when a `*then` block reported it
    if let Some(position) = mask_lines(&document.lines(), &scope).open_comment {
        errors.push(CompileError::from_structural(
            &document.id,
            None,
            StructuralError::UnterminatedComment { position },
        ));
    }

    collect_todo_comments(document, logger);
}

fn read_scene(document: &SourceDocument, block: &Block, errors: &mut Vec<CompileError>) -> Scene {
    let id = block.block_name.clone();
    let mut content = SceneContent::default();

    for property in PropertyEnumerator::new(block) {
        let property = match property {
            Ok(property) => property,
            Err(err) => {
                errors.push(CompileError::from_structural(&document.id, Some(&id), err));
                continue;
            }
        };

        let name = property.block_name.to_lowercase();

        match name.as_str() {
            SAY_PROPERTY => {
                let text = read_text(&property);

                if !content.narration.is_empty() && !text.is_empty() {
                    content.narration.push('\n');
                }

                content.narration.push_str(&text);
            }
            REPROMPT_PROPERTY => content.reprompt = Some(read_text(&property)),
            RECAP_PROPERTY => content.recap = Some(read_text(&property)),
            THEN_PROPERTY => {
                let (directives, syntax_errors) = parse_then_block(&property);

                content.directives.extend(directives);
                errors.extend(
                    syntax_errors
                        .into_iter()
                        .map(|err| CompileError::from_syntax(&document.id, &id, err)),
                );
            }
            _ => content
                .properties
                .push((property.block_name.clone(), read_text(&property))),
        }
    }

    Scene {
        id,
        document: document.id.clone(),
        range: block.range,
        contents: vec![content],
    }
}

/// Read the text of a property: lines without comments, trimmed, with blank lines removed.
fn read_text(property: &Block) -> String {
    if property.body.is_empty() {
        return String::new();
    }

    let masked = mask_lines(&property.lines, &property.body);

    property
        .body
        .row_span()
        .filter_map(|row| masked.get(row))
        .map(|line| line.text_from(0))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Log the comments which start with the to-do marker.
fn collect_todo_comments(document: &SourceDocument, logger: &mut Logger) {
    let lines = document.lines();

    let scope = Range {
        start: Position::default(),
        end: Position::line_start(lines.len()),
    };

    let masked = mask_lines(&lines, &scope);

    for (row, line) in lines.iter().enumerate() {
        let masked_line = match masked.get(row) {
            Some(masked_line) => masked_line,
            None => continue,
        };

        let chars = line.chars().collect::<Vec<_>>();

        // Comments are the only text which masking blanks out
        let comment_start = (0..chars.len()).find(|&column| {
            masked_line.text.get(column) == Some(&' ')
                && (char_suffix(line, column).starts_with(LINE_COMMENT_MARKER)
                    || char_suffix(line, column).starts_with(BLOCK_COMMENT_BEGIN))
        });

        if let Some(column) = comment_start {
            let comment = char_suffix(line, column + LINE_COMMENT_MARKER.chars().count());
            let comment = comment.split(BLOCK_COMMENT_END).next().unwrap_or("");

            if comment.trim_start().starts_with(TODO_COMMENT_MARKER) {
                logger.add_todo(comment, &document.id, Position::new(row, column));
            }
        }
    }
}

fn validate_scenes(
    scenes: &[Scene],
    first_document: Option<&str>,
    input: &CompileInput,
    errors: &mut Vec<CompileError>,
    logger: &mut Logger,
) {
    let mut declared: HashMap<&str, &Scene> = HashMap::new();

    for scene in scenes.iter() {
        match declared.get(scene.id.as_str()) {
            Some(previous) => errors.push(CompileError {
                document: scene.document.clone(),
                scene: Some(scene.id.clone()),
                position: Some(scene.range.start),
                kind: CompileErrorKind::DuplicateScene {
                    id: scene.id.clone(),
                    previous_document: previous.document.clone(),
                    previous_position: previous.range.start,
                },
            }),
            None => {
                declared.insert(&scene.id, scene);
            }
        }
    }

    if !declared.contains_key(START_SCENE) {
        errors.push(CompileError {
            document: first_document.unwrap_or(DEFAULT_DOCUMENT_ID).to_string(),
            scene: None,
            position: None,
            kind: CompileErrorKind::MissingScene {
                id: START_SCENE.to_string(),
            },
        });
    }

    let mut reached = HashSet::new();

    for scene in scenes.iter() {
        let content = match scene.contents.first() {
            Some(content) => content,
            None => continue,
        };

        let is_empty = content.narration.is_empty()
            && content.reprompt.is_none()
            && content.recap.is_none()
            && content.directives.is_empty();

        if is_empty {
            logger.add_warning(
                Warning::EmptyScene {
                    scene: scene.id.clone(),
                },
                Some(&scene.document),
                Some(scene.range.start),
            );
        }

        for directive in content.directives.iter().flat_map(|d| d.walk()) {
            if let Some(target) = directive.target() {
                if !declared.contains_key(target) {
                    errors.push(CompileError {
                        document: scene.document.clone(),
                        scene: Some(scene.id.clone()),
                        position: Some(directive.range.start),
                        kind: CompileErrorKind::UnknownTarget {
                            target: target.to_string(),
                        },
                    });
                }

                if target != scene.id {
                    reached.insert(target);
                }
            }

            if let DirectiveKind::Slot {
                slot_type: Operand::Literal(Variable::String(slot_type)),
                ..
            } = &directive.kind
            {
                let is_known = slot_type.starts_with(BUILTIN_SLOT_TYPE_PREFIX)
                    || input.slot_types.contains_key(slot_type);

                if !is_known {
                    errors.push(CompileError {
                        document: scene.document.clone(),
                        scene: Some(scene.id.clone()),
                        position: Some(directive.range.start),
                        kind: CompileErrorKind::UnknownSlotType {
                            slot_type: slot_type.clone(),
                        },
                    });
                }
            }
        }
    }

    for scene in scenes.iter() {
        let is_entry = scene.id == START_SCENE || is_global_scene(&scene.id);

        if !is_entry && !reached.contains(scene.id.as_str()) {
            logger.add_warning(
                Warning::UnreachableScene {
                    scene: scene.id.clone(),
                },
                Some(&scene.document),
                Some(scene.range.start),
            );
        }
    }
}
