// Block markers
pub const SCENE_MARKER: &'static str = "@";
pub const PROPERTY_MARKER: &'static str = "*";
pub const OPEN_BRACE: char = '{';
pub const CLOSE_BRACE: char = '}';

// Known properties of a scene
pub const SAY_PROPERTY: &'static str = "say";
pub const REPROMPT_PROPERTY: &'static str = "reprompt";
pub const RECAP_PROPERTY: &'static str = "recap";
pub const THEN_PROPERTY: &'static str = "then";

// Comments
pub const LINE_COMMENT_MARKER: &'static str = "//";
pub const BLOCK_COMMENT_BEGIN: &'static str = "/*";
pub const BLOCK_COMMENT_END: &'static str = "*/";
pub const TODO_COMMENT_MARKER: &'static str = "TODO:";

// Navigation markers
pub const GOTO_MARKER: &'static str = "->";
pub const SAVE_AND_GO_MARKER: &'static str = "<->";
pub const CONTROL_MARKER: &'static str = ">>";

// Choice keywords
pub const HEAR_KEYWORD: &'static str = "hear";
pub const OTHERWISE_KEYWORD: &'static str = "otherwise";
pub const IF_KEYWORD: &'static str = "if";
pub const ELSE_KEYWORD: &'static str = "else";

/// Scene every story starts from.
pub const START_SCENE: &'static str = "start";

/// Prefix of scenes whose content is injected into every other scene.
pub const GLOBAL_SCENE_PREFIX: &'static str = "global";

/// Variable that receives the result of a `roll` directive.
pub const ROLL_RESULT_VARIABLE: &'static str = "rollResult";

/// Intent delivered by the platform when a session is (re)opened.
pub const LAUNCH_INTENT: &'static str = "LaunchRequest";

/// Slot types which are provided by the platform and need no declaration.
pub const BUILTIN_SLOT_TYPE_PREFIX: &'static str = "AMAZON.";

// Runtime limits
pub const MAX_STEPS: usize = 10_000;
pub const HISTORY_LIMIT: usize = 30;
pub const MAX_SNIPPET_DEPTH: usize = 8;
pub const MAX_DICE: u32 = 100;
pub const MAX_DICE_SIDES: u32 = 1000;

/// Prefix of session state keys reserved for the driver.
pub const RESERVED_VARIABLE_PREFIX: &'static str = "system_";
