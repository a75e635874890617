//! Turn-based interpreter for compiled stories.

use crate::{
    consts::{HISTORY_LIMIT, MAX_STEPS, ROLL_RESULT_VARIABLE, START_SCENE},
    directive::{
        variable::number_or_zero, Choice, Directive, DirectiveKind, Variable,
    },
    error::{CorruptStateKind, RuntimeError},
    extension::audio_tag,
    runtime::{
        buffer::{render, OutputBuffer},
        input::{Input, TurnOutput},
        instruction::InstructionExtension,
        rng::StoryRng,
        state::{
            BlockPath, Branch, ChoicePath, Frame, HistoryEntry, ResumePoint, SessionState,
        },
    },
    story::{Program, Scene},
};

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

#[derive(Debug)]
/// Runs turns of a compiled story.
///
/// The driver owns nothing that changes between turns. Every call to
/// [`run_turn`][Driver::run_turn] takes the state of a session and returns the state to
/// store for the next turn, so a single driver can serve any number of sessions.
///
/// # Examples
/// ```
/// # use sceneflow::{compile_story, Driver, Input, SessionState};
/// let program = compile_story("\
/// @start
/// *say
///     Hello
/// *then
///     hear hi {
///         -> goodbye
///     }
///
/// @goodbye
/// *say
///     Bye
/// ").unwrap();
///
/// let driver = Driver::new(&program);
///
/// let first = driver.run_turn(Input::launch(), SessionState::default()).unwrap();
/// assert_eq!(first.speech, "Hello");
/// assert!(!first.should_end_session);
///
/// let second = driver.run_turn(Input::utterance("Hi"), first.state).unwrap();
/// assert_eq!(second.speech, "Bye");
/// assert!(second.should_end_session);
/// ```
pub struct Driver<'a> {
    program: &'a Program,
    instructions: Vec<Box<dyn InstructionExtension>>,
    seed: Option<u64>,
}

impl<'a> Driver<'a> {
    pub fn new(program: &'a Program) -> Self {
        Driver {
            program,
            instructions: Vec::new(),
            seed: None,
        }
    }

    /// Register a handler for custom instructions.
    pub fn with_instruction(mut self, instruction: Box<dyn InstructionExtension>) -> Self {
        self.instructions.push(instruction);
        self
    }

    /// Seed the random number generator of sessions which do not yet have one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run a single turn of a session.
    ///
    /// A launch input, or any input to a session which is not in a scene, starts the story
    /// from the start scene or continues it from where it was paused. Other input is matched
    /// against the choices which the session waits for.
    ///
    /// Input which matches no choice, with no `otherwise` to fall back on, speaks the scene's
    /// recap (or reprompt) and runs the scene's `*then` directives again without its
    /// narration. Every directive in them runs, so variable changes, rolls and `bgm` before
    /// the choices happen again on each unrecognised input.
    #[instrument(skip_all, fields(turn = state.turns + 1))]
    pub fn run_turn(
        &self,
        input: Input,
        mut state: SessionState,
    ) -> Result<TurnOutput, RuntimeError> {
        let rng = state
            .rng
            .take()
            .unwrap_or_else(|| match self.seed {
                Some(seed) => StoryRng::with_seed(seed),
                None => StoryRng::default(),
            });

        let original = (state.current_scene.clone(), state.choices.clone());

        let mut turn = Turn {
            driver: self,
            program: self.program,
            input,
            state,
            rng,
            buffer: OutputBuffer::default(),
            frames: Vec::new(),
            scene: String::new(),
            captures: BTreeMap::new(),
            unmatched: Vec::new(),
            steps: 0,
            record_history: true,
            ran_choice: false,
            ended: false,
            repeat: None,
            original,
        };

        turn.start()?;
        turn.execute()?;

        Ok(turn.finish())
    }
}

#[derive(Clone, Copy, Debug)]
enum Repeat {
    Speech,
    Reprompt,
}

/// Working state of a single turn.
struct Turn<'d, 'a> {
    driver: &'d Driver<'a>,
    program: &'a Program,
    input: Input,
    state: SessionState,
    rng: StoryRng,
    buffer: OutputBuffer,
    /// Lists of directives being run, innermost last.
    frames: Vec<Frame>,
    scene: String,
    /// Words captured by `{slot}` placeholders of the matched choice.
    captures: BTreeMap<String, String>,
    /// Choices which were waited for when the input matched none of them.
    unmatched: Vec<ChoicePath>,
    steps: usize,
    record_history: bool,
    ran_choice: bool,
    ended: bool,
    repeat: Option<Repeat>,
    original: (Option<String>, Vec<ChoicePath>),
}

impl<'d, 'a> Turn<'d, 'a> {
    fn start(&mut self) -> Result<(), RuntimeError> {
        self.state.turns += 1;

        match self.state.current_scene.clone() {
            Some(scene) if !self.input.is_launch() => self.respond(&scene),
            _ => self.launch(),
        }
    }

    fn launch(&mut self) -> Result<(), RuntimeError> {
        match self.state.paused.take() {
            Some(point) => {
                debug!(scene = %point.scene, "continuing paused session");

                let scene = self.stored_scene(&point.scene)?;

                if let Some(recap) = scene.recap() {
                    self.buffer.push(recap);
                }

                self.resume(point)
            }
            None => {
                self.state.history.clear();
                self.enter_scene(START_SCENE)
            }
        }
    }

    /// Match the input against the choices which the session waits for.
    fn respond(&mut self, id: &str) -> Result<(), RuntimeError> {
        let scene = self.program.scene(id).ok_or_else(|| {
            CorruptStateKind::UnknownCurrentScene {
                id: id.to_string(),
            }
        })?;

        self.scene = id.to_string();

        let choices = std::mem::take(&mut self.state.choices);
        let mut fallback = None;

        for path in choices.iter() {
            let choice = path.resolve(self.stored_scene(&path.scene)?)?;

            if choice.is_fallback {
                if fallback.is_none() {
                    fallback = Some((path, choice));
                }
            } else if let Some(captures) = self.match_choice(choice) {
                return self.take_choice(path, choice, captures);
            }
        }

        if let Some((path, choice)) = fallback {
            return self.take_choice(path, choice, BTreeMap::new());
        }

        debug!(scene = id, "input matched no choice");

        if let Some(text) = scene.recap().or_else(|| scene.reprompt()) {
            self.buffer.push(text);
        }

        self.unmatched = choices;
        self.frames = content_frames(scene);

        Ok(())
    }

    fn match_choice(&self, choice: &Choice) -> Option<BTreeMap<String, String>> {
        let heard = self.input.value.iter().chain(self.input.intent.iter());

        choice.utterances.iter().find_map(|utterance| {
            heard
                .clone()
                .find_map(|text| match_utterance(utterance, text))
        })
    }

    fn take_choice(
        &mut self,
        path: &ChoicePath,
        choice: &Choice,
        captures: BTreeMap<String, String>,
    ) -> Result<(), RuntimeError> {
        debug!(scene = %path.scene, choice = %path.key, "input matched choice");

        self.scene = path.scene.clone();
        self.state.current_scene = Some(path.scene.clone());
        self.record_history = choice.save_to_history;
        self.ran_choice = true;
        self.captures = captures;
        self.frames = vec![Frame {
            block: path.body(),
            next: 0,
        }];

        Ok(())
    }

    /// Run directives until the turn yields or no directives are left.
    fn execute(&mut self) -> Result<(), RuntimeError> {
        let program = self.program;

        while !self.ended && self.repeat.is_none() {
            let (block, next) = match self.frames.last() {
                Some(frame) => (frame.block.clone(), frame.next),
                None => return self.exhaust(),
            };

            let scene = program
                .scene(&self.scene)
                .ok_or_else(|| RuntimeError::MissingScene {
                    id: self.scene.clone(),
                })?;

            let directives = block.resolve(scene)?;

            match directives.get(next) {
                Some(directive) => {
                    if let Some(frame) = self.frames.last_mut() {
                        frame.next += 1;
                    }

                    self.count_step()?;
                    self.run_directive(directive, &block, next)?;
                }
                None => {
                    self.frames.pop();

                    if block.steps.is_empty() && block.content + 1 < scene.contents.len() {
                        self.frames.push(Frame {
                            block: BlockPath::content(block.content + 1),
                            next: 0,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn count_step(&mut self) -> Result<(), RuntimeError> {
        if self.steps >= MAX_STEPS {
            return Err(RuntimeError::InfiniteLoopSuspected {
                scene: self.scene.clone(),
                steps: self.steps,
            });
        }

        self.steps += 1;
        Ok(())
    }

    /// Every directive has run: wait for one of the registered choices or end the story.
    fn exhaust(&mut self) -> Result<(), RuntimeError> {
        if self.state.choices.is_empty() && self.ran_choice {
            self.collect_choices()?;
        }

        if self.state.choices.is_empty() && !self.unmatched.is_empty() {
            self.state.choices = std::mem::take(&mut self.unmatched);
        }

        if self.state.choices.is_empty() {
            debug!(scene = %self.scene, "no choices to wait for, ending the story");
            self.end();
        }

        Ok(())
    }

    /// Register the choices of the current scene without running any other directive.
    fn collect_choices(&mut self) -> Result<(), RuntimeError> {
        let program = self.program;
        let scene = program
            .scene(&self.scene)
            .ok_or_else(|| RuntimeError::MissingScene {
                id: self.scene.clone(),
            })?;

        for (index, content) in scene.contents.iter().enumerate() {
            self.collect_from(&content.directives, BlockPath::content(index));
        }

        Ok(())
    }

    fn collect_from(&mut self, directives: &[Directive], block: BlockPath) {
        for (index, directive) in directives.iter().enumerate() {
            match &directive.kind {
                DirectiveKind::Choice(choice) => self.register_choice(&block, index, choice),
                DirectiveKind::Conditional {
                    expression,
                    then_branch,
                    else_branch,
                } => {
                    if expression.evaluate(&self.state.variables) {
                        self.collect_from(then_branch, block.child(index, Branch::Then));
                    } else if let Some(else_branch) = else_branch {
                        self.collect_from(else_branch, block.child(index, Branch::Else));
                    }
                }
                _ => (),
            }
        }
    }

    fn register_choice(&mut self, block: &BlockPath, index: usize, choice: &Choice) {
        let key = choice.key();

        if self.state.choices.iter().all(|path| path.key != key) {
            self.state.choices.push(ChoicePath {
                scene: self.scene.clone(),
                block: block.clone(),
                index,
                key,
            });
        }
    }

    fn enter_scene(&mut self, id: &str) -> Result<(), RuntimeError> {
        let scene = self
            .program
            .scene(id)
            .ok_or_else(|| RuntimeError::MissingScene { id: id.to_string() })?;

        debug!(from = %self.scene, to = id, "entering scene");

        for content in scene.contents.iter() {
            self.buffer.push(&content.narration);
        }

        self.scene = id.to_string();
        self.state.current_scene = Some(id.to_string());
        self.state.choices.clear();
        *self.state.visits.entry(id.to_string()).or_insert(0) += 1;

        self.frames = content_frames(scene);
        self.record_history = true;
        self.ran_choice = false;
        self.unmatched.clear();

        Ok(())
    }

    /// Scene named by the session state.
    fn stored_scene(&self, id: &str) -> Result<&'a Scene, RuntimeError> {
        self.program.scene(id).ok_or_else(|| {
            CorruptStateKind::InvalidLocation {
                scene: id.to_string(),
            }
            .into()
        })
    }

    fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            scene: self.scene.clone(),
            frames: self.frames.clone(),
            choices: self.state.choices.clone(),
        }
    }

    fn resume(&mut self, point: ResumePoint) -> Result<(), RuntimeError> {
        self.stored_scene(&point.scene)?;

        // Continuing inside a choice body waits for the scene's choices again once it ends
        let in_choice = point.frames.iter().any(|frame| {
            frame
                .block
                .steps
                .iter()
                .any(|(_, branch)| *branch == Branch::Body)
        });

        self.scene = point.scene.clone();
        self.state.current_scene = Some(point.scene);
        self.state.choices = point.choices;
        self.frames = point.frames;
        self.record_history = true;
        self.ran_choice = in_choice;
        self.unmatched.clear();

        Ok(())
    }

    fn push_history(&mut self, resume: Option<ResumePoint>) {
        let history = &mut self.state.history;

        history.push(HistoryEntry {
            scene: self.scene.clone(),
            resume,
        });

        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }
    }

    fn end(&mut self) {
        self.state.current_scene = None;
        self.state.choices.clear();
        self.frames.clear();
        self.ended = true;
    }

    fn run_directive(
        &mut self,
        directive: &Directive,
        block: &BlockPath,
        index: usize,
    ) -> Result<(), RuntimeError> {
        match &directive.kind {
            DirectiveKind::GoTo { target } => {
                if self.record_history {
                    self.push_history(None);
                }

                self.enter_scene(target)
            }
            DirectiveKind::SaveAndGo { target } => {
                let point = self.resume_point();
                self.push_history(Some(point));

                self.enter_scene(target)
            }
            DirectiveKind::Return => self.return_to_caller(),
            DirectiveKind::Restart => {
                debug!(scene = %self.scene, "restarting the story");

                self.state.variables.clear();
                self.state.history.clear();
                self.state.visits.clear();
                self.state.paused = None;

                self.enter_scene(START_SCENE)
            }
            DirectiveKind::Pause => {
                self.state.paused = Some(self.resume_point());
                Ok(())
            }
            DirectiveKind::Resume => match self.state.paused.take() {
                Some(point) => self.resume(point),
                None => {
                    warn!(scene = %self.scene, "nothing was paused to resume");
                    Ok(())
                }
            },
            DirectiveKind::Repeat => {
                self.repeat = Some(Repeat::Speech);
                Ok(())
            }
            DirectiveKind::RepeatReprompt => {
                self.repeat = Some(Repeat::Reprompt);
                Ok(())
            }
            DirectiveKind::Back { count } => self.go_back(*count),
            DirectiveKind::End => {
                self.end();
                Ok(())
            }
            DirectiveKind::Flag { variable } => {
                self.set_variable(variable, Variable::Bool(true));
                Ok(())
            }
            DirectiveKind::Unflag { variable } => {
                self.set_variable(variable, Variable::Bool(false));
                Ok(())
            }
            DirectiveKind::Clear { variable } if variable == "*" => {
                self.state.variables.clear();
                Ok(())
            }
            DirectiveKind::Clear { variable } => {
                self.state.variables.remove(variable);
                Ok(())
            }
            DirectiveKind::Set { variable, operand } => {
                match operand.evaluate(&self.state.variables, &mut self.rng.generator) {
                    Some(value) => self.set_variable(variable, value),
                    None => {
                        self.state.variables.remove(variable);
                    }
                }

                Ok(())
            }
            DirectiveKind::Arithmetic {
                operation,
                variable,
                operand,
            } => {
                let lhs = number_or_zero(self.state.variables.get(variable));
                let rhs = operand.evaluate(&self.state.variables, &mut self.rng.generator);
                let rhs = number_or_zero(rhs.as_ref());

                let value = operation.apply(lhs, rhs).unwrap_or_else(|| {
                    warn!(variable = %variable, ?operation, "division by zero, setting 0");
                    0.0
                });

                self.set_variable(variable, Variable::Number(value));
                Ok(())
            }
            DirectiveKind::Slot { variable, .. } => {
                let value = self
                    .input
                    .slots
                    .get(variable)
                    .or_else(|| self.captures.get(variable))
                    .cloned();

                match value {
                    Some(value) => self.set_variable(variable, Variable::String(value)),
                    None => debug!(slot = %variable, "input has no value for slot"),
                }

                Ok(())
            }
            DirectiveKind::Choice(choice) => {
                self.register_choice(block, index, choice);
                Ok(())
            }
            DirectiveKind::Conditional {
                expression,
                else_branch,
                ..
            } => {
                let branch = if expression.evaluate(&self.state.variables) {
                    Some(Branch::Then)
                } else if else_branch.is_some() {
                    Some(Branch::Else)
                } else {
                    None
                };

                if let Some(branch) = branch {
                    self.frames.push(Frame {
                        block: block.child(index, branch),
                        next: 0,
                    });
                }

                Ok(())
            }
            DirectiveKind::Bgm { url } => {
                self.buffer.push(&audio_tag(url));
                Ok(())
            }
            DirectiveKind::Roll { dice } => {
                let roll = dice.roll(&mut self.rng.generator);
                self.set_variable(ROLL_RESULT_VARIABLE, Variable::from(roll));

                Ok(())
            }
            DirectiveKind::Custom { name, params } => self.run_instruction(name, params),
        }
    }

    fn set_variable(&mut self, name: &str, value: Variable) {
        self.state.variables.insert(name.to_string(), value);
    }

    /// Continue after the most recent `<->` which has not been returned from.
    fn return_to_caller(&mut self) -> Result<(), RuntimeError> {
        let history = &mut self.state.history;

        match history.iter().rposition(|entry| entry.resume.is_some()) {
            Some(position) => {
                let point = history
                    .split_off(position)
                    .into_iter()
                    .next()
                    .and_then(|entry| entry.resume);

                match point {
                    Some(point) => self.resume(point),
                    None => Ok(()),
                }
            }
            None => {
                warn!(scene = %self.scene, "no scene to return to");
                Ok(())
            }
        }
    }

    fn go_back(&mut self, count: usize) -> Result<(), RuntimeError> {
        let history = &mut self.state.history;

        if count == 0 || history.len() < count {
            debug!(count, history = history.len(), "cannot go back that far, restarting");
            history.clear();

            return self.enter_scene(START_SCENE);
        }

        let position = history.len() - count;

        match history.split_off(position).into_iter().next() {
            Some(HistoryEntry {
                resume: Some(point),
                ..
            }) => self.resume(point),
            Some(entry) => self.enter_scene(&entry.scene),
            None => self.enter_scene(START_SCENE),
        }
    }

    fn run_instruction(&mut self, name: &str, params: &[String]) -> Result<(), RuntimeError> {
        let driver = self.driver;

        let instruction = driver
            .instructions
            .iter()
            .find(|instruction| instruction.name().eq_ignore_ascii_case(name));

        match instruction {
            Some(instruction) => match instruction.execute(params, &mut self.state.variables) {
                Ok(Some(text)) => {
                    self.buffer.push(&text);
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(message) => Err(RuntimeError::Instruction {
                    name: name.to_string(),
                    message,
                }),
            },
            None => {
                warn!(instruction = name, "no handler for custom instruction, skipping");
                Ok(())
            }
        }
    }

    fn finish(mut self) -> TurnOutput {
        let (speech, reprompt) = match self.repeat {
            Some(Repeat::Speech) => (
                self.state.last_speech.clone(),
                self.state.last_reprompt.clone(),
            ),
            Some(Repeat::Reprompt) => (
                self.state.last_reprompt.clone(),
                self.state.last_reprompt.clone(),
            ),
            None => (
                self.buffer.finalize(&self.state.variables),
                self.reprompt(),
            ),
        };

        if self.repeat.is_some() {
            let (scene, choices) = self.original;

            self.state.current_scene = scene;
            self.state.choices = choices;
        } else {
            self.state.last_speech = speech.clone();
            self.state.last_reprompt = reprompt.clone();
        }

        self.state.rng = Some(self.rng);

        TurnOutput {
            speech,
            reprompt,
            state: self.state,
            should_end_session: self.ended,
        }
    }

    /// Reprompt of the scene which the turn ended in, or its narration if it has none.
    fn reprompt(&self) -> String {
        if self.ended {
            return String::new();
        }

        match self.program.scene(&self.scene) {
            Some(scene) => {
                let text = scene
                    .reprompt()
                    .map(|text| text.to_string())
                    .unwrap_or_else(|| scene.narration());

                render(&text, &self.state.variables)
            }
            None => String::new(),
        }
    }
}

/// Frames which run a scene from its first content.
fn content_frames(scene: &Scene) -> Vec<Frame> {
    if scene.contents.is_empty() {
        Vec::new()
    } else {
        vec![Frame {
            block: BlockPath::content(0),
            next: 0,
        }]
    }
}

/// Match heard words against an utterance, capturing the words of `{slot}` placeholders.
///
/// Words are compared without case. Captures keep the case they were heard in.
fn match_utterance(utterance: &str, heard: &str) -> Option<BTreeMap<String, String>> {
    let pattern = utterance.split_whitespace().collect::<Vec<_>>();
    let words = heard.split_whitespace().collect::<Vec<_>>();

    let mut captures = BTreeMap::new();

    if match_words(&pattern, &words, &mut captures) {
        Some(captures)
    } else {
        None
    }
}

fn match_words(pattern: &[&str], words: &[&str], captures: &mut BTreeMap<String, String>) -> bool {
    let (first, rest) = match pattern.split_first() {
        Some(split) => split,
        None => return words.is_empty(),
    };

    match placeholder(first) {
        Some(name) => (1..=words.len()).any(|length| {
            if match_words(rest, &words[length..], captures) {
                captures.insert(name.to_string(), words[..length].join(" "));
                true
            } else {
                false
            }
        }),
        None => match words.split_first() {
            Some((word, remaining)) if first.to_lowercase() == word.to_lowercase() => {
                match_words(rest, remaining, captures)
            }
            _ => false,
        },
    }
}

fn placeholder(word: &str) -> Option<&str> {
    word.strip_prefix('{')
        .and_then(|word| word.strip_suffix('}'))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
