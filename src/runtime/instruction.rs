//! Handlers for custom `>> NAME` instructions.

use crate::directive::VariableSet;

/// Handler for a custom instruction.
///
/// Lines such as `>> WEATHER tomorrow` which are not built in are dispatched by name to the
/// handler registered with the [`Driver`][crate::runtime::Driver].
///
/// # Examples
/// ```
/// # use sceneflow::{compile_story, Driver, Input, InstructionExtension, SessionState, Variable,
/// #     VariableSet};
/// #[derive(Debug)]
/// struct Coins;
///
/// impl InstructionExtension for Coins {
///     fn name(&self) -> &str {
///         "COINS"
///     }
///
///     fn execute(
///         &self,
///         params: &[String],
///         variables: &mut VariableSet,
///     ) -> Result<Option<String>, String> {
///         let amount = params.first().ok_or("no amount")?;
///         variables.insert("coins".to_string(), Variable::from(amount.as_str()));
///
///         Ok(Some(format!("You find {} coins.", amount)))
///     }
/// }
///
/// let program = compile_story("@start\n*then\n    >> COINS 5\n    >> END\n").unwrap();
/// let driver = Driver::new(&program).with_instruction(Box::new(Coins));
///
/// let output = driver.run_turn(Input::launch(), SessionState::default()).unwrap();
///
/// assert_eq!(output.speech, "You find 5 coins.");
/// ```
pub trait InstructionExtension: std::fmt::Debug {
    /// Name of the instruction, compared case-insensitively.
    fn name(&self) -> &str;

    /// Run the instruction.
    ///
    /// Returns text to add to the speech, if any. An error stops the turn.
    fn execute(
        &self,
        params: &[String],
        variables: &mut VariableSet,
    ) -> Result<Option<String>, String>;
}
