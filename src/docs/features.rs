//! Syntax of story documents.
//!
//! Stories are plain text. Examples of what goes into a document appear like this:
//!
//! ```plain
//! @start
//! *say
//!     Hello!
//! ```
//!
//! # Scenes
//!
//! A scene starts with `@` and its id on a line of its own and runs until the next scene.
//! Ids are case sensitive and must be unique across every document of a story. Every story
//! needs a scene called `start`, which is where sessions begin.
//!
//! ```plain
//! @start
//! *say
//!     You stand at the gate of the old castle.
//!
//! @courtyard
//! *say
//!     Weeds grow between the stones.
//! ```
//!
//! ## Properties
//!
//! Scenes are split into properties, each starting with `*` and its name. The body of a
//! property is indented below it.
//!
//! *   `*say`: narration which is spoken when the scene is entered.
//! *   `*reprompt`: spoken if the user does not answer. Defaults to the narration.
//! *   `*recap`: spoken when input matched nothing, or when a paused session continues.
//! *   `*then`: directives which run after the narration.
//!
//! Properties with other names are kept in the compiled scene for tools to read.
//!
//! # Comments
//!
//! Line comments start with `//` and block comments are enclosed in `/*` and `*/`. Neither
//! is ever spoken. Comments which start with `TODO:` are listed in the compile log.
//!
//! ```plain
//! *say
//!     The gate is shut. // TODO: describe the lock
//!     /* The guard arrives
//!        in a later draft. */
//! ```
//!
//! # Navigation
//!
//! *   `-> scene` continues in another scene.
//! *   `<-> scene` continues in another scene and comes back with `>> RETURN`.
//! *   `>> BACK` or `>> BACK 2` goes back in the history of visited scenes.
//! *   `>> RESTART` clears every variable and starts over from `start`.
//! *   `>> PAUSE` marks where the next launch continues, and `>> RESUME` jumps there.
//! *   `>> REPEAT` says the last speech again and `>> REPROMPT` the last reprompt.
//! *   `>> END` ends the story.
//!
//! A scene which waits for no choice once its directives have run ends the story.
//!
//! # Choices
//!
//! `hear` lists the utterances of a choice, separated by commas. The block runs when the
//! user says any of them. Case and extra whitespace do not matter.
//!
//! ```plain
//! *then
//!     hear open the gate, knock {
//!         -> courtyard
//!     }
//!     otherwise {
//!         -> start
//!     }
//! ```
//!
//! The `otherwise` block runs when nothing else matched. Choices taken through it are not
//! added to the navigation history.
//!
//! Utterances can hold `{slot}` placeholders which match one or more words. The words
//! are stored in a variable with the `slot` directive:
//!
//! ```plain
//!     hear my name is {name} {
//!         slot name to 'AMAZON.FirstName'
//!     }
//! ```
//!
//! Slot types which do not start with `AMAZON.` must be declared to the compiler.
//!
//! # Variables
//!
//! Variables hold text, numbers or booleans and are stored with the session.
//!
//! ```plain
//!     flag lamp
//!     unflag lamp
//!     set name to 'Ada'
//!     set gold to {loot}
//!     increase gold by 5
//!     decrease gold by 1
//!     multiply gold by 2
//!     divide gold by 3
//!     modulus gold by 4
//!     clear gold
//!     clear *
//! ```
//!
//! Variables which were never set count as false, zero or empty text. Division by zero
//! sets the variable to 0.
//!
//! Variables are spoken by writing their name in braces: `You have {gold} gold.`
//!
//! # Conditions
//!
//! ```plain
//!     if gold >= 10 and not cursed {
//!         -> shop
//!     } else {
//!         -> street
//!     }
//! ```
//!
//! Comparisons are `==` (or `is`), `!=`, `<`, `<=`, `>` and `>=`. Conditions are combined
//! with `and`, `or` and `not` (or `&&`, `||` and `!`) and can be grouped with parentheses.
//!
//! # Dice
//!
//! `roll 2d6` stores the sum of two six-sided dice in `rollResult`. A roll can keep its
//! highest dice and add a constant: `roll 4d6k3+1`. Dice can also be set directly, as in
//! `set damage to 1d8`.
//!
//! # Audio
//!
//! *   `bgm https://example.com/rain.mp3` plays audio from an address.
//! *   `[sfx thunder]` in narration plays the named sound from the audio library.
//!
//! Narration lines with a voice-over recording named `<scene>-<line>` are replaced by the
//! recording.
//!
//! # Snippets
//!
//! `{{name}}` in narration is replaced by the snippet of that name. Snippets can refer to
//! other snippets.
//!
//! # Global scenes
//!
//! Scenes whose ids start with `global` add their content to every other scene:
//!
//! *   `@global prepend`: before the content of every scene.
//! *   `@global postpend`: after it.
//! *   `@global append` or `@global`: only its choices, after those of every scene.
//!
//! # Custom instructions
//!
//! `>> NAME params` with any other name is run by the instruction extension registered
//! under that name. Unknown instructions are skipped.
