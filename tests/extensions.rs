use sceneflow::{
    log::{MessageKind, Warning},
    *,
};

use std::{collections::BTreeMap, sync::Arc};

fn compile_with(text: &str, input: CompileInput, options: &CompileOptions) -> CompileOutput {
    let input = CompileInput {
        documents: vec![SourceDocument::from_text("main", text)],
        ..input
    };

    compile(&input, options)
}

fn launch(program: &Program) -> TurnOutput {
    Driver::new(program)
        .run_turn(Input::launch(), SessionState::default())
        .unwrap()
}

const GLOBALS: &str = "\
@start
*say
    The hall.
*then
    hear upstairs {
        -> attic
    }

@attic
*say
    The attic.
*then
    hear downstairs {
        -> start
    }

@global prepend
*say
    Thunder rolls.

@global append
*then
    hear help {
        <-> help
    }

@help
*say
    Say where you want to go.
*then
    >> RETURN
";

#[test]
fn global_scenes_are_heard_in_every_scene() {
    let output = compile_with(GLOBALS, CompileInput::default(), &CompileOptions::default());
    let program = output.program.unwrap();

    let driver = Driver::new(&program);

    let launched = driver
        .run_turn(Input::launch(), SessionState::default())
        .unwrap();
    assert_eq!(launched.speech, "Thunder rolls. The hall.");

    let attic = driver
        .run_turn(Input::utterance("upstairs"), launched.state)
        .unwrap();
    assert_eq!(attic.speech, "Thunder rolls. The attic.");

    let help = driver.run_turn(Input::utterance("help"), attic.state).unwrap();
    assert_eq!(help.speech, "Thunder rolls. Say where you want to go.");
    assert_eq!(help.state.current_scene.as_deref(), Some("attic"));

    let keys = help
        .state
        .choices
        .iter()
        .map(|choice| choice.key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, vec!["downstairs", "help"]);
}

#[test]
fn global_exceptions_are_left_alone() {
    let options = CompileOptions {
        global_exceptions: vec!["attic".to_string()],
        ..Default::default()
    };

    let program = compile_with(GLOBALS, CompileInput::default(), &options)
        .program
        .unwrap();

    assert_eq!(program.scene("attic").unwrap().contents.len(), 1);
    assert_eq!(program.scene("start").unwrap().contents.len(), 3);
}

const GREETING: &str = "\
@start
*say
    Welcome, traveller.
*then
    hear yes {
        -> inn
    }

@inn
*say
    The inn is warm.
";

#[test]
fn compiles_fill_the_string_table_of_the_source_locale() {
    let output = compile_with(GREETING, CompileInput::default(), &CompileOptions::default());

    let strings = &output.strings;

    assert_eq!(
        strings.get("en-US", "start.narration"),
        Some("Welcome, traveller.")
    );
    assert_eq!(strings.get("en-US", "utterance-yes"), Some("yes"));
}

#[test]
fn translated_stories_are_spoken_and_heard_in_the_locale() {
    let mut strings = LanguageStrings::new();
    strings.insert("de-DE", "start.narration", "Willkommen, Reisender.");
    strings.insert("de-DE", "inn.narration", "Das Gasthaus ist warm.");
    strings.insert("de-DE", "utterance-yes", "ja");

    let input = CompileInput {
        strings,
        ..Default::default()
    };

    let options = CompileOptions {
        locale: Some("de-DE".to_string()),
        ..Default::default()
    };

    let output = compile_with(GREETING, input, &options);
    let program = output.program.unwrap();

    assert_eq!(program.metadata.locale.as_deref(), Some("de-DE"));

    let driver = Driver::new(&program);

    let launched = driver
        .run_turn(Input::launch(), SessionState::default())
        .unwrap();
    assert_eq!(launched.speech, "Willkommen, Reisender.");

    let inn = driver.run_turn(Input::utterance("Ja"), launched.state).unwrap();
    assert_eq!(inn.speech, "Das Gasthaus ist warm.");
}

#[test]
fn missing_translations_fall_back_to_the_source_and_are_logged() {
    let options = CompileOptions {
        locale: Some("fr-FR".to_string()),
        ..Default::default()
    };

    let output = compile_with(GREETING, CompileInput::default(), &options);

    assert_eq!(output.strings.get("fr-FR", "start.narration"), Some(""));

    let program = output.program.unwrap();
    assert_eq!(launch(&program).speech, "Welcome, traveller.");

    assert!(output.log.iter().any(|message| message.message
        == MessageKind::Warning(Warning::MissingTranslation {
            key: "start.narration".to_string(),
            locale: "fr-FR".to_string(),
        })));
}

#[test]
fn snippets_are_expanded_in_narration() {
    let mut snippets = BTreeMap::new();
    snippets.insert("greeting".to_string(), "Well met".to_string());
    snippets.insert("welcome".to_string(), "{{greeting}}, traveller".to_string());

    let input = CompileInput {
        snippets,
        ..Default::default()
    };

    let output = compile_with(
        "@start\n*say\n    {{welcome}}. {{farewell}}\n",
        input,
        &CompileOptions::default(),
    );

    let program = output.program.unwrap();
    assert_eq!(launch(&program).speech, "Well met, traveller. {{farewell}}");

    assert!(output.log.iter().any(|message| message.message
        == MessageKind::Warning(Warning::UnknownSnippet {
            name: "farewell".to_string()
        })));
}

#[test]
fn sound_effects_and_voice_overs_become_audio() {
    let audio = AudioLibrary::new()
        .with("thunder", "https://cdn.example.com/thunder.mp3")
        .with("start-2", "https://cdn.example.com/start-2.mp3");

    let options = CompileOptions {
        audio: Arc::new(audio),
        ..Default::default()
    };

    let text = "\
@start
*say
    [sfx thunder] A storm.
    The lights go out.
    [sfx rain] It pours.
";

    let output = compile_with(text, CompileInput::default(), &options);
    let program = output.program.unwrap();

    assert_eq!(
        launch(&program).speech,
        "<audio src='https://cdn.example.com/thunder.mp3'/> A storm. \
         <audio src='https://cdn.example.com/start-2.mp3'/> [sfx rain] It pours."
    );

    assert!(output.log.iter().any(|message| message.message
        == MessageKind::Warning(Warning::MissingAudio {
            name: "rain".to_string()
        })));
}

#[test]
fn background_music_is_played_from_its_address() {
    let program = compile_story("@start\n*say\n    Rain.\n*then\n    bgm https://cdn.example.com/rain.mp3\n")
        .unwrap();

    assert_eq!(
        launch(&program).speech,
        "Rain. <audio src='https://cdn.example.com/rain.mp3'/>"
    );
}
