use sceneflow::{
    error::{print_compile_errors, CompileErrorKind},
    log::{MessageKind, Warning},
    *,
};

fn compile_documents(documents: &[(&str, &str)], manifest: &[&str]) -> CompileOutput {
    let input = CompileInput {
        documents: documents
            .iter()
            .map(|(id, text)| SourceDocument::from_text(id, text))
            .collect(),
        manifest: manifest.iter().map(|id| id.to_string()).collect(),
        ..Default::default()
    };

    compile(&input, &CompileOptions::default())
}

#[test]
fn hello_story_compiles_into_a_single_scene() {
    let content = "\
@start
*say
    Hello
*then
    -> start
";

    let program = compile_story(content).unwrap();

    assert_eq!(program.scenes.len(), 1);

    let scene = program.scene("start").unwrap();
    assert_eq!(scene.narration(), "Hello");
    assert_eq!(
        scene.contents[0].directives[0].kind,
        DirectiveKind::GoTo {
            target: "start".to_string()
        }
    );
}

#[test]
fn story_without_start_fails_with_a_single_error() {
    let errors = compile_story("@begin\n*say\n    Hello\n").unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        CompileErrorKind::MissingScene {
            id: "start".to_string()
        }
    );
}

#[test]
fn navigation_to_a_missing_scene_is_reported_with_its_line() {
    let content = "\
@start
*then
    -> nowhere
";

    let errors = compile_story(content).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error_name(), "UnknownTarget");
    assert_eq!(errors[0].line_number(), Some(3));
    assert_eq!(errors[0].scene.as_deref(), Some("start"));
}

#[test]
fn scenes_can_be_spread_over_several_documents() {
    let output = compile_documents(
        &[
            ("intro", "@start\n*say\n    Welcome.\n*then\n    -> cellar\n"),
            ("cellar", "@cellar\n*say\n    It is damp.\n"),
        ],
        &[],
    );

    assert!(output.errors.is_empty());

    let program = output.program.unwrap();
    assert_eq!(program.scene_ids().collect::<Vec<_>>(), vec!["start", "cellar"]);
    assert_eq!(program.scene("cellar").unwrap().document, "cellar");
}

#[test]
fn scenes_repeated_across_documents_are_duplicates() {
    let output = compile_documents(
        &[
            ("one", "@start\n*say\n    One.\n"),
            ("two", "@start\n*say\n    Two.\n"),
        ],
        &[],
    );

    assert!(output.program.is_none());
    assert_eq!(output.errors.len(), 1);

    match &output.errors[0].kind {
        CompileErrorKind::DuplicateScene {
            previous_document, ..
        } => assert_eq!(previous_document, "one"),
        kind => panic!("expected a duplicate scene, got {:?}", kind),
    }
}

#[test]
fn documents_outside_the_manifest_are_left_out() {
    let output = compile_documents(
        &[
            ("draft", "@start\n*say\n    Draft.\n"),
            ("final", "@start\n*say\n    Final.\n"),
        ],
        &["final"],
    );

    let program = output.program.unwrap();

    assert_eq!(program.scenes.len(), 1);
    assert_eq!(program.scene("start").unwrap().narration(), "Final.");
}

#[test]
fn every_syntax_error_is_collected() {
    let content = "\
@start
*then
    dance wildly
    hear {
        >> END
    }
    flag
    >> END
";

    let output = compile_documents(&[("main", content)], &[]);

    let lines = output
        .errors
        .iter()
        .map(|error| (error.error_name(), error.line_number()))
        .collect::<Vec<_>>();

    assert_eq!(
        lines,
        vec![
            ("UnknownDirective", Some(3)),
            ("EmptyChoice", Some(4)),
            ("MissingVariableName", Some(7)),
        ]
    );

    assert!(output.program.is_some());
}

#[test]
fn printed_errors_name_the_document_and_line() {
    let errors = compile_story("@start\n*then\n    -> nowhere\n").unwrap_err();
    let printed = print_compile_errors(&errors).unwrap();

    assert!(printed.starts_with("[main] (line 3) "));
    assert!(printed.contains("nowhere"));
}

#[test]
fn warnings_do_not_stop_a_compile() {
    let content = "\
@start
*say
    Hello. // TODO: greet by name
*then
    >> END

@forgotten
*say
    Nobody comes here.
";

    let output = compile_documents(&[("main", content)], &[]);

    assert!(output.errors.is_empty());
    assert!(output.program.is_some());

    let messages = output
        .log
        .iter()
        .map(|message| message.message.clone())
        .collect::<Vec<_>>();

    assert!(messages.contains(&MessageKind::Todo("greet by name".to_string())));
    assert!(
        messages.contains(&MessageKind::Warning(Warning::UnreachableScene {
            scene: "forgotten".to_string()
        }))
    );
}

#[test]
fn conditions_and_choices_are_nested() {
    let content = "\
@start
*then
    if gold >= 10 {
        hear buy the sword {
            decrease gold by 10
            flag armed
        }
    } else {
        hear leave {
            >> END
        }
    }
";

    let program = compile_story(content).unwrap();
    let directives = &program.scenes[0].contents[0].directives;

    assert_eq!(directives.len(), 1);

    match &directives[0].kind {
        DirectiveKind::Conditional {
            then_branch,
            else_branch,
            ..
        } => {
            assert_eq!(then_branch.len(), 1);
            assert_eq!(else_branch.as_ref().map(|branch| branch.len()), Some(1));

            match &then_branch[0].kind {
                DirectiveKind::Choice(choice) => assert_eq!(choice.directives.len(), 2),
                kind => panic!("expected a choice, got {:?}", kind),
            }
        }
        kind => panic!("expected a conditional, got {:?}", kind),
    }
}
