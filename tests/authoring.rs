use sceneflow::{
    document::{delete_scene, find_scene, get_references, insert_scene, rename_scene},
    error::CompileErrorKind,
    *,
};

const STORY: &str = "\
@start
*say
    A crossroads.
*then
    hear north {
        -> forest
    }
    hear rest {
        <-> forest
    }
    -> forest

@forest
*say
    Tall trees.
*then
    hear back {
        -> start
    }
";

fn document() -> SourceDocument {
    SourceDocument::from_text("main", STORY)
}

#[test]
fn every_navigation_to_a_scene_is_referenced() {
    let document = document();

    assert_eq!(get_references(&document, "forest").len(), 3);
    assert_eq!(get_references(&document, "start").len(), 1);
    assert!(get_references(&document, "cave").is_empty());
}

#[test]
fn references_point_into_the_document() {
    let document = document();

    for range in get_references(&document, "forest") {
        let line = document.line(range.start.row).unwrap();
        assert!(line.contains("hear") || line.contains("forest"));
    }
}

#[test]
fn renamed_scenes_are_found_by_their_new_id_only() {
    let renamed = rename_scene(&document(), "forest", "woods").unwrap();

    assert!(find_scene(&renamed, "woods").is_some());
    assert!(find_scene(&renamed, "forest").is_none());

    assert_eq!(get_references(&renamed, "woods").len(), 3);
    assert!(get_references(&renamed, "forest").is_empty());
}

#[test]
fn renamed_documents_still_compile_and_run() {
    let renamed = rename_scene(&document(), "forest", "woods").unwrap();
    let program = compile_story(&renamed.text()).unwrap();

    let driver = Driver::new(&program);
    let launched = driver
        .run_turn(Input::launch(), SessionState::default())
        .unwrap();

    assert_eq!(launched.speech, "A crossroads. Tall trees.");
    assert_eq!(launched.state.current_scene.as_deref(), Some("woods"));
}

#[test]
fn renaming_leaves_the_original_document_unchanged() {
    let document = document();
    let _ = rename_scene(&document, "forest", "woods").unwrap();

    assert_eq!(document.text(), STORY.trim_end());
}

#[test]
fn deleted_scenes_leave_dangling_navigation() {
    let deleted = delete_scene(&document(), "forest");

    assert!(find_scene(&deleted, "forest").is_none());
    assert!(find_scene(&deleted, "start").is_some());

    let errors = compile_story(&deleted.text()).unwrap_err();

    assert!(!errors.is_empty());
    assert!(errors.iter().all(|error| error.kind
        == CompileErrorKind::UnknownTarget {
            target: "forest".to_string()
        }));
}

#[test]
fn inserted_scenes_can_be_navigated_to() {
    let document = SourceDocument::from_text("main", "@start\n*then\n    -> cave\n");

    assert!(compile_story(&document.text()).is_err());

    let inserted = insert_scene(&document, "cave", "*say\n    It is dark.");

    assert!(find_scene(&inserted, "cave").is_some());

    let program = compile_story(&inserted.text()).unwrap();
    assert_eq!(program.scene("cave").unwrap().narration(), "It is dark.");
}

#[test]
fn programs_can_be_edited_by_scene_id() {
    let mut program = compile_story(STORY).unwrap();

    assert!(program.rename_scene("forest", "woods"));
    assert!(!program.rename_scene("forest", "woods"));
    assert!(!program.rename_scene("start", "woods"));

    let targets = program
        .scene("start")
        .unwrap()
        .contents
        .iter()
        .flat_map(|content| content.directives.iter())
        .flat_map(|directive| directive.walk())
        .filter_map(|directive| directive.target())
        .collect::<Vec<_>>();

    assert_eq!(targets, vec!["woods", "woods", "woods"]);

    let woods = program.delete_scene("woods").unwrap();
    assert!(!program.contains_scene("woods"));

    assert!(program.insert_scene(0, woods.clone()).is_ok());
    assert_eq!(program.scenes[0].id, "woods");
    assert_eq!(program.insert_scene(1, woods.clone()), Err(woods));
}
