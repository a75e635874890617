#[cfg(not(feature = "serde_support"))]
#[test]
fn serde_support_tests() {
    panic!("Feature `serde_support` must be activated to run these integration tests");
}

#[cfg(all(feature = "serde_support", test))]
pub mod tests {
    use sceneflow::*;
    use serde_json::{self, Value};

    const STORY: &str = "\
@start
*say
    You have {gold} gold.
*then
    hear dig {
        increase gold by 1
        roll 1d6
        <-> hole
    }
    hear leave {
        >> END
    }

@hole
*say
    A deep hole.
*then
    hear climb out {
        >> RETURN
    }
";

    #[test]
    fn session_state_is_a_flat_map_of_variables_and_system_keys() {
        let program = compile_story(STORY).unwrap();
        let driver = Driver::new(&program).with_seed(3);

        let launched = driver
            .run_turn(Input::launch(), SessionState::default())
            .unwrap();
        let dug = driver
            .run_turn(Input::utterance("dig"), launched.state)
            .unwrap();

        let value = serde_json::to_value(&dug.state).unwrap();
        let map = value.as_object().unwrap();

        assert_eq!(map.get("gold"), Some(&Value::from(1.0)));
        assert!(map.contains_key("rollResult"));
        assert_eq!(
            map.get("system_current_scene"),
            Some(&Value::from("hole"))
        );
        assert!(map.contains_key("system_history"));
        assert!(map.contains_key("system_rng"));

        assert!(map
            .keys()
            .all(|key| key.starts_with("system_") || key == "gold" || key == "rollResult"));
    }

    #[test]
    fn deserialized_sessions_continue_where_they_left() {
        let program = compile_story(STORY).unwrap();
        let driver = Driver::new(&program).with_seed(3);

        let launched = driver
            .run_turn(Input::launch(), SessionState::default())
            .unwrap();
        let dug = driver
            .run_turn(Input::utterance("dig"), launched.state)
            .unwrap();

        let serialized = serde_json::to_string(&dug.state).unwrap();
        let state: SessionState = serde_json::from_str(&serialized).unwrap();

        assert_eq!(state, dug.state);

        let from_original = driver
            .run_turn(Input::utterance("climb out"), dug.state)
            .unwrap();
        let from_deserialized = driver
            .run_turn(Input::utterance("climb out"), state)
            .unwrap();

        assert_eq!(from_original, from_deserialized);
        assert_eq!(from_deserialized.state.current_scene.as_deref(), Some("start"));
        assert_eq!(from_deserialized.state.choices.len(), 2);
    }

    #[test]
    fn states_written_by_hand_can_be_read() {
        let program = compile_story(STORY).unwrap();

        let state: SessionState = serde_json::from_str(r#"{ "gold": 7, "name": "Ada" }"#).unwrap();

        assert_eq!(state.variables.get("gold"), Some(&Variable::Number(7.0)));
        assert_eq!(state.current_scene, None);

        let output = Driver::new(&program).run_turn(Input::launch(), state).unwrap();
        assert_eq!(output.speech, "You have 7 gold.");
    }

    #[test]
    fn compiled_programs_survive_serialization() {
        let program = compile_story(STORY).unwrap();

        let serialized = serde_json::to_string(&program).unwrap();
        let deserialized: Program = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, program);
    }

    #[test]
    fn compile_options_fill_in_defaults() {
        let options: CompileOptions =
            serde_json::from_str(r#"{ "locale": "de-DE", "title": "The Hole" }"#).unwrap();

        assert_eq!(options.locale.as_deref(), Some("de-DE"));
        assert_eq!(options.source_locale, "en-US");
        assert_eq!(options.title, "The Hole");
        assert!(!options.audio.exists("anything"));
    }
}
