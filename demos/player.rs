use std::{
    env::{args, current_dir},
    fs::read_to_string,
    io,
    path::{Path, PathBuf},
    process::exit,
};

use sceneflow::{error::print_compile_errors, *};

fn main() -> Result<(), io::Error> {
    let path = match args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let mut assets_dir = current_dir()?;
            assets_dir.push("demos");
            assets_dir.push("assets");

            [assets_dir.as_path(), Path::new("story.txt")]
                .iter()
                .collect()
        }
    };

    let program = read_program(&path)?;

    match play_story(&program) {
        Ok(_) => println!("FIN\n"),
        Err(err) => {
            eprintln!("error: {}", err);
            exit(1);
        }
    }

    Ok(())
}

fn play_story(program: &Program) -> Result<(), RuntimeError> {
    let driver = Driver::new(program);
    let mut store = MemoryStore::new();

    let mut input = Input::launch();

    loop {
        let state = store.get("player").unwrap_or_default();
        let output = driver.run_turn(input, state)?;

        println!("{}\n", output.speech);

        if output.should_end_session {
            return Ok(());
        }

        print_choices(&output.state);
        store.set("player", output.state);

        input = match ask_user() {
            Some(text) => Input::utterance(&text),
            None => {
                println!("Exiting program.");
                exit(0);
            }
        };

        println!("");
    }
}

fn print_choices(state: &SessionState) {
    println!("You can say:");

    for choice in state.choices.iter() {
        println!("  {}", choice.key.replace(',', " / "));
    }

    println!("     ---");
    println!("  (empty line to exit)");
    println!("");
}

fn ask_user() -> Option<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok()?;

    let input = input.trim();

    if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}

fn read_program(path: &Path) -> Result<Program, io::Error> {
    let contents = read_to_string(path)?;

    match compile_story(&contents) {
        Ok(program) => Ok(program),
        Err(errors) => {
            eprint!("{}", print_compile_errors(&errors).unwrap_or_default());
            exit(1);
        }
    }
}
