//! The `quizcap init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizcap.toml").exists() {
        println!("quizcap.toml already exists, skipping.");
    } else {
        std::fs::write("quizcap.toml", SAMPLE_CONFIG)?;
        println!("Created quizcap.toml");
    }

    std::fs::create_dir_all("question-sets")?;
    let example_path = std::path::Path::new("question-sets/example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTION_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizcap validate --questions question-sets/example.toml");
    println!("  2. Run: quizcap replay --questions question-sets/example.toml --id puzzle --script script.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizcap configuration

[engine]
# Fixed seed makes puzzle shuffles reproducible. Remove for a random order.
shuffle_seed = 42
chain_separator = " "
arrow_glyph = "→"
ascii_arrows = ["->", "=>"]
"#;

const EXAMPLE_QUESTION_SET: &str = r#"[question_set]
id = "example"
name = "Example Question Set"
description = "One question of each type"

[[questions]]
id = "water"
question_type = "single_choice"
question = "What is the chemical formula for water?"
options = { A = "H2O", B = "CO2", C = "NaCl" }

[[questions]]
id = "noble"
question_type = "multiple_choice"
question = "Which of these are noble gases?"
options = ["Helium", "Oxygen", "Neon", "Nitrogen"]

[[questions]]
id = "periodic"
question_type = "fill_blank"
question = "Complete the sentence"

[questions.question_data]
enhanced = true
template = "The periodic table has {{count}} elements, arranged by {{method}}."

[[questions.question_data.blanks]]
placeholder = "number of elements"
options = { hints = ["More than 100"] }

[[questions.question_data.blanks]]
placeholder = "organization method"

[[questions]]
id = "puzzle"
question_type = "puzzle_game"
question = "Assemble the reaction"

[questions.question_data]
puzzle_fragments = ["2H2", "+", "O2", "->", "2H2O"]
puzzle_solution = "2H2 + O2 → 2H2O"

[[questions]]
id = "capitals"
question_type = "matching_task"
question = "Match each country to its capital"

[questions.question_data]
left_items = ["France", "Japan", "Peru"]
right_items = ["Lima", "Paris", "Tokyo"]
correct_matches = [
    { left = 0, right = 1 },
    { left = 1, right = 2 },
    { left = 2, right = 0 },
]
"#;
