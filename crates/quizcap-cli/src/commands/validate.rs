//! The `quizcap validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizcap_core::question_set::{config_status, load_question_sets, validate_question_set};

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let sets = load_question_sets(&questions_path)?;

    let mut total_warnings = 0;

    for set in &sets {
        println!("Question set: {} ({} questions)", set.name, set.questions.len());

        let mut table = Table::new();
        table.set_header(vec!["Id", "Type", "Status"]);
        for q in &set.questions {
            let status = match config_status(q) {
                Some(e) => e.code().to_string(),
                None => "ok".to_string(),
            };
            table.add_row(vec![
                Cell::new(&q.id),
                Cell::new(q.question_type),
                Cell::new(status),
            ]);
        }
        println!("{table}");

        let warnings = validate_question_set(set);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
