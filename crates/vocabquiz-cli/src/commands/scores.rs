//! The `vocabquiz scores` command.

use std::path::PathBuf;

use anyhow::Result;

use vocabquiz_core::config::load_config_from;
use vocabquiz_core::model::ScoreRecord;
use vocabquiz_core::store::ScoreStore;

pub fn execute(format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = ScoreStore::new(&config.score_file);

    let mut records = store.records();
    records.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| a.username().cmp(b.username()))
    });

    match format.as_str() {
        "json" => {
            let rows: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "username": r.username(),
                        "score": r.score(),
                        "registered": r.is_registered(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            if records.is_empty() {
                println!("No scores yet. Play a round with `vocabquiz play --user <name>`.");
            } else {
                print_table(&records);
            }
        }
    }

    Ok(())
}

fn print_table(records: &[ScoreRecord]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Player", "Score", "Account"]);

    for record in records {
        let account = if record.is_registered() {
            "registered"
        } else {
            "guest"
        };
        table.add_row(vec![
            Cell::new(record.username()),
            Cell::new(record.score()),
            Cell::new(account),
        ]);
    }

    println!("{table}");
}
