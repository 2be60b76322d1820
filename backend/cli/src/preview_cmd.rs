//! CLI Preview Command
//!
//! Dry run: fetches and rebuilds a page, prints the result, changes nothing.

use anyhow::Result;

use eqforge_notion::page_id_from_url;

use crate::config::Config;
use crate::terminal_output::{
    note_info, note_success, note_warn, render_rich_text, render_table, supports_color, truncate,
    Column, DIM, RESET,
};

const MAX_TEXT_WIDTH: usize = 72;

pub async fn run(config: &Config, page: &str, json: bool) -> Result<()> {
    let page_id = page_id_from_url(page)?;
    let plan = config.converter()?.plan(&page_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let color = supports_color();
    let rows: Vec<Vec<String>> = plan
        .replacements
        .iter()
        .enumerate()
        .map(|(i, block)| {
            let text = match block.language.as_deref() {
                Some(lang) if color => format!("{DIM}[{lang}]{RESET} {}", render_rich_text(&block.rich_text, false)),
                Some(lang) => format!("[{lang}] {}", render_rich_text(&block.rich_text, false)),
                None => render_rich_text(&block.rich_text, color),
            };
            vec![
                (i + 1).to_string(),
                block.kind.to_string(),
                block.equation_count().to_string(),
                truncate(&text, MAX_TEXT_WIDTH),
            ]
        })
        .collect();

    let columns = [
        Column::right("#"),
        Column::left("Kind"),
        Column::right("Eq"),
        Column::left("Content"),
    ];
    print!("{}", render_table(&columns, &rows, color));
    println!();

    let dropped = plan.fetched.len() - plan.replacements.len();
    note_info(&format!(
        "{} blocks fetched, {} would be uploaded, {} dropped.",
        plan.fetched.len(),
        plan.replacements.len(),
        dropped
    ));
    let nested = plan.fetched.iter().filter(|b| b.has_children).count();
    if nested > 0 {
        note_warn(&format!(
            "{nested} blocks have children; their descendants would be flattened to the top level."
        ));
    }
    if plan.has_work() {
        note_success(&format!(
            "{} new equations would be created. Run `eqforge convert` to apply.",
            plan.new_equations
        ));
    } else {
        note_warn("No equations found; convert would not change this page.");
    }
    Ok(())
}
