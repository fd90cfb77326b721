use std::fmt::Write;

use shared::{domain::NavigationAction, protocol::GameView};

const TITLE: &str = "Match the images";

pub fn render_board(view: &GameView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{TITLE} (page {} of {})", view.page, view.page_count);
    let _ = writeln!(out, "Tries: {}", view.tries);
    let _ = writeln!(out);

    let key_cells: Vec<String> = view
        .keys
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let mark = if tile.matched { " [fixed]" } else { "" };
            format!("[{}] {}{mark}", index + 1, tile.key)
        })
        .collect();
    // Matched value tiles stay in place but are hidden, so numbering never shifts.
    let value_cells: Vec<String> = view
        .values
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            if tile.matched {
                format!("[{}]", index + 1)
            } else {
                format!("[{}] {}", index + 1, tile.value)
            }
        })
        .collect();

    let width = key_cells
        .iter()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0)
        .max("Keys".len());
    let _ = writeln!(out, "  {:<width$}    Values", "Keys");
    for row in 0..key_cells.len().max(value_cells.len()) {
        let key = key_cells.get(row).map(String::as_str).unwrap_or("");
        let value = value_cells.get(row).map(String::as_str).unwrap_or("");
        let _ = writeln!(out, "  {key:<width$}    {value}");
    }
    let _ = writeln!(out);

    if let Some(message) = view.feedback_message() {
        let _ = writeln!(out, ">> {message}");
    }
    if view.celebrating {
        let _ = writeln!(out, "*** Well done! ***");
    }
    if view.round_complete {
        let _ = writeln!(out, "All pairs matched on this page.");
    }

    let navigation = match view.navigation {
        NavigationAction::Next => "next",
        NavigationAction::Restart => "restart",
    };
    let _ = write!(out, "[drag <key#> <value#>] [{navigation}] [help] [quit]");
    out
}
