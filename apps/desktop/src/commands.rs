//! Typed terminal input, standing in for pointer drag/drop and button clicks.

use anyhow::{anyhow, bail, Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 1-based positions in the displayed key and value columns.
    Drag { key: usize, value: usize },
    Next,
    Restart,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  drag <key#> <value#>   drop key tile <key#> onto value tile <value#> (alias: d)
  next                   go to the next page (alias: n)
  restart                start again from page 1 (alias: r)
  show                   redraw the board
  help                   show this help
  quit                   leave the game (alias: q)";

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Show);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "drag" | "d" => {
            let key = parse_position(parts.next(), "key")?;
            let value = parse_position(parts.next(), "value")?;
            Command::Drag { key, value }
        }
        "next" | "n" => Command::Next,
        "restart" | "r" => Command::Restart,
        "show" | "s" => Command::Show,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}'; type 'help' for the list"),
    };

    if let Some(extra) = parts.next() {
        bail!("unexpected argument '{extra}'");
    }

    Ok(command)
}

fn parse_position(raw: Option<&str>, column: &str) -> Result<usize> {
    let raw = raw.ok_or_else(|| anyhow!("missing {column} tile number"))?;
    let position = raw
        .parse::<usize>()
        .with_context(|| format!("{column} tile number '{raw}' is not a number"))?;
    if position == 0 {
        bail!("{column} tile numbers start at 1");
    }
    Ok(position)
}
