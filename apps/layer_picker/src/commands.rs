//! Line commands accepted on stdin.

use shared::domain::LayerId;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  list [query]   list layers, optionally filtered by name or caption
  show <id>      show a layer and its legend entry
  hide <id>      hide a layer and its legend entry
  table          show or hide the data table for the first visible layer
  select         open the layer picker
  done | esc     close the layer picker
  status         print session status
  help           print this message
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(String),
    Show(LayerId),
    Hide(LayerId),
    Table,
    Select,
    Done,
    Escape,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs a layer id")]
    MissingLayer(&'static str),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "list" | "ls" => Ok(Command::List(rest.to_string())),
        "show" => layer_arg("show", rest).map(Command::Show),
        "hide" => layer_arg("hide", rest).map(Command::Hide),
        "table" => Ok(Command::Table),
        "select" => Ok(Command::Select),
        "done" => Ok(Command::Done),
        "esc" | "escape" => Ok(Command::Escape),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

fn layer_arg(verb: &'static str, rest: &str) -> Result<LayerId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingLayer(verb));
    }
    Ok(LayerId::new(rest))
}
