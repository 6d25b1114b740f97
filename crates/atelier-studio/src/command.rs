// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented studio commands.

use thiserror::Error;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `set <field> <value...>`
    Set {
        /// Field name.
        field: String,
        /// Raw value text.
        value: String,
    },
    /// `bulk <field>=<value>; <field>=<value> ...`
    Bulk(Vec<(String, String)>),
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `reset [keep <field>...]`
    Reset {
        /// Fields left untouched.
        keep: Vec<String>,
    },
    /// `snap [name...]`
    Snap(Option<String>),
    /// `load <id-prefix>`
    Load(String),
    /// `drop <id-prefix>`
    Drop(String),
    /// `snaps`
    Snaps,
    /// `save`
    Save,
    /// `show`
    Show,
    /// `fields`
    Fields,
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line.
    #[error("empty input")]
    Empty,
    /// First word is not a command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    /// Command is missing an argument.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Short help text listing every command.
pub const HELP: &str = "\
set <field> <value>          change one field
bulk f=v; f=v ...            change several fields as one step
undo | redo                  walk the edit history
reset [keep <field>...]      restore defaults, optionally keeping fields
snap [name]                  save a snapshot
snaps                        list snapshots
load <id>                    load a snapshot (id prefix is enough)
drop <id>                    delete a snapshot
save                         persist the avatar
show | fields | help | quit";

/// Parses one input line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::Usage("set <field> <value>"))?;
            Ok(Command::Set {
                field: field.to_owned(),
                value: value.trim().to_owned(),
            })
        }
        "bulk" => parse_bulk(rest),
        "undo" => Ok(Command::Undo),
        "redo" => Ok(Command::Redo),
        "reset" => {
            let mut words = rest.split_whitespace();
            match words.next() {
                None => Ok(Command::Reset { keep: Vec::new() }),
                Some(w) if w.eq_ignore_ascii_case("keep") => Ok(Command::Reset {
                    keep: words.map(str::to_owned).collect(),
                }),
                Some(_) => Err(CommandError::Usage("reset [keep <field>...]")),
            }
        }
        "snap" => Ok(Command::Snap((!rest.is_empty()).then(|| rest.to_owned()))),
        "load" => one_arg(rest, "load <id>").map(Command::Load),
        "drop" => one_arg(rest, "drop <id>").map(Command::Drop),
        "snaps" => Ok(Command::Snaps),
        "save" => Ok(Command::Save),
        "show" => Ok(Command::Show),
        "fields" => Ok(Command::Fields),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

fn one_arg(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
        [one] => Ok((*one).to_owned()),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_bulk(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "bulk <field>=<value>; <field>=<value> ...";
    let pairs = rest
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.split_once('=')
                .map(|(f, v)| (f.trim().to_owned(), v.trim().to_owned()))
                .ok_or(CommandError::Usage(USAGE))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if pairs.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }
    Ok(Command::Bulk(pairs))
}
