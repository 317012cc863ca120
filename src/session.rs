//! Interactive session state: the table, the last search hit and the command language.

use crate::error::{CommandError, TableError};
use crate::hash_table::{HashTable, Placement};
use log::info;
use std::fmt;

/// Longest key the session accepts.
pub const MAX_KEY_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Insert(String),
    Search(String),
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Operation),
    Show,
    Quit,
}

impl Command {
    /// Parses `<verb> [key]`. The key is the rest of the line, trimmed, so it may contain spaces.
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line: &str = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "insert" | "i" => Command::Run(Operation::Insert(Self::key("insert", rest)?)),
            "search" | "s" => Command::Run(Operation::Search(Self::key("search", rest)?)),
            "delete" | "d" => Command::Run(Operation::Delete(Self::key("delete", rest)?)),
            "show" => Command::Show,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(verb.to_owned())),
        };
        Ok(Some(command))
    }

    fn key(verb: &'static str, rest: &str) -> Result<String, CommandError> {
        if rest.is_empty() {
            return Err(CommandError::MissingKey(verb));
        }
        if rest.chars().count() > MAX_KEY_CHARS {
            return Err(CommandError::KeyTooLong {
                key: rest.to_owned(),
                max: MAX_KEY_CHARS,
            });
        }
        Ok(rest.to_owned())
    }
}

/// Result of one operation, displayed as the session's status line.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Inserted {
        key: String,
        home: usize,
        placement: Placement,
    },
    Rejected {
        key: String,
        error: TableError,
    },
    Found {
        key: String,
        index: usize,
    },
    Missing {
        key: String,
    },
    Removed {
        key: String,
    },
    NotRemoved {
        key: String,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted {
                home, placement, ..
            } if placement.collided => write!(
                f,
                "collision! hash {} -> placed at {}",
                home, placement.index
            ),
            Outcome::Inserted { key, placement, .. } => {
                write!(f, "item '{}' inserted in slot {}", key, placement.index)
            }
            Outcome::Rejected { error, .. } => write!(f, "error: {}", error),
            Outcome::Found { key, index } => write!(f, "item '{}' found in slot {}", key, index),
            Outcome::Missing { key } => write!(f, "item '{}' is not in the table", key),
            Outcome::Removed { key } => write!(f, "item '{}' removed (tombstone created)", key),
            Outcome::NotRemoved { key } => write!(f, "item '{}' not found for removal", key),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    table: HashTable,
    highlight: Option<usize>,
}

impl Session {
    pub fn new(capacity: usize) -> Session {
        Session {
            table: HashTable::with_capacity(capacity),
            highlight: None,
        }
    }

    pub fn table(&self) -> &HashTable {
        &self.table
    }

    /// Slot index of the last successful search, cleared by any later operation.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn execute(&mut self, operation: Operation) -> Outcome {
        self.highlight = None;
        let outcome: Outcome = match operation {
            Operation::Insert(key) => {
                let home: usize = self.table.hash(&key);
                match self.table.insert(&key) {
                    Ok(placement) => Outcome::Inserted {
                        key,
                        home,
                        placement,
                    },
                    Err(error) => Outcome::Rejected { key, error },
                }
            }
            Operation::Search(key) => match self.table.search(&key) {
                Some(index) => {
                    self.highlight = Some(index);
                    Outcome::Found { key, index }
                }
                None => Outcome::Missing { key },
            },
            Operation::Delete(key) => {
                if self.table.delete(&key) {
                    Outcome::Removed { key }
                } else {
                    Outcome::NotRemoved { key }
                }
            }
        };
        info!("{}", outcome);
        outcome
    }
}
