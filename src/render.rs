//! Text rendering of the slot array.
//!
//! Draws the table as a grid of fixed width cells, one per slot, in index order:
//!
//! ```text
//! [ 0+ Poção     ][ 1            ][ 2            ][ 3            ][ 4            ]
//! [10x X         ][11+ Escudo    ][12            ][13            ][14            ]
//! ```
//!
//! Each cell shows the slot index, a marker for its [`SlotKind`] and the stored key (`X` for a
//! tombstone, blank for an empty slot).

use crate::hash_table::{HashTable, Slot};
use std::fmt::Write;

/// Grid width used when none is configured, five columns by four rows for the default table.
pub const DEFAULT_COLUMNS: usize = 5;

/// Keys longer than this are cut and end in `~`.
pub const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Empty,
    /// Live key sitting at its own hashed index.
    Occupied,
    /// Live key that was pushed past its hashed index by a collision.
    Displaced,
    Tombstone,
    /// Result of the last successful search.
    Highlighted,
}

impl SlotKind {
    pub fn marker(self) -> char {
        match self {
            SlotKind::Empty => ' ',
            SlotKind::Occupied => '+',
            SlotKind::Displaced => '~',
            SlotKind::Tombstone => 'x',
            SlotKind::Highlighted => '*',
        }
    }
}

/// Classifies slot `index`. Out of range indices are reported as empty.
pub fn classify(table: &HashTable, index: usize, highlight: Option<usize>) -> SlotKind {
    if highlight == Some(index) {
        return SlotKind::Highlighted;
    }
    match table.get(index) {
        Some(Slot::Occupied(key)) if table.hash(key) != index => SlotKind::Displaced,
        Some(Slot::Occupied(_)) => SlotKind::Occupied,
        Some(Slot::Tombstone) => SlotKind::Tombstone,
        Some(Slot::Empty) | None => SlotKind::Empty,
    }
}

pub fn label(slot: &Slot) -> String {
    match slot {
        Slot::Empty => String::new(),
        Slot::Tombstone => "X".to_owned(),
        Slot::Occupied(key) if key.chars().count() > LABEL_WIDTH => {
            let mut cut: String = key.chars().take(LABEL_WIDTH - 1).collect();
            cut.push('~');
            cut
        }
        Slot::Occupied(key) => key.clone(),
    }
}

pub fn legend() -> &'static str {
    "+ home slot   ~ displaced by collision   x tombstone   * search result"
}

pub fn render_grid(table: &HashTable, columns: usize, highlight: Option<usize>) -> String {
    let columns: usize = columns.max(1);
    let capacity: usize = table.capacity();
    let index_width: usize = (capacity - 1).to_string().len();
    let mut out = String::new();

    for (idx, slot) in table.slots().iter().enumerate() {
        let kind: SlotKind = classify(table, idx, highlight);
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "[{:>iw$}{} {:<lw$}]",
            idx,
            kind.marker(),
            label(slot),
            iw = index_width,
            lw = LABEL_WIDTH
        );
        if (idx + 1) % columns == 0 || idx + 1 == capacity {
            out.push('\n');
        }
    }
    out
}
