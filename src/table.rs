use crate::matrix::{CoOccurrenceMatrix, Player};
use crate::scale::{Intensity, ScaleStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// "Alice"
    #[default]
    FirstName,
    /// "Alice S." when a last name is known.
    FirstNameInitial,
}

impl NameStyle {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first" | "first_name" => Some(NameStyle::FirstName),
            "initial" | "first_initial" => Some(NameStyle::FirstNameInitial),
            _ => None,
        }
    }

    pub fn display_name(self, player: &Player) -> String {
        let first = player.first_name.trim();
        match self {
            NameStyle::FirstName => first.to_string(),
            NameStyle::FirstNameInitial => match player
                .last_name_trimmed()
                .and_then(|last| last.chars().next())
            {
                Some(initial) => format!("{first} {}.", initial.to_uppercase()),
                None => first.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    pub value: u32,
    pub content: String,
    pub tooltip: String,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub header: String,
    pub cells: Vec<TableCell>,
}

/// Renderable matrix: a header row of names, then one row per player.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTable {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl MatrixTable {
    pub fn size(&self) -> usize {
        self.header.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }
}

pub fn match_phrase(count: u32) -> String {
    if count == 1 {
        "1 match".to_string()
    } else {
        format!("{count} matches")
    }
}

pub fn pair_tooltip(row_name: &str, col_name: &str, count: u32) -> String {
    format!("{row_name} played with {col_name} in {}", match_phrase(count))
}

pub fn build_table(
    matrix: &CoOccurrenceMatrix,
    strategy: &dyn ScaleStrategy,
    names: NameStyle,
) -> MatrixTable {
    let header: Vec<String> = matrix
        .players()
        .iter()
        .map(|p| names.display_name(p))
        .collect();
    let max_value = matrix.max_value();

    let rows = matrix
        .cells()
        .iter()
        .enumerate()
        .map(|(row, values)| {
            let row_name = &header[row];
            let cells = values
                .iter()
                .enumerate()
                .map(|(col, &value)| TableCell {
                    row,
                    col,
                    value,
                    content: value.to_string(),
                    tooltip: pair_tooltip(row_name, &header[col], value),
                    intensity: strategy.intensity(value, max_value),
                })
                .collect();
            TableRow {
                header: row_name.clone(),
                cells,
            }
        })
        .collect();

    MatrixTable { header, rows }
}
