use std::collections::VecDeque;

use crate::binding::{MatrixBinding, RequestTicket, Resolution, Selection};
use crate::config::{MatrixConfig, TeamEntry};
use crate::error::AcquireError;
use crate::matrix::CoOccurrenceMatrix;
use crate::matrix_fetch::Scope;
use crate::table::TableCell;

const MAX_LOGS: usize = 200;

#[derive(Debug)]
pub enum Delta {
    MatrixFetched {
        ticket: RequestTicket,
        outcome: Result<CoOccurrenceMatrix, AcquireError>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchMatrix(RequestTicket),
}

/// One row of the scope picker. `None` is the "no team selected" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeOption {
    pub scope: Option<Scope>,
    pub label: String,
}

impl ScopeOption {
    pub fn selection(&self) -> Selection {
        match &self.scope {
            Some(scope) => Selection::scope(scope.clone(), self.label.clone()),
            None => Selection::None,
        }
    }
}

pub fn scope_options(teams: &[TeamEntry]) -> Vec<ScopeOption> {
    let mut options = vec![
        ScopeOption {
            scope: None,
            label: "-- select team --".to_string(),
        },
        ScopeOption {
            scope: Some(Scope::AllPlayers),
            label: "All players".to_string(),
        },
    ];
    options.extend(teams.iter().map(|t| ScopeOption {
        scope: Some(Scope::Team(t.id)),
        label: t.name.clone(),
    }));
    options
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub binding: MatrixBinding,
    pub options: Vec<ScopeOption>,
    pub option_selected: usize,
    pub cursor: (usize, usize),
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(config: &MatrixConfig) -> Self {
        Self {
            binding: MatrixBinding::new(config.binding()),
            options: scope_options(&config.teams),
            option_selected: 0,
            cursor: (0, 0),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn select_next_option(&mut self) {
        if self.option_selected + 1 < self.options.len() {
            self.option_selected += 1;
        }
    }

    pub fn select_prev_option(&mut self) {
        self.option_selected = self.option_selected.saturating_sub(1);
    }

    /// Feeds the highlighted option into the binding.
    pub fn activate_option(&mut self) -> Option<RequestTicket> {
        let selection = self
            .options
            .get(self.option_selected)
            .map(ScopeOption::selection)
            .unwrap_or(Selection::None);
        self.cursor = (0, 0);
        self.binding.select(selection)
    }

    /// Jumps back to the "no team" entry and clears the binding.
    pub fn clear_selection(&mut self) {
        self.option_selected = 0;
        self.cursor = (0, 0);
        self.binding.select(Selection::None);
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let Some(table) = self.binding.table() else {
            return;
        };
        let size = table.size();
        if size == 0 {
            return;
        }
        let step = |pos: usize, delta: isize| -> usize {
            pos.saturating_add_signed(delta).min(size - 1)
        };
        self.cursor = (step(self.cursor.0, d_row), step(self.cursor.1, d_col));
    }

    pub fn focused_cell(&self) -> Option<&TableCell> {
        self.binding
            .table()
            .and_then(|t| t.cell(self.cursor.0, self.cursor.1))
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::MatrixFetched { ticket, outcome } => {
            let summary = match &outcome {
                Ok(matrix) if matrix.is_empty() => "no players".to_string(),
                Ok(matrix) => format!("{} players", matrix.len()),
                Err(err) => err.to_string(),
            };
            let failed = outcome.is_err();
            match state.binding.resolve(&ticket, outcome) {
                Resolution::Applied if failed => {
                    state.push_log(format!("[WARN] Matrix #{} failed: {summary}", ticket.id));
                }
                Resolution::Applied => {
                    state.push_log(format!("[INFO] Matrix #{} loaded: {summary}", ticket.id));
                }
                Resolution::Stale => {
                    state.push_log(format!(
                        "[INFO] Ignored stale matrix #{} ({summary})",
                        ticket.id
                    ));
                }
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
