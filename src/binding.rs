//! Presentation state machine for the player matrix.
//!
//! A selection moves the binding to `Loading` and hands out a
//! [`RequestTicket`]. The outcome of that request is only applied while the
//! same ticket is still current, so a slow response for an earlier
//! selection can never overwrite a newer one.

use log::{debug, warn};

use crate::error::AcquireError;
use crate::matrix::CoOccurrenceMatrix;
use crate::matrix_fetch::Scope;
use crate::scale::ScaleKind;
use crate::table::{MatrixTable, NameStyle, build_table};

pub const NO_DATA_MESSAGE: &str = "No match data available for this selection.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    None,
    Scope { scope: Scope, label: String },
}

impl Selection {
    pub fn scope(scope: Scope, label: impl Into<String>) -> Self {
        Selection::Scope {
            scope,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    Idle,
    Loading {
        ticket: RequestTicket,
    },
    Populated {
        scope: Scope,
        table: MatrixTable,
    },
    Empty {
        scope: Scope,
    },
    Error {
        scope: Scope,
        error: AcquireError,
    },
}

impl PresentationState {
    pub fn label(&self) -> &'static str {
        match self {
            PresentationState::Idle => "IDLE",
            PresentationState::Loading { .. } => "LOADING",
            PresentationState::Populated { .. } => "POPULATED",
            PresentationState::Empty { .. } => "EMPTY",
            PresentationState::Error { .. } => "ERROR",
        }
    }
}

/// What the host surface should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub loading: bool,
    pub table: bool,
    pub message: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingConfig {
    pub scale: ScaleKind,
    pub names: NameStyle,
}

#[derive(Debug, Clone)]
pub struct MatrixBinding {
    config: BindingConfig,
    state: PresentationState,
    title: Option<String>,
    next_request_id: u64,
}

impl MatrixBinding {
    pub fn new(config: BindingConfig) -> Self {
        Self {
            config,
            state: PresentationState::Idle,
            title: None,
            next_request_id: 1,
        }
    }

    pub fn config(&self) -> BindingConfig {
        self.config
    }

    /// Takes effect for the next resolved request.
    pub fn set_config(&mut self, config: BindingConfig) {
        self.config = config;
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn table(&self) -> Option<&MatrixTable> {
        match &self.state {
            PresentationState::Populated { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&RequestTicket> {
        match &self.state {
            PresentationState::Loading { ticket } => Some(ticket),
            _ => None,
        }
    }

    /// Starts a new cycle, or returns to `Idle` when the selection is cleared.
    pub fn select(&mut self, selection: Selection) -> Option<RequestTicket> {
        match selection {
            Selection::None => {
                debug!("matrix selection cleared");
                self.state = PresentationState::Idle;
                self.title = None;
                None
            }
            Selection::Scope { scope, label } => Some(self.start(scope, &label)),
        }
    }

    /// Initial load of the all-players variant.
    pub fn load_all(&mut self) -> RequestTicket {
        self.start(Scope::AllPlayers, "All players")
    }

    fn start(&mut self, scope: Scope, label: &str) -> RequestTicket {
        let ticket = RequestTicket {
            id: self.next_request_id,
            scope,
        };
        self.next_request_id += 1;
        debug!("matrix request #{} for {:?}", ticket.id, ticket.scope);
        self.title = Some(format!("Player Matrix - {label}"));
        self.state = PresentationState::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }

    pub fn resolve(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<CoOccurrenceMatrix, AcquireError>,
    ) -> Resolution {
        if self.pending() != Some(ticket) {
            warn!(
                "discarding stale matrix response #{} for {:?}",
                ticket.id, ticket.scope
            );
            return Resolution::Stale;
        }

        let scope = ticket.scope.clone();
        self.state = match outcome {
            Ok(matrix) if matrix.is_empty() => PresentationState::Empty { scope },
            Ok(matrix) => {
                let strategy = self.config.scale.strategy();
                let table = build_table(&matrix, strategy.as_ref(), self.config.names);
                PresentationState::Populated { scope, table }
            }
            Err(error) => {
                warn!("matrix request #{} failed: {error}", ticket.id);
                PresentationState::Error { scope, error }
            }
        };
        Resolution::Applied
    }

    pub fn visibility(&self) -> Visibility {
        match self.state {
            PresentationState::Idle => Visibility {
                loading: false,
                table: false,
                message: false,
            },
            PresentationState::Loading { .. } => Visibility {
                loading: true,
                table: false,
                message: false,
            },
            PresentationState::Populated { .. } => Visibility {
                loading: false,
                table: true,
                message: false,
            },
            PresentationState::Empty { .. } | PresentationState::Error { .. } => Visibility {
                loading: false,
                table: false,
                message: true,
            },
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        self.visibility().message.then_some(NO_DATA_MESSAGE)
    }
}
