use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;

use crate::error::AcquireError;
use crate::http_client::http_client;
use crate::matrix::{CoOccurrenceMatrix, Player, TeamId};

pub const PLAYER_MATRIX_PATH: &str = "/team/api/player-matrix/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Team(TeamId),
    AllPlayers,
}

impl Scope {
    /// Empty input means "all players"; anything else must be a team id.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Some(Scope::AllPlayers);
        }
        trimmed.parse::<TeamId>().ok().map(Scope::Team)
    }

    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            Scope::Team(id) => Some(*id),
            Scope::AllPlayers => None,
        }
    }
}

/// Anything able to answer a matrix request for a scope.
pub trait MatrixSource {
    fn fetch(&self, scope: &Scope) -> Result<CoOccurrenceMatrix, AcquireError>;
}

pub struct HttpMatrixSource {
    base_url: String,
    session_id: Option<String>,
    timeout_secs: u64,
}

impl HttpMatrixSource {
    pub fn new(base_url: &str, session_id: Option<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id,
            timeout_secs,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PLAYER_MATRIX_PATH)
    }

    fn client(&self) -> Result<&'static Client, AcquireError> {
        http_client(self.timeout_secs).map_err(|err| AcquireError::transport(format!("{err:#}")))
    }
}

impl MatrixSource for HttpMatrixSource {
    fn fetch(&self, scope: &Scope) -> Result<CoOccurrenceMatrix, AcquireError> {
        let client = self.client()?;
        let url = self.endpoint();
        debug!("requesting player matrix {url} scope={scope:?}");

        let mut req = client.get(&url);
        if let Some(team_id) = scope.team_id() {
            req = req.query(&[("team_id", team_id)]);
        }
        if let Some(session) = self.session_id.as_deref() {
            req = req.header(COOKIE, format!("sessionid={session}"));
        }

        let resp = req
            .send()
            .map_err(|err| AcquireError::transport(format!("request failed: {err}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| AcquireError::transport(format!("failed reading body: {err}")))?;
        if !status.is_success() {
            warn!("player matrix request returned http {status}");
            return Err(AcquireError::status(status.as_u16(), snippet(&body)));
        }

        parse_matrix_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    players: Vec<Player>,
    #[serde(default)]
    matrix: Vec<Vec<u32>>,
    #[serde(default)]
    max_value: Option<f64>,
}

pub fn parse_matrix_json(raw: &str) -> Result<CoOccurrenceMatrix, AcquireError> {
    let parsed: MatrixResponse = serde_json::from_str(raw.trim())
        .map_err(|err| AcquireError::Malformed(format!("invalid player matrix json: {err}")))?;
    CoOccurrenceMatrix::new(parsed.players, parsed.matrix, parsed.max_value)
}

fn snippet(body: &str) -> String {
    const MAX_CHARS: usize = 160;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_CHARS).collect();
    format!("{cut}…")
}
