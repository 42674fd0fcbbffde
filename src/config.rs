use std::env;
use std::path::PathBuf;

use crate::binding::BindingConfig;
use crate::demo_source::{DEMO_TEAMS, DemoMatrixSource};
use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::matrix::TeamId;
use crate::matrix_fetch::{HttpMatrixSource, MatrixSource, Scope};
use crate::scale::ScaleKind;
use crate::table::NameStyle;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamEntry {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MatrixConfig {
    pub source: SourceKind,
    pub base_url: String,
    pub session_id: Option<String>,
    pub timeout_secs: u64,
    pub scale: ScaleKind,
    pub names: NameStyle,
    pub teams: Vec<TeamEntry>,
    pub export_dir: PathBuf,
}

impl MatrixConfig {
    /// Loads `.env.local` / `.env` if present, then reads the process env.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let source = match get("MATRIX_SOURCE").map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "demo" => SourceKind::Demo,
            _ => SourceKind::Http,
        };
        let timeout_secs = get("MATRIX_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let scale = get("MATRIX_SCALE")
            .and_then(|v| ScaleKind::parse(&v))
            .unwrap_or_default();
        let names = get("MATRIX_NAME_STYLE")
            .and_then(|v| NameStyle::parse(&v))
            .unwrap_or_default();
        let teams = match get("MATRIX_TEAMS") {
            Some(raw) => parse_teams(&raw),
            None if source == SourceKind::Demo => demo_teams(),
            None => Vec::new(),
        };

        Self {
            source,
            base_url: get("MATRIX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            session_id: get("MATRIX_SESSION_ID"),
            timeout_secs,
            scale,
            names,
            teams,
            export_dir: get("MATRIX_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn binding(&self) -> BindingConfig {
        BindingConfig {
            scale: self.scale,
            names: self.names,
        }
    }

    pub fn matrix_source(&self) -> Box<dyn MatrixSource + Send> {
        match self.source {
            SourceKind::Http => Box::new(HttpMatrixSource::new(
                &self.base_url,
                self.session_id.clone(),
                self.timeout_secs,
            )),
            SourceKind::Demo => Box::new(DemoMatrixSource::default()),
        }
    }

    pub fn team_name(&self, id: TeamId) -> Option<&str> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    pub fn scope_label(&self, scope: &Scope) -> String {
        match scope {
            Scope::AllPlayers => "All players".to_string(),
            Scope::Team(id) => self
                .team_name(*id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Team {id}")),
        }
    }
}

/// `"1:Senior A, 2:U19"`; malformed entries are skipped.
pub fn parse_teams(raw: &str) -> Vec<TeamEntry> {
    raw.split(',')
        .filter_map(|part| {
            let (id, name) = part.split_once(':')?;
            let id = id.trim().parse::<TeamId>().ok()?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(TeamEntry {
                id,
                name: name.to_string(),
            })
        })
        .collect()
}

fn demo_teams() -> Vec<TeamEntry> {
    DEMO_TEAMS
        .iter()
        .map(|t| TeamEntry {
            id: t.id,
            name: t.name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> MatrixConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MatrixConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.source, SourceKind::Http);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.scale, ScaleKind::Continuous);
        assert_eq!(cfg.names, NameStyle::FirstName);
        assert!(cfg.teams.is_empty());
        assert!(cfg.session_id.is_none());
    }

    #[test]
    fn reads_overrides_and_clamps_timeout() {
        let cfg = config_from(&[
            ("MATRIX_SCALE", "banded"),
            ("MATRIX_NAME_STYLE", "initial"),
            ("MATRIX_TIMEOUT_SECS", "900"),
            ("MATRIX_SESSION_ID", "  "),
            ("MATRIX_TEAMS", "1:Senior A, x:Bad, 3:, 7: U19 "),
        ]);
        assert_eq!(cfg.scale, ScaleKind::Banded);
        assert_eq!(cfg.names, NameStyle::FirstNameInitial);
        assert_eq!(cfg.timeout_secs, 120);
        assert!(cfg.session_id.is_none());
        assert_eq!(cfg.teams.len(), 2);
        assert_eq!(cfg.team_name(7), Some("U19"));
        assert_eq!(cfg.scope_label(&Scope::Team(1)), "Senior A");
        assert_eq!(cfg.scope_label(&Scope::Team(9)), "Team 9");
    }

    #[test]
    fn demo_source_falls_back_to_demo_teams() {
        let cfg = config_from(&[("MATRIX_SOURCE", "Demo"), ("MATRIX_SCALE", "rainbow")]);
        assert_eq!(cfg.source, SourceKind::Demo);
        assert_eq!(cfg.scale, ScaleKind::Continuous);
        assert_eq!(cfg.teams.len(), DEMO_TEAMS.len());
    }
}
