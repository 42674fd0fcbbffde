use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::AcquireError;
use crate::matrix::{CoOccurrenceMatrix, Player, PlayerId, TeamId};
use crate::matrix_fetch::{MatrixSource, Scope};

pub struct DemoTeam {
    pub id: TeamId,
    pub name: &'static str,
    pub squad_size: usize,
    pub matches: usize,
}

pub const DEMO_TEAMS: &[DemoTeam] = &[
    DemoTeam {
        id: 1,
        name: "Senior A",
        squad_size: 14,
        matches: 18,
    },
    DemoTeam {
        id: 2,
        name: "Senior B",
        squad_size: 12,
        matches: 12,
    },
    DemoTeam {
        id: 3,
        name: "U19",
        squad_size: 16,
        matches: 9,
    },
    DemoTeam {
        id: 4,
        name: "New Squad",
        squad_size: 0,
        matches: 0,
    },
];

const FIRST_NAMES: &[&str] = &[
    "Aksel", "Birk", "Emil", "Filip", "Henrik", "Isak", "Jonas", "Kasper", "Lars", "Magnus",
    "Nils", "Oskar", "Petter", "Sander", "Tobias", "Vetle", "William", "Even", "Jakob", "Mathias",
];

const LAST_NAMES: &[&str] = &[
    "Berg", "Dahl", "Eide", "Haugen", "Johansen", "Lie", "Moen", "Nilsen", "Solberg", "Strand",
];

/// Offline source: seeded synthetic appearances per team.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoMatrixSource {
    pub seed: u64,
}

impl DemoMatrixSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn team_data(&self, team: &DemoTeam) -> (Vec<Player>, Vec<(PlayerId, u64)>) {
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(team.id).wrapping_mul(0x9e37));
        let base_id = u64::from(team.id) * 100;
        let players: Vec<Player> = (0..team.squad_size)
            .map(|idx| {
                let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
                let last = if rng.gen_bool(0.8) {
                    Some(LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())])
                } else {
                    None
                };
                Player::new(base_id + idx as u64, first, last)
            })
            .collect();

        let mut appearances = Vec::new();
        if players.is_empty() {
            return (players, appearances);
        }
        let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        for m in 0..team.matches {
            let match_id = base_id * 1000 + m as u64;
            let lineup = rng.gen_range(ids.len().min(7)..=ids.len().min(11));
            for id in ids.choose_multiple(&mut rng, lineup) {
                appearances.push((*id, match_id));
            }
        }
        (players, appearances)
    }
}

impl MatrixSource for DemoMatrixSource {
    fn fetch(&self, scope: &Scope) -> Result<CoOccurrenceMatrix, AcquireError> {
        match scope {
            Scope::Team(team_id) => {
                let Some(team) = DEMO_TEAMS.iter().find(|t| t.id == *team_id) else {
                    return Ok(CoOccurrenceMatrix::empty());
                };
                let (players, appearances) = self.team_data(team);
                Ok(CoOccurrenceMatrix::from_appearances(players, &appearances))
            }
            Scope::AllPlayers => {
                let mut players = Vec::new();
                let mut appearances = Vec::new();
                for team in DEMO_TEAMS {
                    let (p, a) = self.team_data(team);
                    players.extend(p);
                    appearances.extend(a);
                }
                Ok(CoOccurrenceMatrix::from_appearances(players, &appearances))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_team_matrix_is_deterministic_and_symmetric() {
        let source = DemoMatrixSource::new(7);
        let a = source.fetch(&Scope::Team(1)).expect("demo fetch");
        let b = source.fetch(&Scope::Team(1)).expect("demo fetch");
        assert_eq!(a, b);
        assert_eq!(a.len(), 14);
        assert!(a.is_symmetric());
        assert!(a.max_value() >= 1.0);
    }

    #[test]
    fn empty_and_unknown_teams_have_no_players() {
        let source = DemoMatrixSource::default();
        assert!(source.fetch(&Scope::Team(4)).expect("demo fetch").is_empty());
        assert!(source.fetch(&Scope::Team(404)).expect("demo fetch").is_empty());
    }

    #[test]
    fn all_players_spans_every_team() {
        let source = DemoMatrixSource::default();
        let all = source.fetch(&Scope::AllPlayers).expect("demo fetch");
        let expected: usize = DEMO_TEAMS.iter().map(|t| t.squad_size).sum();
        assert_eq!(all.len(), expected);
        // Teams never share matches, so cross-team pairs stay zero.
        assert_eq!(all.value(0, 14), Some(0));
    }
}
