use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::AcquireError;

pub type PlayerId = u64;
pub type TeamId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, first_name: &str, last_name: Option<&str>) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.map(str::to_string),
        }
    }

    /// Last name with surrounding whitespace removed, if any is left.
    pub fn last_name_trimmed(&self) -> Option<&str> {
        self.last_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Square count matrix for one roster, produced fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct CoOccurrenceMatrix {
    players: Vec<Player>,
    cells: Vec<Vec<u32>>,
    max_value: f64,
}

/// Absent, zero, negative or non-finite ceilings become 1.
pub fn normalize_max_value(raw: Option<f64>) -> f64 {
    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    }
}

impl CoOccurrenceMatrix {
    /// Validates the square and symmetric shape before accepting the data.
    pub fn new(
        players: Vec<Player>,
        cells: Vec<Vec<u32>>,
        max_value: Option<f64>,
    ) -> Result<Self, AcquireError> {
        let n = players.len();
        if cells.len() != n {
            return Err(AcquireError::Malformed(format!(
                "{} players but {} matrix rows",
                n,
                cells.len()
            )));
        }
        for (i, row) in cells.iter().enumerate() {
            if row.len() != n {
                return Err(AcquireError::Malformed(format!(
                    "row {i} has {} cells, expected {n}",
                    row.len()
                )));
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if cells[i][j] != cells[j][i] {
                    return Err(AcquireError::Malformed(format!(
                        "asymmetric cell ({i},{j}): {} vs {}",
                        cells[i][j], cells[j][i]
                    )));
                }
            }
        }

        Ok(Self {
            players,
            cells,
            max_value: normalize_max_value(max_value),
        })
    }

    pub fn empty() -> Self {
        Self {
            players: Vec::new(),
            cells: Vec::new(),
            max_value: 1.0,
        }
    }

    /// Counts shared matches from `(player, match)` appearance records.
    ///
    /// The diagonal holds matches played. The ceiling is the largest
    /// off-diagonal count so pair shading is not dominated by the diagonal.
    pub fn from_appearances<M>(players: Vec<Player>, appearances: &[(PlayerId, M)]) -> Self
    where
        M: Eq + std::hash::Hash + Clone,
    {
        let index: HashMap<PlayerId, usize> = players
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.id, idx))
            .collect();

        let mut lineups: HashMap<M, Vec<usize>> = HashMap::new();
        let mut seen: HashSet<(PlayerId, M)> = HashSet::new();
        for (player_id, match_id) in appearances {
            let Some(&idx) = index.get(player_id) else {
                continue;
            };
            if !seen.insert((*player_id, match_id.clone())) {
                continue;
            }
            lineups.entry(match_id.clone()).or_default().push(idx);
        }

        let n = players.len();
        let mut cells = vec![vec![0u32; n]; n];
        for lineup in lineups.values() {
            for &a in lineup {
                cells[a][a] += 1;
                for &b in lineup {
                    if a != b {
                        cells[a][b] += 1;
                    }
                }
            }
        }

        let mut max_pair = 0u32;
        for (i, row) in cells.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if i != j {
                    max_pair = max_pair.max(value);
                }
            }
        }

        Self {
            players,
            cells,
            max_value: normalize_max_value(Some(f64::from(max_pair))),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn cells(&self) -> &[Vec<u32>] {
        &self.cells
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn value(&self, row: usize, col: usize) -> Option<u32> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.cells.len();
        (0..n).all(|i| (0..n).all(|j| self.cells[i][j] == self.cells[j][i]))
    }
}
