use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::RwLock;

use crate::domain::model::{Boxer, CompetitorId, Outcome, WeightClass};
use crate::domain::ports::StatsRecorder;
use crate::utils::error::{BoxshelfError, Result};
use crate::utils::validation::{
    validate_finite, validate_greater_than, validate_non_empty_string, validate_range,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    Wins,
    WinPct,
}

impl FromStr for LeaderboardSort {
    type Err = BoxshelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wins" => Ok(LeaderboardSort::Wins),
            "win_pct" | "win-pct" => Ok(LeaderboardSort::WinPct),
            other => Err(BoxshelfError::validation(
                "sort_by",
                other,
                "Expected 'wins' or 'win_pct'",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub id: CompetitorId,
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub reach: f64,
    pub age: u32,
    pub weight_class: WeightClass,
    pub fights: u32,
    pub wins: u32,
    pub win_pct: f64,
}

#[derive(Default)]
struct RosterState {
    boxers: BTreeMap<CompetitorId, Boxer>,
    next_id: CompetitorId,
}

/// In-memory boxer registry and fight statistics.
#[derive(Default)]
pub struct InMemoryRoster {
    state: RwLock<RosterState>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_boxer(
        &self,
        name: &str,
        weight: f64,
        height: f64,
        reach: f64,
        age: u32,
    ) -> Result<Boxer> {
        tracing::info!("Received request to create boxer {}", name);

        let name = validate_non_empty_string("name", name)?;
        validate_finite("weight", weight)?;
        validate_finite("height", height)?;
        validate_finite("reach", reach)?;
        if weight < WeightClass::MIN_WEIGHT {
            return Err(BoxshelfError::validation(
                "weight",
                weight,
                format!("Must be at least {}", WeightClass::MIN_WEIGHT),
            ));
        }
        validate_greater_than("height", height, 0.0)?;
        validate_greater_than("reach", reach, 0.0)?;
        validate_range("age", age, 18, 40)?;

        let mut state = self.write();
        if state.boxers.values().any(|b| b.name == name) {
            tracing::error!("Boxer with name '{}' already exists", name);
            return Err(BoxshelfError::DuplicateEntry {
                entity: "Boxer",
                key: name.to_string(),
            });
        }

        state.next_id += 1;
        let boxer = Boxer {
            id: state.next_id,
            name: name.to_string(),
            weight,
            height,
            reach,
            age,
            fights: 0,
            wins: 0,
        };
        state.boxers.insert(boxer.id, boxer.clone());

        tracing::info!("Boxer {} created with ID {}", boxer.name, boxer.id);
        Ok(boxer)
    }

    pub fn delete_boxer(&self, id: CompetitorId) -> Result<()> {
        tracing::info!("Received request to delete boxer with ID {}", id);
        self.write()
            .boxers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BoxshelfError::not_found("Boxer", id))
    }

    pub fn get_by_id(&self, id: CompetitorId) -> Result<Boxer> {
        self.read()
            .boxers
            .get(&id)
            .cloned()
            .ok_or_else(|| BoxshelfError::not_found("Boxer", id))
    }

    pub fn get_by_name(&self, name: &str) -> Result<Boxer> {
        self.read()
            .boxers
            .values()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| BoxshelfError::not_found("Boxer", format!("'{}'", name)))
    }

    /// Boxers with at least one fight, best first.
    pub fn leaderboard(&self, sort_by: LeaderboardSort) -> Result<Vec<LeaderboardEntry>> {
        let state = self.read();
        let mut entries = state
            .boxers
            .values()
            .filter_map(|b| b.win_pct().map(|pct| (b, pct)))
            .map(|(b, win_pct)| -> Result<LeaderboardEntry> {
                Ok(LeaderboardEntry {
                    id: b.id,
                    name: b.name.clone(),
                    weight: b.weight,
                    height: b.height,
                    reach: b.reach,
                    age: b.age,
                    weight_class: b.weight_class()?,
                    fights: b.fights,
                    wins: b.wins,
                    win_pct,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        match sort_by {
            LeaderboardSort::Wins => entries.sort_by(|a, b| b.wins.cmp(&a.wins)),
            LeaderboardSort::WinPct => entries.sort_by(|a, b| b.win_pct.total_cmp(&a.win_pct)),
        }

        tracing::info!("Leaderboard built with {} boxers", entries.len());
        Ok(entries)
    }

    pub fn len(&self) -> usize {
        self.read().boxers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().boxers.is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RosterState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RosterState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl StatsRecorder for InMemoryRoster {
    fn record_result(&self, competitor_id: CompetitorId, outcome: Outcome) -> Result<()> {
        let mut state = self.write();
        let boxer = state.boxers.get_mut(&competitor_id).ok_or_else(|| {
            tracing::error!("Cannot record {}: boxer with ID {} not found", outcome, competitor_id);
            BoxshelfError::not_found("Boxer", competitor_id)
        })?;

        boxer.fights += 1;
        if outcome == Outcome::Win {
            boxer.wins += 1;
        }
        tracing::info!("Recorded {} for boxer {} ({}/{})", outcome, boxer.name, boxer.wins, boxer.fights);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_boxer_validation() {
        let roster = InMemoryRoster::new();
        assert!(roster.create_boxer("Light", 100.0, 180.0, 70.0, 25).is_err());
        assert!(roster.create_boxer("Flat", 150.0, 0.0, 70.0, 25).is_err());
        assert!(roster.create_boxer("Short", 150.0, 180.0, -5.0, 25).is_err());
        assert!(roster.create_boxer("Kid", 150.0, 180.0, 70.0, 17).is_err());
        assert!(roster.create_boxer("Vet", 150.0, 180.0, 70.0, 41).is_err());
        assert!(roster.is_empty());

        let boxer = roster.create_boxer("Boxer A", 150.0, 180.0, 70.0, 18).unwrap();
        assert_eq!(boxer.id, 1);
        assert!(matches!(
            roster.create_boxer("Boxer A", 160.0, 170.0, 72.0, 30).unwrap_err(),
            BoxshelfError::DuplicateEntry { .. }
        ));
    }

    #[test]
    fn test_create_boxer_rejects_non_finite_measurements() {
        let roster = InMemoryRoster::new();
        for (weight, height, reach) in [
            (f64::NAN, 180.0, 70.0),
            (f64::INFINITY, 180.0, 70.0),
            (150.0, f64::NAN, 70.0),
            (150.0, 180.0, f64::INFINITY),
        ] {
            let err = roster.create_boxer("Ghost", weight, height, reach, 25).unwrap_err();
            assert!(matches!(err, BoxshelfError::ValidationError { .. }));
        }
        assert!(roster.is_empty());

        let boxer = roster.create_boxer("Real", 150.0, 180.0, 70.0, 25).unwrap();
        roster.record_result(boxer.id, Outcome::Win).unwrap();
        assert_eq!(roster.leaderboard(LeaderboardSort::Wins).unwrap().len(), 1);
    }

    #[test]
    fn test_record_result_updates_stats() {
        let roster = InMemoryRoster::new();
        let boxer = roster.create_boxer("Boxer A", 150.0, 180.0, 70.0, 30).unwrap();

        roster.record_result(boxer.id, Outcome::Win).unwrap();
        roster.record_result(boxer.id, Outcome::Loss).unwrap();

        let stored = roster.get_by_name("Boxer A").unwrap();
        assert_eq!(stored.fights, 2);
        assert_eq!(stored.wins, 1);

        assert!(matches!(
            roster.record_result(99, Outcome::Win).unwrap_err(),
            BoxshelfError::NotFound { .. }
        ));
    }

    #[test]
    fn test_leaderboard_sorting() {
        let roster = InMemoryRoster::new();
        let a = roster.create_boxer("Boxer A", 150.0, 180.0, 70.0, 30).unwrap();
        let b = roster.create_boxer("Boxer B", 170.0, 175.0, 72.0, 28).unwrap();
        roster.create_boxer("Boxer C", 210.0, 190.0, 80.0, 33).unwrap();

        // A: 2 wins of 4, B: 1 win of 1, C never fought.
        for outcome in [Outcome::Win, Outcome::Win, Outcome::Loss, Outcome::Loss] {
            roster.record_result(a.id, outcome).unwrap();
        }
        roster.record_result(b.id, Outcome::Win).unwrap();

        let by_wins = roster.leaderboard(LeaderboardSort::Wins).unwrap();
        assert_eq!(by_wins.len(), 2);
        assert_eq!(by_wins[0].name, "Boxer A");
        assert_eq!(by_wins[0].win_pct, 50.0);
        assert_eq!(by_wins[0].weight_class, WeightClass::Lightweight);

        let by_pct = roster.leaderboard(LeaderboardSort::WinPct).unwrap();
        assert_eq!(by_pct[0].name, "Boxer B");
        assert_eq!(by_pct[0].weight_class, WeightClass::Middleweight);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("wins".parse::<LeaderboardSort>().unwrap(), LeaderboardSort::Wins);
        assert_eq!("win-pct".parse::<LeaderboardSort>().unwrap(), LeaderboardSort::WinPct);
        assert!("invalid_param".parse::<LeaderboardSort>().is_err());
    }

    #[test]
    fn test_delete_boxer() {
        let roster = InMemoryRoster::new();
        let boxer = roster.create_boxer("Boxer A", 150.0, 180.0, 70.0, 30).unwrap();
        roster.delete_boxer(boxer.id).unwrap();
        assert!(roster.get_by_id(boxer.id).is_err());
        assert!(roster.delete_boxer(boxer.id).is_err());
    }
}
