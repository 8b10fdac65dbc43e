use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{BoxshelfError, Result};

pub type BookId = u64;
pub type CompetitorId = u64;

/// A fighter as seen by the ring for the duration of a single bout.
/// Extra fields such as roster stats are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub weight: f64,
    pub reach: f64,
    pub age: u32,
}

impl Competitor {
    pub fn new(id: CompetitorId, name: impl Into<String>, weight: f64, reach: f64, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            reach,
            age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightClass {
    Featherweight,
    Lightweight,
    Middleweight,
    Heavyweight,
}

impl WeightClass {
    pub const MIN_WEIGHT: f64 = 125.0;

    pub fn from_weight(weight: f64) -> Result<Self> {
        if weight >= 203.0 {
            Ok(WeightClass::Heavyweight)
        } else if weight >= 166.0 {
            Ok(WeightClass::Middleweight)
        } else if weight >= 133.0 {
            Ok(WeightClass::Lightweight)
        } else if weight >= Self::MIN_WEIGHT {
            Ok(WeightClass::Featherweight)
        } else {
            Err(BoxshelfError::validation(
                "weight",
                weight,
                format!("Weight must be at least {}", Self::MIN_WEIGHT),
            ))
        }
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeightClass::Featherweight => "FEATHERWEIGHT",
            WeightClass::Lightweight => "LIGHTWEIGHT",
            WeightClass::Middleweight => "MIDDLEWEIGHT",
            WeightClass::Heavyweight => "HEAVYWEIGHT",
        };
        f.write_str(label)
    }
}

/// Roster record: a competitor plus the fight statistics kept between bouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boxer {
    pub id: CompetitorId,
    pub name: String,
    pub weight: f64,
    pub height: f64,
    pub reach: f64,
    pub age: u32,
    pub fights: u32,
    pub wins: u32,
}

impl Boxer {
    pub fn to_competitor(&self) -> Competitor {
        Competitor::new(self.id, self.name.clone(), self.weight, self.reach, self.age)
    }

    pub fn weight_class(&self) -> Result<WeightClass> {
        WeightClass::from_weight(self.weight)
    }

    /// Win percentage rounded to one decimal, `None` before the first fight.
    pub fn win_pct(&self) -> Option<f64> {
        if self.fights == 0 {
            return None;
        }
        let pct = self.wins as f64 / self.fights as f64 * 100.0;
        Some((pct * 10.0).round() / 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub author: String,
    pub title: String,
    pub year: i32,
    pub genre: String,
    /// Number of pages.
    pub length: u32,
    pub read_count: u64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.author, self.title, self.year)
    }
}
