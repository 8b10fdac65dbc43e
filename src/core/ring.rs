use crate::domain::model::{Competitor, Outcome};
use crate::domain::ports::{RandomSource, StatsRecorder};
use crate::utils::error::{BoxshelfError, Result};

pub const RING_CAPACITY: usize = 2;

/// Skill score used to weigh a bout.
///
/// Name length is part of the formula and must stay that way for results to
/// match previously recorded fights.
pub fn fighting_skill(competitor: &Competitor) -> f64 {
    let age_modifier = if competitor.age < 25 {
        -1.0
    } else if competitor.age > 35 {
        -2.0
    } else {
        0.0
    };
    let name_length = competitor.name.chars().count() as f64;

    (competitor.weight * name_length) + (competitor.reach / 10.0) + age_modifier
}

/// Logistic transform of the absolute skill gap. Always in `[0.5, 1)`.
pub fn win_probability(a: &Competitor, b: &Competitor) -> f64 {
    let delta = (fighting_skill(a) - fighting_skill(b)).abs();
    1.0 / (1.0 + (-delta).exp())
}

pub struct Ring<S: StatsRecorder, R: RandomSource> {
    competitors: Vec<Competitor>,
    stats: S,
    random: R,
}

impl<S: StatsRecorder, R: RandomSource> Ring<S, R> {
    pub fn new(stats: S, random: R) -> Self {
        Self {
            competitors: Vec::with_capacity(RING_CAPACITY),
            stats,
            random,
        }
    }

    pub fn enter(&mut self, competitor: Competitor) -> Result<()> {
        tracing::info!("Competitor {} ({}) entering the ring", competitor.id, competitor.name);

        if self.competitors.len() >= RING_CAPACITY {
            tracing::error!("Ring is full, cannot add {}", competitor.name);
            return Err(BoxshelfError::CapacityExceeded {
                collection: "Ring",
                capacity: RING_CAPACITY,
            });
        }

        self.competitors.push(competitor);
        tracing::info!("Ring now holds {} competitor(s)", self.competitors.len());
        Ok(())
    }

    /// Enters a competitor decoded from untrusted JSON.
    pub fn enter_value(&mut self, value: &serde_json::Value) -> Result<()> {
        let competitor = serde_json::from_value::<Competitor>(value.clone()).map_err(|e| {
            tracing::error!("Rejected ring entry: {}", e);
            BoxshelfError::TypeMismatch {
                expected: "Competitor".to_string(),
                found: describe_json(value),
            }
        })?;
        self.enter(competitor)
    }

    /// Runs the bout and returns the winner's name.
    ///
    /// Once two competitors are present the ring is emptied before anything
    /// else happens, so it is empty afterwards even if the random draw or a
    /// stats update fails.
    pub fn resolve_fight(&mut self) -> Result<String> {
        tracing::info!("Received request to start the fight");

        if self.competitors.len() != RING_CAPACITY {
            tracing::error!(
                "A fight needs {} competitors, ring holds {}",
                RING_CAPACITY,
                self.competitors.len()
            );
            return Err(BoxshelfError::PreconditionFailed {
                message: format!(
                    "There must be {} competitors to start a fight, found {}",
                    RING_CAPACITY,
                    self.competitors.len()
                ),
            });
        }

        let [first, second]: [Competitor; RING_CAPACITY] = std::mem::take(&mut self.competitors)
            .try_into()
            .map_err(|drawn: Vec<Competitor>| BoxshelfError::PreconditionFailed {
                message: format!("Ring emptied with {} competitors", drawn.len()),
            })?;

        let probability = win_probability(&first, &second);
        let draw = self.random.next_unit()?;
        tracing::debug!(
            "Skill {:.2} vs {:.2}, p = {:.4}, draw = {:.4}",
            fighting_skill(&first),
            fighting_skill(&second),
            probability,
            draw
        );

        // The first entrant takes the probability-weighted region.
        let (winner, loser) = if draw < probability {
            (first, second)
        } else {
            (second, first)
        };

        self.stats.record_result(winner.id, Outcome::Win)?;
        self.stats.record_result(loser.id, Outcome::Loss)?;

        tracing::info!("{} defeated {}", winner.name, loser.name);
        Ok(winner.name)
    }

    pub fn clear(&mut self) {
        if self.competitors.is_empty() {
            tracing::debug!("Ring already empty");
            return;
        }
        tracing::info!("Clearing {} competitor(s) from the ring", self.competitors.len());
        self.competitors.clear();
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

fn describe_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(_) => "bool".to_string(),
        serde_json::Value::Number(_) => "number".to_string(),
        serde_json::Value::String(_) => "string".to_string(),
        serde_json::Value::Array(_) => "array".to_string(),
        serde_json::Value::Object(_) => "malformed object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedDraw(f64);

    impl RandomSource for FixedDraw {
        fn next_unit(&self) -> Result<f64> {
            Ok(self.0)
        }

        fn next_in_range(&self, low: usize, _high: usize) -> Result<usize> {
            Ok(low)
        }
    }

    #[derive(Default)]
    struct RecordingStats {
        calls: Mutex<Vec<(u64, Outcome)>>,
    }

    impl StatsRecorder for RecordingStats {
        fn record_result(&self, competitor_id: u64, outcome: Outcome) -> Result<()> {
            self.calls.lock().unwrap().push((competitor_id, outcome));
            Ok(())
        }
    }

    fn alex() -> Competitor {
        Competitor::new(1234, "Alex", 160.0, 77.0, 23)
    }

    fn bob() -> Competitor {
        Competitor::new(5678, "Bob", 168.0, 74.0, 21)
    }

    #[test]
    fn test_fighting_skill() {
        assert!((fighting_skill(&alex()) - 646.7).abs() < 1e-9);
        // 168 * 3 + 7.4 - 1
        assert!((fighting_skill(&bob()) - 510.4).abs() < 1e-9);
    }

    #[test]
    fn test_age_modifier_buckets() {
        let prime = Competitor::new(1, "Ann", 150.0, 70.0, 30);
        let veteran = Competitor::new(2, "Ann", 150.0, 70.0, 36);
        assert!((fighting_skill(&prime) - 457.0).abs() < 1e-9);
        assert!((fighting_skill(&veteran) - 455.0).abs() < 1e-9);
    }

    #[test]
    fn test_probability_symmetric() {
        let p_ab = win_probability(&alex(), &bob());
        let p_ba = win_probability(&bob(), &alex());
        assert_eq!(p_ab, p_ba);
        assert!(p_ab >= 0.5);

        let twin = alex();
        assert_eq!(win_probability(&alex(), &twin), 0.5);
    }

    #[test]
    fn test_enter_rejects_third_competitor() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.0));
        ring.enter(alex()).unwrap();
        ring.enter(bob()).unwrap();

        let err = ring.enter(Competitor::new(9, "Cal", 150.0, 70.0, 30)).unwrap_err();
        assert!(matches!(err, BoxshelfError::CapacityExceeded { capacity: 2, .. }));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_enter_value_type_mismatch() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.0));
        let err = ring.enter_value(&serde_json::json!("Alex")).unwrap_err();
        assert!(matches!(err, BoxshelfError::TypeMismatch { .. }));

        let err = ring
            .enter_value(&serde_json::json!({"id": 1, "name": "Alex"}))
            .unwrap_err();
        assert!(matches!(err, BoxshelfError::TypeMismatch { .. }));
        assert!(ring.is_empty());

        ring.enter_value(&serde_json::json!({
            "id": 1, "name": "Alex", "weight": 160.0, "reach": 77.0, "age": 23
        }))
        .unwrap();
        assert_eq!(ring.competitors()[0].name, "Alex");
    }

    #[test]
    fn test_fight_requires_two() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.0));
        assert!(matches!(
            ring.resolve_fight().unwrap_err(),
            BoxshelfError::PreconditionFailed { .. }
        ));

        ring.enter(alex()).unwrap();
        assert!(matches!(
            ring.resolve_fight().unwrap_err(),
            BoxshelfError::PreconditionFailed { .. }
        ));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_low_draw_favors_first_entrant() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.0));
        ring.enter(bob()).unwrap();
        ring.enter(alex()).unwrap();

        assert_eq!(ring.resolve_fight().unwrap(), "Bob");
        assert!(ring.is_empty());
        assert_eq!(
            *ring.stats.calls.lock().unwrap(),
            vec![(5678, Outcome::Win), (1234, Outcome::Loss)]
        );
    }

    #[test]
    fn test_high_draw_favors_second_entrant() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.999_999));
        ring.enter(alex()).unwrap();
        ring.enter(alex()).unwrap();
        ring.competitors[1].id = 42;
        ring.competitors[1].name = "Alix".to_string();

        // Equal skill gives p = 0.5.
        assert_eq!(ring.resolve_fight().unwrap(), "Alix");
        assert!(ring.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ring = Ring::new(RecordingStats::default(), FixedDraw(0.0));
        ring.clear();
        ring.enter(alex()).unwrap();
        ring.clear();
        ring.clear();
        assert!(ring.is_empty());
    }
}
