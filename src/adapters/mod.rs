// Adapters layer: concrete implementations of the domain ports.

pub mod catalog;
pub mod clock;
pub mod random;
pub mod roster;

pub use catalog::InMemoryCatalog;
pub use clock::{ManualClock, SystemClock};
pub use random::{LocalRandom, RandomOrgRandom};
pub use roster::{InMemoryRoster, LeaderboardSort};
