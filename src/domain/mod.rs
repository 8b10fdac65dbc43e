// Domain layer: models and ports. Engines and adapters depend on this, never the other way round.

pub mod model;
pub mod ports;
