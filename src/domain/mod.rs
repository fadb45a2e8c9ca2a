// Domain layer: models and ports. Adapters live under src/sdk and src/config.

pub mod model;
pub mod ports;
