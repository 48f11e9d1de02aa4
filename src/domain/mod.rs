// Domain layer: models and ports. Adapters and the flow depend on this, never the reverse.

pub mod model;
pub mod ports;
