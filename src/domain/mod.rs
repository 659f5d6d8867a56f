// Domain layer: API models, resource schema and ports (interfaces).

pub mod model;
pub mod ports;
pub mod schema;
