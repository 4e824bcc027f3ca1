// Domain layer: search models and ports (interfaces) to the REST backend.

pub mod model;
pub mod ports;
