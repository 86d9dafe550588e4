// Domain layer: cart models and ports. No storage or CLI concerns here.

pub mod model;
pub mod ports;
