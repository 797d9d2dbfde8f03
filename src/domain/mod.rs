// Domain layer: experiment data model and ports. No I/O here.

pub mod currency;
pub mod model;
pub mod ports;
