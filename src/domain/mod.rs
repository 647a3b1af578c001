// Domain layer: response shapes, the movie record and ports. No I/O here.

pub mod model;
pub mod ports;
