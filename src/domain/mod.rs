// Domain layer: records, the in-memory dog house and the ports it talks through.

pub mod doghouse;
pub mod model;
pub mod ports;
