pub mod errors;
pub mod ports;
pub mod probe;
pub mod sla;
