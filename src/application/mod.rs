pub mod downstream;
pub mod probe_unit;
pub mod scheduler;
pub mod sla_unit;

pub use downstream::{DownstreamPush, PushOutcome};
pub use probe_unit::ProbeUnit;
pub use scheduler::{Scheduler, Unit};
pub use sla_unit::SlaUnit;
