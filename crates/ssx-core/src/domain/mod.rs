//! Domain model (records, field bags, scenarios, errors).

pub mod errors;
pub mod fields;
pub mod record;
pub mod scenario;

pub use errors::SimulatorError;
pub use fields::{FieldAccessor, FieldBag};
pub use record::{IoEntry, JobRecord, RecordStatus};
pub use scenario::Scenario;
