//! FJSP domain models.
//!
//! Provides the data types for representing flexible job-shop problems and
//! their decoded solutions.
//!
//! # Domain Mappings
//!
//! | u-fjsp | Manufacturing | Healthcare | Logistics |
//! |--------|--------------|------------|-----------|
//! | Job | Order | Patient Case | Shipment |
//! | Operation | Routing Step | Procedure | Transport Leg |
//! | Machine | Work Center | Room | Truck |
//! | Schedule | Production Plan | OR Schedule | Route Plan |

mod instance;
mod job;
mod machine;
mod operation;
mod schedule;

pub(crate) use instance::mean_std;
pub use instance::{Instance, InstanceData, InstanceFeatures, OperationId};
pub use job::Job;
pub use machine::Machine;
pub use operation::{MachineOption, Operation};
pub use schedule::{Schedule, ScheduledOperation, Violation, ViolationType};
