mod appointment;
mod customer;

pub use appointment::*;
pub use customer::*;

/// Identifier carried by records that have not been persisted yet.
pub const UNASSIGNED_ID: i32 = -1;
