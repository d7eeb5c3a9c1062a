//! Application layer: instance lifecycle and diagnostics
//!
//! This layer orchestrates domain logic; it does no I/O of its own.

pub mod debug_draw;
pub mod describe;
pub mod error;
pub mod instance;

pub use debug_draw::{debug_draw, DebugPrimitive};
pub use describe::{Description, TreeNodeConvert};
pub use error::{ApplicationError, ApplicationResult};
pub use instance::InstanceSkeleton;
