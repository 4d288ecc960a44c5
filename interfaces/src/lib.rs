pub mod defs;
pub mod empty;

pub use defs::{DigestDelivery, DigestOutput, LiveSourceSpec, RawEntry};
pub use empty::NullDelivery;
