//! Shared helpers with no domain state.

pub mod exec;
pub mod hash;
pub mod mime;
pub mod path;
pub mod plural;
