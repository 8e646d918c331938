//! Utilities shared by the Walkie server and client binaries.

pub mod logger;
pub mod time;
