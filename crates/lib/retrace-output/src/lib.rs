#![forbid(unsafe_code)]

pub mod logger;
pub mod snapshot;
