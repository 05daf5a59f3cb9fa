#![forbid(unsafe_code)]

pub mod mapping;
pub mod space;
pub mod stats;
