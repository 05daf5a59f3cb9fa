#![forbid(unsafe_code)]

pub mod dataset;
