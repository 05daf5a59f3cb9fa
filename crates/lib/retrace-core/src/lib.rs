#![forbid(unsafe_code)]

pub use hashbrown;

pub mod dataset;
pub mod event;
pub mod ids;
pub mod node;
pub mod timeline;
