#![forbid(unsafe_code)]

//! Playback engine for recorded mobile-network simulations.
//!
//! The [`controller::PlaybackController`] is a plain owned value driven by
//! one sequential caller; it has no interior mutability and spawns no
//! threads. A boundary that shares it across threads must wrap it in a
//! `Mutex` for the duration of each operation.

pub mod controller;
