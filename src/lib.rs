//! clone-proxy: voice-cloning prediction proxy.
//!
//! This crate accepts voice-cloning requests over HTTP, runs them as
//! predictions on Replicate (Coqui XTTS v2 by default), waits for the
//! prediction to finish and returns the generated audio URL.

pub mod cli;
pub mod config;
pub mod prediction;
pub mod proxy;
pub mod server;
