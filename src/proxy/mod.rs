//! Voice-cloning proxy.
//!
//! This module turns a caller's clone request into a prediction job,
//! waits for the job to finish and classifies the outcome.

mod handler;
mod poll;

pub use handler::{CloneProxy, CloneRequest, ProxyError};
pub use poll::PollPolicy;
