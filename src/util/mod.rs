//! Utility modules: cancellation.

pub mod cancel;
