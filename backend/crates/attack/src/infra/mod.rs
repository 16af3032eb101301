//! Infrastructure Layer
//!
//! Simulation backend implementations.

pub mod retry;
pub mod stabilizer;
