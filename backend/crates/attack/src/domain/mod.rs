//! Domain Layer
//!
//! - Value objects (Key, qubit budget, shot count)
//! - Circuit description and its construction policy
//! - Cancellation signals
//! - Simulation backend contract
//! - Entities (reports, runs) and timing helpers

pub mod backend;
pub mod cancellation;
pub mod circuit;
pub mod entities;
pub mod services;
pub mod value_objects;
