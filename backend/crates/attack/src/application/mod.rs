//! Application Layer - Use Cases
//!
//! Orchestrates the domain: the attack loop, the run registry and the
//! small codec-backed use cases behind the key endpoints.

pub mod config;
pub mod encrypt;
pub mod run_attack;
pub mod runs;
