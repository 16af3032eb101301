//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Transport codec (Base64) and random key generation
//! - Typed environment configuration readers

pub mod codec;
pub mod config;
