//! Shared Kernel
//!
//! Vocabulary shared by every crate of the attack simulator:
//! - The unified error type and its classification
//! - Typed identifiers
//!
//! Only things with the same meaning in every layer belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
