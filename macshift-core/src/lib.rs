//! macshift Core Library
//!
//! This crate provides the hardware address type, the pure address codec
//! (validation, generation and text scanning) and the shared error type
//! for the macshift MAC address changer.

pub mod codec;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use codec::{find_in_text, generate, generate_with, validate};
pub use error::{Error, Result};
pub use types::MacAddr;
