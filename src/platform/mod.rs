//! Platform abstraction layer
//!
//! Shared by the browser and terminal shells:
//! - Key mapping from raw key names to session commands

pub mod input;

pub use input::{Input, input_for_key, inputs_for_line};
