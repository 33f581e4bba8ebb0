//! Command implementations for the progdate CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod completions;
pub mod dates;
pub mod list;
