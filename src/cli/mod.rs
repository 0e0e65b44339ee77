//! CLI module for Precedent
//!
//! Handles command-line argument parsing and verbosity mapping.

pub mod args;

pub use args::{Args, Commands, Verbosity};
