// Path: crates/cli/src/commands/mod.rs

pub mod config;
pub mod keys;
pub mod node;
