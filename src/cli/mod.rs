//! CLI module for tickstore - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the server
//! and inspecting snapshot files.

pub mod commands;

pub use commands::Cli;
