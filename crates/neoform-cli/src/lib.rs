//! neoform-cli: check, render, decode, and store property bags from the shell.

pub mod commands;
pub mod config;
pub mod error;
