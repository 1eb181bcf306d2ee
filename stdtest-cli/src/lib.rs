//! Crate for stdtest, a command-line runner for stdin/output test cases.

pub mod args;
pub mod entry;
pub mod events;
mod productinfo;
