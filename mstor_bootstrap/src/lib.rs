//! Process entry point for `mstor`, kept deliberately thin and outside the
//! domain/application/infrastructure layering `mstor_domain`/`mstor`
//! implement: CLI parsing, configuration assembly, platform facts, signal
//! handling, and exit-code mapping. Enterprise layers never depend back on
//! this crate.

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod platform;
pub mod signals;
