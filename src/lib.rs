//! Administrative location directory.
//!
//! A self-referencing Province > District > Sector > Cell > Village tree
//! kept in a pluggable store, with validated inserts, parent-chain walks,
//! subtree views, statistics and guarded deletion.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
