//! `replay-core` binary crate's library half: the component-graph wiring,
//! CLI-only configuration, and error aggregation that `src/cli/*` drives.
//! The replay subsystem itself lives in the `crates/*` workspace members;
//! this crate only assembles them for the binary (§0 of SPEC_FULL.md).

pub mod app_context;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fixture;
