//! Sprintmd: sprint-aware annotation for markdown planning docs.
//!
//! A Rust implementation of sprint bookkeeping over business days, with
//! a markdown pass that highlights the active day's section and expands
//! sprint phrases into numbered references.
//!
//! ## Pipeline
//!
//! - `schedule` - business-day arithmetic (active day, sprint number)
//! - `augment` - the markdown annotation pass
//! - `preview` - terminal rendering of annotated plans
//! - `watch` - polling loop that re-renders on plan edits
//! - `config` - CLI arguments, `sprintmd.toml`, and environment

pub mod augment;
pub mod color;
pub mod config;
pub mod preview;
pub mod schedule;
pub mod watch;
