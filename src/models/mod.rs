//! Data models for leaderboard entities.
//!
//! This module contains the structures used to represent leaderboard data:
//!
//! - `RunRecord`, `RunsDocument`: the flat wire format served as runs.json
//! - `Leaderboard`, `Game`, `Section`, `Category`, `Run`: the grouped
//!   hierarchy the viewer navigates

pub mod leaderboard;
pub mod record;

pub use leaderboard::{slugify, Category, Game, Leaderboard, Run, Section};
pub use record::{RunRecord, RunsDocument};
