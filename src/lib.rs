//! # Trio Solver Library
//!
//! This library decides whether a triple-matching tile level can be fully cleared before
//! it is shown to a player. Picked tiles go to a seven-slot tray; three of a kind clear.
//! A bounded beam search looks for a pick order that empties both the board and the tray.
//!
//! It is used by two binaries:
//! - `tile_solver`: loads a level (or a flat board) and reports a winning pick order.
//! - `level_builder`: shuffles pieces onto a layout until the solver accepts one.
//!
//! ## Modules
//! - `engine`: board, tray, signatures and the tray clearing rules.
//! - `heuristics`: the score used to rank partial states.
//! - `transposition`: the per-solve dominance map over seen states.
//! - `layout`: the `SelectablePositions` boundary and stacked tile geometry.
//! - `solver`: the beam search driver and the `is_solvable` entry point.
//! - `level`: the randomized retry loop used when authoring levels.
//! - `utils`: board and level file parsing.

pub mod engine;
pub mod heuristics;
pub mod layout;
pub mod level;
pub mod solver;
pub mod transposition;
pub mod utils;

pub use engine::{Board, PieceType, Tray, TrayRule, TRAY_CAPACITY};
pub use layout::{Layout, SelectablePositions};
pub use solver::{is_solvable, verify_solution, SearchStats, SolveOutcome, SolverConfig};
