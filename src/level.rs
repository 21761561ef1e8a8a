//! Random piece assignment for level authoring.
//!
//! A layout is filled with shuffled triples and handed to the solver; unsolvable
//! assignments are thrown away and reshuffled until one passes or attempts run out.
use crate::engine::{Board, PieceType, MATCH_SIZE};
use crate::layout::Layout;
use crate::solver::{is_solvable, SearchStats, SolveOutcome, SolverConfig};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_ATTEMPTS: usize = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("layout has {0} cells, which is not a multiple of three")]
    CellCount(usize),
    #[error("at least one piece type is required")]
    NoPieceTypes,
    #[error("no solvable assignment found in {0} attempts")]
    AttemptsExhausted(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelOptions {
    pub seed: u64,
    /// Maximum number of assignments tried. Zero means `DEFAULT_ATTEMPTS`.
    pub attempts: usize,
    pub solver: SolverConfig,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            attempts: DEFAULT_ATTEMPTS,
            solver: SolverConfig::default(),
        }
    }
}

/// A piece assignment the solver managed to clear.
#[derive(Clone, Debug)]
pub struct Level {
    pub board: Board,
    pub winning_moves: Vec<usize>,
    /// 1-based index of the attempt that succeeded.
    pub attempt: usize,
    pub stats: SearchStats,
}

/// Piece types for `cells` slots: whole triples, types dealt round-robin, unshuffled.
pub fn triple_pieces(cells: usize, piece_types: PieceType) -> Result<Vec<PieceType>, LevelError> {
    if cells % MATCH_SIZE != 0 {
        return Err(LevelError::CellCount(cells));
    }
    if piece_types == 0 {
        return Err(LevelError::NoPieceTypes);
    }
    let pieces = (0..cells / MATCH_SIZE)
        .flat_map(|i| {
            let piece = (i % piece_types as usize) as PieceType;
            std::iter::repeat(piece).take(MATCH_SIZE)
        })
        .collect();
    Ok(pieces)
}

/// Shuffles triples onto `layout` until the solver finds a way to clear them.
pub fn build_solvable_level(
    layout: &Layout,
    piece_types: PieceType,
    options: &LevelOptions,
) -> Result<Level, LevelError> {
    let mut pieces = triple_pieces(layout.len(), piece_types)?;
    let attempts = if options.attempts == 0 {
        DEFAULT_ATTEMPTS
    } else {
        options.attempts
    };
    let mut rng = SmallRng::seed_from_u64(options.seed);

    for attempt in 1..=attempts {
        pieces.shuffle(&mut rng);
        let board = Board::from_slots(pieces.iter().map(|&p| Some(p)).collect());

        match is_solvable(&board, layout, &options.solver) {
            SolveOutcome::Solvable {
                winning_moves,
                stats,
            } => {
                info!(attempt, expansions = stats.expansions_used, "solvable level found");
                return Ok(Level {
                    board,
                    winning_moves,
                    attempt,
                    stats,
                });
            }
            SolveOutcome::Unsolvable { stats } => {
                debug!(attempt, termination = ?stats.termination, "assignment rejected");
            }
        }
    }

    Err(LevelError::AttemptsExhausted(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TrayRule;
    use crate::solver::verify_solution;

    #[test]
    fn test_triple_pieces_counts() {
        let pieces = triple_pieces(9, 2).unwrap();
        assert_eq!(pieces, vec![0, 0, 0, 1, 1, 1, 0, 0, 0]);
        assert_eq!(triple_pieces(10, 2), Err(LevelError::CellCount(10)));
        assert_eq!(triple_pieces(9, 0), Err(LevelError::NoPieceTypes));
    }

    #[test]
    fn test_build_flat_level() {
        let layout = Layout::flat(9);
        let level = build_solvable_level(&layout, 3, &LevelOptions::default()).unwrap();
        assert_eq!(level.attempt, 1);
        assert_eq!(level.board.remaining(), 9);
        assert_eq!(
            verify_solution(&level.board, &layout, &level.winning_moves, TrayRule::Append),
            Ok(())
        );
    }

    #[test]
    fn test_build_is_reproducible_for_a_seed() {
        let layout = Layout::pyramid(3, 3, 1);
        let options = LevelOptions {
            seed: 42,
            ..LevelOptions::default()
        };
        let a = build_solvable_level(&layout, 3, &options).unwrap();
        let b = build_solvable_level(&layout, 3, &options).unwrap();
        assert_eq!(a.board, b.board);
        assert_eq!(a.winning_moves, b.winning_moves);
    }

    #[test]
    fn test_impossible_budget_exhausts_attempts() {
        let layout = Layout::flat(6);
        let options = LevelOptions {
            attempts: 3,
            solver: SolverConfig {
                max_depth: 1,
                ..SolverConfig::default()
            },
            ..LevelOptions::default()
        };
        assert_eq!(
            build_solvable_level(&layout, 2, &options).unwrap_err(),
            LevelError::AttemptsExhausted(3)
        );
    }
}
