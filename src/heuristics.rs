//! Move scoring used to order the beam.
//!
//! The score is a hand-tuned proxy, not an admissible estimate. It only decides which
//! partial states survive beam truncation.
use crate::engine::{Board, Tray, MATCH_SIZE};
use serde::{Deserialize, Serialize};

/// Weights of the additive scoring components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Reward per full triple cleared by the move.
    pub triple_cleared: i64,
    /// Reward per piece type sitting in the tray with exactly two copies.
    pub pair_in_tray: i64,
    /// Penalty per piece type the move introduced into the tray.
    pub new_type_in_tray: i64,
    /// Penalty per occupied tray slot.
    pub tray_slot: i64,
    /// Reward per piece removed from the board.
    pub board_progress: i64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            triple_cleared: 100,
            pair_in_tray: 12,
            new_type_in_tray: -8,
            tray_slot: -3,
            board_progress: 5,
        }
    }
}

/// Everything the scorer looks at for one pick.
#[derive(Clone, Copy, Debug)]
pub struct Transition<'a> {
    /// Board after the pick. Carried so the scorer sees the whole resulting state; no
    /// current term reads it, since board progress comes from the remaining counts.
    pub board: &'a Board,
    /// Tray after the pick and resolution.
    pub tray: &'a Tray,
    /// Tray before the pick.
    pub tray_before: &'a Tray,
    pub remaining_before: usize,
    pub remaining_after: usize,
    /// Pieces removed by resolution during this pick.
    pub cleared_count: usize,
}

/// Number of piece types with exactly two copies in `tray`.
pub fn count_pairs(tray: &Tray) -> usize {
    tray.distinct_types()
        .into_iter()
        .filter(|&t| tray.count_of(t) == 2)
        .count()
}

/// Number of piece types present in `after` that were absent from `before`.
pub fn count_new_types(before: &Tray, after: &Tray) -> usize {
    after
        .distinct_types()
        .into_iter()
        .filter(|&t| !before.contains(t))
        .count()
}

/// Score increment for one pick under the given weights.
///
/// # Examples
/// ```
/// use trio_solver::engine::{Board, Tray};
/// use trio_solver::heuristics::{score_transition, HeuristicWeights, Transition};
///
/// let board = Board::from_values(&[-1, -1, -1]);
/// let empty = Tray::new();
/// let before = Tray::from_pieces(vec![0, 0]);
/// let t = Transition {
///     board: &board,
///     tray: &empty,
///     tray_before: &before,
///     remaining_before: 1,
///     remaining_after: 0,
///     cleared_count: 3,
/// };
/// // One triple (+100) and one piece off the board (+5).
/// assert_eq!(score_transition(&t, &HeuristicWeights::default()), 105);
/// ```
pub fn score_transition(t: &Transition<'_>, weights: &HeuristicWeights) -> i64 {
    let triples = (t.cleared_count / MATCH_SIZE) as i64;
    let pairs = count_pairs(t.tray) as i64;
    let new_types = count_new_types(t.tray_before, t.tray) as i64;
    let occupancy = t.tray.len() as i64;
    let progress = t.remaining_before as i64 - t.remaining_after as i64;

    triples * weights.triple_cleared
        + pairs * weights.pair_in_tray
        + new_types * weights.new_type_in_tray
        + occupancy * weights.tray_slot
        + progress * weights.board_progress
}
