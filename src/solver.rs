//! Bounded beam search answering "can this board be cleared?".
//!
//! `is_solvable` is the entry point level-authoring code calls. It runs `BeamSolver`, which
//! keeps the best `beam_width` states per depth, prunes transpositions through a
//! `TranspositionIndex`, and stops on success or when a budget runs out.
//!
//! A negative answer means "nothing found within budget", never a proof of unsolvability.
use crate::engine::{apply_pick, Board, Signature, Tray, TrayRule};
use crate::heuristics::{score_transition, HeuristicWeights, Transition};
use crate::layout::SelectablePositions;
use crate::transposition::TranspositionIndex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, trace};

pub const DEFAULT_BEAM_WIDTH: usize = 100;
pub const DEFAULT_MAX_EXPANSIONS: usize = 5000;
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Search budget and rule set.
///
/// A zero in any budget field means "use the default"; see [`SolverConfig::normalized`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of states kept per depth.
    pub beam_width: usize,
    /// Global cap on picks simulated across the whole search.
    pub max_expansions: usize,
    /// Maximum number of picks in a solution.
    pub max_depth: usize,
    pub tray_rule: TrayRule,
    pub weights: HeuristicWeights,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_depth: DEFAULT_MAX_DEPTH,
            tray_rule: TrayRule::default(),
            weights: HeuristicWeights::default(),
        }
    }
}

impl SolverConfig {
    /// Replaces zero budgets with their defaults.
    pub fn normalized(self) -> Self {
        fn or_default(value: usize, default: usize) -> usize {
            if value == 0 {
                default
            } else {
                value
            }
        }
        Self {
            beam_width: or_default(self.beam_width, DEFAULT_BEAM_WIDTH),
            max_expansions: or_default(self.max_expansions, DEFAULT_MAX_EXPANSIONS),
            max_depth: or_default(self.max_depth, DEFAULT_MAX_DEPTH),
            ..self
        }
    }
}

/// One state in the search. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub board: Board,
    pub tray: Tray,
    pub score: i64,
    pub path: Vec<usize>,
    pub signature: Signature,
}

impl SearchNode {
    pub fn root(board: Board) -> Self {
        let tray = Tray::new();
        let signature = Signature::of(&board, &tray);
        SearchNode {
            board,
            tray,
            score: 0,
            path: Vec::new(),
            signature,
        }
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Board has no pieces left and the tray is empty.
    pub fn is_solved(&self) -> bool {
        self.tray.is_empty() && self.board.is_cleared()
    }
}

/// Why the search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Solved,
    DepthLimit,
    ExpansionBudget,
    FrontierExhausted,
}

/// Counters reported with every outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub expansions_used: usize,
    /// Highest cumulative score of any state generated, including the root.
    pub best_score: i64,
    pub time_ms: u64,
    pub beam_width: usize,
    /// Number of picks in the solution, when one was found.
    pub solution_depth: Option<usize>,
    /// Deepest frontier the search produced.
    pub depth_reached: usize,
    pub pruned_overflow: usize,
    pub pruned_transpositions: usize,
    pub termination: Termination,
}

/// Answer of a solve call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveOutcome {
    Solvable {
        winning_moves: Vec<usize>,
        stats: SearchStats,
    },
    /// No solution found within budget.
    Unsolvable { stats: SearchStats },
}

impl SolveOutcome {
    pub fn is_solvable(&self) -> bool {
        matches!(self, SolveOutcome::Solvable { .. })
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveOutcome::Solvable { stats, .. } | SolveOutcome::Unsolvable { stats } => stats,
        }
    }

    pub fn winning_moves(&self) -> Option<&[usize]> {
        match self {
            SolveOutcome::Solvable { winning_moves, .. } => Some(winning_moves),
            SolveOutcome::Unsolvable { .. } => None,
        }
    }

    /// Writes the outcome as pretty-printed JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

/// Running totals for one search.
#[derive(Debug, Default)]
struct Counters {
    expansions: usize,
    best_score: i64,
    pruned_overflow: usize,
    pruned_transpositions: usize,
    budget_exhausted: bool,
}

impl Counters {
    fn stats(
        &self,
        config: &SolverConfig,
        started: Instant,
        depth: usize,
        solution_depth: Option<usize>,
        termination: Termination,
    ) -> SearchStats {
        SearchStats {
            expansions_used: self.expansions,
            best_score: self.best_score,
            time_ms: started.elapsed().as_millis() as u64,
            beam_width: config.beam_width,
            solution_depth,
            depth_reached: depth,
            pruned_overflow: self.pruned_overflow,
            pruned_transpositions: self.pruned_transpositions,
            termination,
        }
    }
}

/// Beam search over pick sequences.
pub struct BeamSolver {
    config: SolverConfig,
}

impl BeamSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve<S>(&self, initial_board: &Board, positions: &S) -> SolveOutcome
    where
        S: SelectablePositions + ?Sized,
    {
        let started = Instant::now();
        let config = &self.config;

        let mut index = TranspositionIndex::new();
        let mut frontier = vec![SearchNode::root(initial_board.clone())];
        let mut counters = Counters::default();
        let mut depth = 0usize;

        let termination = loop {
            if let Some(solved) = frontier.iter().find(|n| n.is_solved()) {
                info!(
                    depth = solved.depth(),
                    expansions = counters.expansions,
                    best_score = counters.best_score,
                    "solution found"
                );
                return SolveOutcome::Solvable {
                    winning_moves: solved.path.clone(),
                    stats: counters.stats(
                        config,
                        started,
                        depth,
                        Some(solved.depth()),
                        Termination::Solved,
                    ),
                };
            }
            if frontier.is_empty() {
                break if counters.budget_exhausted {
                    Termination::ExpansionBudget
                } else {
                    Termination::FrontierExhausted
                };
            }
            if depth >= config.max_depth {
                break Termination::DepthLimit;
            }
            if counters.budget_exhausted {
                break Termination::ExpansionBudget;
            }

            frontier = self.expand(&frontier, positions, &mut index, &mut counters);
            depth += 1;
            debug!(
                depth,
                frontier = frontier.len(),
                expansions = counters.expansions,
                best = ?frontier.first().map(|n| n.score),
                "beam advanced"
            );
        };

        info!(
            ?termination,
            expansions = counters.expansions,
            best_score = counters.best_score,
            "no solution within budget"
        );
        SolveOutcome::Unsolvable {
            stats: counters.stats(config, started, depth, None, termination),
        }
    }

    /// Builds the next frontier: every admitted child of `frontier`, best first, cut to the
    /// beam width.
    ///
    /// A child that beats an earlier child with the same signature takes its place, so no
    /// signature appears twice. When the budget runs out part way, the children built so
    /// far still form the result.
    fn expand<S>(
        &self,
        frontier: &[SearchNode],
        positions: &S,
        index: &mut TranspositionIndex,
        counters: &mut Counters,
    ) -> Vec<SearchNode>
    where
        S: SelectablePositions + ?Sized,
    {
        let config = &self.config;
        let mut candidates: Vec<SearchNode> = Vec::new();
        let mut slots: FxHashMap<Signature, usize> = FxHashMap::default();

        'frontier: for node in frontier {
            let remaining_before = node.board.remaining();

            for pos in positions.selectable(&node.board) {
                if node.board.get(pos).is_none() {
                    continue;
                }
                if counters.expansions >= config.max_expansions {
                    counters.budget_exhausted = true;
                    break 'frontier;
                }
                counters.expansions += 1;

                let Some(pick) = apply_pick(&node.board, &node.tray, pos, config.tray_rule) else {
                    continue;
                };
                let tray = pick.resolution.tray;
                if tray.exceeds_capacity() {
                    counters.pruned_overflow += 1;
                    continue;
                }

                let increment = score_transition(
                    &Transition {
                        board: &pick.board,
                        tray: &tray,
                        tray_before: &node.tray,
                        remaining_before,
                        remaining_after: pick.board.remaining(),
                        cleared_count: pick.resolution.cleared_count,
                    },
                    &config.weights,
                );
                let score = node.score + increment;
                counters.best_score = counters.best_score.max(score);

                let signature = Signature::of(&pick.board, &tray);
                if !index.admit(&signature, score, tray.len()) {
                    trace!(pos, score, "transposition pruned");
                    counters.pruned_transpositions += 1;
                    continue;
                }

                let mut path = node.path.clone();
                path.push(pos);
                let child = SearchNode {
                    board: pick.board,
                    tray,
                    score,
                    path,
                    signature,
                };
                match slots.get(&child.signature) {
                    Some(&slot) => candidates[slot] = child,
                    None => {
                        slots.insert(child.signature.clone(), candidates.len());
                        candidates.push(child);
                    }
                }
            }
        }

        // Stable: equal scores keep generation order.
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(config.beam_width);
        candidates
    }
}

/// Decides whether `initial_board` can be cleared within the budget in `config`.
///
/// # Examples
/// ```
/// use trio_solver::engine::Board;
/// use trio_solver::layout::Layout;
/// use trio_solver::solver::{is_solvable, SolverConfig};
///
/// let board = Board::from_values(&[0, 0, 0]);
/// let outcome = is_solvable(&board, &Layout::flat(3), &SolverConfig::default());
/// assert!(outcome.is_solvable());
/// assert_eq!(outcome.winning_moves().map(|m| m.len()), Some(3));
/// ```
pub fn is_solvable<S>(initial_board: &Board, positions: &S, config: &SolverConfig) -> SolveOutcome
where
    S: SelectablePositions + ?Sized,
{
    BeamSolver::new(*config).solve(initial_board, positions)
}

/// Reasons a recorded move list fails to clear its board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("move {step}: position {pos} is not selectable")]
    NotSelectable { step: usize, pos: usize },
    #[error("move {step}: position {pos} is empty")]
    EmptyPosition { step: usize, pos: usize },
    #[error("move {step}: tray overflowed with {len} pieces")]
    TrayOverflow { step: usize, len: usize },
    #[error("moves ended with {remaining} pieces on the board and {tray} in the tray")]
    NotCleared { remaining: usize, tray: usize },
}

/// Replays `moves` from `initial_board` and checks they clear it.
pub fn verify_solution<S>(
    initial_board: &Board,
    positions: &S,
    moves: &[usize],
    rule: TrayRule,
) -> Result<(), ReplayError>
where
    S: SelectablePositions + ?Sized,
{
    let mut board = initial_board.clone();
    let mut tray = Tray::new();

    for (step, &pos) in moves.iter().enumerate() {
        if !positions.selectable(&board).contains(&pos) {
            return Err(ReplayError::NotSelectable { step, pos });
        }
        let pick =
            apply_pick(&board, &tray, pos, rule).ok_or(ReplayError::EmptyPosition { step, pos })?;
        if pick.resolution.tray.exceeds_capacity() {
            return Err(ReplayError::TrayOverflow {
                step,
                len: pick.resolution.tray.len(),
            });
        }
        board = pick.board;
        tray = pick.resolution.tray;
    }

    if board.is_cleared() && tray.is_empty() {
        Ok(())
    } else {
        Err(ReplayError::NotCleared {
            remaining: board.remaining(),
            tray: tray.len(),
        })
    }
}
