//! Property tests for the solver.
//!
//! Boards are random shuffles of whole triples. Two collaborators are used: a flat one
//! where every piece is always selectable, and a stacked one where a piece is blocked
//! while the slot three positions further along still holds a piece.
use proptest::prelude::*;
use trio_solver::engine::{resolve, Board, PieceType, TrayRule};
use trio_solver::layout::Layout;
use trio_solver::solver::{is_solvable, verify_solution, SolveOutcome, SolverConfig};

fn stacked(board: &Board) -> Vec<usize> {
    (0..board.len())
        .filter(|&i| board.get(i).is_some() && board.get(i + 3).is_none())
        .collect()
}

fn triple_board(max_triples: usize) -> impl Strategy<Value = Vec<i64>> {
    (1usize..=max_triples, 1u16..=5).prop_flat_map(|(triples, types)| {
        let pieces: Vec<i64> = (0..triples)
            .flat_map(|i| std::iter::repeat((i as u16 % types) as i64).take(3))
            .collect();
        Just(pieces).prop_shuffle()
    })
}

fn rule() -> impl Strategy<Value = TrayRule> {
    prop_oneof![Just(TrayRule::Append), Just(TrayRule::Clustered)]
}

proptest! {
    #[test]
    fn winning_moves_replay_on_flat_boards(values in triple_board(3), tray_rule in rule()) {
        let board = Board::from_values(&values);
        let layout = Layout::flat(board.len());
        let config = SolverConfig { tray_rule, ..SolverConfig::default() };

        let outcome = is_solvable(&board, &layout, &config);
        // With at most three types the tray never holds more than six pieces.
        let moves = outcome.winning_moves().expect("small flat boards always clear");
        prop_assert_eq!(moves.len(), board.remaining());
        prop_assert_eq!(verify_solution(&board, &layout, moves, tray_rule), Ok(()));
    }

    #[test]
    fn winning_moves_replay_on_stacked_boards(values in triple_board(5), tray_rule in rule()) {
        let board = Board::from_values(&values);
        let config = SolverConfig { tray_rule, ..SolverConfig::default() };

        if let SolveOutcome::Solvable { winning_moves, stats } = is_solvable(&board, &stacked, &config) {
            prop_assert_eq!(stats.solution_depth, Some(winning_moves.len()));
            prop_assert_eq!(verify_solution(&board, &stacked, &winning_moves, tray_rule), Ok(()));
        }
    }

    #[test]
    fn expansions_never_exceed_budget(values in triple_board(5), budget in 1usize..60) {
        let board = Board::from_values(&values);
        let config = SolverConfig { max_expansions: budget, ..SolverConfig::default() };
        let outcome = is_solvable(&board, &stacked, &config);
        prop_assert!(outcome.stats().expansions_used <= budget);
    }

    #[test]
    fn deeper_limit_keeps_solutions(values in triple_board(5), depth in 1usize..16) {
        let board = Board::from_values(&values);
        let shallow = SolverConfig { max_depth: depth, ..SolverConfig::default() };
        let deep = SolverConfig { max_depth: depth + 5, ..SolverConfig::default() };

        if is_solvable(&board, &stacked, &shallow).is_solvable() {
            prop_assert!(is_solvable(&board, &stacked, &deep).is_solvable());
        }
    }

    #[test]
    fn larger_budget_keeps_unexhausted_solutions(values in triple_board(5), budget in 1usize..80) {
        let board = Board::from_values(&values);
        let small = SolverConfig { max_expansions: budget, ..SolverConfig::default() };
        let large = SolverConfig { max_expansions: budget * 2, ..SolverConfig::default() };

        let first = is_solvable(&board, &stacked, &small);
        if first.is_solvable() && first.stats().expansions_used < budget {
            let second = is_solvable(&board, &stacked, &large);
            prop_assert_eq!(first.winning_moves(), second.winning_moves());
        }
    }

    #[test]
    fn resolution_leaves_no_qualifying_type(pieces in prop::collection::vec(0u16..4, 0..12)) {
        let r = resolve(&pieces);
        prop_assert_eq!(r.cleared_count + r.tray.len(), pieces.len());
        for t in r.tray.distinct_types() {
            prop_assert!(r.tray.count_of(t) < 3);
        }
        let again = resolve(r.tray.pieces());
        prop_assert_eq!(again.tray, r.tray);
    }
}

#[test]
fn three_identical_pieces_clear() {
    let board = Board::from_values(&[0, 0, 0]);
    let outcome = is_solvable(&board, &Layout::flat(3), &SolverConfig::default());
    let moves = outcome.winning_moves().expect("solvable").to_vec();
    let mut sorted = moves.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2]);
    assert!(outcome.stats().best_score >= 100);
}

#[test]
fn eight_distinct_pieces_never_clear() {
    let values: Vec<i64> = (0..8).collect();
    let board = Board::from_values(&values);
    let outcome = is_solvable(&board, &Layout::flat(8), &SolverConfig::default());
    assert!(!outcome.is_solvable());
}

// Beam width is not monotonic in general: with the stacked collaborator,
// [2,4,3,4,0,1,3,2,0,2,1,3,1,4,0] clears at width 1 but not at width 2, because the
// wider beam keeps a higher-scoring state that pushes the winning one out. Only small
// flat boards, which every width can clear, are pinned here.
#[test]
fn wider_beam_still_solves_flat_boards() {
    let values = [0, 1, 2, 0, 1, 2, 0, 1, 2];
    let board = Board::from_values(&values);
    let layout = Layout::flat(values.len());
    for beam_width in [1, 2, 5, 50, 100, 500] {
        let config = SolverConfig {
            beam_width,
            max_expansions: 200_000,
            ..SolverConfig::default()
        };
        assert!(
            is_solvable(&board, &layout, &config).is_solvable(),
            "beam width {} failed",
            beam_width
        );
    }
}

#[test]
fn tie_break_prefers_smallest_type() {
    let pieces: [PieceType; 6] = [2, 2, 2, 0, 0, 0];
    let r = resolve(&pieces);
    assert_eq!(r.cleared_types, vec![0, 2]);
}
