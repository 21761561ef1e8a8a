//! Outcomes written as JSON keep the fields downstream tooling reads.
use std::fs;
use trio_solver::engine::Board;
use trio_solver::layout::Layout;
use trio_solver::solver::{is_solvable, SolveOutcome, SolverConfig};

#[test]
fn test_export_solvable_outcome() {
    let board = Board::from_values(&[1, 1, 1, 2, 2, 2]);
    let outcome = is_solvable(&board, &Layout::flat(6), &SolverConfig::default());
    assert!(outcome.is_solvable());

    let path = std::env::temp_dir().join("trio_solver_solvable.outcome.json");
    outcome.to_json_file(&path).expect("Failed to write JSON");

    let json_content = fs::read_to_string(&path).expect("Failed to read JSON file");
    let parsed: serde_json::Value = serde_json::from_str(&json_content).expect("Failed to parse JSON");

    assert_eq!(parsed["status"], "solvable");
    assert_eq!(parsed["winning_moves"].as_array().map(|m| m.len()), Some(6));
    assert!(parsed["stats"]["expansions_used"].is_number());
    assert!(parsed["stats"]["time_ms"].is_number());
    assert_eq!(parsed["stats"]["beam_width"], 100);
    assert_eq!(parsed["stats"]["solution_depth"], 6);
    assert_eq!(parsed["stats"]["termination"], "solved");

    let restored: SolveOutcome = serde_json::from_str(&json_content).expect("Failed to deserialize");
    assert_eq!(restored, outcome);

    fs::remove_file(&path).ok();
}

#[test]
fn test_export_unsolvable_outcome() {
    let board = Board::from_values(&[0, 1, 2, 3, 4, 5, 6, 7]);
    let outcome = is_solvable(&board, &Layout::flat(8), &SolverConfig::default());

    let json = serde_json::to_value(&outcome).expect("Failed to serialize");
    assert_eq!(json["status"], "unsolvable");
    assert!(json.get("winning_moves").is_none());
    assert!(json["stats"]["solution_depth"].is_null());
}
