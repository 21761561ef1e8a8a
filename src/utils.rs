use crate::engine::{Board, PieceType};
use crate::layout::{Cell, Layout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized slot value '{token}' at position {pos}")]
    BadToken { token: String, pos: usize },
    #[error("piece type {value} at position {pos} is out of range (max {})", PieceType::MAX)]
    PieceOutOfRange { value: i64, pos: usize },
    #[error("level has {cells} cells but {slots} board slots")]
    LengthMismatch { cells: usize, slots: usize },
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a board from whitespace- or comma-separated slot values.
///
/// Each token is a piece type in `0..=PieceType::MAX`, `-1`, or `.` for an empty slot.
///
/// # Examples
/// ```
/// use trio_solver::utils::board_from_str;
///
/// let board = board_from_str("0 1, . 2\n-1").unwrap();
/// assert_eq!(board.to_values(), vec![0, 1, -1, 2, -1]);
///
/// assert!(board_from_str("0 x 1").is_err());
/// ```
pub fn board_from_str(s: &str) -> Result<Board, ParseError> {
    let mut values = Vec::new();
    for (pos, token) in s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        let value = match token {
            "." => -1,
            _ => match token.parse::<i64>() {
                Ok(v) if v > PieceType::MAX as i64 => {
                    return Err(ParseError::PieceOutOfRange { value: v, pos })
                }
                Ok(v) if v >= -1 => v,
                _ => {
                    return Err(ParseError::BadToken {
                        token: token.to_string(),
                        pos,
                    })
                }
            },
        };
        values.push(value);
    }
    Ok(Board::from_values(&values))
}

/// On-disk level: tile geometry plus the piece in every slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    pub cells: Vec<Cell>,
    pub board: Vec<i64>,
}

impl LevelFile {
    pub fn new(layout: &Layout, board: &Board) -> Self {
        LevelFile {
            cells: layout.cells().to_vec(),
            board: board.to_values(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let level: LevelFile = serde_json::from_str(json)?;
        if level.cells.len() != level.board.len() {
            return Err(ParseError::LengthMismatch {
                cells: level.cells.len(),
                slots: level.board.len(),
            });
        }
        if let Some((pos, &value)) = level
            .board
            .iter()
            .enumerate()
            .find(|&(_, &v)| v > PieceType::MAX as i64)
        {
            return Err(ParseError::PieceOutOfRange { value, pos });
        }
        Ok(level)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Splits the level into the solver's inputs.
    pub fn into_parts(self) -> (Layout, Board) {
        (Layout::new(self.cells), Board::from_values(&self.board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_mixed_separators() {
        let board = board_from_str(" 3,3 ,3\t.\n").unwrap();
        assert_eq!(board.to_values(), vec![3, 3, 3, -1]);
    }

    #[test]
    fn test_board_from_str_rejects_bad_tokens() {
        match board_from_str("0 -2") {
            Err(ParseError::BadToken { token, pos }) => {
                assert_eq!(token, "-2");
                assert_eq!(pos, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(board_from_str("0 a").is_err());
    }

    #[test]
    fn test_board_from_str_rejects_types_past_the_piece_range() {
        match board_from_str("65535 70000 80000") {
            Err(ParseError::PieceOutOfRange { value, pos }) => {
                assert_eq!(value, 70000);
                assert_eq!(pos, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        let board = board_from_str("65535").unwrap();
        assert_eq!(board.get(0), Some(PieceType::MAX));
    }

    #[test]
    fn test_board_from_str_empty_input() {
        let board = board_from_str("").unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn test_level_file_round_trip_through_parts() {
        let json = r#"{
            "cells": [
                {"layer": 0, "col": 0, "row": 0},
                {"layer": 1, "col": 1, "row": 0}
            ],
            "board": [4, -1]
        }"#;
        let level = LevelFile::from_json(json).unwrap();
        let (layout, board) = level.clone().into_parts();
        assert_eq!(layout.len(), 2);
        assert_eq!(board.get(0), Some(4));
        assert_eq!(LevelFile::new(&layout, &board), level);
    }

    #[test]
    fn test_level_file_length_mismatch() {
        let json = r#"{"cells": [{"layer": 0, "col": 0, "row": 0}], "board": [1, 2]}"#;
        assert!(matches!(
            LevelFile::from_json(json),
            Err(ParseError::LengthMismatch { cells: 1, slots: 2 })
        ));
        assert!(matches!(
            LevelFile::from_json("not json"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_level_file_rejects_types_past_the_piece_range() {
        let json = r#"{
            "cells": [
                {"layer": 0, "col": 0, "row": 0},
                {"layer": 0, "col": 2, "row": 0},
                {"layer": 0, "col": 4, "row": 0}
            ],
            "board": [65535, 70000, 80000]
        }"#;
        assert!(matches!(
            LevelFile::from_json(json),
            Err(ParseError::PieceOutOfRange {
                value: 70000,
                pos: 1
            })
        ));
    }
}
