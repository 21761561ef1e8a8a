//! Core state model for the triple-matching puzzle.
//!
//! This module defines the pieces the solver pushes around:
//! - `Board`: the fixed-length sequence of slots, each holding a piece type or nothing.
//! - `Tray`: the capacity-bounded staging area that picked pieces land in.
//! - `Signature`: the byte encoding of a (board, tray) pair used as a lookup key.
//! - `resolve` / `resolve_adjacent`: the auto-clearing rules applied after every pick.
//! - `apply_pick`: the pure "pick one slot" transition used by the search.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a piece type. Types are small non-negative integers.
pub type PieceType = u16;

/// Maximum number of pieces the tray may hold once resolution has run.
pub const TRAY_CAPACITY: usize = 7;

/// Number of identical pieces that clear each other from the tray.
pub const MATCH_SIZE: usize = 3;

/// The playfield as an ordered sequence of slots.
///
/// A slot's identity is its index. Slots never move; picking a piece just empties its slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    slots: Vec<Option<PieceType>>,
}

impl Board {
    /// Builds a board from raw slot values.
    ///
    /// Any negative value (canonically `-1`) is the empty sentinel. Values larger than
    /// `PieceType::MAX` are clamped, which merges them into one type; text and level-file
    /// input goes through `utils`, which rejects them instead.
    ///
    /// # Examples
    /// ```
    /// use trio_solver::engine::Board;
    /// let board = Board::from_values(&[0, -1, 2]);
    /// assert_eq!(board.get(0), Some(0));
    /// assert_eq!(board.get(1), None);
    /// assert_eq!(board.remaining(), 2);
    /// ```
    pub fn from_values(values: &[i64]) -> Self {
        let slots = values
            .iter()
            .map(|&v| {
                if v < 0 {
                    None
                } else {
                    Some(v.min(PieceType::MAX as i64) as PieceType)
                }
            })
            .collect();
        Board { slots }
    }

    /// Builds a board directly from slot contents.
    pub fn from_slots(slots: Vec<Option<PieceType>>) -> Self {
        Board { slots }
    }

    /// Converts the board back into raw values, using `-1` for empty slots.
    pub fn to_values(&self) -> Vec<i64> {
        self.slots
            .iter()
            .map(|s| s.map_or(-1, |p| p as i64))
            .collect()
    }

    /// Returns the piece at `pos`, or `None` when the slot is empty or out of range.
    pub fn get(&self, pos: usize) -> Option<PieceType> {
        self.slots.get(pos).copied().flatten()
    }

    /// Removes and returns the piece at `pos`.
    ///
    /// Out-of-range and already-empty positions are no-ops that return `None`.
    pub fn take(&mut self, pos: usize) -> Option<PieceType> {
        self.slots.get_mut(pos).and_then(Option::take)
    }

    pub fn slots(&self) -> &[Option<PieceType>] {
        &self.slots
    }

    /// Number of slots, empty or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots still holding a piece.
    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// `true` once every slot is empty.
    pub fn is_cleared(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl fmt::Display for Board {
    /// Slots separated by spaces, `.` for an empty slot.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match slot {
                Some(p) => write!(f, "{}", p)?,
                None => write!(f, ".")?,
            }
        }
        Ok(())
    }
}

/// How a picked piece enters the tray and how the tray clears itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrayRule {
    /// Append at the end; clear the three earliest occurrences of any type reaching three,
    /// smallest type identifier first.
    #[default]
    Append,
    /// Insert right after the latest occurrence of the same type; clear only three
    /// consecutive identical entries. This mirrors the tray the player sees.
    Clustered,
}

impl TrayRule {
    /// Runs the clearing rule that matches this insertion policy.
    pub fn resolve(self, pieces: &[PieceType]) -> Resolution {
        match self {
            TrayRule::Append => resolve(pieces),
            TrayRule::Clustered => resolve_adjacent(pieces),
        }
    }
}

/// The staging area. Insertion order matters for later resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tray {
    pieces: Vec<PieceType>,
}

impl Tray {
    pub fn new() -> Self {
        Tray { pieces: Vec::new() }
    }

    pub fn from_pieces(pieces: Vec<PieceType>) -> Self {
        Tray { pieces }
    }

    pub fn pieces(&self) -> &[PieceType] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// `true` when the tray holds more than `TRAY_CAPACITY` pieces.
    pub fn exceeds_capacity(&self) -> bool {
        self.pieces.len() > TRAY_CAPACITY
    }

    pub fn count_of(&self, piece: PieceType) -> usize {
        self.pieces.iter().filter(|&&p| p == piece).count()
    }

    pub fn contains(&self, piece: PieceType) -> bool {
        self.pieces.contains(&piece)
    }

    /// Distinct piece types in ascending order.
    pub fn distinct_types(&self) -> Vec<PieceType> {
        let mut types = self.pieces.clone();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Places `piece` in the tray according to `rule`. No resolution happens here.
    pub fn insert(&mut self, piece: PieceType, rule: TrayRule) {
        match rule {
            TrayRule::Append => self.pieces.push(piece),
            TrayRule::Clustered => match self.pieces.iter().rposition(|&p| p == piece) {
                Some(last) => self.pieces.insert(last + 1, piece),
                None => self.pieces.push(piece),
            },
        }
    }
}

/// Outcome of running a clearing rule over a tray.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The tray after every qualifying triple has been removed.
    pub tray: Tray,
    /// Total number of pieces removed (always a multiple of three).
    pub cleared_count: usize,
    /// Piece type of each removed triple, in clearing order.
    pub cleared_types: Vec<PieceType>,
}

/// Clears triples from a tray under the append rule.
///
/// While some type occurs at least three times, the qualifying type with the smallest
/// identifier loses its three earliest occurrences. Each pass shortens the tray by three,
/// so at most `len / 3` passes run.
///
/// # Examples
/// ```
/// use trio_solver::engine::resolve;
/// let r = resolve(&[1, 1, 1, 1]);
/// assert_eq!(r.tray.pieces(), &[1]);
/// assert_eq!(r.cleared_count, 3);
/// assert_eq!(r.cleared_types, vec![1]);
/// ```
pub fn resolve(pieces: &[PieceType]) -> Resolution {
    let mut tray = pieces.to_vec();
    let mut cleared_types = Vec::new();

    loop {
        // Ascending type order decides ties between qualifying types.
        let mut candidates = tray.clone();
        candidates.sort_unstable();
        candidates.dedup();
        let qualifying = candidates
            .into_iter()
            .find(|&t| tray.iter().filter(|&&p| p == t).count() >= MATCH_SIZE);

        let Some(target) = qualifying else {
            break;
        };

        let mut removed = 0;
        tray.retain(|&p| {
            if p == target && removed < MATCH_SIZE {
                removed += 1;
                false
            } else {
                true
            }
        });
        cleared_types.push(target);
    }

    Resolution {
        cleared_count: cleared_types.len() * MATCH_SIZE,
        tray: Tray::from_pieces(tray),
        cleared_types,
    }
}

/// Clears triples from a tray under the clustered rule.
///
/// Only runs of three consecutive identical pieces clear; the leftmost run goes first and
/// the scan restarts after every removal.
pub fn resolve_adjacent(pieces: &[PieceType]) -> Resolution {
    let mut tray = pieces.to_vec();
    let mut cleared_types = Vec::new();

    while let Some(start) = tray
        .windows(MATCH_SIZE)
        .position(|w| w.iter().all(|&p| p == w[0]))
    {
        cleared_types.push(tray[start]);
        tray.drain(start..start + MATCH_SIZE);
    }

    Resolution {
        cleared_count: cleared_types.len() * MATCH_SIZE,
        tray: Tray::from_pieces(tray),
        cleared_types,
    }
}

/// Byte-exact, order-preserving encoding of a board and a tray.
///
/// Each slot is a big-endian `u16` (`0` for empty, `type + 1` otherwise), followed by the
/// tray length and then every tray piece, also as big-endian `u16`. Two trays holding the
/// same pieces in a different order never share a signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn of(board: &Board, tray: &Tray) -> Self {
        let mut bytes = Vec::with_capacity((board.len() + tray.len() + 1) * 2);
        for slot in board.slots() {
            let code = slot.map_or(0u16, |p| p.saturating_add(1));
            bytes.extend_from_slice(&code.to_be_bytes());
        }
        bytes.extend_from_slice(&(tray.len() as u16).to_be_bytes());
        for &p in tray.pieces() {
            bytes.extend_from_slice(&p.to_be_bytes());
        }
        Signature(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// The result of picking one slot: new board, resolved tray and what got cleared.
#[derive(Clone, Debug)]
pub struct Pick {
    pub piece: PieceType,
    pub board: Board,
    pub resolution: Resolution,
}

/// Picks the piece at `pos`, inserts it into `tray` and resolves.
///
/// Returns `None` for an empty or out-of-range position. The inputs are left untouched.
pub fn apply_pick(board: &Board, tray: &Tray, pos: usize, rule: TrayRule) -> Option<Pick> {
    let mut next_board = board.clone();
    let piece = next_board.take(pos)?;

    let mut staged = tray.clone();
    staged.insert(piece, rule);
    let resolution = rule.resolve(staged.pieces());

    Some(Pick {
        piece,
        board: next_board,
        resolution,
    })
}
