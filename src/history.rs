use std::fmt;
use std::str::FromStr;
use serde::{Deserializer, Serializer};
use crate::board::{new_board, on_board, Board, Color, Square, HEIGHT};

/// A completed move. Its text form, `"e2 to e4"`, is the only thing kept of past moves;
/// positions are always recomputed from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    MissingSeparator(String),
    InvalidSquare(String),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoveError::MissingSeparator(text) => write!(f, "expected \"<from> to <to>\", got {:?}", text),
            ParseMoveError::InvalidSquare(text) => write!(f, "invalid square {:?}", text),
        }
    }
}

impl std::error::Error for ParseMoveError {}

pub fn square_name(square: Square) -> String {
    let file = (b'a' + square.1 as u8) as char;
    format!("{}{}", file, HEIGHT - square.0)
}

pub fn parse_square(text: &str) -> Result<Square, ParseMoveError> {
    let invalid = || ParseMoveError::InvalidSquare(text.to_string());
    let mut chars = text.chars();
    let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
        (Some(file), Some(rank), None) => (file, rank),
        _ => return Err(invalid()),
    };
    if !('a'..='h').contains(&file) {
        return Err(invalid());
    }
    let rank = rank.to_digit(10).filter(|r| (1..=8).contains(r)).ok_or_else(invalid)?;
    let square = (HEIGHT - rank as usize, file as usize - 'a' as usize);
    debug_assert!(on_board(square));
    Ok(square)
}

impl MoveRecord {
    pub fn new(from: Square, to: Square) -> Self {
        MoveRecord { from, to }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", square_name(self.from), square_name(self.to))
    }
}

impl FromStr for MoveRecord {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s.split_once(" to ")
            .ok_or_else(|| ParseMoveError::MissingSeparator(s.to_string()))?;
        Ok(MoveRecord::new(parse_square(from)?, parse_square(to)?))
    }
}

impl serde::Serialize for MoveRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for MoveRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Scores {
    pub white: u32,
    pub black: u32,
}

impl Scores {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn add(&mut self, color: Color, points: u32) {
        match color {
            Color::White => self.white += points,
            Color::Black => self.black += points,
        }
    }
}

/// Rebuilds board and scores by applying `records` to the initial position. Captures are
/// credited to the owner of the moving piece as found on the replay board.
pub fn replay(records: &[MoveRecord]) -> (Board, Scores) {
    let mut board = new_board();
    let mut scores = Scores::default();
    for record in records {
        let mover = board.piece_at(record.from);
        let captured = board.make_move(record.from, record.to);
        if let (Some(mover), Some(captured)) = (mover, captured) {
            scores.add(mover.color, captured.kind.value());
        }
    }
    (board, scores)
}
