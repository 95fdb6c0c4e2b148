use std::collections::HashSet;
use std::fmt;
use crate::board::{on_board, Board, Color, Piece, PieceType, Square, HEIGHT, WIDTH};

const START_RANK_WHITE: usize = 6;
const START_RANK_BLACK: usize = 1;

/// Why a move attempt was turned down. Checks run in the order of the variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    OffBoard,
    EmptySource,
    OwnPieceAtDestination,
    IllegalGeometry(PieceType),
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::OffBoard => write!(f, "square is outside the board"),
            MoveRejection::EmptySource => write!(f, "no piece on the source square"),
            MoveRejection::OwnPieceAtDestination => write!(f, "destination holds a piece of the same color"),
            MoveRejection::IllegalGeometry(kind) => write!(f, "{:?} cannot move that way", kind),
        }
    }
}

impl std::error::Error for MoveRejection {}

fn pawn_move(board: &Board, color: Color, from: Square, to: Square) -> bool {
    let (direction, start_rank): (i8, usize) = match color {
        Color::White => (-1, START_RANK_WHITE),
        Color::Black => (1, START_RANK_BLACK),
    };
    let (from_row, from_col) = (from.0 as i8, from.1 as i8);
    let (to_row, to_col) = (to.0 as i8, to.1 as i8);
    let destination_empty = board.squares[to.0][to.1].is_none();

    if from_col == to_col && destination_empty {
        if to_row == from_row + direction {
            return true;
        }
        let intervening = (from_row + direction) as usize;
        if from.0 == start_rank && to_row == from_row + 2 * direction && board.squares[intervening][from.1].is_none() {
            return true;
        }
    }

    // diagonal steps only capture
    (from_col - to_col).abs() == 1 && to_row == from_row + direction && !destination_empty
}

/// Per-kind movement rule. Sliding pieces are not blocked by pieces standing in between.
fn geometry(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    let row_diff = from.0.abs_diff(to.0);
    let col_diff = from.1.abs_diff(to.1);
    match piece.kind {
        PieceType::Pawn => pawn_move(board, piece.color, from, to),
        PieceType::Rook => from.0 == to.0 || from.1 == to.1,
        PieceType::Knight => (row_diff == 2 && col_diff == 1) || (row_diff == 1 && col_diff == 2),
        PieceType::Bishop => row_diff == col_diff,
        PieceType::Queen => from.0 == to.0 || from.1 == to.1 || row_diff == col_diff,
        PieceType::King => row_diff <= 1 && col_diff <= 1,
    }
}

/// Returns the piece that would move when `from -> to` is allowed.
pub fn check_move(board: &Board, from: Square, to: Square) -> Result<Piece, MoveRejection> {
    if !on_board(from) || !on_board(to) {
        return Err(MoveRejection::OffBoard);
    }
    let piece = board.piece_at(from).ok_or(MoveRejection::EmptySource)?;
    if board.piece_at(to).is_some_and(|target| target.color == piece.color) {
        return Err(MoveRejection::OwnPieceAtDestination);
    }
    if !geometry(board, piece, from, to) {
        return Err(MoveRejection::IllegalGeometry(piece.kind));
    }
    Ok(piece)
}

pub fn is_valid_move(board: &Board, from: Square, to: Square) -> bool {
    check_move(board, from, to).is_ok()
}

pub fn legal_moves(board: &Board, row: usize, col: usize) -> HashSet<Square> {
    (0 .. HEIGHT)
        .flat_map(|r| (0 .. WIDTH).map(move |c| (r, c)))
        .filter(|&to| is_valid_move(board, (row, col), to))
        .collect()
}
