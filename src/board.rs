use serde::Serializer;

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;

/// A board coordinate as `(row, col)`. Row 0 is black's back rank, row 7 is white's.
pub type Square = (usize, usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Points awarded to the side that captures a piece of this kind.
    pub fn value(&self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White, Black
}

impl Color {
    pub fn opposite(&self) -> Color {
        if self == &Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Piece>; WIDTH]; HEIGHT],
}

impl Board {
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if on_board(square) {
            self.squares[square.0][square.1]
        } else {
            None
        }
    }

    /// Moves whatever stands on `move_from` to `move_to` and returns the piece that was
    /// standing on `move_to` before. No rule is checked here.
    pub fn make_move(&mut self, move_from: Square, move_to: Square) -> Option<Piece> {
        let piece = self.squares[move_from.0][move_from.1].take();
        std::mem::replace(&mut self.squares[move_to.0][move_to.1], piece)
    }
}

pub fn on_board(square: Square) -> bool {
    square.0 < HEIGHT && square.1 < WIDTH
}

pub fn piece_icon(piece: &Piece) -> char {
    let icon = match piece.kind {
        PieceType::King => 'k',
        PieceType::Queen => 'q',
        PieceType::Rook => 'r',
        PieceType::Bishop => 'b',
        PieceType::Knight => 'n',
        PieceType::Pawn => 'p',
    };
    match piece.color {
        Color::White => icon.to_ascii_uppercase(),
        Color::Black => icon,
    }
}

/// Renders the board row by row, starting with black's back rank. Upper case letters are
/// white pieces, lower case black ones, a space is an empty square.
pub fn to_string(board: &Board) -> String {
    board.squares.iter()
        .map(|row| row.iter()
            .map(|square| match square {
                None => ' ',
                Some(p) => piece_icon(p),
            })
            .collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

impl serde::Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str(to_string(self).as_str())
    }
}

fn new_pieces(color: Color) -> [Option<Piece>; WIDTH] {
    [
        Some(Piece::new(color, PieceType::Rook)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Queen)),
        Some(Piece::new(color, PieceType::King)),
        Some(Piece::new(color, PieceType::Bishop)),
        Some(Piece::new(color, PieceType::Knight)),
        Some(Piece::new(color, PieceType::Rook))
    ]
}

fn new_pawns(color: Color) -> [Option<Piece>; WIDTH] {
    [Some(Piece::new(color, PieceType::Pawn)); WIDTH]
}

fn new_empty() -> [Option<Piece>; WIDTH] {
    [None; WIDTH]
}

pub fn new_board() -> Board {
    Board {
        squares: [
            new_pieces(Color::Black),
            new_pawns(Color::Black),
            new_empty(),
            new_empty(),
            new_empty(),
            new_empty(),
            new_pawns(Color::White),
            new_pieces(Color::White)
        ],
    }
}

pub fn empty_board() -> Board {
    Board { squares: [new_empty(); HEIGHT] }
}
