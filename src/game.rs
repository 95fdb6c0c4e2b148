use std::collections::HashSet;
use std::fmt;
use crate::board::{new_board, on_board, Board, Color, Square};
use crate::history::{replay, MoveRecord, ParseMoveError, Scores};
use crate::moves::{check_move, legal_moves, MoveRejection};

/// What a click on the board did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Square),
    Moved(MoveRecord),
    Rejected(MoveRejection),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    Parse(usize, ParseMoveError),
    OutOfTurn(usize, MoveRecord),
    Illegal(usize, MoveRecord, MoveRejection),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Parse(ply, e) => write!(f, "move {}: {}", ply + 1, e),
            HistoryError::OutOfTurn(ply, record) => write!(f, "move {} ({}): not the side to move", ply + 1, record),
            HistoryError::Illegal(ply, record, reason) => write!(f, "move {} ({}): {}", ply + 1, record, reason),
        }
    }
}

impl std::error::Error for HistoryError {}

/// One game: the live board plus the list of moves it was built from.
///
/// The board always equals the replay of the first `current_move` records, and white is to
/// play exactly when `current_move` is even.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GameState {
    board: Board,
    selected: Option<Square>,
    current_player: Color,
    move_history: Vec<MoveRecord>,
    current_move: usize,
    scores: Scores,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            board: new_board(),
            selected: None,
            current_player: Color::White,
            move_history: Vec::new(),
            current_move: 0,
            scores: Scores::default(),
        }
    }

    /// Rebuilds a game from its textual history, playing each move through the normal move
    /// path. The returned game sits at the last move.
    pub fn from_history<S: AsRef<str>>(records: &[S]) -> Result<Self, HistoryError> {
        let mut game = GameState::new();
        for (ply, text) in records.iter().enumerate() {
            let record: MoveRecord = text.as_ref().parse()
                .map_err(|e| HistoryError::Parse(ply, e))?;
            if game.board.piece_at(record.from).is_some_and(|p| p.color != game.current_player) {
                return Err(HistoryError::OutOfTurn(ply, record));
            }
            game.attempt_move(record.from, record.to)
                .map_err(|reason| HistoryError::Illegal(ply, record, reason))?;
        }
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn current_move(&self) -> usize {
        self.current_move
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Handles a click on `square`: picks up a piece of the side to move, or tries to move
    /// the picked up piece there. A rejected move keeps the selection.
    pub fn select_or_move(&mut self, square: Square) -> ClickOutcome {
        if !on_board(square) {
            return ClickOutcome::Ignored;
        }
        if self.board.piece_at(square).is_some_and(|p| p.color == self.current_player) {
            self.selected = Some(square);
            return ClickOutcome::Selected(square);
        }
        match self.selected {
            None => ClickOutcome::Ignored,
            Some(from) => match self.attempt_move(from, square) {
                Ok(record) => ClickOutcome::Moved(record),
                Err(reason) => ClickOutcome::Rejected(reason),
            }
        }
    }

    fn attempt_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, MoveRejection> {
        let mover = match check_move(&self.board, from, to) {
            Ok(piece) => piece,
            Err(reason) => {
                log::trace!("Move {:?} -> {:?} rejected: {}", from, to, reason);
                return Err(reason);
            }
        };
        if let Some(captured) = self.board.make_move(from, to) {
            self.scores.add(mover.color, captured.kind.value());
        }

        let record = MoveRecord::new(from, to);
        self.move_history.truncate(self.current_move);
        self.move_history.push(record);
        self.current_move += 1;
        self.current_player = self.current_player.opposite();
        self.selected = None;
        log::debug!("Move {}: {}", self.current_move, record);
        Ok(record)
    }

    /// Shows the position after the first `index` moves by replaying them from the start.
    /// Indexes past the end of the history are ignored.
    pub fn go_to_move(&mut self, index: usize) -> bool {
        if index > self.move_history.len() {
            log::trace!("Ignoring move index {} (history length {})", index, self.move_history.len());
            return false;
        }
        let (board, scores) = replay(&self.move_history[.. index]);
        self.board = board;
        self.scores = scores;
        self.current_move = index;
        self.current_player = if index % 2 == 0 { Color::White } else { Color::Black };
        self.selected = None;
        log::debug!("Replayed {} of {} moves", index, self.move_history.len());
        true
    }

    pub fn can_step_back(&self) -> bool {
        self.current_move > 0
    }

    pub fn can_step_forward(&self) -> bool {
        self.current_move < self.move_history.len()
    }

    pub fn step_back(&mut self) -> bool {
        self.can_step_back() && self.go_to_move(self.current_move - 1)
    }

    pub fn step_forward(&mut self) -> bool {
        self.can_step_forward() && self.go_to_move(self.current_move + 1)
    }

    pub fn reset(&mut self) {
        *self = GameState::new();
        log::debug!("Game reset");
    }

    /// Squares the piece on `square` may move to. Empty for empty squares.
    pub fn legal_destinations(&self, square: Square) -> HashSet<Square> {
        if !on_board(square) {
            return HashSet::new();
        }
        legal_moves(&self.board, square.0, square.1)
    }

    /// History entries as listed next to the board: white's moves carry the move number.
    pub fn numbered_history(&self) -> Vec<String> {
        self.move_history.iter()
            .enumerate()
            .map(|(i, record)| match i % 2 {
                0 => format!("{}. {}", i / 2 + 1, record),
                _ => record.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use crate::board::{new_board, Color, Piece, PieceType, Square};
    use crate::game::{ClickOutcome, GameState, HistoryError};
    use crate::history::{parse_square, replay, MoveRecord, ParseMoveError, Scores};
    use crate::moves::MoveRejection;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    fn play(game: &mut GameState, from: &str, to: &str) -> ClickOutcome {
        game.select_or_move(sq(from));
        game.select_or_move(sq(to))
    }

    fn history_strings(game: &GameState) -> Vec<String> {
        game.move_history().iter().map(|r| r.to_string()).collect()
    }

    fn opening() -> GameState {
        GameState::from_history(&["e2 to e4", "e7 to e5", "g1 to f3", "b8 to c6", "f1 to b5", "a7 to a6"]).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new();
        assert_eq!(game.board(), &new_board());
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.selected(), None);
        assert_eq!(game.current_move(), 0);
        assert!(game.move_history().is_empty());
        assert_eq!(game.scores(), Scores::default());
    }

    #[test]
    fn test_opening_scenario() {
        let mut game = GameState::new();
        assert_eq!(play(&mut game, "e2", "e4"), ClickOutcome::Moved(MoveRecord::new((6, 4), (4, 4))));
        assert_eq!(history_strings(&game), vec!["e2 to e4"]);
        assert_eq!(game.current_player(), Color::Black);

        assert!(matches!(play(&mut game, "e7", "e5"), ClickOutcome::Moved(_)));
        assert!(matches!(play(&mut game, "g1", "f3"), ClickOutcome::Moved(_)));
        assert!(matches!(play(&mut game, "a7", "a6"), ClickOutcome::Moved(_)));

        // rooks are not blocked by pieces in between
        assert!(matches!(play(&mut game, "a1", "a3"), ClickOutcome::Moved(_)));
        assert_eq!(game.board().piece_at(sq("a3")), Some(Piece::new(Color::White, PieceType::Rook)));
        assert!(matches!(play(&mut game, "h8", "h6"), ClickOutcome::Moved(_)));
        assert!(matches!(play(&mut game, "a3", "h3"), ClickOutcome::Moved(_)));
        assert_eq!(history_strings(&game), vec![
            "e2 to e4", "e7 to e5", "g1 to f3", "a7 to a6", "a1 to a3", "h8 to h6", "a3 to h3"
        ]);
        assert_eq!(game.current_player(), Color::Black);
    }

    #[test]
    fn test_rook_moves_through_pieces() {
        let mut game = GameState::from_history(&["h2 to h4", "a7 to a6"]).unwrap();
        // clicking the other rook picks it up instead
        assert_eq!(play(&mut game, "a1", "h1"), ClickOutcome::Selected(sq("h1")));
        assert!(matches!(game.select_or_move(sq("h3")), ClickOutcome::Moved(_)));
        game.select_or_move(sq("a6"));
        game.select_or_move(sq("a5"));
        // b1..g1 still occupied, the rook passes straight through them
        assert_eq!(play(&mut game, "a1", "h1"), ClickOutcome::Moved(MoveRecord::new((7, 0), (7, 7))));
    }

    #[test]
    fn test_rejected_move_keeps_state() {
        let mut game = GameState::new();
        let before = game.clone();
        assert_eq!(game.select_or_move(sq("e2")), ClickOutcome::Selected(sq("e2")));
        assert_eq!(game.select_or_move(sq("e5")), ClickOutcome::Rejected(MoveRejection::IllegalGeometry(PieceType::Pawn)));
        assert_eq!(game.board(), before.board());
        assert!(game.move_history().is_empty());
        assert_eq!(game.current_player(), Color::White);
        assert_eq!(game.selected(), Some(sq("e2")));
    }

    #[test]
    fn test_selection() {
        let mut game = GameState::new();
        assert_eq!(game.select_or_move(sq("e4")), ClickOutcome::Ignored);
        assert_eq!(game.select_or_move(sq("e7")), ClickOutcome::Ignored);
        assert_eq!(game.selected(), None);
        assert_eq!(game.select_or_move((8, 0)), ClickOutcome::Ignored);

        game.select_or_move(sq("e2"));
        assert_eq!(game.select_or_move(sq("d2")), ClickOutcome::Selected(sq("d2")));
        assert_eq!(game.selected(), Some(sq("d2")));
        assert!(matches!(game.select_or_move(sq("d4")), ClickOutcome::Moved(_)));
        assert_eq!(game.selected(), None);

        // white pieces cannot be picked up on black's turn
        assert_eq!(game.select_or_move(sq("d4")), ClickOutcome::Ignored);
    }

    #[test]
    fn test_capture_scoring() {
        let mut game = GameState::from_history(&["e2 to e4", "d7 to d5"]).unwrap();
        assert!(matches!(play(&mut game, "e4", "d5"), ClickOutcome::Moved(_)));
        assert_eq!(game.scores(), Scores { white: 1, black: 0 });

        assert!(matches!(play(&mut game, "d8", "d5"), ClickOutcome::Moved(_)));
        assert_eq!(game.scores(), Scores { white: 1, black: 1 });

        assert!(matches!(play(&mut game, "b1", "c3"), ClickOutcome::Moved(_)));
        assert_eq!(game.scores(), Scores { white: 1, black: 1 });

        assert!(matches!(play(&mut game, "a7", "a6"), ClickOutcome::Moved(_)));
        // queen on d1 takes queen on d5 through the d2 pawn
        assert!(matches!(play(&mut game, "d1", "d5"), ClickOutcome::Moved(_)));
        assert_eq!(game.scores(), Scores { white: 10, black: 1 });
    }

    #[test]
    fn test_king_capture_scores_nothing() {
        let mut game = GameState::from_history(&["e2 to e4", "f7 to f6", "d1 to h5", "a7 to a6"]).unwrap();
        assert!(matches!(play(&mut game, "h5", "e8"), ClickOutcome::Moved(_)));
        assert_eq!(game.scores(), Scores::default());
        assert_eq!(game.board().piece_at(sq("e8")), Some(Piece::new(Color::White, PieceType::Queen)));
    }

    #[test]
    fn test_turn_alternation() {
        let mut game = GameState::new();
        for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")] {
            let before = game.current_player();
            assert!(matches!(play(&mut game, from, to), ClickOutcome::Moved(_)));
            assert_eq!(game.current_player(), before.opposite());
        }
        for k in 0 ..= 4 {
            game.go_to_move(k);
            assert_eq!(game.current_player() == Color::White, k % 2 == 0);
        }
    }

    #[test]
    fn test_go_to_move_is_idempotent() {
        let mut game = opening();
        for k in 0 ..= game.move_history().len() {
            game.go_to_move(k);
            let first = (*game.board(), game.scores());
            game.go_to_move(k);
            assert_eq!((*game.board(), game.scores()), first);
        }
    }

    #[test]
    fn test_replay_matches_played_moves() {
        let full = GameState::from_history(&["e2 to e4", "d7 to d5", "e4 to d5", "d8 to d5", "b1 to c3", "d5 to a2"]).unwrap();
        let records = full.move_history().to_vec();
        for k in 0 ..= records.len() {
            let mut rewound = full.clone();
            assert!(rewound.go_to_move(k));

            let mut replayed = GameState::new();
            for record in &records[.. k] {
                replayed.select_or_move(record.from);
                assert!(matches!(replayed.select_or_move(record.to), ClickOutcome::Moved(_)));
            }
            assert_eq!(rewound.board(), replayed.board());
            assert_eq!(rewound.scores(), replayed.scores());
            assert_eq!(rewound.current_player(), replayed.current_player());
            assert_eq!(replay(&records[.. k]), (*replayed.board(), replayed.scores()));
        }
    }

    #[test]
    fn test_go_to_move_out_of_range() {
        let mut game = opening();
        game.select_or_move(sq("d2"));
        let before = game.clone();
        assert!(!game.go_to_move(7));
        assert_eq!(game, before);
        assert!(game.go_to_move(6));
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn test_go_to_move_keeps_history() {
        let mut game = opening();
        assert!(game.go_to_move(2));
        assert_eq!(game.move_history().len(), 6);
        assert_eq!(game.current_move(), 2);
        assert_eq!(game.board().piece_at(sq("g1")), Some(Piece::new(Color::White, PieceType::Knight)));
        assert!(game.go_to_move(6));
        assert_eq!(game, opening());
    }

    #[test]
    fn test_new_move_after_rewind_truncates() {
        let mut game = opening();
        game.go_to_move(3);
        assert_eq!(game.current_player(), Color::Black);
        assert!(matches!(play(&mut game, "g8", "f6"), ClickOutcome::Moved(_)));
        assert_eq!(game.move_history().len(), 4);
        assert_eq!(game.current_move(), 4);
        assert_eq!(history_strings(&game), vec!["e2 to e4", "e7 to e5", "g1 to f3", "g8 to f6"]);
        assert!(!game.can_step_forward());
    }

    #[test]
    fn test_scores_follow_rewind() {
        let mut game = GameState::from_history(&["e2 to e4", "d7 to d5", "e4 to d5", "d8 to d5"]).unwrap();
        game.go_to_move(3);
        assert_eq!(game.scores(), Scores { white: 1, black: 0 });
        game.go_to_move(2);
        assert_eq!(game.scores(), Scores::default());
        game.go_to_move(4);
        assert_eq!(game.scores(), Scores { white: 1, black: 1 });
    }

    #[test]
    fn test_step_back_and_forward() {
        let mut game = GameState::from_history(&["e2 to e4", "e7 to e5"]).unwrap();
        assert!(!game.step_forward());
        assert!(game.step_back());
        assert!(game.step_back());
        assert_eq!(game.current_move(), 0);
        assert!(!game.can_step_back());
        assert!(!game.step_back());
        assert_eq!(game.board(), &new_board());
        assert!(game.step_forward());
        assert_eq!(game.current_move(), 1);
        assert_eq!(game.current_player(), Color::Black);
    }

    #[test]
    fn test_reset() {
        let mut game = opening();
        game.go_to_move(4);
        game.select_or_move(sq("d2"));
        game.reset();
        assert_eq!(game, GameState::new());
    }

    #[test]
    fn test_from_history_errors() {
        assert_eq!(
            GameState::from_history(&["e2 to e4", "e7 e5"]),
            Err(HistoryError::Parse(1, ParseMoveError::MissingSeparator("e7 e5".to_string())))
        );
        assert_eq!(
            GameState::from_history(&["e2 to e4", "e4 to e5"]),
            Err(HistoryError::OutOfTurn(1, MoveRecord::new((4, 4), (3, 4))))
        );
        assert_eq!(
            GameState::from_history(&["e2 to e5"]),
            Err(HistoryError::Illegal(0, MoveRecord::new((6, 4), (3, 4)), MoveRejection::IllegalGeometry(PieceType::Pawn)))
        );
        assert_eq!(
            GameState::from_history(&["e3 to e4"]),
            Err(HistoryError::Illegal(0, MoveRecord::new((5, 4), (4, 4)), MoveRejection::EmptySource))
        );
    }

    #[test]
    fn test_numbered_history() {
        let game = GameState::from_history(&["e2 to e4", "e7 to e5", "g1 to f3"]).unwrap();
        assert_eq!(game.numbered_history(), vec!["1. e2 to e4", "e7 to e5", "2. g1 to f3"]);
    }

    #[test]
    fn test_legal_destinations() {
        let game = GameState::new();
        assert_eq!(game.legal_destinations(sq("g1")), [sq("f3"), sq("h3")].into_iter().collect());
        assert!(game.legal_destinations(sq("e4")).is_empty());
        assert!(game.legal_destinations((0, 8)).is_empty());
    }

    #[test]
    fn test_snapshot_json() {
        let game = GameState::from_history(&["e2 to e4"]).unwrap();
        let json: serde_json::Value = serde_json::to_value(&game).unwrap();
        assert_eq!(json["current_player"], "black");
        assert_eq!(json["move_history"], serde_json::json!(["e2 to e4"]));
        assert_eq!(json["current_move"], 1);
        assert_eq!(json["scores"], serde_json::json!({"white": 0, "black": 0}));
        assert_eq!(json["selected"], serde_json::Value::Null);
        assert_eq!(json["board"], "rnbqkbnr\npppppppp\n        \n        \n    P   \n        \nPPPP PPP\nRNBQKBNR");
    }
}
