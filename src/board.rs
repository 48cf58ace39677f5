use cozy_chess::{Board as CozyBoard, Color};

/// Validated board state plus side to move. Callers own it; the evaluator
/// only borrows it for the duration of one analysis call.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        CozyBoard::from_fen(fen, false).map(|b| Self { board: b }).map_err(|e| format!("FEN error: {e:?}"))
    }

    /// FEN of the current position, as sent over the engine wire.
    pub fn fen(&self) -> String {
        format!("{}", self.board)
    }

    pub fn legal_moves_count(&self) -> usize {
        let mut ct = 0usize;
        self.board.generate_moves(|moves| { ct += moves.len(); false });
        ct
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }
}
