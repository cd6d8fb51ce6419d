use std::fmt;

use serde::Serialize;

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// One of the two players. Player one's men move toward row 0,
/// player two's men move toward row 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Row a man of this player promotes on.
    pub fn far_rank(self) -> u8 {
        match self {
            Player::One => 0,
            Player::Two => 7,
        }
    }
}

/// Contents of one board cell.
///
/// Wire codes for persistence are the declaration order, 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Square {
    Empty,
    PlayerOneMan,
    PlayerTwoMan,
    PlayerOneKing,
    PlayerTwoKing,
}

impl Square {
    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }

    pub fn is_king(self) -> bool {
        matches!(self, Square::PlayerOneKing | Square::PlayerTwoKing)
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::PlayerOneMan | Square::PlayerOneKing => Some(Player::One),
            Square::PlayerTwoMan | Square::PlayerTwoKing => Some(Player::Two),
        }
    }

    /// The man piece for a player.
    pub fn man(player: Player) -> Square {
        match player {
            Player::One => Square::PlayerOneMan,
            Player::Two => Square::PlayerTwoMan,
        }
    }

    /// The king piece for a player.
    pub fn king(player: Player) -> Square {
        match player {
            Player::One => Square::PlayerOneKing,
            Player::Two => Square::PlayerTwoKing,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Square::Empty => 0,
            Square::PlayerOneMan => 1,
            Square::PlayerTwoMan => 2,
            Square::PlayerOneKing => 3,
            Square::PlayerTwoKing => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Square> {
        match code {
            0 => Some(Square::Empty),
            1 => Some(Square::PlayerOneMan),
            2 => Some(Square::PlayerTwoMan),
            3 => Some(Square::PlayerOneKing),
            4 => Some(Square::PlayerTwoKing),
            _ => None,
        }
    }
}

/// Why a proposed move was rejected. No variant leaves any state mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// A coordinate lies outside the 8x8 grid.
    OutOfBounds,
    /// The game already has a winner.
    GameOver,
    /// The source cell holds no piece.
    EmptySource,
    /// The source piece does not belong to the player whose turn it is.
    NotYourTurn,
    /// The destination cell is occupied.
    DestinationOccupied,
    /// Source and destination are the same cell.
    NullMove,
    /// A man tried to move against its forward direction.
    WrongDirection,
    /// The delta between source and destination matches no legal move shape.
    IllegalShape,
    /// A jump's midpoint holds no opponent piece.
    NothingToCapture,
    /// A long run is blocked by a friendly piece or a doubled-up capture.
    BlockedPath,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MoveError::OutOfBounds => "coordinate is outside the board",
            MoveError::GameOver => "the game is already over",
            MoveError::EmptySource => "no piece on the source cell",
            MoveError::NotYourTurn => "piece does not belong to the active player",
            MoveError::DestinationOccupied => "destination cell is occupied",
            MoveError::NullMove => "source and destination are the same cell",
            MoveError::WrongDirection => "men may only move forward",
            MoveError::IllegalShape => "not a legal move shape",
            MoveError::NothingToCapture => "no opponent piece to jump",
            MoveError::BlockedPath => "path is blocked",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for MoveError {}

/// What a successful move did, for the presentation layer.
///
/// Contract:
/// - `captured` lists every cell emptied by the move, in jump order.
///   A plain step must report an empty list.
/// - `promoted` is `true` only when this move crowned the piece.
/// - `winner` is set when this move ended the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub captured: Vec<Position>,
    pub promoted: bool,
    pub winner: Option<Player>,
}

/// Full game state snapshot for the presentation and persistence layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub board: [[Square; 8]; 8],
    pub player_one_name: String,
    pub player_two_name: String,
    pub p1_captures: u8,
    pub p2_captures: u8,
    pub player_one_to_move: bool,
    pub winner: Option<Player>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_codes_round_trip() {
        for code in 0..=4u8 {
            let square = Square::from_code(code).unwrap();
            assert_eq!(square.code(), code);
        }
        assert_eq!(Square::from_code(5), None);
    }

    #[test]
    fn owner_and_kind_helpers() {
        assert_eq!(Square::Empty.owner(), None);
        assert_eq!(Square::PlayerOneMan.owner(), Some(Player::One));
        assert_eq!(Square::PlayerTwoKing.owner(), Some(Player::Two));
        assert!(Square::PlayerOneKing.is_king());
        assert!(!Square::PlayerTwoMan.is_king());
        assert_eq!(Player::One.opponent(), Player::Two);
    }
}
