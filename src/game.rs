use log::debug;

use crate::board::{offset, Board};
use crate::rules;
use crate::types::{GameSnapshot, MoveError, MoveOutcome, Player, Position, Square};

pub const DEFAULT_PLAYER_ONE_NAME: &str = "Player 1";
pub const DEFAULT_PLAYER_TWO_NAME: &str = "Player 2";

/// Captures needed to win outright: the opponent started with 12 pieces.
pub const CAPTURES_TO_WIN: u8 = 12;
/// At 11 captures the opponent is down to one piece; if that piece has no
/// legal move left the game ends early.
const NEAR_WIN_CAPTURES: u8 = 11;

/// The game's phase machine. Exactly one transition per accepted move:
/// the turn flips, or the game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerOneTurn,
    PlayerTwoTurn,
    Over(Player),
}

impl Phase {
    /// The player who may move, `None` once the game is over.
    pub fn to_move(self) -> Option<Player> {
        match self {
            Phase::PlayerOneTurn => Some(Player::One),
            Phase::PlayerTwoTurn => Some(Player::Two),
            Phase::Over(_) => None,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Phase::Over(winner) => Some(winner),
            _ => None,
        }
    }
}

/// The single source of truth for one running game: board, player names,
/// capture counters, and the phase machine. Player one always moves first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    pub player_one_name: String,
    pub player_two_name: String,
    p1_captures: u8,
    p2_captures: u8,
    phase: Phase,
}

impl Game {
    pub fn new() -> Self {
        Self::with_names(DEFAULT_PLAYER_ONE_NAME, DEFAULT_PLAYER_TWO_NAME)
    }

    pub fn with_names(player_one: &str, player_two: &str) -> Self {
        Self {
            board: Board::new(),
            player_one_name: player_one.to_string(),
            player_two_name: player_two.to_string(),
            p1_captures: 0,
            p2_captures: 0,
            phase: Phase::PlayerOneTurn,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn captures(&self, player: Player) -> u8 {
        match player {
            Player::One => self.p1_captures,
            Player::Two => self.p2_captures,
        }
    }

    /// Restores the freshly-initialized state: initial layout, zero scores,
    /// default names, player one to move.
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    /// Processes one move intent for the active player.
    ///
    /// On success the move is executed (captures removed, piece relocated,
    /// promotion applied), the mover is credited one capture per removed
    /// piece, the end-game conditions are re-evaluated, and the turn flips
    /// or the game ends. On any error nothing changes and the turn does not
    /// flip.
    pub fn try_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        let mover = match self.phase.to_move() {
            Some(player) => player,
            None => return Err(MoveError::GameOver),
        };

        let piece = self.board.get(from).ok_or(MoveError::OutOfBounds)?;
        self.board.get(to).ok_or(MoveError::OutOfBounds)?;
        match piece.owner() {
            None => return Err(MoveError::EmptySource),
            Some(owner) if owner != mover => return Err(MoveError::NotYourTurn),
            Some(_) => {}
        }

        let plan = if piece.is_king() {
            rules::plan_king_move(&self.board, from, to)?
        } else {
            rules::plan_man_move(&self.board, from, to)?
        };

        self.board.apply(&plan);
        let captured = plan.captures.len() as u8;
        match mover {
            Player::One => self.p1_captures += captured,
            Player::Two => self.p2_captures += captured,
        }
        debug!(
            "player {mover:?} moved ({},{}) -> ({},{}), captured {captured}",
            from.row, from.col, to.row, to.col
        );

        let winner = self.evaluate_end();
        self.phase = match winner {
            Some(player) => Phase::Over(player),
            None => match mover {
                Player::One => Phase::PlayerTwoTurn,
                Player::Two => Phase::PlayerOneTurn,
            },
        };

        Ok(MoveOutcome {
            captured: plan.captures,
            promoted: plan.promotion,
            winner,
        })
    }

    /// Win conditions, evaluated in this order: a player at 11 captures wins
    /// when the opponent's last man has no legal move; a player reaching 12
    /// captures wins outright, regardless of the opposing score.
    fn evaluate_end(&self) -> Option<Player> {
        let mut winner = None;

        if self.p1_captures == NEAR_WIN_CAPTURES
            && self.p2_captures < NEAR_WIN_CAPTURES
            && !self.side_has_reply(Player::Two)
        {
            winner = Some(Player::One);
        } else if self.p2_captures == NEAR_WIN_CAPTURES
            && self.p1_captures < NEAR_WIN_CAPTURES
            && !self.side_has_reply(Player::One)
        {
            winner = Some(Player::Two);
        }

        if self.p1_captures >= CAPTURES_TO_WIN {
            winner = Some(Player::One);
        } else if self.p2_captures >= CAPTURES_TO_WIN {
            winner = Some(Player::Two);
        }

        winner
    }

    /// Whether the near-losing side still has a legal move. Finds that
    /// side's last man in row-major scan order and probes its four forward
    /// candidate destinations; no man left means no reply.
    fn side_has_reply(&self, defender: Player) -> bool {
        let man = Square::man(defender);
        let mut found = None;
        for row in 0..8u8 {
            for col in 0..8u8 {
                let pos = Position::new(row, col);
                if self.board.get(pos) == Some(man) {
                    found = Some(pos);
                }
            }
        }
        let Some(from) = found else {
            return false;
        };

        let forward: i32 = match defender {
            Player::One => -1,
            Player::Two => 1,
        };
        let candidates = [
            (forward, 1),
            (2 * forward, 2),
            (forward, -1),
            (2 * forward, -2),
        ];
        candidates.iter().any(|&(d_row, d_col)| {
            offset(from, d_row, d_col)
                .is_some_and(|to| rules::probe_man_move(&self.board, from, to))
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: *self.board.cells(),
            player_one_name: self.player_one_name.clone(),
            player_two_name: self.player_two_name.clone(),
            p1_captures: self.p1_captures,
            p2_captures: self.p2_captures,
            player_one_to_move: self.phase != Phase::PlayerTwoTurn,
            winner: self.phase.winner(),
        }
    }

    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let phase = match snapshot.winner {
            Some(winner) => Phase::Over(winner),
            None if snapshot.player_one_to_move => Phase::PlayerOneTurn,
            None => Phase::PlayerTwoTurn,
        };
        Self {
            board: Board::from_cells(snapshot.board),
            player_one_name: snapshot.player_one_name.clone(),
            player_two_name: snapshot.player_two_name.clone(),
            p1_captures: snapshot.p1_captures,
            p2_captures: snapshot.p2_captures,
            phase,
        }
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, phase: Phase) {
        self.board = board;
        self.phase = phase;
    }

    #[cfg(test)]
    fn set_captures_for_test(&mut self, p1: u8, p2: u8) {
        self.p1_captures = p1;
        self.p2_captures = p2;
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_SIZE;

    fn board_with(pieces: &[(u8, u8, Square)]) -> Board {
        let mut cells = [[Square::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, col, square) in pieces {
            cells[*row as usize][*col as usize] = *square;
        }
        Board::from_cells(cells)
    }

    #[test]
    fn initial_state_is_correct() {
        let game = Game::new();

        assert_eq!(game.phase(), Phase::PlayerOneTurn);
        assert_eq!(game.captures(Player::One), 0);
        assert_eq!(game.captures(Player::Two), 0);
        assert_eq!(game.board().count(), (12, 12));
        assert_eq!(game.player_one_name, DEFAULT_PLAYER_ONE_NAME);
        assert_eq!(game.player_two_name, DEFAULT_PLAYER_TWO_NAME);
    }

    #[test]
    fn opening_move_is_legal_and_flips_the_turn() {
        let mut game = Game::new();

        let outcome = game
            .try_move(Position::new(5, 0), Position::new(4, 1))
            .unwrap();

        assert!(outcome.captured.is_empty());
        assert!(!outcome.promoted);
        assert_eq!(outcome.winner, None);
        assert_eq!(game.phase(), Phase::PlayerTwoTurn);
        assert_eq!(
            game.board().get(Position::new(4, 1)),
            Some(Square::PlayerOneMan)
        );
        assert_eq!(game.board().get(Position::new(5, 0)), Some(Square::Empty));
    }

    #[test]
    fn moving_the_opponents_piece_changes_nothing() {
        let mut game = Game::new();
        let before = game.clone();

        // Player one to move, but (2,1) holds a player-two man.
        let err = game
            .try_move(Position::new(2, 1), Position::new(3, 0))
            .unwrap_err();

        assert_eq!(err, MoveError::NotYourTurn);
        assert_eq!(game, before);
    }

    #[test]
    fn invalid_move_leaves_state_untouched() {
        let mut game = Game::new();
        let before = game.clone();

        assert_eq!(
            game.try_move(Position::new(5, 0), Position::new(3, 0)),
            Err(MoveError::IllegalShape)
        );
        assert_eq!(
            game.try_move(Position::new(4, 1), Position::new(3, 0)),
            Err(MoveError::EmptySource)
        );
        assert_eq!(
            game.try_move(Position::new(5, 0), Position::new(8, 1)),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn single_jump_captures_scores_and_lands() {
        let mut game = Game::new();
        game.set_board_for_test(
            board_with(&[
                (4, 5, Square::PlayerOneMan),
                (3, 4, Square::PlayerTwoMan),
                (0, 1, Square::PlayerTwoMan),
            ]),
            Phase::PlayerOneTurn,
        );

        let outcome = game
            .try_move(Position::new(4, 5), Position::new(2, 3))
            .unwrap();

        assert_eq!(outcome.captured, vec![Position::new(3, 4)]);
        assert_eq!(game.captures(Player::One), 1);
        assert_eq!(game.board().get(Position::new(3, 4)), Some(Square::Empty));
        assert_eq!(game.board().get(Position::new(4, 5)), Some(Square::Empty));
        assert_eq!(
            game.board().get(Position::new(2, 3)),
            Some(Square::PlayerOneMan)
        );
        assert_eq!(game.phase(), Phase::PlayerTwoTurn);
    }

    #[test]
    fn man_promotes_in_the_same_move() {
        let mut game = Game::new();
        game.set_board_for_test(
            board_with(&[
                (1, 2, Square::PlayerOneMan),
                (2, 5, Square::PlayerTwoMan),
            ]),
            Phase::PlayerOneTurn,
        );

        let outcome = game
            .try_move(Position::new(1, 2), Position::new(0, 1))
            .unwrap();

        assert!(outcome.promoted);
        assert_eq!(
            game.board().get(Position::new(0, 1)),
            Some(Square::PlayerOneKing)
        );
    }

    #[test]
    fn king_does_not_demote_on_its_home_rank() {
        let mut game = Game::new();
        game.set_board_for_test(
            board_with(&[
                (1, 2, Square::PlayerTwoKing),
                (5, 0, Square::PlayerOneMan),
            ]),
            Phase::PlayerTwoTurn,
        );

        let outcome = game
            .try_move(Position::new(1, 2), Position::new(0, 1))
            .unwrap();

        assert!(!outcome.promoted);
        assert_eq!(
            game.board().get(Position::new(0, 1)),
            Some(Square::PlayerTwoKing)
        );
    }

    #[test]
    fn twelfth_capture_wins_regardless_of_opposing_score() {
        let mut game = Game::new();
        game.set_board_for_test(
            board_with(&[
                (4, 5, Square::PlayerOneMan),
                (3, 4, Square::PlayerTwoMan),
            ]),
            Phase::PlayerOneTurn,
        );
        game.set_captures_for_test(11, 11);

        let outcome = game
            .try_move(Position::new(4, 5), Position::new(2, 3))
            .unwrap();

        assert_eq!(outcome.winner, Some(Player::One));
        assert_eq!(game.phase(), Phase::Over(Player::One));
        assert_eq!(game.captures(Player::One), 12);
    }

    #[test]
    fn finished_game_accepts_no_more_moves() {
        let mut game = Game::new();
        game.set_board_for_test(
            board_with(&[
                (4, 5, Square::PlayerOneMan),
                (3, 4, Square::PlayerTwoMan),
            ]),
            Phase::PlayerOneTurn,
        );
        game.set_captures_for_test(11, 0);
        game.try_move(Position::new(4, 5), Position::new(2, 3))
            .unwrap();
        let before = game.clone();

        assert_eq!(
            game.try_move(Position::new(2, 3), Position::new(1, 2)),
            Err(MoveError::GameOver)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn eleventh_capture_against_a_boxed_in_man_ends_the_game() {
        let mut game = Game::new();
        // The surviving player-two man on (6,1) has both forward targets
        // occupied and both jump targets off the board.
        game.set_board_for_test(
            board_with(&[
                (4, 3, Square::PlayerOneMan),
                (3, 2, Square::PlayerTwoMan),
                (6, 1, Square::PlayerTwoMan),
                (7, 0, Square::PlayerOneMan),
                (7, 2, Square::PlayerOneMan),
            ]),
            Phase::PlayerOneTurn,
        );
        game.set_captures_for_test(10, 0);

        let outcome = game
            .try_move(Position::new(4, 3), Position::new(2, 1))
            .unwrap();

        assert_eq!(game.captures(Player::One), 11);
        assert_eq!(outcome.winner, Some(Player::One));
        assert_eq!(game.phase(), Phase::Over(Player::One));
    }

    #[test]
    fn eleventh_capture_with_a_reply_left_keeps_playing() {
        let mut game = Game::new();
        // Same shape, but (5,2) is free so the man on (6,1) can step out.
        game.set_board_for_test(
            board_with(&[
                (4, 3, Square::PlayerOneMan),
                (3, 2, Square::PlayerTwoMan),
                (6, 1, Square::PlayerTwoMan),
            ]),
            Phase::PlayerOneTurn,
        );
        game.set_captures_for_test(10, 0);

        let outcome = game
            .try_move(Position::new(4, 3), Position::new(2, 1))
            .unwrap();

        assert_eq!(game.captures(Player::One), 11);
        assert_eq!(outcome.winner, None);
        assert_eq!(game.phase(), Phase::PlayerTwoTurn);
    }

    #[test]
    fn snapshot_round_trips_through_from_snapshot() {
        let mut game = Game::with_names("Abebe", "Chaltu");
        game.try_move(Position::new(5, 0), Position::new(4, 1))
            .unwrap();
        game.try_move(Position::new(2, 1), Position::new(3, 0))
            .unwrap();

        let snapshot = game.snapshot();
        let restored = Game::from_snapshot(&snapshot);

        assert_eq!(restored, game);
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn reset_restores_the_fresh_game() {
        let mut game = Game::with_names("Abebe", "Chaltu");
        game.try_move(Position::new(5, 0), Position::new(4, 1))
            .unwrap();

        game.reset();

        assert_eq!(game, Game::new());
    }
}
