use crate::rules::MovePlan;
use crate::types::{Player, Position, Square};

pub const BOARD_SIZE: usize = 8;

/// Pixel size of one board cell, shared with the input collaborator.
pub const CELL_SIZE: i32 = 100;
const BOARD_PIXELS: i32 = CELL_SIZE * BOARD_SIZE as i32;

/// Dama board state: an 8x8 grid of squares.
///
/// Row 0 is player two's home side, row 7 is player one's home side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Square; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates the initial board: 12 player-two men on the dark squares of
    /// rows 0..=2, 12 player-one men on the dark squares of rows 5..=7.
    pub fn new() -> Self {
        let mut cells = [[Square::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (row, rank) in cells.iter_mut().enumerate() {
            for (col, cell) in rank.iter_mut().enumerate() {
                *cell = initial_square(row, col);
            }
        }
        Self { cells }
    }

    /// Rebuilds a board from a stored grid.
    pub fn from_cells(cells: [[Square; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// The raw grid, for rendering and snapshots.
    pub fn cells(&self) -> &[[Square; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Bounds-checked read. `None` for coordinates off the board.
    pub fn get(&self, pos: Position) -> Option<Square> {
        if pos.row as usize >= BOARD_SIZE || pos.col as usize >= BOARD_SIZE {
            return None;
        }
        Some(self.cells[pos.row as usize][pos.col as usize])
    }

    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.cells[pos.row as usize][pos.col as usize] = square;
    }

    /// Returns `(player_one_pieces, player_two_pieces)`.
    pub fn count(&self) -> (u8, u8) {
        let mut one = 0;
        let mut two = 0;
        for rank in &self.cells {
            for cell in rank {
                match cell.owner() {
                    Some(Player::One) => one += 1,
                    Some(Player::Two) => two += 1,
                    None => {}
                }
            }
        }
        (one, two)
    }

    /// Executes a validated plan: removes captured pieces, relocates the
    /// mover, and crowns it when the plan says so. Promotion happens in the
    /// same call that performs the move; a king never demotes.
    pub(crate) fn apply(&mut self, plan: &MovePlan) {
        for captured in &plan.captures {
            self.set(*captured, Square::Empty);
        }

        let piece = self.cells[plan.from.row as usize][plan.from.col as usize];
        self.set(plan.from, Square::Empty);

        let landed = match (plan.promotion, piece.owner()) {
            (true, Some(player)) => Square::king(player),
            _ => piece,
        };
        self.set(plan.to, landed);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates a screen point to a board cell by integer division with the
/// fixed cell size. `None` outside the board's pixel bounds.
pub fn cell_at_point(x: i32, y: i32) -> Option<Position> {
    if !(0..BOARD_PIXELS).contains(&x) || !(0..BOARD_PIXELS).contains(&y) {
        return None;
    }
    Some(Position::new((y / CELL_SIZE) as u8, (x / CELL_SIZE) as u8))
}

/// Dark squares are the playable ones.
pub fn is_dark(row: u8, col: u8) -> bool {
    (row + col) % 2 == 1
}

/// Steps `pos` by a signed delta, `None` when the result leaves the board.
pub fn offset(pos: Position, d_row: i32, d_col: i32) -> Option<Position> {
    let row = pos.row as i32 + d_row;
    let col = pos.col as i32 + d_col;
    if !(0..BOARD_SIZE as i32).contains(&row) || !(0..BOARD_SIZE as i32).contains(&col) {
        return None;
    }
    Some(Position::new(row as u8, col as u8))
}

fn initial_square(row: usize, col: usize) -> Square {
    if is_dark(row as u8, col as u8) {
        if row < 3 {
            return Square::PlayerTwoMan;
        }
        if row > 4 {
            return Square::PlayerOneMan;
        }
    }
    Square::Empty
}
