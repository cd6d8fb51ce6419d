//! Move validation for men and kings.
//!
//! Validation is pure: planning a move never touches the board. A legal move
//! comes back as a [`MovePlan`] listing the cells it captures and whether it
//! crowns the mover; the board applies the plan in a separate step.

use crate::board::{offset, Board};
use crate::types::{MoveError, Player, Position, Square};

/// A validated move, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    pub from: Position,
    pub to: Position,
    /// Captured cells in jump order. Empty for a plain step.
    pub captures: Vec<Position>,
    /// The mover is a man landing on its far rank.
    pub promotion: bool,
}

/// Validates a man's move.
///
/// Men step one diagonal cell forward, jump an adjacent opponent piece two
/// cells forward, or clear several pieces in one action: a straight diagonal
/// chain of two-cell jumps, or a vertical zig-zag whose column offsets
/// cancel out so the man ends on its starting file.
pub fn plan_man_move(board: &Board, from: Position, to: Position) -> Result<MovePlan, MoveError> {
    let (piece, mover) = check_endpoints(board, from, to)?;

    let d_row = to.row as i32 - from.row as i32;
    let d_col = to.col as i32 - from.col as i32;

    // Forward only: player two's men descend, player one's men ascend.
    match mover {
        Player::Two if d_row <= 0 => return Err(MoveError::WrongDirection),
        Player::One if d_row >= 0 => return Err(MoveError::WrongDirection),
        _ => {}
    }

    let captures = match (d_row.abs(), d_col.abs()) {
        (1, 1) => Vec::new(),
        (2, 2) => vec![capturable_midpoint(board, mover, from, to)?],
        (r, 0) if r > 2 => vertical_chain(board, mover, from, to)?,
        (r, c) if r > 2 && r == c => diagonal_chain(board, mover, from, to)?,
        _ => return Err(MoveError::IllegalShape),
    };

    Ok(MovePlan {
        from,
        to,
        captures,
        promotion: !piece.is_king() && to.row == mover.far_rank(),
    })
}

/// Validates a king's move.
///
/// Kings move in any diagonal direction. Besides the man's step and jump
/// shapes they may fly two cells over an empty midpoint, and run any
/// distance along a diagonal, capturing every opponent piece on the way as
/// long as each has an empty cell immediately beyond it.
pub fn plan_king_move(board: &Board, from: Position, to: Position) -> Result<MovePlan, MoveError> {
    let (_, mover) = check_endpoints(board, from, to)?;

    let d_row = to.row as i32 - from.row as i32;
    let d_col = to.col as i32 - from.col as i32;

    let captures = match (d_row.abs(), d_col.abs()) {
        (1, 1) => Vec::new(),
        (2, 2) => {
            let mid = midpoint(from, to);
            let square = board.get(mid).ok_or(MoveError::OutOfBounds)?;
            if square.is_empty() {
                Vec::new()
            } else if square.owner() == Some(mover.opponent()) {
                vec![mid]
            } else {
                return Err(MoveError::BlockedPath);
            }
        }
        (r, 0) if r > 2 => vertical_chain(board, mover, from, to)?,
        (r, c) if r > 2 && r == c => king_run(board, mover, from, to)?,
        _ => return Err(MoveError::IllegalShape),
    };

    Ok(MovePlan {
        from,
        to,
        captures,
        promotion: false,
    })
}

/// Read-only legality check used by stalemate detection: would this man's
/// move be legal, ignoring capture side effects entirely?
///
/// Mirrors the step and single-jump branches of [`plan_man_move`]. The jump
/// branch only requires the midpoint to hold a piece of a different kind
/// than the mover, and out-of-range targets are simply not legal.
pub fn probe_man_move(board: &Board, from: Position, to: Position) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    let Some(target) = board.get(to) else {
        return false;
    };
    if piece.is_empty() || !target.is_empty() || from == to {
        return false;
    }

    let d_row = to.row as i32 - from.row as i32;
    let d_col = to.col as i32 - from.col as i32;
    if d_row.abs() != d_col.abs() {
        return false;
    }
    if piece == Square::PlayerTwoMan && d_row <= 0 {
        return false;
    }
    if piece == Square::PlayerOneMan && d_row >= 0 {
        return false;
    }

    match d_row.abs() {
        1 => true,
        2 => {
            let mid = midpoint(from, to);
            match board.get(mid) {
                Some(square) => !square.is_empty() && square != piece,
                None => false,
            }
        }
        _ => false,
    }
}

/// Shared endpoint checks: both coordinates on the board, a piece on the
/// source, an empty and distinct destination.
fn check_endpoints(
    board: &Board,
    from: Position,
    to: Position,
) -> Result<(Square, Player), MoveError> {
    let piece = board.get(from).ok_or(MoveError::OutOfBounds)?;
    let target = board.get(to).ok_or(MoveError::OutOfBounds)?;

    let Some(mover) = piece.owner() else {
        return Err(MoveError::EmptySource);
    };
    if !target.is_empty() {
        return Err(MoveError::DestinationOccupied);
    }
    if from == to {
        return Err(MoveError::NullMove);
    }

    Ok((piece, mover))
}

fn midpoint(from: Position, to: Position) -> Position {
    Position::new((from.row + to.row) / 2, (from.col + to.col) / 2)
}

/// The single-jump midpoint must hold an opponent piece, man or king.
fn capturable_midpoint(
    board: &Board,
    mover: Player,
    from: Position,
    to: Position,
) -> Result<Position, MoveError> {
    let mid = midpoint(from, to);
    let square = board.get(mid).ok_or(MoveError::OutOfBounds)?;
    if square.owner() == Some(mover.opponent()) {
        Ok(mid)
    } else {
        Err(MoveError::NothingToCapture)
    }
}

/// Straight diagonal multi-capture: |d_row| / 2 two-cell hops toward the
/// destination, each jumping an opponent piece and landing on an empty cell.
fn diagonal_chain(
    board: &Board,
    mover: Player,
    from: Position,
    to: Position,
) -> Result<Vec<Position>, MoveError> {
    let d_row = to.row as i32 - from.row as i32;
    if d_row.abs() % 2 != 0 {
        return Err(MoveError::IllegalShape);
    }
    let row_dir = d_row.signum();
    let col_dir = (to.col as i32 - from.col as i32).signum();

    let mut captures = Vec::new();
    let mut at = from;
    while at != to {
        let mid = offset(at, row_dir, col_dir).ok_or(MoveError::OutOfBounds)?;
        let landing = offset(at, 2 * row_dir, 2 * col_dir).ok_or(MoveError::OutOfBounds)?;

        let jumped = board.get(mid).ok_or(MoveError::OutOfBounds)?;
        if jumped.owner() != Some(mover.opponent()) {
            return Err(MoveError::NothingToCapture);
        }
        if landing != to && !board.get(landing).ok_or(MoveError::OutOfBounds)?.is_empty() {
            return Err(MoveError::BlockedPath);
        }

        captures.push(mid);
        at = landing;
    }

    Ok(captures)
}

/// Vertical multi-capture: the destination shares the source's column, so
/// the two-cell hops zig-zag, alternating column direction to cancel out.
/// Both column directions are searched at every hop; the chain is legal when
/// some sequence of hops reaches the destination capturing at each midpoint.
fn vertical_chain(
    board: &Board,
    mover: Player,
    from: Position,
    to: Position,
) -> Result<Vec<Position>, MoveError> {
    let d_row = to.row as i32 - from.row as i32;
    if d_row.abs() % 2 != 0 {
        return Err(MoveError::IllegalShape);
    }
    let row_dir = d_row.signum();
    let hops = d_row.abs() / 2;

    let mut captures = Vec::new();
    if zigzag(board, mover, from, to, row_dir, hops, &mut captures) {
        Ok(captures)
    } else {
        Err(MoveError::NothingToCapture)
    }
}

fn zigzag(
    board: &Board,
    mover: Player,
    at: Position,
    to: Position,
    row_dir: i32,
    hops_left: i32,
    captures: &mut Vec<Position>,
) -> bool {
    if hops_left == 0 {
        return at == to;
    }

    for col_dir in [1, -1] {
        let (Some(mid), Some(landing)) = (
            offset(at, row_dir, col_dir),
            offset(at, 2 * row_dir, 2 * col_dir),
        ) else {
            continue;
        };

        let jumped = board.get(mid);
        let landing_square = board.get(landing);
        if jumped.and_then(Square::owner) != Some(mover.opponent())
            || landing_square.is_none_or(|s| !s.is_empty())
        {
            continue;
        }

        captures.push(mid);
        if zigzag(board, mover, landing, to, row_dir, hops_left - 1, captures) {
            return true;
        }
        captures.pop();
    }

    false
}

/// Long diagonal king run: walks cell by cell toward the destination. Every
/// occupied cell on the way must be an opponent piece with an empty cell
/// immediately beyond it, and is captured.
fn king_run(
    board: &Board,
    mover: Player,
    from: Position,
    to: Position,
) -> Result<Vec<Position>, MoveError> {
    let row_dir = (to.row as i32 - from.row as i32).signum();
    let col_dir = (to.col as i32 - from.col as i32).signum();

    let mut captures = Vec::new();
    let mut at = offset(from, row_dir, col_dir).ok_or(MoveError::OutOfBounds)?;
    while at != to {
        let square = board.get(at).ok_or(MoveError::OutOfBounds)?;
        if !square.is_empty() {
            if square.owner() != Some(mover.opponent()) {
                return Err(MoveError::BlockedPath);
            }
            let beyond = offset(at, row_dir, col_dir).ok_or(MoveError::OutOfBounds)?;
            if !board.get(beyond).ok_or(MoveError::OutOfBounds)?.is_empty() {
                return Err(MoveError::BlockedPath);
            }
            captures.push(at);
        }
        at = offset(at, row_dir, col_dir).ok_or(MoveError::OutOfBounds)?;
    }

    Ok(captures)
}
