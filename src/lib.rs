//! Rules engine and turn management for two-player Dama (checkers) on an
//! 8x8 board: move validation for men and kings, capture chains, promotion,
//! capture scores, win and stalemate detection, and a fixed-layout binary
//! save format. Rendering, input capture, and audio live outside this crate
//! and consume the board contents, [`types::MoveOutcome`], and
//! [`types::GameSnapshot`].

pub mod board;
pub mod game;
pub mod rules;
pub mod state;
pub mod types;
