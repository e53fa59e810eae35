//! The maze: pieces and the board that holds them.

mod board;
mod piece;

pub use board::Board;
pub use piece::{Piece, Shape};
