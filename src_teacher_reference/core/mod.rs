pub mod bitboard;
pub mod board;
pub mod config;
pub mod constants;
pub mod types;
pub mod zobrist;
pub mod fen;
pub mod moves;
pub mod queries;

// Re-export commonly used types
pub use board::Board;
pub use types::{Move, Piece, Color, Square, MoveList};
pub use constants::*;
pub use types::Bitboard;
pub use fen::FenError;
