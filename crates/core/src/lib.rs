//! Blockgrid core crate - fundamental types for the block placement puzzle.

mod board;
mod catalogue;
mod error;
mod piece;
mod position;
mod state;

pub use board::{Board, Cell};
pub use catalogue::{Catalogue, CatalogueEntry, RawEntry};
pub use error::{CatalogueError, ShapeError};
pub use piece::{Color, Difficulty, Piece, PieceId, Shape, ShapeClass, MAX_SHAPE_SIDE};
pub use position::{Point, Position};
pub use state::{PieceTriple, SessionSnapshot, TRIPLE_SIZE};
