mod board;
mod capture;
mod coordinate;
mod mapper;
mod stone;

pub use board::{BoardState, MoveError, BOARD_SIZE};
pub use capture::Group;
pub use coordinate::Coordinate;
pub use mapper::{CoordinateMapper, Geometry};
pub use stone::{Color, Stone};
