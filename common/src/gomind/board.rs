use crate::gomind::coordinate::Coordinate;
use crate::gomind::stone::{Color, Stone};
use hashbrown::HashSet;
use thiserror::Error;

pub const BOARD_SIZE: usize = 19;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("There's already a piece at {0}")]
    OccupiedCell(Coordinate),
    #[error("It's not your turn")]
    NotYourTurn,
    #[error("A stone at {0} would have no liberties")]
    Suicide(Coordinate),
    #[error("{0} is outside of the {1}x{1} board")]
    OutOfBounds(Coordinate, usize),
}

// Occupancy of the board, one set per color. A coordinate is never in both sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardState {
    white: HashSet<Coordinate>,
    black: HashSet<Coordinate>,
}

impl BoardState {
    pub fn new() -> Self {
        BoardState::default()
    }

    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    pub fn in_bounds(&self, coordinate: Coordinate) -> bool {
        coordinate.in_bounds(BOARD_SIZE)
    }

    pub fn has_stone_at(&self, coordinate: Coordinate) -> bool {
        self.white.contains(&coordinate) || self.black.contains(&coordinate)
    }

    pub fn stone_at(&self, coordinate: Coordinate) -> Option<Color> {
        if self.white.contains(&coordinate) {
            Some(Color::White)
        } else if self.black.contains(&coordinate) {
            Some(Color::Black)
        } else {
            None
        }
    }

    // Never removes stones; captures go through remove_stone
    pub fn place_stone(&mut self, coordinate: Coordinate, color: Color) -> Result<(), MoveError> {
        if !self.in_bounds(coordinate) {
            return Err(MoveError::OutOfBounds(coordinate, BOARD_SIZE));
        }
        if self.has_stone_at(coordinate) {
            return Err(MoveError::OccupiedCell(coordinate));
        }
        self.stones_mut(color).insert(coordinate);
        Ok(())
    }

    pub fn remove_stone(&mut self, coordinate: Coordinate) {
        self.white.remove(&coordinate);
        self.black.remove(&coordinate);
    }

    // Installs a decoded snapshot. The decoder guarantees the sets are disjoint.
    pub fn replace_all(&mut self, white: HashSet<Coordinate>, black: HashSet<Coordinate>) {
        debug_assert!(white.is_disjoint(&black));
        self.white = white;
        self.black = black;
    }

    pub fn white_stones(&self) -> &HashSet<Coordinate> {
        &self.white
    }

    pub fn black_stones(&self) -> &HashSet<Coordinate> {
        &self.black
    }

    pub fn stones(&self) -> impl Iterator<Item = Stone> + '_ {
        self.white
            .iter()
            .map(|c| Stone::new(*c, Color::White))
            .chain(self.black.iter().map(|c| Stone::new(*c, Color::Black)))
    }

    // On-board orthogonal neighbours of a coordinate
    pub fn neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        coordinate
            .neighbors()
            .into_iter()
            .filter(move |c| self.in_bounds(*c))
    }

    // Row-major, x varying fastest
    pub fn empty_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let size = BOARD_SIZE as i32;
        (0..size)
            .flat_map(move |y| (0..size).map(move |x| Coordinate::new(x, y)))
            .filter(move |c| !self.has_stone_at(*c))
    }

    fn stones_mut(&mut self, color: Color) -> &mut HashSet<Coordinate> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_no_stones() {
        let board = BoardState::new();
        for y in 0..BOARD_SIZE as i32 {
            for x in 0..BOARD_SIZE as i32 {
                assert!(!board.has_stone_at(Coordinate::new(x, y)));
            }
        }
        assert_eq!(board.empty_cells().count(), BOARD_SIZE * BOARD_SIZE);
    }

    #[test]
    fn test_place_stone() {
        let mut board = BoardState::new();
        let c = Coordinate::new(3, 3);
        assert!(board.place_stone(c, Color::White).is_ok());
        assert!(board.has_stone_at(c));
        assert_eq!(board.stone_at(c), Some(Color::White));

        let d = Coordinate::new(18, 0);
        assert!(board.place_stone(d, Color::Black).is_ok());
        assert_eq!(board.stone_at(d), Some(Color::Black));
        assert_eq!(board.stones().count(), 2);
    }

    #[test]
    fn test_place_stone_on_occupied_cell() {
        let mut board = BoardState::new();
        let c = Coordinate::new(3, 3);
        board.place_stone(c, Color::White).unwrap();
        let before = board.clone();
        assert_eq!(
            board.place_stone(c, Color::Black),
            Err(MoveError::OccupiedCell(c))
        );
        assert_eq!(
            board.place_stone(c, Color::White),
            Err(MoveError::OccupiedCell(c))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_stone_out_of_bounds() {
        let mut board = BoardState::new();
        let outside = Coordinate::new(19, 2);
        assert_eq!(
            board.place_stone(outside, Color::White),
            Err(MoveError::OutOfBounds(outside, BOARD_SIZE))
        );
        let negative = Coordinate::new(-1, 0);
        assert!(board.place_stone(negative, Color::Black).is_err());
        assert_eq!(board, BoardState::new());
    }

    #[test]
    fn test_remove_stone_is_idempotent() {
        let mut board = BoardState::new();
        let c = Coordinate::new(10, 4);
        board.place_stone(c, Color::Black).unwrap();
        board.remove_stone(c);
        assert!(!board.has_stone_at(c));
        board.remove_stone(c);
        assert_eq!(board, BoardState::new());
    }

    #[test]
    fn test_replace_all() {
        let mut board = BoardState::new();
        board.place_stone(Coordinate::new(0, 0), Color::White).unwrap();
        let white: HashSet<Coordinate> = [Coordinate::new(1, 1)].into_iter().collect();
        let black: HashSet<Coordinate> = [Coordinate::new(2, 2), Coordinate::new(2, 3)]
            .into_iter()
            .collect();
        board.replace_all(white.clone(), black.clone());
        assert!(!board.has_stone_at(Coordinate::new(0, 0)));
        assert_eq!(board.white_stones(), &white);
        assert_eq!(board.black_stones(), &black);
    }

    #[test]
    fn test_neighbors_stay_on_board() {
        let board = BoardState::new();
        assert_eq!(board.neighbors(Coordinate::new(0, 0)).count(), 2);
        assert_eq!(board.neighbors(Coordinate::new(0, 5)).count(), 3);
        assert_eq!(board.neighbors(Coordinate::new(5, 5)).count(), 4);
        assert_eq!(board.neighbors(Coordinate::new(18, 18)).count(), 2);
    }

    #[test]
    fn test_empty_cells_skip_stones() {
        let mut board = BoardState::new();
        board.place_stone(Coordinate::new(0, 0), Color::Black).unwrap();
        board.place_stone(Coordinate::new(1, 0), Color::White).unwrap();
        let mut cells = board.empty_cells();
        assert_eq!(cells.next(), Some(Coordinate::new(2, 0)));
        assert_eq!(board.empty_cells().count(), BOARD_SIZE * BOARD_SIZE - 2);
    }
}
