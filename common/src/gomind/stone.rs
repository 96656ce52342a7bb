use crate::gomind::coordinate::Coordinate;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stone {
    pub coordinate: Coordinate,
    pub color: Color,
}

impl Stone {
    pub fn new(coordinate: Coordinate, color: Color) -> Self {
        Stone { coordinate, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }

    #[test]
    fn test_stone_equality() {
        let c = Coordinate::new(4, 4);
        assert_eq!(Stone::new(c, Color::White), Stone::new(c, Color::White));
        assert_ne!(Stone::new(c, Color::White), Stone::new(c, Color::Black));
        assert_ne!(
            Stone::new(c, Color::White),
            Stone::new(Coordinate::new(4, 5), Color::White)
        );
    }
}
