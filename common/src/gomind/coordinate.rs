use std::fmt;

// Signed so that pointer input slightly outside the board still maps to a value
// that can be rejected instead of wrapping around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    pub fn in_bounds(&self, size: usize) -> bool {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    // West, east, north, south. May contain off-board coordinates.
    pub fn neighbors(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.x - 1, self.y),
            Coordinate::new(self.x + 1, self.y),
            Coordinate::new(self.x, self.y - 1),
            Coordinate::new(self.x, self.y + 1),
        ]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Coordinate::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        assert!(Coordinate::new(0, 0).in_bounds(19));
        assert!(Coordinate::new(18, 18).in_bounds(19));
        assert!(!Coordinate::new(19, 0).in_bounds(19));
        assert!(!Coordinate::new(0, 19).in_bounds(19));
        assert!(!Coordinate::new(-1, 3).in_bounds(19));
        assert!(!Coordinate::new(3, -1).in_bounds(19));
    }

    #[test]
    fn test_neighbors() {
        let neighbors = Coordinate::new(0, 0).neighbors();
        assert_eq!(neighbors[0], Coordinate::new(-1, 0));
        assert_eq!(neighbors[1], Coordinate::new(1, 0));
        assert_eq!(neighbors[2], Coordinate::new(0, -1));
        assert_eq!(neighbors[3], Coordinate::new(0, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(3, 15).to_string(), "(3, 15)");
    }
}
