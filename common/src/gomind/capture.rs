use crate::gomind::board::{BoardState, MoveError};
use crate::gomind::coordinate::Coordinate;
use crate::gomind::stone::Color;
use hashbrown::HashSet;
use tracing::debug;

// A maximal set of 4-connected stones of one color, with the empty cells around it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub stones: HashSet<Coordinate>,
    pub liberties: HashSet<Coordinate>,
}

impl Group {
    pub fn is_captured(&self) -> bool {
        self.liberties.is_empty()
    }
}

impl BoardState {
    pub fn group_at(&self, start: Coordinate) -> Option<Group> {
        let color = self.stone_at(start)?;
        let mut stones = HashSet::new();
        let mut liberties = HashSet::new();
        let mut to_process = vec![start];

        while let Some(current) = to_process.pop() {
            if !stones.insert(current) {
                continue;
            }
            for neighbor in self.neighbors(current) {
                match self.stone_at(neighbor) {
                    None => {
                        liberties.insert(neighbor);
                    }
                    Some(c) if c == color && !stones.contains(&neighbor) => {
                        to_process.push(neighbor);
                    }
                    Some(_) => (),
                }
            }
        }

        Some(Group {
            color,
            stones,
            liberties,
        })
    }

    pub fn liberties(&self, coordinate: Coordinate) -> usize {
        self.group_at(coordinate)
            .map_or(0, |group| group.liberties.len())
    }

    // Places a stone and resolves the captures it causes. Either the whole move
    // applies or the board is left untouched.
    pub fn play(&mut self, coordinate: Coordinate, color: Color) -> Result<Vec<Coordinate>, MoveError> {
        let mut tentative = self.clone();
        tentative.place_stone(coordinate, color)?;
        let captured = tentative.capture_around(coordinate, color.opponent());

        let own_group_captured = tentative
            .group_at(coordinate)
            .map_or(true, |group| group.is_captured());
        if own_group_captured {
            return Err(MoveError::Suicide(coordinate));
        }

        *self = tentative;
        Ok(captured)
    }

    pub fn is_legal(&self, coordinate: Coordinate, color: Color) -> bool {
        self.clone().play(coordinate, color).is_ok()
    }

    pub fn legal_moves(&self, color: Color) -> impl Iterator<Item = Coordinate> + '_ {
        self.empty_cells()
            .filter(move |c| self.is_legal(*c, color))
    }

    // Removes every group of `color` that has no liberties left. Running it on an
    // already resolved board removes nothing.
    pub fn resolve_captures(&mut self, color: Color) -> Vec<Coordinate> {
        let candidates: Vec<Coordinate> = match color {
            Color::White => self.white_stones().iter().copied().collect(),
            Color::Black => self.black_stones().iter().copied().collect(),
        };
        let mut visited = HashSet::new();
        let mut captured = Vec::new();
        for start in candidates {
            if visited.contains(&start) {
                continue;
            }
            if let Some(group) = self.group_at(start) {
                visited.extend(group.stones.iter().copied());
                if group.is_captured() {
                    captured.extend(group.stones.iter().copied());
                }
            }
        }
        for c in &captured {
            self.remove_stone(*c);
        }
        sort_coordinates(&mut captured);
        captured
    }

    // Opposing groups adjacent to a freshly placed stone
    fn capture_around(&mut self, coordinate: Coordinate, opponent: Color) -> Vec<Coordinate> {
        let mut captured = Vec::new();
        let adjacent: Vec<Coordinate> = self.neighbors(coordinate).collect();
        for neighbor in adjacent {
            if self.stone_at(neighbor) != Some(opponent) {
                continue;
            }
            if let Some(group) = self.group_at(neighbor) {
                if group.is_captured() {
                    debug!(
                        "capturing {} {} stones next to {}",
                        group.stones.len(),
                        opponent,
                        coordinate
                    );
                    for stone in group.stones {
                        self.remove_stone(stone);
                        captured.push(stone);
                    }
                }
            }
        }
        sort_coordinates(&mut captured);
        captured
    }
}

fn sort_coordinates(coordinates: &mut [Coordinate]) {
    coordinates.sort_by_key(|c| (c.y, c.x));
}
