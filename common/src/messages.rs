use crate::gomind::{BoardState, Color, Coordinate, BOARD_SIZE};
use hashbrown::HashSet;
use thiserror::Error;

pub const ROW_TERMINATOR: u8 = b'\n';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot has length {actual}, expected {expected}")]
    WrongLength { actual: usize, expected: usize },
    #[error("Unrecognized character {found:?} in cell {cell} of the snapshot")]
    UnrecognizedCharacter { found: char, cell: Coordinate },
    #[error("Row {row} of the snapshot is not terminated by a newline, found {found:?}")]
    MissingRowTerminator { row: usize, found: char },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Move {0:?} is not of the form \"x,y\"")]
    BadFormat(String),
    #[error("Couldn't parse {0} coordinate {1:?}")]
    BadCoordinate(char, String),
}

// Length of a full snapshot: one terminator per row
pub fn snapshot_len() -> usize {
    (BOARD_SIZE + 1) * BOARD_SIZE
}

pub fn encode_move(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.x, coordinate.y)
}

pub fn parse_move(message: &str) -> Result<Coordinate, MoveParseError> {
    let parts: Vec<&str> = message.trim().split(',').collect();
    let &[x, y] = parts.as_slice() else {
        return Err(MoveParseError::BadFormat(message.to_string()));
    };
    Ok(Coordinate::new(parse_axis('x', x)?, parse_axis('y', y)?))
}

fn parse_axis(axis: char, value: &str) -> Result<i32, MoveParseError> {
    let value = value.trim();
    // Reject signs so that "-1" and "+1" are not accepted as cells
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoveParseError::BadCoordinate(axis, value.to_string()));
    }
    value
        .parse::<i32>()
        .map_err(|_| MoveParseError::BadCoordinate(axis, value.to_string()))
}

pub fn encode_snapshot(board: &BoardState) -> String {
    let mut result = String::with_capacity(snapshot_len());
    for y in 0..BOARD_SIZE as i32 {
        for x in 0..BOARD_SIZE as i32 {
            result.push(match board.stone_at(Coordinate::new(x, y)) {
                Some(Color::White) => 'W',
                Some(Color::Black) => 'B',
                None => '.',
            });
        }
        result.push(ROW_TERMINATOR as char);
    }
    result
}

/// Decodes a full board snapshot into the white and black stone sets.
///
/// Decoding is strict: the snapshot must be exactly [`snapshot_len`] bytes,
/// every cell must be `W`, `B`, `.` or a space, and every row must end in a
/// newline. The returned sets are disjoint since each cell yields at most one
/// stone.
pub fn decode_snapshot(
    snapshot: &str,
) -> Result<(HashSet<Coordinate>, HashSet<Coordinate>), SnapshotError> {
    let bytes = snapshot.as_bytes();
    if bytes.len() != snapshot_len() {
        return Err(SnapshotError::WrongLength {
            actual: bytes.len(),
            expected: snapshot_len(),
        });
    }

    let mut white = HashSet::new();
    let mut black = HashSet::new();
    for (row, line) in bytes.chunks(BOARD_SIZE + 1).enumerate() {
        let terminator = line[BOARD_SIZE];
        if terminator != ROW_TERMINATOR {
            return Err(SnapshotError::MissingRowTerminator {
                row,
                found: terminator as char,
            });
        }
        for (column, cell) in line[..BOARD_SIZE].iter().enumerate() {
            let coordinate = Coordinate::new(column as i32, row as i32);
            match cell {
                b'W' => {
                    white.insert(coordinate);
                }
                b'B' => {
                    black.insert(coordinate);
                }
                b'.' | b' ' => (),
                other => {
                    return Err(SnapshotError::UnrecognizedCharacter {
                        found: *other as char,
                        cell: coordinate,
                    })
                }
            }
        }
    }
    Ok((white, black))
}
