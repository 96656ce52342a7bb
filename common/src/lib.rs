pub mod gomind;
pub mod messages;
pub mod sync;

pub use gomind::{
    BoardState, Color, Coordinate, CoordinateMapper, Geometry, Group, MoveError, Stone,
    BOARD_SIZE,
};
pub use messages::{MoveParseError, SnapshotError};
pub use sync::{Render, SendError, SendMsg, Session, SyncEngine, TurnState};

// Default port of the authority's WebSocket endpoint
pub const SERVER_PORT: u16 = 2794;
pub const SUB_PROTOCOL: &str = "rust-websocket";
