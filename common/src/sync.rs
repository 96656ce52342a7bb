use crate::gomind::{BoardState, Color, Coordinate, CoordinateMapper, Geometry, MoveError};
use crate::messages::{self, SnapshotError};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
#[error("Error sending message")]
pub struct SendError;

// Outbound half of the connection to the authority
pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), SendError>;
}

// Called after every state change. Implementations read the session themselves.
pub trait Render {
    fn render(&self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    LocalTurn,
    WaitingForRemote,
}

/// Everything one connection to the authority knows about the game.
#[derive(Clone, Debug)]
pub struct Session {
    board: BoardState,
    turn: TurnState,
    mapper: CoordinateMapper,
    color: Color,
}

impl Session {
    pub fn new(color: Color, geometry: Geometry) -> Self {
        Session {
            board: BoardState::new(),
            turn: TurnState::LocalTurn,
            mapper: CoordinateMapper::new(geometry),
            color,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn is_local_turn(&self) -> bool {
        self.turn == TurnState::LocalTurn
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Color::White, Geometry::default())
    }
}

/// Keeps the local board in step with the authority.
///
/// Local moves are validated and applied optimistically, then sent as `"x,y"`.
/// The turn passes to the remote side as soon as a move is sent and comes back
/// with the next snapshot, whatever that snapshot contains.
pub struct SyncEngine<S: SendMsg, R: Render> {
    session: Session,
    sender: S,
    renderer: R,
}

impl<S: SendMsg, R: Render> SyncEngine<S, R> {
    pub fn new(session: Session, sender: S, renderer: R) -> Self {
        SyncEngine {
            session,
            sender,
            renderer,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Validates and plays a local move, returning the captured stones.
    ///
    /// Fails without touching the board or the turn if it is not the local
    /// player's turn, the cell is off the board or occupied, or the stone
    /// would be left without liberties.
    #[tracing::instrument(skip(self))]
    pub fn propose_move(
        &mut self,
        coordinate: Coordinate,
        color: Color,
    ) -> Result<Vec<Coordinate>, MoveError> {
        if !self.session.is_local_turn() {
            return Err(MoveError::NotYourTurn);
        }
        let captured = self.session.board.play(coordinate, color)?;
        info!(
            "placed {} stone at {}, captured {}",
            color,
            coordinate,
            captured.len()
        );
        self.session.turn = TurnState::WaitingForRemote;

        // Fire and forget: the move counts as made once handed to the transport
        if let Err(err) = self.sender.send(&messages::encode_move(coordinate)) {
            error!("failed to send move {}: {}", coordinate, err);
        }
        self.renderer.render();
        Ok(captured)
    }

    /// Maps a pointer position to a cell and proposes a move there with the
    /// session's color.
    pub fn propose_click(
        &mut self,
        pixel_x: f64,
        pixel_y: f64,
    ) -> Result<Vec<Coordinate>, MoveError> {
        let coordinate = self.session.mapper.pixel_to_cell(pixel_x, pixel_y);
        self.propose_move(coordinate, self.session.color)
    }

    /// Replaces the board with an authoritative snapshot and hands the turn
    /// back to the local player. A malformed snapshot changes nothing.
    pub fn apply_snapshot(&mut self, snapshot: &str) -> Result<(), SnapshotError> {
        let (white, black) = messages::decode_snapshot(snapshot)?;
        self.session.board.replace_all(white, black);
        self.session.turn = TurnState::LocalTurn;
        self.renderer.render();
        Ok(())
    }

    // Inbound entry point for transports. An error means the session is out of
    // sync and the connection should be closed.
    pub fn handle_message(&mut self, message: &str) -> Result<(), SnapshotError> {
        match self.apply_snapshot(message) {
            Ok(()) => {
                info!(
                    "applied snapshot with {} white and {} black stones",
                    self.session.board.white_stones().len(),
                    self.session.board.black_stones().len()
                );
                Ok(())
            }
            Err(err) => {
                warn!("rejected snapshot from server: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gomind::BOARD_SIZE;
    use crate::messages::{encode_snapshot, snapshot_len};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MockSender {
        sent: RefCell<Vec<String>>,
    }

    impl SendMsg for MockSender {
        fn send(&self, msg: &str) -> Result<(), SendError> {
            self.sent.borrow_mut().push(msg.to_string());
            Ok(())
        }
    }

    struct ClosedSender;

    impl SendMsg for ClosedSender {
        fn send(&self, _msg: &str) -> Result<(), SendError> {
            Err(SendError)
        }
    }

    #[derive(Default)]
    struct MockRenderer {
        calls: Cell<usize>,
    }

    impl Render for MockRenderer {
        fn render(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn engine() -> SyncEngine<MockSender, MockRenderer> {
        SyncEngine::new(
            Session::default(),
            MockSender::default(),
            MockRenderer::default(),
        )
    }

    fn snapshot_of(white: &[(i32, i32)], black: &[(i32, i32)]) -> String {
        let mut board = BoardState::new();
        for &c in white {
            board.place_stone(c.into(), Color::White).unwrap();
        }
        for &c in black {
            board.place_stone(c.into(), Color::Black).unwrap();
        }
        encode_snapshot(&board)
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        assert_eq!(engine.session().turn(), TurnState::LocalTurn);
        assert_eq!(engine.session().color(), Color::White);
        assert_eq!(engine.session().board(), &BoardState::new());
    }

    #[test]
    fn test_propose_move_then_not_your_turn() {
        let mut engine = engine();
        let captured = engine
            .propose_move(Coordinate::new(3, 3), Color::White)
            .unwrap();
        assert!(captured.is_empty());
        assert!(engine.session().board().has_stone_at(Coordinate::new(3, 3)));
        assert!(!engine.session().is_local_turn());
        assert_eq!(engine.sender.sent.borrow().as_slice(), ["3,3"]);
        assert_eq!(engine.renderer.calls.get(), 1);

        let before = engine.session().board().clone();
        assert_eq!(
            engine.propose_move(Coordinate::new(4, 4), Color::White),
            Err(MoveError::NotYourTurn)
        );
        assert_eq!(engine.session().board(), &before);
        assert_eq!(engine.sender.sent.borrow().len(), 1);
        assert_eq!(engine.renderer.calls.get(), 1);
    }

    #[test]
    fn test_propose_move_on_occupied_cell() {
        let mut engine = engine();
        engine
            .apply_snapshot(&snapshot_of(&[], &[(9, 9)]))
            .unwrap();
        assert_eq!(
            engine.propose_move(Coordinate::new(9, 9), Color::White),
            Err(MoveError::OccupiedCell(Coordinate::new(9, 9)))
        );
        assert!(engine.session().is_local_turn());
        assert!(engine.sender.sent.borrow().is_empty());
    }

    #[test]
    fn test_propose_move_out_of_bounds() {
        let mut engine = engine();
        assert_eq!(
            engine.propose_move(Coordinate::new(-1, 0), Color::White),
            Err(MoveError::OutOfBounds(Coordinate::new(-1, 0), BOARD_SIZE))
        );
        assert!(engine.session().is_local_turn());
    }

    #[test]
    fn test_suicide_leaves_session_unchanged() {
        let mut engine = engine();
        engine
            .apply_snapshot(&snapshot_of(&[], &[(4, 5), (6, 5), (5, 4), (5, 6)]))
            .unwrap();
        let before = engine.session().board().clone();
        let renders = engine.renderer.calls.get();
        assert_eq!(
            engine.propose_move(Coordinate::new(5, 5), Color::White),
            Err(MoveError::Suicide(Coordinate::new(5, 5)))
        );
        assert_eq!(engine.session().board(), &before);
        assert_eq!(
            encode_snapshot(engine.session().board()),
            encode_snapshot(&before)
        );
        assert!(engine.session().is_local_turn());
        assert!(engine.sender.sent.borrow().is_empty());
        assert_eq!(engine.renderer.calls.get(), renders);
    }

    #[test]
    fn test_surrounding_move_captures() {
        let mut engine = SyncEngine::new(
            Session::new(Color::Black, Geometry::default()),
            MockSender::default(),
            MockRenderer::default(),
        );
        engine
            .apply_snapshot(&snapshot_of(&[(5, 5)], &[(4, 5), (6, 5), (5, 4)]))
            .unwrap();
        let captured = engine
            .propose_move(Coordinate::new(5, 6), Color::Black)
            .unwrap();
        assert_eq!(captured, vec![Coordinate::new(5, 5)]);
        assert!(!engine.session().board().has_stone_at(Coordinate::new(5, 5)));
        assert_eq!(engine.sender.sent.borrow().as_slice(), ["5,6"]);
    }

    #[test]
    fn test_apply_snapshot_returns_turn() {
        let mut engine = engine();
        engine
            .propose_move(Coordinate::new(3, 3), Color::White)
            .unwrap();
        engine
            .apply_snapshot(&snapshot_of(&[(3, 3)], &[(15, 15)]))
            .unwrap();
        assert!(engine.session().is_local_turn());
        let board = engine.session().board();
        assert_eq!(board.stone_at(Coordinate::new(3, 3)), Some(Color::White));
        assert_eq!(board.stone_at(Coordinate::new(15, 15)), Some(Color::Black));
        assert_eq!(engine.renderer.calls.get(), 2);

        // Snapshots are accepted on the local turn too
        engine
            .apply_snapshot(&snapshot_of(&[], &[]))
            .unwrap();
        assert!(engine.session().is_local_turn());
        assert_eq!(engine.session().board(), &BoardState::new());
    }

    #[test]
    fn test_malformed_snapshot_changes_nothing() {
        let mut engine = engine();
        engine
            .propose_move(Coordinate::new(3, 3), Color::White)
            .unwrap();
        let before = engine.session().board().clone();
        let short = ".".repeat(snapshot_len() - 1);
        assert_eq!(
            engine.handle_message(&short),
            Err(SnapshotError::WrongLength {
                actual: snapshot_len() - 1,
                expected: snapshot_len(),
            })
        );
        assert_eq!(engine.session().board(), &before);
        assert_eq!(engine.session().turn(), TurnState::WaitingForRemote);
        assert_eq!(engine.renderer.calls.get(), 1);

        let garbage = snapshot_of(&[], &[]).replacen('.', "?", 1);
        assert!(engine.handle_message(&garbage).is_err());
        assert_eq!(engine.session().turn(), TurnState::WaitingForRemote);
    }

    #[test]
    fn test_send_failure_still_passes_turn() {
        let mut engine = SyncEngine::new(
            Session::default(),
            ClosedSender,
            MockRenderer::default(),
        );
        assert!(engine
            .propose_move(Coordinate::new(0, 0), Color::White)
            .is_ok());
        assert_eq!(engine.session().turn(), TurnState::WaitingForRemote);
        assert_eq!(engine.renderer.calls.get(), 1);
    }

    #[test]
    fn test_propose_click() {
        let mut engine = engine();
        let (px, py) = engine.session().mapper().cell_to_pixel(Coordinate::new(7, 11));
        engine.propose_click(px + 1.0, py + 1.0).unwrap();
        assert_eq!(
            engine.session().board().stone_at(Coordinate::new(7, 11)),
            Some(Color::White)
        );
        assert_eq!(engine.sender.sent.borrow().as_slice(), ["7,11"]);
    }

    #[test]
    fn test_click_off_board_is_rejected() {
        let mut engine = engine();
        assert!(matches!(
            engine.propose_click(0.0, 0.0),
            Err(MoveError::OutOfBounds(_, _))
        ));
        assert!(engine.session().is_local_turn());
    }
}
