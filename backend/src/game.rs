use crate::util;
use common::messages::{encode_snapshot, parse_move};
use common::{BoardState, Color, Coordinate, SendMsg};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use std::fmt::Debug;
use tracing::{error, info, warn};

// The connected client always plays white, the server answers with black
const CLIENT_COLOR: Color = Color::White;
const SERVER_COLOR: Color = Color::Black;

pub trait MoveRng {
    fn choose<I: Iterator<Item = Coordinate> + Sized>(&mut self, moves: I) -> Option<Coordinate>;
}

#[derive(Debug)]
pub struct RandomMoves {
    rng: StdRng,
}

impl Default for RandomMoves {
    fn default() -> Self {
        RandomMoves {
            rng: StdRng::from_entropy(),
        }
    }
}

impl MoveRng for RandomMoves {
    fn choose<I: Iterator<Item = Coordinate> + Sized>(&mut self, moves: I) -> Option<Coordinate> {
        moves.choose(&mut self.rng)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProtocolState {
    AwaitingMove,
    End,
}

#[derive(Debug)]
pub struct Game<R: MoveRng + Debug> {
    board: BoardState,
    rng: R,
    protocol_state: ProtocolState,
}

impl<R: MoveRng + Debug> Game<R> {
    pub fn new(rng: R) -> Self {
        Game {
            board: BoardState::new(),
            rng,
            protocol_state: ProtocolState::AwaitingMove,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.protocol_state, ProtocolState::End)
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    // Plays the client's move and the server's answer, then reports the board
    // back. Illegal moves and a finished board end the game.
    pub fn handle_message(&mut self, msg: &str, client: &impl SendMsg) {
        if self.is_over() {
            return;
        }
        let coordinate = match parse_move(msg) {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!("Ignoring message: {}", err);
                // Sends the unchanged board right back
                send_board(client, &self.board);
                return;
            }
        };
        self.protocol_state = self.process_move(coordinate, client);
    }

    fn process_move(&mut self, coordinate: Coordinate, client: &impl SendMsg) -> ProtocolState {
        match self.board.play(coordinate, CLIENT_COLOR) {
            Ok(captured) => info!(
                "Placed {} stone at {}, captured {}",
                CLIENT_COLOR,
                coordinate,
                captured.len()
            ),
            Err(err) => {
                warn!("Illegal move: {}", err);
                return ProtocolState::End;
            }
        }

        let Some(answer) = self.rng.choose(self.board.legal_moves(SERVER_COLOR)) else {
            info!("No legal moves left for {}. Game is over.", SERVER_COLOR);
            return ProtocolState::End;
        };
        match self.board.play(answer, SERVER_COLOR) {
            Ok(captured) => info!(
                "Placed {} stone at {}, captured {}",
                SERVER_COLOR,
                answer,
                captured.len()
            ),
            Err(err) => {
                error!("Chosen answer {} was illegal: {}", answer, err);
                return ProtocolState::End;
            }
        }

        send_board(client, &self.board);
        if self.board.legal_moves(CLIENT_COLOR).next().is_none() {
            info!("No legal moves left for {}. Game is over.", CLIENT_COLOR);
            return ProtocolState::End;
        }
        ProtocolState::AwaitingMove
    }
}

fn send_board(client: &impl SendMsg, board: &BoardState) {
    let snapshot = encode_snapshot(board);
    // If the message fails to send even after retries, there's not much we can do but proceed
    let _ = util::retry(1, || client.send(&snapshot));
}
