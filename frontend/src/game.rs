use crate::ws::{self, WsSender};
use common::{Color, Coordinate, MoveError, Render, Session, Stone, SyncEngine};
use gloo::console::log;
use std::fmt;
use yew::prelude::*;

const BOARD_IMAGE: &str = "images/board.png";
const WHITE_STONE_IMAGE: &str = "images/white_piece.png";
const BLACK_STONE_IMAGE: &str = "images/black_piece.png";

#[derive(Debug, Clone)]
pub enum Message {
    Discovered(Result<String, String>),
    Inbound(String),
    Click(f64, f64),
    Closed,
    Redraw,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Discovered(result) => write!(f, "Discovered: {:?}", result),
            Message::Inbound(s) => write!(f, "Inbound: {:?}", s),
            Message::Click(x, y) => write!(f, "Click: {}, {}", x, y),
            Message::Closed => write!(f, "Closed"),
            Message::Redraw => write!(f, "Redraw"),
        }
    }
}

// The engine asks for a redraw, the component re-renders on the next update
pub struct Redraw(Callback<()>);

impl Render for Redraw {
    fn render(&self) {
        self.0.emit(());
    }
}

enum Phase {
    Discovering,
    Playing(SyncEngine<WsSender, Redraw>),
    // The connection is gone but the last board stays on screen
    Finished(Session),
    Failed(String),
}

const SERVER_CLOSED_NOTICE: &str = "Game over: the server closed the connection";

fn finished_phase(engine: &SyncEngine<WsSender, Redraw>) -> Phase {
    Phase::Finished(engine.session().clone())
}

pub struct Game {
    phase: Phase,
    notice: Option<String>,
}

impl Component for Game {
    type Message = Message;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_future(async {
            let result = ws::discover(ws::DISCOVERY_URL).await;
            Message::Discovered(result.map_err(|e| e.to_string()))
        });
        Game {
            phase: Phase::Discovering,
            notice: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match (msg, &mut self.phase) {
            (Message::Discovered(Ok(host)), Phase::Discovering) => {
                log!("connecting to", &host);
                let link = ctx.link();
                self.phase = match ws::connect(
                    &host,
                    link.callback(Message::Inbound),
                    link.callback(|_| Message::Closed),
                ) {
                    Ok(sender) => Phase::Playing(SyncEngine::new(
                        Session::default(),
                        sender,
                        Redraw(link.callback(|_| Message::Redraw)),
                    )),
                    Err(e) => Phase::Failed(format!("Couldn't connect to {}: {}", host, e)),
                };
            }
            (Message::Discovered(Err(e)), Phase::Discovering) => {
                log!("discovery failed:", &e);
                self.phase = Phase::Failed(format!("Couldn't find the game server: {}", e));
            }
            (Message::Click(x, y), Phase::Playing(engine)) => {
                self.notice = match engine.propose_click(x, y) {
                    Ok(_) => None,
                    Err(e) => Some(move_error_notice(&e)),
                };
            }
            (Message::Inbound(snapshot), Phase::Playing(engine)) => {
                if let Err(e) = engine.handle_message(&snapshot) {
                    // Dropping the engine closes the socket
                    self.phase = Phase::Failed(format!("Lost sync with the server: {}", e));
                } else {
                    self.notice = None;
                }
            }
            (Message::Closed, Phase::Playing(engine)) => {
                self.phase = finished_phase(engine);
                self.notice = Some(SERVER_CLOSED_NOTICE.to_string());
            }
            (Message::Redraw, _) => {}
            (msg, _) => {
                log!("ignored message", msg.to_string());
                return false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.phase {
            Phase::Discovering => html! { <p>{"Looking for the game server..."}</p> },
            Phase::Failed(reason) => html! { <p class={classes!("error")}>{reason}</p> },
            Phase::Playing(engine) => {
                let status = if engine.session().is_local_turn() {
                    "Your move"
                } else {
                    "Waiting for the server..."
                };
                view_board(ctx, engine.session(), status, self.notice.as_deref())
            }
            Phase::Finished(session) => {
                view_board(ctx, session, "Game over", self.notice.as_deref())
            }
        }
    }
}

fn move_error_notice(error: &MoveError) -> String {
    match error {
        MoveError::OccupiedCell(_) => "There's already a piece there!".to_string(),
        MoveError::NotYourTurn => "It's not your turn!".to_string(),
        other => other.to_string(),
    }
}

fn view_board(ctx: &Context<Game>, session: &Session, status: &str, notice: Option<&str>) -> Html {
    let geometry = *session.mapper().geometry();
    let onclick = ctx.link().callback(|e: MouseEvent| {
        Message::Click(f64::from(e.offset_x()), f64::from(e.offset_y()))
    });
    html! {
        <section id="page">
            <div
                class={classes!("board")}
                style={format!(
                    "position: relative; width: {}px; height: {}px;",
                    geometry.width, geometry.height
                )}
                {onclick}>
                <img
                    src={BOARD_IMAGE}
                    style={format!(
                        "position: absolute; left: 0; top: 0; width: {}px; height: {}px; pointer-events: none;",
                        geometry.width, geometry.height
                    )}/>
                { for session.board().stones().map(|stone| stone_image(session, stone)) }
            </div>
            <div class={classes!("status")}>{status}</div>
            {
                match notice {
                    Some(text) => html! { <div class={classes!("notice")}>{text}</div> },
                    None => html! {},
                }
            }
        </section>
    }
}

fn stone_image(session: &Session, stone: Stone) -> Html {
    let geometry = session.mapper().geometry();
    let (left, top) = session.mapper().cell_to_pixel(stone.coordinate);
    let src = match stone.color {
        Color::White => WHITE_STONE_IMAGE,
        Color::Black => BLACK_STONE_IMAGE,
    };
    html! {
        <img
            key={cell_key(stone.coordinate)}
            {src}
            style={format!(
                "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; pointer-events: none;",
                left, top, geometry.stone_width, geometry.stone_height
            )}/>
    }
}

fn cell_key(coordinate: Coordinate) -> String {
    format!("{}-{}", coordinate.x, coordinate.y)
}
