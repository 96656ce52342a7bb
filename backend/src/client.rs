use common::{SendError, SendMsg};
use hashbrown::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use warp::ws::Message;

pub type Clients = Arc<RwLock<HashMap<String, Client>>>;

#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Result<Message, warp::Error>>);

impl Sender {
    pub fn close(&self) -> Result<(), SendError> {
        self.0.send(Ok(Message::close())).map_err(|_| SendError)
    }
}

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0.send(Ok(Message::text(msg))).map_err(|_| SendError)
    }
}

// A player with an upgraded socket. Their game lives in the connection task.
#[derive(Debug, Clone)]
pub struct Client {
    pub sender: Sender,
}
