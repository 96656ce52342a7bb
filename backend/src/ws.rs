use crate::client::{Client, Clients, Sender};
use crate::game::{Game, RandomMoves};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

pub async fn client_connection(ws: WebSocket, id: String, clients: Clients) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel();

    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(e) = result {
            error!("error sending websocket msg: {}", e);
        }
    }));

    let sender = Sender(client_sender);
    let mut game = Game::new(RandomMoves::default());
    let connected = {
        let mut clients_map = clients.write().await;
        clients_map.insert(
            id.clone(),
            Client {
                sender: sender.clone(),
            },
        );
        clients_map.len()
    };

    info!("{} connected, {} clients online", id, connected);

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("error receiving ws message for id: {}): {}", id, e);
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        if !client_msg(&id, msg, &mut game, &sender) {
            break;
        }
    }

    if let Some(client) = clients.write().await.remove(&id) {
        // Fails once the forwarder has already finished
        let _ = client.sender.close();
    }
    info!("{} disconnected", id);
}

// Returns false once the connection should be closed
#[tracing::instrument(skip(game, sender))]
fn client_msg(id: &str, msg: Message, game: &mut Game<RandomMoves>, sender: &Sender) -> bool {
    let message = match msg.to_str() {
        Ok(v) => v.trim(),
        // Pings and binary frames
        Err(_) => return true,
    };
    info!("received message from {}: {}", id, message);

    if message == "ping" {
        return true;
    }

    game.handle_message(message, sender);
    if game.is_over() {
        info!("game with {} is over, closing connection", id);
        if let Err(err) = sender.close() {
            warn!("Couldn't send close message to client {}: {}", id, err);
        }
        return false;
    }
    true
}
