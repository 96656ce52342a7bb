use anyhow::anyhow;
use common::{SendError, SendMsg, SERVER_PORT};
use futures::channel::mpsc::{self, UnboundedSender};
use futures::future::{self, Either};
use futures::{SinkExt, StreamExt};
use gloo::console::log;
use gloo::timers::future::TimeoutFuture;
use reqwasm::http::Request;
use reqwasm::websocket::{futures::WebSocket, Message};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

pub const DISCOVERY_URL: &str = "http://alex.uwplse.org/homeserver_ip.txt";
const DISCOVERY_TIMEOUT_MS: u32 = 5_000;

// Outbound half of the socket. Dropping it closes the connection.
pub struct WsSender(UnboundedSender<String>);

impl From<UnboundedSender<String>> for WsSender {
    fn from(sender: UnboundedSender<String>) -> Self {
        WsSender(sender)
    }
}

impl SendMsg for WsSender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0.unbounded_send(msg.to_string()).map_err(|_| SendError)
    }
}

// Asks the discovery endpoint which host the game server is on
pub async fn discover(url: &str) -> anyhow::Result<String> {
    let request = fetch_host(url);
    let timeout = TimeoutFuture::new(DISCOVERY_TIMEOUT_MS);
    futures::pin_mut!(request);
    match future::select(request, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(anyhow!(
            "server discovery timed out after {} ms",
            DISCOVERY_TIMEOUT_MS
        )),
    }
}

async fn fetch_host(url: &str) -> anyhow::Result<String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| anyhow!("discovery request failed: {}", e))?;
    if !response.ok() {
        return Err(anyhow!("discovery returned status {}", response.status()));
    }
    let host = response
        .text()
        .await
        .map_err(|e| anyhow!("couldn't read discovery response: {}", e))?;
    let host = host.trim();
    if host.is_empty() {
        return Err(anyhow!("discovery returned no address"));
    }
    Ok(host.to_string())
}

pub fn server_url(host: &str) -> String {
    format!("ws://{}:{}", host, SERVER_PORT)
}

// Opens the game socket. Inbound text frames go to `on_message`, and `on_close`
// fires once the server side is gone.
pub fn connect(
    host: &str,
    on_message: Callback<String>,
    on_close: Callback<()>,
) -> anyhow::Result<WsSender> {
    let ws = WebSocket::open(&server_url(host)).map_err(|e| anyhow!("{}", e))?;
    let (mut write, mut read) = ws.split();

    let (in_tx, mut in_rx) = mpsc::unbounded::<String>();
    spawn_local(async move {
        while let Some(s) = in_rx.next().await {
            log!("sending move", &s);
            if let Err(e) = write.send(Message::Text(s)).await {
                log!("ws send failed:", e.to_string());
                break;
            }
        }
        let _ = write.close().await;
    });

    spawn_local(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(data)) => on_message.emit(data),
                Ok(Message::Bytes(b)) => {
                    if let Ok(val) = std::str::from_utf8(&b) {
                        on_message.emit(val.to_string());
                    }
                }
                Err(e) => {
                    log!("ws:", e.to_string());
                    break;
                }
            }
        }
        log!("WebSocket closed");
        on_close.emit(());
    });

    Ok(WsSender::from(in_tx))
}
