use crate::{
    client::Clients,
    config::ServerConfig,
    ws,
};
use common::SUB_PROTOCOL;
use tracing::info;
use uuid::Uuid;
use warp::{http::StatusCode, Rejection, Reply};

type Result<T> = std::result::Result<T, Rejection>;

// Address clients should open their WebSocket to
pub async fn discovery_handler(config: ServerConfig) -> Result<impl Reply> {
    Ok(config.advertised_host)
}

pub async fn ws_handler(
    ws: warp::ws::Ws,
    protocols: Option<String>,
    clients: Clients,
) -> Result<Box<dyn Reply>> {
    let id = Uuid::new_v4().as_simple().to_string();
    info!("upgrading connection for client {}", id);

    let reply = ws.on_upgrade(move |socket| ws::client_connection(socket, id, clients));
    if offers_sub_protocol(protocols.as_deref()) {
        Ok(Box::new(warp::reply::with_header(
            reply,
            "sec-websocket-protocol",
            SUB_PROTOCOL,
        )))
    } else {
        Ok(Box::new(reply))
    }
}

pub async fn health_handler() -> Result<impl Reply> {
    Ok(StatusCode::OK)
}

fn offers_sub_protocol(header: Option<&str>) -> bool {
    header.map_or(false, |protocols| {
        protocols.split(',').any(|p| p.trim() == SUB_PROTOCOL)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offers_sub_protocol() {
        assert!(offers_sub_protocol(Some("rust-websocket")));
        assert!(offers_sub_protocol(Some("chat, rust-websocket")));
        assert!(!offers_sub_protocol(Some("chat")));
        assert!(!offers_sub_protocol(None));
    }
}
