use crate::client::Clients;
use crate::config::{ServerConfig, CONFIG_PATH};
use hashbrown::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use warp::{
    http::{header, Method},
    Filter, Rejection, Reply,
};

mod client;
mod config;
mod game;
mod handler;
mod util;
mod ws;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not start server! {}", err);
            return;
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_directory, "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(non_blocking)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install logger: {}", err);
        return;
    }

    let clients: Clients = Arc::new(RwLock::new(HashMap::new()));
    info!("starting server on {}", config.bind_address);

    let health_route = warp::path!("health").and_then(handler::health_handler);

    let discovery_route = warp::path!("homeserver_ip.txt")
        .and(warp::get())
        .and(with_config(config.clone()))
        .and_then(handler::discovery_handler);

    let routes = health_route
        .or(discovery_route)
        .or(ws_route(clients.clone()))
        .with(
            warp::cors()
                .allow_methods(&[Method::OPTIONS, Method::GET])
                .allow_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
                .max_age(300)
                .allow_any_origin(),
        );

    warp::serve(routes).run(config.bind_address).await;
}

// Clients are registered by the connection task once the socket is upgraded
fn ws_route(
    clients: Clients,
) -> impl Filter<Extract = (Box<dyn Reply>,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::ws())
        .and(warp::header::optional::<String>("sec-websocket-protocol"))
        .and(with_clients(clients))
        .and_then(handler::ws_handler)
}

fn with_clients(clients: Clients) -> impl Filter<Extract = (Clients,), Error = Infallible> + Clone {
    warp::any().map(move || clients.clone())
}

fn with_config(
    config: ServerConfig,
) -> impl Filter<Extract = (ServerConfig,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}
