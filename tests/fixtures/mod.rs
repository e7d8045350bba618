//! Shared test fixtures.

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::StreamExt;
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use pong_relay_rs::{
    domain::SessionStore,
    infrastructure::store::InMemorySessionStore,
    server::build_router,
    ui::state::AppState,
    usecase::RoomLifecycle,
};

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A relay server on an ephemeral port backed by the in-memory store.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let state = Arc::new(AppState {
            store: store.clone(),
            lifecycle: RoomLifecycle::new(store, Duration::from_secs(7200)),
            backend: "memory",
            session_ttl: Duration::from_secs(3600),
            rooms: Arc::new(Mutex::new(HashMap::new())),
        });
        let app = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self { addr, handle }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Connect a WebSocket client, creating a room (no code) or
    /// joining one (with code).
    pub async fn connect(&self, game: Option<&str>) -> WsClient {
        let url = match game {
            Some(code) => format!("{}?game={}", self.ws_url(), code),
            None => self.ws_url(),
        };
        let (socket, _) = connect_async(&url).await.expect("Failed to connect");
        socket
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Receive the next text frame as JSON, with a timeout.
pub async fn recv_event(client: &mut WsClient) -> serde_json::Value {
    let deadline = Duration::from_secs(5);
    loop {
        let msg = tokio::time::timeout(deadline, client.next())
            .await
            .expect("Timed out waiting for event")
            .expect("Connection closed")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("Failed to parse JSON");
        }
    }
}
