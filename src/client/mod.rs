//! Headless demo client.
//!
//! Connects to the relay, runs the match engine at the fixed tick rate
//! and plays with a simple ball-tracking paddle. Useful for exercising
//! a relay without a browser: run one instance with no arguments to
//! create a room, then a second with `--game <CODE>` to fill it.

use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{
    config::ClientConfig,
    domain::Role,
    game::{
        MatchEngine, MatchPhase,
        state::{BALL_SIZE, PADDLE_HEIGHT, TICK_HZ},
    },
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
};

/// Paddle travel per tick for the tracking bot.
const BOT_PADDLE_SPEED: f32 = 6.0;
/// Liveness probe interval.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Run the headless client until the match ends or the relay hangs up.
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let url = match &config.game {
        Some(code) => format!("{}?game={}", config.url, code),
        None => config.url.clone(),
    };

    let (socket, _) = connect_async(&url).await?;
    tracing::info!("Connected to {}", config.url);
    let (mut sink, mut stream) = socket.split();

    let mut engine = MatchEngine::new();
    let mut tick = tokio::time::interval(Duration::from_secs_f64(1.0 / TICK_HZ));
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.reset(); // skip the immediate first tick

    loop {
        tokio::select! {
            msg = stream.next() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                };
                match msg {
                    Message::Text(text) => {
                        let event = match serde_json::from_str::<ServerEvent>(&text) {
                            Ok(event) => event,
                            Err(e) => {
                                tracing::warn!("Unparseable event: {}", e);
                                continue;
                            }
                        };
                        log_event(&event);
                        engine.handle_server_event(&event);
                        if engine.phase() == MatchPhase::GameOver {
                            announce_winner(&engine);
                            return Ok(());
                        }
                    }
                    Message::Close(_) => {
                        tracing::info!("Relay closed the connection");
                        break;
                    }
                    _ => {}
                }
            }
            _ = tick.tick() => {
                for event in engine.tick(Instant::now()) {
                    send_event(&mut sink, &event).await?;
                }
                if engine.phase() == MatchPhase::GameOver {
                    announce_winner(&engine);
                    return Ok(());
                }
                if let Some(event) = track_ball(&mut engine) {
                    send_event(&mut sink, &event).await?;
                }
            }
            _ = ping.tick() => {
                send_event(&mut sink, &ClientEvent::Ping).await?;
            }
        }
    }

    Ok(())
}

async fn send_event<S>(sink: &mut S, event: &ClientEvent) -> Result<(), Box<dyn std::error::Error>>
where
    S: SinkExt<Message> + Unpin,
    S::Error: std::error::Error + 'static,
{
    let json = serde_json::to_string(event)?;
    sink.send(Message::Text(json.into())).await?;
    Ok(())
}

/// Step the bot paddle toward the ball's vertical center.
fn track_ball(engine: &mut MatchEngine) -> Option<ClientEvent> {
    let role = engine.role()?;
    let state = engine.state();
    let current = match role {
        Role::First => state.paddle_a,
        Role::Second => state.paddle_b,
    };
    let target = state.ball.y + BALL_SIZE / 2.0 - PADDLE_HEIGHT / 2.0;
    let delta = (target - current).clamp(-BOT_PADDLE_SPEED, BOT_PADDLE_SPEED);
    if delta.abs() < f32::EPSILON {
        return None;
    }
    engine.set_own_paddle(current + delta)
}

fn log_event(event: &ServerEvent) {
    match event {
        ServerEvent::RoomId { room_id } => {
            tracing::info!("Room code: {} (share it to invite a peer)", room_id);
        }
        ServerEvent::Role { role } => tracing::info!("Assigned role: {:?}", role),
        ServerEvent::PeerPresence { present } => tracing::info!("Peer present: {}", present),
        ServerEvent::PeerConnected { role } => tracing::info!("Peer connected as {:?}", role),
        ServerEvent::PeerDisconnected { role } => tracing::info!("Peer {:?} disconnected", role),
        ServerEvent::Pong => tracing::debug!("Pong"),
        _ => {}
    }
}

fn announce_winner(engine: &MatchEngine) {
    match engine.winner() {
        Some(Role::First) => tracing::info!("Match over: Player 1 wins"),
        Some(Role::Second) => tracing::info!("Match over: Player 2 wins"),
        None => {}
    }
}
