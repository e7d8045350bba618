//! Match engine: one client's half of the synchronization protocol.
//!
//! Reconciliation rules:
//! - only the First participant advances the ball and increments
//!   scores, broadcasting both after every tick in which they changed;
//! - each participant broadcasts its own paddle and renders the peer's
//!   paddle purely from the last received broadcast (no prediction);
//! - the non-authoritative participant never mutates ball or score
//!   state from its own physics, so ball ownership is single-writer
//!   and no conflict resolution is needed;
//! - after GameOver, incoming ball broadcasts are ignored until a
//!   `resetMatch` arrives.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::{
    domain::Role,
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
};

use super::state::{
    BALL_SIZE, BALL_SPEED, BOARD_HEIGHT, BOARD_WIDTH, MatchPhase, PADDLE_HEIGHT, PADDLE_WIDTH,
    SharedMatchState, TICK_HZ, WIN_SCORE,
};

/// Upper bound on simulation catch-up after a stall, in frames.
const MAX_CATCHUP_FRAMES: u32 = 10;

/// Per-match client state machine.
pub struct MatchEngine {
    role: Option<Role>,
    phase: MatchPhase,
    state: SharedMatchState,
    room_code: Option<String>,
    peer_connected: bool,
    last_tick: Option<Instant>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            role: None,
            phase: MatchPhase::WaitingForRole,
            state: SharedMatchState::new(),
            room_code: None,
            peer_connected: false,
            last_tick: None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn state(&self) -> &SharedMatchState {
        &self.state
    }

    pub fn room_code(&self) -> Option<&str> {
        self.room_code.as_deref()
    }

    /// The winning side once the score threshold is reached.
    pub fn winner(&self) -> Option<Role> {
        if self.state.score_a >= WIN_SCORE {
            Some(Role::First)
        } else if self.state.score_b >= WIN_SCORE {
            Some(Role::Second)
        } else {
            None
        }
    }

    /// Apply one relayed event to the local view.
    pub fn handle_server_event(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::RoomId { room_id } => {
                self.room_code = Some(room_id.clone());
            }
            ServerEvent::Role { role } => {
                self.role = Some(*role);
                if self.phase == MatchPhase::WaitingForRole {
                    self.phase = MatchPhase::WaitingForPeer;
                }
            }
            ServerEvent::PeerPresence { present } => {
                self.set_peer_present(*present);
            }
            ServerEvent::PeerConnected { .. } => {
                self.set_peer_present(true);
            }
            ServerEvent::PeerDisconnected { .. } => {
                self.peer_connected = false;
                if self.phase == MatchPhase::Playing {
                    self.phase = MatchPhase::Paused;
                }
            }
            ServerEvent::PaddleA { y } => {
                // Own paddle is single-writer; only apply the peer's.
                if self.role != Some(Role::First) {
                    self.state.paddle_a = *y;
                }
            }
            ServerEvent::PaddleB { y } => {
                if self.role != Some(Role::Second) {
                    self.state.paddle_b = *y;
                }
            }
            ServerEvent::BallState { x, y, vx, vy } => {
                if self.role != Some(Role::First) && self.phase != MatchPhase::GameOver {
                    self.state.ball.x = *x;
                    self.state.ball.y = *y;
                    self.state.ball.vx = *vx;
                    self.state.ball.vy = *vy;
                }
            }
            ServerEvent::ScoreState { score_a, score_b } => {
                if self.role != Some(Role::First) {
                    self.state.score_a = *score_a;
                    self.state.score_b = *score_b;
                    if self.winner().is_some() {
                        self.state.game_over = true;
                        self.phase = MatchPhase::GameOver;
                    }
                }
            }
            ServerEvent::ResetMatch => {
                self.apply_reset();
            }
            ServerEvent::Pong => {}
        }
    }

    /// Advance the fixed-step simulation up to `now`.
    ///
    /// Only the authoritative side steps physics; the returned events
    /// are the broadcasts due after this tick (score first, so the peer
    /// sees a terminal score before any trailing ball update).
    pub fn tick(&mut self, now: Instant) -> Vec<ClientEvent> {
        if self.phase != MatchPhase::Playing {
            self.last_tick = None;
            return Vec::new();
        }
        if self.role != Some(Role::First) || !self.peer_connected {
            self.last_tick = Some(now);
            return Vec::new();
        }

        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return Vec::new();
        };

        let frame = Duration::from_secs_f64(1.0 / TICK_HZ);
        // Wall-clock corrected: consume whole frames, carry the
        // remainder, and bound catch-up after a long stall.
        let mut elapsed = (now - last).min(frame * MAX_CATCHUP_FRAMES);
        let mut stepped = false;
        let mut score_changed = false;
        while elapsed >= frame && self.phase == MatchPhase::Playing {
            score_changed |= self.step();
            elapsed -= frame;
            stepped = true;
        }
        self.last_tick = Some(now - elapsed);

        let mut out = Vec::new();
        if score_changed {
            out.push(ClientEvent::ScoreState {
                score_a: self.state.score_a,
                score_b: self.state.score_b,
            });
        }
        if stepped && self.phase == MatchPhase::Playing {
            out.push(ClientEvent::BallState {
                x: self.state.ball.x,
                y: self.state.ball.y,
                vx: self.state.ball.vx,
                vy: self.state.ball.vy,
            });
        }
        out
    }

    /// Move the locally controlled paddle.
    ///
    /// Returns the broadcast announcing the new position, or `None`
    /// while input is not being accepted (not playing yet, paused, or
    /// game over).
    pub fn set_own_paddle(&mut self, y: f32) -> Option<ClientEvent> {
        if self.phase != MatchPhase::Playing {
            return None;
        }
        let role = self.role?;
        let y = y.clamp(0.0, BOARD_HEIGHT - PADDLE_HEIGHT);
        match role {
            Role::First => {
                self.state.paddle_a = y;
                Some(ClientEvent::PaddleA { y })
            }
            Role::Second => {
                self.state.paddle_b = y;
                Some(ClientEvent::PaddleB { y })
            }
        }
    }

    /// Locally reinitialize and produce the reset broadcast.
    ///
    /// Either side may request a reset; authority for subsequent ball
    /// ownership is unchanged.
    pub fn request_reset(&mut self) -> ClientEvent {
        self.apply_reset();
        ClientEvent::ResetMatch
    }

    /// Suspend the simulation (tab hidden).
    pub fn pause(&mut self) {
        if self.phase == MatchPhase::Playing {
            self.phase = MatchPhase::Paused;
        }
    }

    /// Resume after a pause; accumulated wall-clock time is discarded.
    pub fn resume(&mut self) {
        if self.phase == MatchPhase::Paused && self.peer_connected {
            self.phase = MatchPhase::Playing;
            self.last_tick = None;
        }
    }

    fn set_peer_present(&mut self, present: bool) {
        self.peer_connected = present;
        if present
            && self.role.is_some()
            && matches!(self.phase, MatchPhase::WaitingForPeer | MatchPhase::Paused)
        {
            self.phase = MatchPhase::Playing;
            self.last_tick = None;
        }
    }

    fn apply_reset(&mut self) {
        self.state = SharedMatchState::new();
        self.serve();
        self.last_tick = None;
        self.phase = if self.peer_connected && self.role.is_some() {
            MatchPhase::Playing
        } else if self.role.is_some() {
            MatchPhase::WaitingForPeer
        } else {
            MatchPhase::WaitingForRole
        };
    }

    fn serve(&mut self) {
        let vy = rand::thread_rng().gen_range(-4.0..4.0);
        self.state.reset_ball(BALL_SPEED, vy);
    }

    /// One fixed simulation step. Returns whether a score changed.
    fn step(&mut self) -> bool {
        let mut x = self.state.ball.x + self.state.ball.vx;
        let mut y = self.state.ball.y + self.state.ball.vy;

        // Wall bounce
        if y <= 0.0 || y >= BOARD_HEIGHT - BALL_SIZE {
            self.state.ball.vy = -self.state.ball.vy;
            y = y.clamp(0.0, BOARD_HEIGHT - BALL_SIZE);
        }

        let mut rng = rand::thread_rng();

        // Left paddle (First)
        if x <= PADDLE_WIDTH
            && y + BALL_SIZE >= self.state.paddle_a
            && y <= self.state.paddle_a + PADDLE_HEIGHT
        {
            self.state.ball.vx = self.state.ball.vx.abs();
            self.state.ball.vy += rng.gen_range(-1.0..1.0);
            x = x.max(PADDLE_WIDTH);
        }

        // Right paddle (Second)
        if x >= BOARD_WIDTH - PADDLE_WIDTH - BALL_SIZE
            && y + BALL_SIZE >= self.state.paddle_b
            && y <= self.state.paddle_b + PADDLE_HEIGHT
        {
            self.state.ball.vx = -self.state.ball.vx.abs();
            self.state.ball.vy += rng.gen_range(-1.0..1.0);
            x = x.min(BOARD_WIDTH - PADDLE_WIDTH - BALL_SIZE);
        }

        // Scoring
        if x <= 0.0 {
            self.state.score_b += 1;
            self.after_score();
            return true;
        }
        if x >= BOARD_WIDTH - BALL_SIZE {
            self.state.score_a += 1;
            self.after_score();
            return true;
        }

        self.state.ball.x = x;
        self.state.ball.y = y;
        false
    }

    fn after_score(&mut self) {
        if self.winner().is_some() {
            self.state.game_over = true;
            self.phase = MatchPhase::GameOver;
        } else {
            self.serve();
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SharedMatchState {
        &mut self.state
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
