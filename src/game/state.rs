//! Shared match state and playfield constants.

/// Playfield width in logical units.
pub const BOARD_WIDTH: f32 = 800.0;
/// Playfield height in logical units.
pub const BOARD_HEIGHT: f32 = 600.0;
/// Paddle thickness.
pub const PADDLE_WIDTH: f32 = 10.0;
/// Paddle height.
pub const PADDLE_HEIGHT: f32 = 100.0;
/// Ball edge length.
pub const BALL_SIZE: f32 = 20.0;
/// Horizontal ball speed per simulation tick.
pub const BALL_SPEED: f32 = 5.0;
/// First side to reach this score ends the match.
pub const WIN_SCORE: u32 = 5;
/// Fixed simulation rate in ticks per second.
pub const TICK_HZ: f64 = 60.0;

/// Lifecycle of a client's view of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Connected, role assignment not yet received
    WaitingForRole,
    /// Role known, the other slot is unoccupied
    WaitingForPeer,
    /// Both occupants present, simulation running
    Playing,
    /// Suspended on tab-visibility loss or peer disconnect
    Paused,
    /// A side reached the score threshold; awaiting a reset
    GameOver,
}

/// Ball position and velocity, in playfield units per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// The match state both participants render.
///
/// Ownership is split per field: ball and scores are written only by
/// the First participant's simulation, each paddle only by the
/// participant controlling it. The other fields arrive as broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedMatchState {
    pub ball: Ball,
    /// First participant's paddle (left), top edge Y
    pub paddle_a: f32,
    /// Second participant's paddle (right), top edge Y
    pub paddle_b: f32,
    pub score_a: u32,
    pub score_b: u32,
    pub game_over: bool,
}

impl SharedMatchState {
    /// Fresh state: centered ball and paddles, zero scores.
    pub fn new() -> Self {
        let paddle_center = (BOARD_HEIGHT - PADDLE_HEIGHT) / 2.0;
        Self {
            ball: Ball {
                x: (BOARD_WIDTH - BALL_SIZE) / 2.0,
                y: (BOARD_HEIGHT - BALL_SIZE) / 2.0,
                vx: BALL_SPEED,
                vy: 0.0,
            },
            paddle_a: paddle_center,
            paddle_b: paddle_center,
            score_a: 0,
            score_b: 0,
            game_over: false,
        }
    }

    /// Put the ball back in the center with the given serve velocity.
    pub fn reset_ball(&mut self, serve_vx: f32, serve_vy: f32) {
        self.ball = Ball {
            x: (BOARD_WIDTH - BALL_SIZE) / 2.0,
            y: (BOARD_HEIGHT - BALL_SIZE) / 2.0,
            vx: serve_vx,
            vy: serve_vy,
        };
    }
}

impl Default for SharedMatchState {
    fn default() -> Self {
        Self::new()
    }
}
