//! Data transfer objects for the WebSocket wire protocol and the
//! diagnostic HTTP surface.

pub mod http;
pub mod websocket;
