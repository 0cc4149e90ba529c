//! Room relay server for a turn-based trivia game.
//!
//! Each room elects a host connection, de-duplicates display names and fans
//! out game-control messages (`join`, `start`, `question`, `answer`) to every
//! connected participant over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
