//! Trivia room relay server.
//!
//! Clients connect to `ws://<host>:<port>/parties/<room>`; every room elects a
//! host and relays `join` / `start` / `question` / `answer` to its members.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin trivia-relay-server
//! cargo run --bin trivia-relay-server -- --host 0.0.0.0 --port 1999 --log-level info
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use tokio::sync::Mutex;
use trivia_relay_server::{
    domain::MessagePusher,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, RelayMessageUseCase, RoomRegistry,
    },
};
use trivia_relay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "trivia-relay-server")]
#[command(about = "WebSocket room relay for turn-based trivia games", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(short = 'l', long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. RoomRegistry
    // 3. UseCases
    // 4. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher: Arc<dyn MessagePusher> =
        Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 2. Create RoomRegistry (one room task per room key)
    let registry = Arc::new(RoomRegistry::new(message_pusher.clone()));

    // 3. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(registry.clone()));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        relay_message_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
