//! UseCase 層
//!
//! UI 層（WebSocket / HTTP ハンドラ）から呼ばれるアプリケーションの操作。
//! ルームごとの状態は `room_actor` のタスクが所有し、
//! `RoomRegistry` がルームの生成・破棄を管理します。

pub mod connect_participant;
pub mod coordinator;
pub mod disconnect_participant;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod relay_message;
pub mod room_actor;
pub mod room_registry;

pub use connect_participant::ConnectParticipantUseCase;
pub use coordinator::RoomCoordinator;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, GetRoomDetailError, RelayMessageError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use relay_message::RelayMessageUseCase;
pub use room_actor::{RoomHandle, spawn_room};
pub use room_registry::RoomRegistry;
