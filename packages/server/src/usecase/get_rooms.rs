//! UseCase: ルーム一覧取得

use std::sync::Arc;

use crate::domain::RoomSnapshot;

use super::room_registry::RoomRegistry;

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 現在存在する全ルームのスナップショット（キー順）
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        self.registry.snapshots().await
    }
}
