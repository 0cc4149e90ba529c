//! UseCase: ルーム詳細取得

use std::sync::Arc;

use crate::domain::{RoomKey, RoomSnapshot};

use super::{error::GetRoomDetailError, room_registry::RoomRegistry};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<RoomRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 指定されたルームのスナップショット
    ///
    /// 不正なキー・存在しないルームはどちらも `RoomNotFound`。
    pub async fn execute(&self, room_key: String) -> Result<RoomSnapshot, GetRoomDetailError> {
        let room_key = RoomKey::new(room_key).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.registry
            .snapshot(&room_key)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}
