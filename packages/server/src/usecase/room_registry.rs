//! ルームレジストリ（ルームキー → ルームタスク）
//!
//! ルームの生成と破棄を担当するファクトリ。
//!
//! - 最初の接続でルームタスクを生成する
//! - 最後のメンバーが切断したらルームを破棄する
//!
//! ロックはマップの参照・挿入・削除の間だけ保持し、ルームタスクの応答は
//! ロックの外で待つ。あるルームが混んでいても他のルームは待たされない。
//!
//! 空になったルームタスクは自分で終了し、以降の操作には `RoomClosed` を返す。
//! 古いハンドルを掴んだ connect はそれを見てマップから外し、新しいルームで
//! やり直す。削除は `RoomHandle::same_room` で同じタスクの場合だけ行うので、
//! 後から作られたルームを消してしまうことはない。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, GameCommand, MessagePusher, RoomError, RoomKey, RoomSnapshot};

use super::room_actor::{RoomHandle, spawn_room};

pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomKey, RoomHandle>>,
    /// 各ルームに渡す MessagePusher
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomRegistry {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            message_pusher,
        }
    }

    /// ルームに接続する（ルームが無ければ生成する）
    pub async fn connect(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
    ) -> Result<(), RoomError> {
        loop {
            let (handle, created) = self.get_or_create(room_key).await;

            match handle.connect(connection_id.clone()).await {
                // 終了済みのルームを掴んだ: 外してから作り直す
                Err(RoomError::RoomClosed(_)) => {
                    tracing::debug!("Room '{}' closed before connect, retrying", room_key);
                    self.remove_if_current(room_key, &handle).await;
                }
                Err(e) => {
                    if created {
                        self.remove_if_current(room_key, &handle).await;
                    }
                    return Err(e);
                }
                Ok(()) => return Ok(()),
            }
        }
    }

    /// ルームから切断する（空になったらルームを破棄する）
    pub async fn disconnect(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
    ) -> Result<(), RoomError> {
        let handle = self.get(room_key).await?;

        match handle.disconnect(connection_id).await {
            Ok(0) | Err(RoomError::RoomClosed(_)) => {
                if self.remove_if_current(room_key, &handle).await {
                    tracing::info!("Room '{}' destroyed", room_key);
                }
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// ルームにコマンドを転送する
    pub async fn message(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
        command: GameCommand,
    ) -> Result<(), RoomError> {
        let handle = self.get(room_key).await?;
        handle.message(connection_id, command)
    }

    pub async fn room_keys(&self) -> Vec<RoomKey> {
        let rooms = self.rooms.lock().await;
        let mut keys: Vec<RoomKey> = rooms.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn snapshot(&self, room_key: &RoomKey) -> Result<RoomSnapshot, RoomError> {
        let handle = self.get(room_key).await?;
        handle.snapshot().await
    }

    /// 全ルームのスナップショット（キー順）
    ///
    /// 取得中に閉じたルームは含まれない。
    pub async fn snapshots(&self) -> Vec<RoomSnapshot> {
        let handles: Vec<RoomHandle> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.snapshot().await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => tracing::debug!("Skipping room '{}': {}", handle.key(), e),
            }
        }
        snapshots.sort_by(|a, b| a.key.cmp(&b.key));
        snapshots
    }

    async fn get_or_create(&self, room_key: &RoomKey) -> (RoomHandle, bool) {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.get(room_key) {
            return (handle.clone(), false);
        }

        let handle = spawn_room(room_key.clone(), self.message_pusher.clone());
        rooms.insert(room_key.clone(), handle.clone());
        (handle, true)
    }

    /// マップ上のハンドルが `handle` と同じタスクなら取り除く
    async fn remove_if_current(&self, room_key: &RoomKey, handle: &RoomHandle) -> bool {
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(room_key)
            .is_some_and(|current| current.same_room(handle))
        {
            rooms.remove(room_key);
            return true;
        }
        false
    }

    async fn get(&self, room_key: &RoomKey) -> Result<RoomHandle, RoomError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_key)
            .cloned()
            .ok_or_else(|| RoomError::RoomClosed(room_key.as_str().to_string()))
    }
}
