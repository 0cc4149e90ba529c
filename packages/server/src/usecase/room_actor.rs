//! ルームのアクタータスク
//!
//! `RoomCoordinator` を 1 つのタスクが所有し、イベントを到着順に 1 件ずつ処理します。
//! 外部からは `RoomHandle` 経由でのみ到達できるため、ルームの状態に
//! 共有可変参照が生まれることはありません。
//! 異なるルームは独立したタスクなので互いに並行して動作します。

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, GameCommand, MessagePusher, RoomError, RoomKey, RoomSnapshot};

use super::coordinator::RoomCoordinator;

/// ルームタスクが処理するイベント
#[derive(Debug)]
pub enum RoomEvent {
    Connect {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// 応答は残りのメンバー数
    Disconnect {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },
    Message {
        connection_id: ConnectionId,
        command: GameCommand,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}

/// ルームタスクへのハンドル
///
/// 最後のメンバーが切断するか、すべてのハンドルが drop されるとタスクは終了する。
/// 終了したルームへの操作は `RoomError::RoomClosed` になる。
#[derive(Debug, Clone)]
pub struct RoomHandle {
    key: RoomKey,
    sender: mpsc::UnboundedSender<RoomEvent>,
}

impl RoomHandle {
    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    fn closed(&self) -> RoomError {
        RoomError::RoomClosed(self.key.as_str().to_string())
    }

    /// 同じルームタスクを指すハンドルか
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    fn send(&self, event: RoomEvent) -> Result<(), RoomError> {
        self.sender.send(event).map_err(|_| self.closed())
    }

    pub async fn connect(&self, connection_id: ConnectionId) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomEvent::Connect {
            connection_id,
            reply,
        })?;
        rx.await.map_err(|_| self.closed())?
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<usize, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomEvent::Disconnect {
            connection_id,
            reply,
        })?;
        rx.await.map_err(|_| self.closed())?
    }

    /// コマンドを投げるだけで、処理の完了は待たない
    pub fn message(
        &self,
        connection_id: ConnectionId,
        command: GameCommand,
    ) -> Result<(), RoomError> {
        self.send(RoomEvent::Message {
            connection_id,
            command,
        })
    }

    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomEvent::Snapshot { reply })?;
        rx.await.map_err(|_| self.closed())
    }
}

/// ルームタスクを起動する
pub fn spawn_room(key: RoomKey, message_pusher: Arc<dyn MessagePusher>) -> RoomHandle {
    let (sender, receiver) = mpsc::unbounded_channel();
    let coordinator = RoomCoordinator::new(key.clone(), message_pusher);

    tokio::spawn(run_room(coordinator, receiver));
    tracing::info!("Room '{}' created", key);

    RoomHandle { key, sender }
}

async fn run_room(
    mut coordinator: RoomCoordinator,
    mut receiver: mpsc::UnboundedReceiver<RoomEvent>,
) {
    while let Some(event) = receiver.recv().await {
        match event {
            RoomEvent::Connect {
                connection_id,
                reply,
            } => {
                let result = coordinator.on_connect(connection_id).await;
                if let Err(e) = &result {
                    tracing::warn!("Rejected connect: {}", e);
                }
                let _ = reply.send(result);
            }
            RoomEvent::Disconnect {
                connection_id,
                reply,
            } => {
                let result = coordinator.on_disconnect(&connection_id).await;
                if let Err(e) = &result {
                    tracing::warn!("Ignored disconnect: {}", e);
                }
                let emptied = matches!(result, Ok(0));
                let _ = reply.send(result);
                // 空になったルームは再利用しない（後続のイベントは RoomClosed になる）
                if emptied {
                    break;
                }
            }
            RoomEvent::Message {
                connection_id,
                command,
            } => {
                coordinator.on_message(&connection_id, command).await;
            }
            RoomEvent::Snapshot { reply } => {
                let _ = reply.send(coordinator.snapshot());
            }
        }
    }

    tracing::info!("Room '{}' closed", coordinator.state().key);
}
