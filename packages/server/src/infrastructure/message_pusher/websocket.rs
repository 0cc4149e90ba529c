//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - エンベロープを JSON にエンコードして送信（push_to, broadcast）
//!
//! WebSocket の受付と sender の生成は UI 層（`ui/handler/websocket.rs`）が行い、
//! この実装は受け取った sender を送信に使うだけです。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, Envelope, MessagePushError, MessagePusher, PusherChannel},
    infrastructure::dto::encode_envelope,
};

/// WebSocket を使った MessagePusher 実装
///
/// 全ルームの接続を一つのマップで保持する（接続 ID はサーバー全体で一意）。
pub struct WebSocketMessagePusher {
    /// Key: 接続 ID, Value: その接続の送信チャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(envelope: &Envelope) -> Result<String, MessagePushError> {
        encode_envelope(envelope).map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id, sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn is_connected(&self, client_id: &ConnectionId) -> bool {
        let clients = self.clients.lock().await;
        clients
            .get(client_id)
            .is_some_and(|sender| !sender.is_closed())
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        envelope: &Envelope,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(envelope)?;
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(client_id) else {
            return Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ));
        };
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        envelope: &Envelope,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(envelope)?;
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.clone()) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }
        tracing::debug!("Broadcasted message to {} client(s)", targets.len());

        Ok(())
    }
}
