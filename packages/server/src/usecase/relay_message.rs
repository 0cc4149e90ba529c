//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - デコード済みのコマンドを送信者のルームへ転送する
//!
//! ### どのような状況を想定しているか
//! - 正常系：join は表示名一覧として、start は送信者を含む全員に届く
//! - 異常系：存在しないルームへの中継（何も送信されない）

use std::sync::Arc;

use crate::domain::{ConnectionId, GameCommand, RoomKey};

use super::{error::RelayMessageError, room_registry::RoomRegistry};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// RoomRegistry（ルームの生成・破棄）
    registry: Arc<RoomRegistry>,
}

impl RelayMessageUseCase {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// メッセージ中継を実行
    ///
    /// ルームへ投げるだけで、ブロードキャストの完了は待たない。
    ///
    /// # Arguments
    ///
    /// * `room_key` - 送信者のルーム
    /// * `connection_id` - 送信者の接続 ID
    /// * `command` - 受信したフレームをデコードしたコマンド
    pub async fn execute(
        &self,
        room_key: &RoomKey,
        connection_id: ConnectionId,
        command: GameCommand,
    ) -> Result<(), RelayMessageError> {
        tracing::debug!("Relaying '{}' from '{}'", command.name(), connection_id);
        self.registry
            .message(room_key, connection_id, command)
            .await
            .map_err(|_| RelayMessageError::RoomUnavailable(room_key.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MessagePusher, infrastructure::message_pusher::WebSocketMessagePusher,
        usecase::ConnectParticipantUseCase,
    };
    use tokio::sync::mpsc;

    struct Fixture {
        connect: ConnectParticipantUseCase,
        relay: RelayMessageUseCase,
    }

    fn create_fixture() -> Fixture {
        let pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::default());
        let registry = Arc::new(RoomRegistry::new(pusher.clone()));
        Fixture {
            connect: ConnectParticipantUseCase::new(registry.clone(), pusher),
            relay: RelayMessageUseCase::new(registry),
        }
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn key() -> RoomKey {
        RoomKey::new("lobby".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_relay_join_broadcasts_roster() {
        // テスト項目: join がルーム全員に表示名一覧として届く
        // given (前提条件):
        let fixture = create_fixture();
        let (tx, mut rx) = mpsc::unbounded_channel();
        fixture.connect.execute(&key(), id("a"), tx).await.unwrap();
        while rx.try_recv().is_ok() {}

        // when (操作):
        let result = fixture
            .relay
            .execute(
                &key(),
                id("a"),
                GameCommand::Join {
                    username: "Alice".to_string(),
                },
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(
            rx.recv().await,
            Some(r#"{"command":"joined","players":["Alice"]}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_relay_start_reaches_sender_and_others() {
        // テスト項目: start が送信者を含むルーム全員に届く
        // given (前提条件):
        let fixture = create_fixture();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        fixture.connect.execute(&key(), id("a"), tx_a).await.unwrap();
        fixture.connect.execute(&key(), id("b"), tx_b).await.unwrap();
        while rx_a.try_recv().is_ok() {}
        while rx_b.try_recv().is_ok() {}

        // when (操作):
        let result = fixture
            .relay
            .execute(&key(), id("b"), GameCommand::Start)
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        let start = Some(r#"{"command":"start"}"#.to_string());
        assert_eq!(rx_a.recv().await, start);
        assert_eq!(rx_b.recv().await, start);
    }

    #[tokio::test]
    async fn test_relay_to_missing_room() {
        // テスト項目: 存在しないルームへの中継はエラーになる
        // given (前提条件):
        let fixture = create_fixture();

        // when (操作):
        let result = fixture
            .relay
            .execute(&key(), id("a"), GameCommand::Start)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayMessageError::RoomUnavailable("lobby".to_string()))
        );
    }
}
