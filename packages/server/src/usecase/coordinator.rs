//! Room Coordinator
//!
//! 1 ルーム分の状態（`RoomState`）を所有し、トランスポートから届く
//! connect / disconnect / message イベントを 1 件ずつ処理して、
//! ブロードキャストやホスト通知を `MessagePusher` 経由で送信します。
//!
//! 直接呼び出すのはルームのアクタータスク（`room_actor`）だけです。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Envelope, GameCommand, HostChange, MessagePushError, MessagePusher, RoomError,
    RoomKey, RoomSnapshot, RoomState, Timestamp,
};

pub struct RoomCoordinator {
    state: RoomState,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomCoordinator {
    pub fn new(key: RoomKey, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            state: RoomState::new(key, Timestamp::now()),
            message_pusher,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        self.state.snapshot()
    }

    /// 接続イベント
    ///
    /// 1. メンバーに追加（重複は `DuplicateConnection`、状態は変更しない）
    /// 2. ホスト不在ならこの接続をホストにして通知
    /// 3. 現在の表示名一覧を全員にブロードキャスト（新規接続にはまだ表示名が無い）
    pub async fn on_connect(&mut self, connection_id: ConnectionId) -> Result<(), RoomError> {
        let became_host = self
            .state
            .add_member(connection_id.clone(), Timestamp::now())?;
        tracing::info!(
            "Connection '{}' joined room '{}' ({} member(s))",
            connection_id,
            self.state.key,
            self.state.len()
        );

        if became_host {
            self.send_become_host(&connection_id).await;
        }

        self.broadcast(Envelope::Joined {
            players: self.state.players(),
        })
        .await;

        Ok(())
    }

    /// 切断イベント
    ///
    /// ホストが抜けた場合は次のホストに通知する。
    /// 表示名一覧のブロードキャストは行わない。
    ///
    /// # Returns
    ///
    /// 残りのメンバー数
    pub async fn on_disconnect(&mut self, connection_id: &ConnectionId) -> Result<usize, RoomError> {
        let change = self.state.remove_member(connection_id)?;
        tracing::info!(
            "Connection '{}' left room '{}' ({} member(s) remaining)",
            connection_id,
            self.state.key,
            self.state.len()
        );

        match change {
            HostChange::Promoted(new_host) => {
                tracing::info!(
                    "Host of room '{}' passed from '{}' to '{}'",
                    self.state.key,
                    connection_id,
                    new_host
                );
                self.send_become_host(&new_host).await;
            }
            HostChange::Vacated => {
                tracing::info!("Room '{}' has no host (empty)", self.state.key);
            }
            HostChange::Unchanged => {}
        }

        Ok(self.state.len())
    }

    /// メッセージイベント（デコード済みのコマンド）
    ///
    /// コマンドごとに独立して処理し、送信者へのエラー応答は行わない。
    pub async fn on_message(&mut self, connection_id: &ConnectionId, command: GameCommand) {
        if !self.state.is_member(connection_id) {
            tracing::warn!(
                "Dropping '{}' from non-member '{}' in room '{}'",
                command.name(),
                connection_id,
                self.state.key
            );
            return;
        }

        let envelope = match command {
            GameCommand::Join { username } => {
                let assigned = self.state.assign_identity(connection_id, username);
                tracing::info!("[RECV] join '{}' as '{}'", connection_id, assigned);
                Envelope::Joined {
                    players: self.state.players(),
                }
            }
            other => {
                tracing::debug!("[RECV] {} from '{}'", other.name(), connection_id);
                match other.into_relay_envelope() {
                    Some(envelope) => envelope,
                    None => return,
                }
            }
        };

        self.broadcast(envelope).await;
    }

    /// ルームの全メンバーに送信（送信者を含む）
    async fn broadcast(&self, envelope: Envelope) {
        let targets = self.state.member_ids();
        if let Err(e) = self.message_pusher.broadcast(&targets, &envelope).await {
            tracing::warn!("Failed to broadcast in room '{}': {}", self.state.key, e);
        }
    }

    /// ホスト通知
    ///
    /// 対象が既に解決できなければ送信しない（再送・再選出もしない）。
    async fn send_become_host(&self, host_id: &ConnectionId) {
        tracing::info!("Sending become host to '{}'", host_id);
        if !self.message_pusher.is_connected(host_id).await {
            tracing::debug!("Host '{}' is no longer reachable, skipping notice", host_id);
            return;
        }

        let envelope = Envelope::BecomeHost {
            host_id: host_id.clone(),
        };
        match self.message_pusher.push_to(host_id, &envelope).await {
            Ok(()) | Err(MessagePushError::ClientNotFound(_)) => {}
            Err(e) => tracing::warn!("Failed to notify host '{}': {}", host_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockMessagePusher, infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use tokio::sync::mpsc;

    struct TestClient {
        id: ConnectionId,
        rx: mpsc::UnboundedReceiver<String>,
    }

    impl TestClient {
        /// 受信済みのメッセージをすべて取り出す
        fn drain(&mut self) -> Vec<String> {
            let mut received = Vec::new();
            while let Ok(msg) = self.rx.try_recv() {
                received.push(msg);
            }
            received
        }
    }

    fn create_test_coordinator() -> (RoomCoordinator, Arc<WebSocketMessagePusher>) {
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let coordinator = RoomCoordinator::new(
            RoomKey::new("test".to_string()).unwrap(),
            pusher.clone(),
        );
        (coordinator, pusher)
    }

    async fn connect(
        coordinator: &mut RoomCoordinator,
        pusher: &WebSocketMessagePusher,
        name: &str,
    ) -> TestClient {
        let id = ConnectionId::new(name.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(id.clone(), tx).await;
        coordinator.on_connect(id.clone()).await.unwrap();
        TestClient { id, rx }
    }

    fn join(username: &str) -> GameCommand {
        GameCommand::Join {
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_scenario_host_election_and_name_dedup() {
        // テスト項目: A 接続 → B 接続 → 同名 join → A 切断 の一連の流れ
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();

        // when (操作): A が接続
        let mut a = connect(&mut coordinator, &pusher, "A").await;

        // then (期待する結果): A がホストになり、空の一覧を受け取る
        assert_eq!(
            a.drain(),
            vec![
                r#"{"isHost":"A"}"#.to_string(),
                r#"{"command":"joined","players":[]}"#.to_string(),
            ]
        );

        // when (操作): B が接続
        let mut b = connect(&mut coordinator, &pusher, "B").await;

        // then (期待する結果): 全員に空の一覧
        let joined_empty = r#"{"command":"joined","players":[]}"#.to_string();
        assert_eq!(a.drain(), vec![joined_empty.clone()]);
        assert_eq!(b.drain(), vec![joined_empty]);

        // when (操作): A が "Alice" で join
        coordinator.on_message(&a.id, join("Alice")).await;

        // then (期待する結果):
        let joined_alice = r#"{"command":"joined","players":["Alice"]}"#.to_string();
        assert_eq!(a.drain(), vec![joined_alice.clone()]);
        assert_eq!(b.drain(), vec![joined_alice]);

        // when (操作): B も "Alice" で join
        coordinator.on_message(&b.id, join("Alice")).await;

        // then (期待する結果): B は "Alice 2" になる
        let joined_both = r#"{"command":"joined","players":["Alice","Alice 2"]}"#.to_string();
        assert_eq!(a.drain(), vec![joined_both.clone()]);
        assert_eq!(b.drain(), vec![joined_both]);

        // when (操作): A が切断
        pusher.unregister_client(&a.id).await;
        let remaining = coordinator.on_disconnect(&a.id).await.unwrap();

        // then (期待する結果): B がホストになり、joined は送られない
        assert_eq!(remaining, 1);
        assert_eq!(b.drain(), vec![r#"{"isHost":"B"}"#.to_string()]);
        assert_eq!(coordinator.state().host_id(), Some(&b.id));
        assert_eq!(coordinator.state().players(), vec!["Alice 2"]);
    }

    #[tokio::test]
    async fn test_relay_commands_reach_everyone_including_sender() {
        // テスト項目: start / question / answer は送信者を含む全員に届く
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();
        let mut a = connect(&mut coordinator, &pusher, "A").await;
        let mut b = connect(&mut coordinator, &pusher, "B").await;
        a.drain();
        b.drain();

        // when (操作):
        coordinator.on_message(&b.id, GameCommand::Start).await;
        coordinator
            .on_message(
                &b.id,
                GameCommand::Question {
                    username: Some("Someone Else".to_string()),
                    question: "2 + 2?".to_string(),
                },
            )
            .await;
        coordinator
            .on_message(
                &a.id,
                GameCommand::Answer {
                    username: Some("Alice".to_string()),
                    answer: "4".to_string(),
                },
            )
            .await;

        // then (期待する結果): ホストでなくても start でき、username は検証されない
        let expected = vec![
            r#"{"command":"start"}"#.to_string(),
            r#"{"command":"question","username":"Someone Else","question":"2 + 2?"}"#.to_string(),
            r#"{"command":"answer","username":"Alice","answer":"4"}"#.to_string(),
        ];
        assert_eq!(a.drain(), expected);
        assert_eq!(b.drain(), expected);
    }

    #[tokio::test]
    async fn test_duplicate_connect_is_invariant_violation() {
        // テスト項目: 同じ接続 ID の二重 connect はエラーになり、何も送信されない
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();
        let mut a = connect(&mut coordinator, &pusher, "A").await;
        a.drain();

        // when (操作):
        let result = coordinator.on_connect(a.id.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::DuplicateConnection("A".to_string())));
        assert_eq!(coordinator.state().len(), 1);
        assert!(a.drain().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_unknown_is_noop() {
        // テスト項目: 未登録の接続の切断はエラーを返し、状態を変更しない
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();
        let mut a = connect(&mut coordinator, &pusher, "A").await;
        a.drain();

        // when (操作):
        let ghost = ConnectionId::new("ghost".to_string()).unwrap();
        let result = coordinator.on_disconnect(&ghost).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::UnknownConnection("ghost".to_string())));
        assert_eq!(coordinator.state().host_id(), Some(&a.id));
        assert!(a.drain().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_last_member_clears_room() {
        // テスト項目: 最後のメンバーが切断するとホストも表示名も消える
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();
        let a = connect(&mut coordinator, &pusher, "A").await;
        coordinator.on_message(&a.id, join("Alice")).await;

        // when (操作):
        let remaining = coordinator.on_disconnect(&a.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(remaining, 0);
        assert!(coordinator.state().is_empty());
        assert_eq!(coordinator.state().host_id(), None);
        assert!(coordinator.state().players().is_empty());
    }

    #[tokio::test]
    async fn test_message_from_non_member_is_dropped() {
        // テスト項目: メンバーでない接続からのメッセージは無視される
        // given (前提条件):
        let (mut coordinator, pusher) = create_test_coordinator();
        let mut a = connect(&mut coordinator, &pusher, "A").await;
        a.drain();

        // when (操作):
        let stranger = ConnectionId::new("stranger".to_string()).unwrap();
        coordinator.on_message(&stranger, join("Eve")).await;

        // then (期待する結果):
        assert!(a.drain().is_empty());
        assert!(coordinator.state().players().is_empty());
    }

    #[tokio::test]
    async fn test_host_handoff_sends_exactly_one_notice() {
        // テスト項目: ホスト切断時、次に古いメンバーにだけホスト通知が 1 回送られる
        // given (前提条件):
        let host = ConnectionId::new("A".to_string()).unwrap();
        let next = ConnectionId::new("B".to_string()).unwrap();
        let last = ConnectionId::new("C".to_string()).unwrap();

        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().returning(|_, _| Ok(()));
        pusher.expect_is_connected().returning(|_| true);
        let expected_host = host.clone();
        pusher
            .expect_push_to()
            .withf(move |id, envelope| {
                id == &expected_host
                    && envelope
                        == &Envelope::BecomeHost {
                            host_id: expected_host.clone(),
                        }
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let expected_next = next.clone();
        pusher
            .expect_push_to()
            .withf(move |id, _| id == &expected_next)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut coordinator =
            RoomCoordinator::new(RoomKey::new("test".to_string()).unwrap(), Arc::new(pusher));
        for id in [&host, &next, &last] {
            coordinator.on_connect(id.clone()).await.unwrap();
        }

        // when (操作):
        coordinator.on_disconnect(&host).await.unwrap();

        // then (期待する結果): モックの times(1) で検証
        assert_eq!(coordinator.state().host_id(), Some(&next));
    }

    #[tokio::test]
    async fn test_stale_host_notice_is_skipped() {
        // テスト項目: 解決できないホストへの通知は送らず、再選出もしない
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().returning(|_, _| Ok(()));
        pusher.expect_is_connected().returning(|_| false);
        pusher.expect_push_to().never();

        let mut coordinator =
            RoomCoordinator::new(RoomKey::new("test".to_string()).unwrap(), Arc::new(pusher));
        let a = ConnectionId::new("A".to_string()).unwrap();

        // when (操作):
        let result = coordinator.on_connect(a.clone()).await;

        // then (期待する結果): ホストとしては記録される
        assert!(result.is_ok());
        assert_eq!(coordinator.state().host_id(), Some(&a));
    }
}
