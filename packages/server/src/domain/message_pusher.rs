//! MessagePusher trait 定義
//!
//! ルームからクライアントへのメッセージ送信（通知）のインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, Envelope, MessagePushError};

/// クライアントへの送信チャンネル（エンコード済みテキストを流す）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// ルーム（Coordinator）が送信先を解決する唯一の窓口。
/// 送信はすべて fire-and-forget で、再送や到達確認は行わない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 接続が解決できるか（まだ送信可能か）
    async fn is_connected(&self, client_id: &ConnectionId) -> bool;

    /// 特定のクライアントにエンベロープを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        envelope: &Envelope,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにエンベロープを送信
    ///
    /// 一部の送信失敗は許容し、エンコード失敗のみエラーとする。
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        envelope: &Envelope,
    ) -> Result<(), MessagePushError>;
}
