//! クライアントとやり取りするゲームメッセージ（ドメイン表現）
//!
//! ワイヤーフォーマット（JSON）への変換は `infrastructure::dto` が担当します。

use super::value_object::ConnectionId;

/// クライアントから受信するコマンド
///
/// 必須フィールドが揃ったものだけがこの型になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// 表示名を名乗ってゲームに参加する
    Join { username: String },
    /// ゲーム開始
    Start,
    /// 出題。`username` はメッセージに書かれた値をそのまま使う
    Question {
        username: Option<String>,
        question: String,
    },
    /// 回答
    Answer {
        username: Option<String>,
        answer: String,
    },
}

impl GameCommand {
    /// ログ用のコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Start => "start",
            Self::Question { .. } => "question",
            Self::Answer { .. } => "answer",
        }
    }
}

/// クライアントへ送信するエンベロープ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// 現在の表示名一覧（ルーム全体へブロードキャスト）
    Joined { players: Vec<String> },
    Start,
    Question {
        username: Option<String>,
        question: String,
    },
    Answer {
        username: Option<String>,
        answer: String,
    },
    /// ホストになったことの通知（対象の接続にのみ送信）
    BecomeHost { host_id: ConnectionId },
}

impl GameCommand {
    /// そのまま中継するコマンドをブロードキャスト用エンベロープに変換する
    ///
    /// `join` は名前の重複解消が必要なので `None` を返す。
    pub fn into_relay_envelope(self) -> Option<Envelope> {
        match self {
            Self::Join { .. } => None,
            Self::Start => Some(Envelope::Start),
            Self::Question { username, question } => Some(Envelope::Question { username, question }),
            Self::Answer { username, answer } => Some(Envelope::Answer { username, answer }),
        }
    }
}
