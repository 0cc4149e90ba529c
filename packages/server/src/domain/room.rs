//! Room エンティティ
//!
//! ルームのメンバーシップ状態（接続レジストリ・表示名マップ・ホスト）を保持し、
//! 以下の不変条件を守ります。
//!
//! 1. `members` に重複はない
//! 2. `identities` のキーはすべて `members` に含まれる
//! 3. 表示名は参加（join）時点で互いに異なる（後から遡って修正はしない）
//! 4. `members` が空でなければ `host_id` が存在し、空なら存在しない
//! 5. `host_id` は残っているメンバーのうち最も早く参加した接続
//!
//! 送信などの副作用は持たず、呼び出し側（Coordinator）が結果に応じて通知します。

use serde::Serialize;

use super::{ConnectionId, RoomError, RoomKey, Timestamp};

/// ルームのメンバー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: ConnectionId,
    pub connected_at: Timestamp,
}

/// メンバー削除に伴うホストの変化
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostChange {
    /// 削除されたのはホストではない
    Unchanged,
    /// ホストが抜け、次に古いメンバーが昇格した
    Promoted(ConnectionId),
    /// ホストが抜け、ルームが空になった
    Vacated,
}

/// ルームの状態
#[derive(Debug, Clone)]
pub struct RoomState {
    pub key: RoomKey,
    pub created_at: Timestamp,
    /// 参加順（ホストの継承順）
    members: Vec<Member>,
    /// 表示名の割り当て順
    identities: Vec<(ConnectionId, String)>,
    host_id: Option<ConnectionId>,
}

impl RoomState {
    pub fn new(key: RoomKey, created_at: Timestamp) -> Self {
        Self {
            key,
            created_at,
            members: Vec::new(),
            identities: Vec::new(),
            host_id: None,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// ブロードキャスト対象（全メンバーの接続 ID、参加順）
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn host_id(&self) -> Option<&ConnectionId> {
        self.host_id.as_ref()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, id: &ConnectionId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    pub fn display_name(&self, id: &ConnectionId) -> Option<&str> {
        self.identities
            .iter()
            .find(|(cid, _)| cid == id)
            .map(|(_, name)| name.as_str())
    }

    /// 現在の表示名一覧（割り当て順）
    pub fn players(&self) -> Vec<String> {
        self.identities.iter().map(|(_, name)| name.clone()).collect()
    }

    /// メンバーを追加する
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 追加され、ホストになった
    /// * `Ok(false)` - 追加された（既にホストがいる）
    /// * `Err(RoomError::DuplicateConnection)` - 既にメンバー（状態は変更しない）
    pub fn add_member(
        &mut self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<bool, RoomError> {
        if self.is_member(&id) {
            return Err(RoomError::DuplicateConnection(id.into_string()));
        }

        let became_host = self.host_id.is_none();
        if became_host {
            self.host_id = Some(id.clone());
        }
        self.members.push(Member { id, connected_at });

        Ok(became_host)
    }

    /// メンバーを削除し、表示名も破棄する
    ///
    /// ホストが抜けた場合は残りのうち最も早く参加したメンバーを昇格させる。
    pub fn remove_member(&mut self, id: &ConnectionId) -> Result<HostChange, RoomError> {
        let Some(index) = self.members.iter().position(|m| &m.id == id) else {
            return Err(RoomError::UnknownConnection(id.as_str().to_string()));
        };

        self.members.remove(index);
        self.identities.retain(|(cid, _)| cid != id);

        if self.host_id.as_ref() != Some(id) {
            return Ok(HostChange::Unchanged);
        }

        match self.members.first() {
            Some(next) => {
                self.host_id = Some(next.id.clone());
                Ok(HostChange::Promoted(next.id.clone()))
            }
            None => {
                self.host_id = None;
                Ok(HostChange::Vacated)
            }
        }
    }

    /// 表示名を割り当てる
    ///
    /// 既に同じ名前が使われていれば `"<name> <割り当て済み件数 + 1>"` に変更する。
    /// 変更後の名前が既存の名前と衝突するかは再確認しない。
    /// 同じ接続からの再 join は元の位置のまま上書きする。
    ///
    /// # Returns
    ///
    /// 実際に保存された表示名
    pub fn assign_identity(&mut self, id: &ConnectionId, requested: String) -> String {
        let username = if self.identities.iter().any(|(_, name)| *name == requested) {
            format!("{} {}", requested, self.identities.len() + 1)
        } else {
            requested
        };

        match self.identities.iter_mut().find(|(cid, _)| cid == id) {
            Some((_, name)) => *name = username.clone(),
            None => self.identities.push((id.clone(), username.clone())),
        }

        username
    }

    /// HTTP などで参照するためのスナップショット
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            key: self.key.clone(),
            created_at: self.created_at,
            members: self
                .members
                .iter()
                .map(|m| MemberSnapshot {
                    connection_id: m.id.clone(),
                    username: self.display_name(&m.id).map(str::to_string),
                    connected_at: m.connected_at,
                })
                .collect(),
            host_id: self.host_id.clone(),
        }
    }
}

/// ルーム状態の読み取り専用コピー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    pub key: RoomKey,
    pub created_at: Timestamp,
    pub members: Vec<MemberSnapshot>,
    pub host_id: Option<ConnectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    pub connection_id: ConnectionId,
    pub username: Option<String>,
    pub connected_at: Timestamp,
}
