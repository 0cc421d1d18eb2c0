use crate::model::id::ClientId;

pub mod event;

/// 顧客（外部の認証基盤の ID を主キーとするレプリカ）
#[derive(Debug, Clone)]
pub struct Client {
    pub external_identity_id: ClientId,
    pub username: String,
    pub full_name: String,
}
