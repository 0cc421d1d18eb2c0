use crate::model::id::StylistId;
use uuid::Uuid;

pub mod event;

/// 予約を受けるスタッフ（マスターデータは外部サービスが所有するレプリカ）
#[derive(Debug, Clone)]
pub struct Stylist {
    pub stylist_id: StylistId,
    pub full_name: String,
    pub external_identity_id: Uuid,
    pub is_active: bool,
}
