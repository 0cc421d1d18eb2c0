use crate::model::id::ServiceId;

pub mod event;

/// 予約対象のメニュー（マスターデータは外部サービスが所有するレプリカ）
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub service_id: ServiceId,
    pub service_name: String,
    pub duration_minutes: i32,
    pub is_available: bool,
}
