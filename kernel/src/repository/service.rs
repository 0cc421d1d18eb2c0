use crate::model::{
    id::ServiceId,
    service::{event::UpsertService, Service},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    // なければ作成、あればレプリカ項目を全て上書きする
    async fn upsert(&self, event: UpsertService) -> AppResult<()>;
    // 利用不可フラグを立てる（削除はしない）
    async fn deactivate(&self, service_id: ServiceId) -> AppResult<()>;
    async fn find_by_id(&self, service_id: ServiceId) -> AppResult<Option<Service>>;
}
