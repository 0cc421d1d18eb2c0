use crate::model::{
    id::StylistId,
    stylist::{event::UpsertStylist, Stylist},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait StylistRepository: Send + Sync {
    async fn upsert(&self, event: UpsertStylist) -> AppResult<()>;
    async fn deactivate(&self, stylist_id: StylistId) -> AppResult<()>;
    async fn find_by_id(&self, stylist_id: StylistId) -> AppResult<Option<Stylist>>;
}
