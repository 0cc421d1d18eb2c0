use crate::model::{
    client::{event::UpsertClient, Client},
    id::ClientId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn upsert(&self, event: UpsertClient) -> AppResult<()>;
    async fn find_by_id(&self, external_identity_id: ClientId) -> AppResult<Option<Client>>;
}
