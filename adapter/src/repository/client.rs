use crate::database::{model::client::ClientRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    client::{event::UpsertClient, Client},
    id::ClientId,
};
use kernel::repository::client::ClientRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ClientRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ClientRepository for ClientRepositoryImpl {
    // 顧客レプリカは外部の認証基盤の ID を主キーとする
    async fn upsert(&self, event: UpsertClient) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO clients (external_identity_id, username, full_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (external_identity_id)
                DO UPDATE SET
                    username = EXCLUDED.username,
                    full_name = EXCLUDED.full_name
            "#,
        )
        .bind(event.external_identity_id)
        .bind(&event.username)
        .bind(&event.full_name)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_by_id(&self, external_identity_id: ClientId) -> AppResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            r#"
                SELECT external_identity_id, username, full_name
                FROM clients
                WHERE external_identity_id = $1
            "#,
        )
        .bind(external_identity_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Client::from))
    }
}
