use crate::database::{model::stylist::StylistRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::StylistId,
    stylist::{event::UpsertStylist, Stylist},
};
use kernel::repository::stylist::StylistRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct StylistRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl StylistRepository for StylistRepositoryImpl {
    async fn upsert(&self, event: UpsertStylist) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO stylists (stylist_id, full_name, external_identity_id, is_active)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (stylist_id)
                DO UPDATE SET
                    full_name = EXCLUDED.full_name,
                    external_identity_id = EXCLUDED.external_identity_id,
                    is_active = EXCLUDED.is_active
            "#,
        )
        .bind(event.stylist_id)
        .bind(&event.full_name)
        .bind(event.external_identity_id)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn deactivate(&self, stylist_id: StylistId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE stylists
                SET is_active = FALSE
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "スタッフ（{stylist_id}）が見つかりませんでした。"
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, stylist_id: StylistId) -> AppResult<Option<Stylist>> {
        let row: Option<StylistRow> = sqlx::query_as(
            r#"
                SELECT stylist_id, full_name, external_identity_id, is_active
                FROM stylists
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Stylist::from))
    }
}
