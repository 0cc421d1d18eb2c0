use crate::database::{model::service::ServiceRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::ServiceId,
    service::{event::UpsertService, Service},
};
use kernel::repository::service::ServiceRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ServiceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ServiceRepository for ServiceRepositoryImpl {
    // レプリカ項目は毎回丸ごと上書きする（同じイベントを二度適用しても結果は同じ）
    async fn upsert(&self, event: UpsertService) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO services (service_id, service_name, duration_minutes, is_available)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (service_id)
                DO UPDATE SET
                    service_name = EXCLUDED.service_name,
                    duration_minutes = EXCLUDED.duration_minutes,
                    is_available = EXCLUDED.is_available
            "#,
        )
        .bind(event.service_id)
        .bind(&event.service_name)
        .bind(event.duration_minutes)
        .bind(event.is_available)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn deactivate(&self, service_id: ServiceId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE services
                SET is_available = FALSE
                WHERE service_id = $1
            "#,
        )
        .bind(service_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "メニュー（{service_id}）が見つかりませんでした。"
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, service_id: ServiceId) -> AppResult<Option<Service>> {
        let row: Option<ServiceRow> = sqlx::query_as(
            r#"
                SELECT service_id, service_name, duration_minutes, is_available
                FROM services
                WHERE service_id = $1
            "#,
        )
        .bind(service_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Service::from))
    }
}
