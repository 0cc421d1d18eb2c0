use crate::database::{
    model::schedule::{BlockoutRow, BreakEntryRow, ScheduleEntryRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::StylistId,
    schedule::{
        event::{UpdateDailyBreaks, UpdateWeeklySchedule, UpsertBlockout},
        weekday_number, BlockoutRange, BreakEntry, WeeklySchedule,
    },
};
use kernel::repository::schedule::ScheduleRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ScheduleRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    // 週間スケジュールの置き換えを行う。
    // 個別のエントリーの更新はなく、スタッフ単位で全削除→全挿入する
    async fn update_weekly(&self, event: UpdateWeeklySchedule) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM weekly_schedules WHERE stylist_id = $1")
            .bind(event.stylist_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        for entry in &event.entries {
            sqlx::query(
                r#"
                    INSERT INTO weekly_schedules
                    (stylist_id, day_of_week, start_time, end_time, is_working_day)
                    VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(event.stylist_id)
            .bind(weekday_number(entry.day_of_week))
            .bind(entry.start_time)
            .bind(entry.end_time)
            .bind(entry.is_working_day)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // 固定休憩の置き換えを行う。週間スケジュールと同じく全置き換えである
    async fn update_breaks(&self, event: UpdateDailyBreaks) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM daily_breaks WHERE stylist_id = $1")
            .bind(event.stylist_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        for entry in &event.entries {
            sqlx::query(
                r#"
                    INSERT INTO daily_breaks
                    (stylist_id, day_of_week, break_start, break_end)
                    VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(event.stylist_id)
            .bind(weekday_number(entry.day_of_week))
            .bind(entry.break_start)
            .bind(entry.break_end)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    // 休業期間はスタッフごとに 1 件のみ保持し、書き込みのたびに置き換える
    async fn upsert_blockout(&self, event: UpsertBlockout) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO blockout_ranges (stylist_id, start_date, end_date)
                VALUES ($1, $2, $3)
                ON CONFLICT (stylist_id)
                DO UPDATE SET
                    start_date = EXCLUDED.start_date,
                    end_date = EXCLUDED.end_date
            "#,
        )
        .bind(event.stylist_id)
        .bind(event.start_date)
        .bind(event.end_date)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(())
    }

    async fn find_weekly(&self, stylist_id: StylistId) -> AppResult<Option<WeeklySchedule>> {
        let rows: Vec<ScheduleEntryRow> = sqlx::query_as(
            r#"
                SELECT day_of_week, start_time, end_time, is_working_day
                FROM weekly_schedules
                WHERE stylist_id = $1
                ORDER BY day_of_week ASC
            "#,
        )
        .bind(stylist_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let entries = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(WeeklySchedule {
            stylist_id,
            entries,
        }))
    }

    async fn find_breaks(&self, stylist_id: StylistId) -> AppResult<Vec<BreakEntry>> {
        let rows: Vec<BreakEntryRow> = sqlx::query_as(
            r#"
                SELECT day_of_week, break_start, break_end
                FROM daily_breaks
                WHERE stylist_id = $1
                ORDER BY day_of_week ASC
            "#,
        )
        .bind(stylist_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_blockout(&self, stylist_id: StylistId) -> AppResult<Option<BlockoutRange>> {
        let row: Option<BlockoutRow> = sqlx::query_as(
            r#"
                SELECT stylist_id, start_date, end_date
                FROM blockout_ranges
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(BlockoutRange::from))
    }
}
