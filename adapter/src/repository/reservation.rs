use crate::database::{
    model::{
        reservation::{BookedSlotRow, ReservationRow},
        schedule::{BlockoutRow, BreakEntryRow, ScheduleEntryRow},
        service::ServiceRow,
        stylist::StylistRow,
    },
    ConnectionPool,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc, Weekday};
use derive_new::new;
use kernel::model::{
    id::{ClientId, ReservationId, ServiceId, StylistId},
    reservation::{
        attended_minutes,
        availability::{check_references, check_slot, BookedSlot, CandidateSlot, ReferenceRejection},
        event::{CreateReservation, RescheduleReservation},
        Reservation, ReservationStatus,
    },
    schedule::{weekday_number, BlockoutRange, BreakEntry, WeeklySchedule},
    service::Service,
    stylist::Stylist,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

// 参照確認の失敗を HTTP のエラー種別へ振り分ける。
// 存在しないものは 404、存在するが使えないものは 422 とする
fn reject_reference(rejection: ReferenceRejection) -> AppError {
    match rejection {
        ReferenceRejection::ServiceNotFound(_) | ReferenceRejection::StylistNotFound(_) => {
            AppError::EntityNotFound(rejection.to_string())
        }
        ReferenceRejection::ServiceUnavailable(_) | ReferenceRejection::StylistInactive(_) => {
            AppError::UnprocessableEntity(rejection.to_string())
        }
    }
}

// 検証パイプラインの結果。永続化ステップで使う値だけを持つ
struct ValidatedSlot {
    end_time: NaiveTime,
    attended_minutes: i32,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する。
        // 同時に同じ枠を取ろうとする 2 つのリクエストが
        // 両方とも成功しないことはこの分離レベルのみで保証している
        self.set_transaction_serializable(&mut tx).await?;

        // 参照確認から空き判定までを行い、確定した終了時刻を得る
        let slot = self
            .validate_slot(
                &mut tx,
                event.stylist_id,
                event.service_id,
                event.reserved_date,
                event.start_time,
                None,
            )
            .await?;

        // ここまでのチェックを通過すれば予約を作成する
        let reservation_id = ReservationId::new();
        let reserved_at = Utc::now();
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ;
            "#,
        )
        .bind(reservation_id)
        .bind(event.client_id)
        .bind(event.service_id)
        .bind(event.stylist_id)
        .bind(event.reserved_date)
        .bind(event.start_time)
        .bind(slot.end_time)
        .bind(slot.attended_minutes)
        .bind(ReservationStatus::Pending.as_ref())
        .bind(reserved_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            reservation_id,
            client_id: event.client_id,
            service_id: event.service_id,
            stylist_id: event.stylist_id,
            reserved_date: event.reserved_date,
            start_time: event.start_time,
            end_time: slot.end_time,
            attended_minutes: slot.attended_minutes,
            status: ReservationStatus::Pending,
            reserved_at,
        })
    }

    // 予約変更操作を行う
    async fn reschedule(&self, event: RescheduleReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        // ① 変更対象の予約が存在するか
        let current: Option<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at
                FROM reservations
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(current) = current else {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                event.reservation_id
            )));
        };
        let current = Reservation::try_from(current)?;

        // ② 新しい枠に対して作成時と同じパイプラインを実行する。
        //    衝突判定では自分自身の旧い枠を除外する
        let slot = self
            .validate_slot(
                &mut tx,
                current.stylist_id,
                current.service_id,
                event.new_date,
                event.new_start_time,
                Some(event.reservation_id),
            )
            .await?;

        // ③ 日時と所要時間を更新し、ステータスを pending に戻す
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET
                    reserved_date = $1,
                    start_time = $2,
                    end_time = $3,
                    attended_minutes = $4,
                    status = $5
                WHERE reservation_id = $6
            "#,
        )
        .bind(event.new_date)
        .bind(event.new_start_time)
        .bind(slot.end_time)
        .bind(slot.attended_minutes)
        .bind(ReservationStatus::Pending.as_ref())
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(Reservation {
            reserved_date: event.new_date,
            start_time: event.new_start_time,
            end_time: slot.end_time,
            attended_minutes: slot.attended_minutes,
            status: ReservationStatus::Pending,
            ..current
        })
    }

    // 予約キャンセル操作を行う。
    // レコードは削除せず、ステータスを cancelled に遷移させるだけである。
    // すでにキャンセル済みでも成功する（冪等）
    async fn cancel(&self, reservation_id: ReservationId) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'cancelled'
                WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            )));
        }

        Ok(())
    }

    async fn change_status(
        &self,
        reservation_id: ReservationId,
        new_status: ReservationStatus,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = $1
                WHERE reservation_id = $2
            "#,
        )
        .bind(new_status.as_ref())
        .bind(reservation_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at
                FROM reservations
                WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        match row {
            Some(row) => Reservation::try_from(row),
            None => Err(AppError::EntityNotFound(format!(
                "予約（{reservation_id}）が見つかりませんでした。"
            ))),
        }
    }

    // 顧客に紐づく予約一覧を取得する
    async fn find_by_client(&self, client_id: ClientId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at
                FROM reservations
                WHERE client_id = $1
                ORDER BY reserved_date ASC, start_time ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn find_by_stylist_on(
        &self,
        stylist_id: StylistId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at
                FROM reservations
                WHERE stylist_id = $1 AND reserved_date = $2
                ORDER BY start_time ASC
            "#,
        )
        .bind(stylist_id)
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn find_by_stylist_between(
        &self,
        stylist_id: StylistId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(
            r#"
                SELECT
                reservation_id, client_id, service_id, stylist_id,
                reserved_date, start_time, end_time, attended_minutes,
                status, reserved_at
                FROM reservations
                WHERE stylist_id = $1 AND reserved_date BETWEEN $2 AND $3
                ORDER BY reserved_date ASC, start_time ASC
            "#,
        )
        .bind(stylist_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    // 以下の 4 つは連携元システムが破壊的変更の前に呼ぶ読み取り専用クエリ

    async fn has_future_reservations(&self, stylist_id: StylistId) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM reservations
                    WHERE stylist_id = $1
                      AND status <> 'cancelled'
                      AND reserved_date >= CURRENT_DATE
                )
            "#,
        )
        .bind(stylist_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn has_reservations_on_weekday(
        &self,
        stylist_id: StylistId,
        day_of_week: Weekday,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM reservations
                    WHERE stylist_id = $1
                      AND status <> 'cancelled'
                      AND reserved_date >= CURRENT_DATE
                      AND CAST(EXTRACT(DOW FROM reserved_date) AS SMALLINT) = $2
                )
            "#,
        )
        .bind(stylist_id)
        .bind(weekday_number(day_of_week))
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn has_reservations_in_date_range(
        &self,
        stylist_id: StylistId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<bool> {
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM reservations
                    WHERE stylist_id = $1
                      AND status <> 'cancelled'
                      AND reserved_date BETWEEN $2 AND $3
                )
            "#,
        )
        .bind(stylist_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }

    async fn has_reservations_in_time_range(
        &self,
        stylist_id: StylistId,
        day_of_week: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<bool> {
        // 重複条件は空き判定と同じ半開区間で揃えている
        sqlx::query_scalar(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM reservations
                    WHERE stylist_id = $1
                      AND status <> 'cancelled'
                      AND reserved_date >= CURRENT_DATE
                      AND CAST(EXTRACT(DOW FROM reserved_date) AS SMALLINT) = $2
                      AND start_time < $4
                      AND $3 < end_time
                )
            "#,
        )
        .bind(stylist_id)
        .bind(weekday_number(day_of_week))
        .bind(start)
        .bind(end)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

impl ReservationRepositoryImpl {
    // create, reschedule メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // 予約作成・予約変更で共通の検証パイプライン。
    // 事前のチェックとして、以下を順に調べる。
    // - 指定のメニューが存在し、利用可能か
    // - 指定のスタッフが存在し、予約を受け付けているか
    // - 所要時間（メニューの時間＋準備時間）から終了時刻を求める
    // - 休業期間・基本スケジュール・固定休憩・既存予約と衝突しないか
    //
    // 上記の全てを通過した場合のみ永続化ステップに進む。
    // 予約変更時は exclude に自分の予約 ID が渡される
    async fn validate_slot(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        stylist_id: StylistId,
        service_id: ServiceId,
        reserved_date: NaiveDate,
        start_time: NaiveTime,
        exclude: Option<ReservationId>,
    ) -> AppResult<ValidatedSlot> {
        //
        // ①② メニューとスタッフの存在確認・利用可否チェック
        //
        let service: Option<Service> = sqlx::query_as::<_, ServiceRow>(
            r#"
                SELECT service_id, service_name, duration_minutes, is_available
                FROM services
                WHERE service_id = $1
            "#,
        )
        .bind(service_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Service::from);

        let stylist: Option<Stylist> = sqlx::query_as::<_, StylistRow>(
            r#"
                SELECT stylist_id, full_name, external_identity_id, is_active
                FROM stylists
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(Stylist::from);

        let service = check_references(service_id, stylist_id, service.as_ref(), stylist.as_ref())
            .map_err(reject_reference)?;

        //
        // ③ 所要時間の算出と終了時刻の導出
        //
        let minutes = attended_minutes(service.duration_minutes);
        let end_time = start_time + Duration::minutes(i64::from(minutes));

        //
        // ④ 空き判定に使うレプリカと既存予約をまとめて取得する
        //
        let blockout: Option<BlockoutRange> = sqlx::query_as::<_, BlockoutRow>(
            r#"
                SELECT stylist_id, start_date, end_date
                FROM blockout_ranges
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .map(BlockoutRange::from);

        let schedule_rows: Vec<ScheduleEntryRow> = sqlx::query_as(
            r#"
                SELECT day_of_week, start_time, end_time, is_working_day
                FROM weekly_schedules
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        // スケジュール未登録（0 件）と曜日エントリーなしは区別する
        let schedule = if schedule_rows.is_empty() {
            None
        } else {
            let entries = schedule_rows
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?;
            Some(WeeklySchedule {
                stylist_id,
                entries,
            })
        };

        let breaks: Vec<BreakEntry> = sqlx::query_as::<_, BreakEntryRow>(
            r#"
                SELECT day_of_week, break_start, break_end
                FROM daily_breaks
                WHERE stylist_id = $1
            "#,
        )
        .bind(stylist_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>, _>>()?;

        // キャンセル済みは衝突しない
        let existing: Vec<BookedSlot> = sqlx::query_as::<_, BookedSlotRow>(
            r#"
                SELECT reservation_id, start_time, end_time
                FROM reservations
                WHERE stylist_id = $1
                  AND reserved_date = $2
                  AND status <> 'cancelled'
            "#,
        )
        .bind(stylist_id)
        .bind(reserved_date)
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(BookedSlot::from)
        .collect();

        //
        // ⑤ 空き判定本体。失敗理由はそのままクライアントエラーにする
        //
        let candidate = CandidateSlot {
            reserved_date,
            start_time,
            end_time,
        };
        check_slot(
            &candidate,
            blockout.as_ref(),
            schedule.as_ref(),
            &breaks,
            &existing,
            exclude,
        )
        .map_err(|rejection| AppError::UnprocessableEntity(rejection.to_string()))?;

        Ok(ValidatedSlot {
            end_time,
            attended_minutes: minutes,
        })
    }
}
