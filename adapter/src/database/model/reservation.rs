use kernel::model::{
    id::{ClientId, ReservationId, ServiceId, StylistId},
    reservation::{availability::BookedSlot, Reservation, ReservationStatus},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::str::FromStr;

// 予約一覧・単体取得に使う型
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub stylist_id: StylistId,
    pub reserved_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub attended_minutes: i32,
    pub status: String,
    pub reserved_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
            reservation_id,
            client_id,
            service_id,
            stylist_id,
            reserved_date,
            start_time,
            end_time,
            attended_minutes,
            status,
            reserved_at,
        } = value;
        // ステータスは TEXT 列で保存しているため、ここで列挙型へ戻す
        let status = ReservationStatus::from_str(&status).map_err(|_| {
            AppError::ConversionEntityError(format!("不正な予約ステータスです：{status}"))
        })?;
        Ok(Reservation {
            reservation_id,
            client_id,
            service_id,
            stylist_id,
            reserved_date,
            start_time,
            end_time,
            attended_minutes,
            status,
            reserved_at,
        })
    }
}

// 衝突判定に渡す最小限の型
#[derive(sqlx::FromRow)]
pub struct BookedSlotRow {
    pub reservation_id: ReservationId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<BookedSlotRow> for BookedSlot {
    fn from(value: BookedSlotRow) -> Self {
        let BookedSlotRow {
            reservation_id,
            start_time,
            end_time,
        } = value;
        BookedSlot {
            reservation_id,
            start_time,
            end_time,
        }
    }
}
