use crate::model::id::{ClientId, ReservationId, ServiceId, StylistId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub mod availability;
pub mod event;

/// 施術時間に加算する準備時間（分）
pub const PREPARATION_BUFFER_MINUTES: i32 = 15;

/// メニューの所要時間から実際に枠を占有する時間を求める
pub fn attended_minutes(duration_minutes: i32) -> i32 {
    duration_minutes + PREPARATION_BUFFER_MINUTES
}

#[derive(Debug)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub stylist_id: StylistId,
    pub reserved_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub attended_minutes: i32,
    pub status: ReservationStatus,
    pub reserved_at: DateTime<Utc>,
}

// ステータスは外部コマンドからも設定されるため全種を保持する。
// 予約レコードは物理削除せず cancelled へ遷移させる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
    Initiated,
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}
