use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// 連携元システムが破壊的変更（スタッフ削除やスケジュール変更）の前に
// 問い合わせてくる確認クエリの入出力

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeCheckQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeCheckQuery {
    pub day_of_week: i16,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HasReservationsResponse {
    pub has_reservations: bool,
}

impl From<bool> for HasReservationsResponse {
    fn from(has_reservations: bool) -> Self {
        Self { has_reservations }
    }
}
