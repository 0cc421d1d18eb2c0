use crate::model::validation::{DateRangeCheckQuery, HasReservationsResponse, TimeRangeCheckQuery};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use kernel::model::{id::StylistId, schedule::weekday_from_number};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// 連携元システムが破壊的変更の前に呼ぶ確認クエリ。
// ここでは何もロックせず、その時点の予約の有無を返すだけである

pub async fn check_future_reservations(
    Path(stylist_id): Path<StylistId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<HasReservationsResponse>> {
    registry
        .reservation_repository()
        .has_future_reservations(stylist_id)
        .await
        .map(HasReservationsResponse::from)
        .map(Json)
}

pub async fn check_weekday_reservations(
    Path((stylist_id, day_of_week)): Path<(StylistId, i16)>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<HasReservationsResponse>> {
    let day_of_week = weekday_from_number(day_of_week).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("不正な曜日番号です：{day_of_week}"))
    })?;

    registry
        .reservation_repository()
        .has_reservations_on_weekday(stylist_id, day_of_week)
        .await
        .map(HasReservationsResponse::from)
        .map(Json)
}

pub async fn check_date_range_reservations(
    Path(stylist_id): Path<StylistId>,
    Query(query): Query<DateRangeCheckQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<HasReservationsResponse>> {
    registry
        .reservation_repository()
        .has_reservations_in_date_range(stylist_id, query.from, query.to)
        .await
        .map(HasReservationsResponse::from)
        .map(Json)
}

pub async fn check_time_range_reservations(
    Path(stylist_id): Path<StylistId>,
    Query(query): Query<TimeRangeCheckQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<HasReservationsResponse>> {
    let day_of_week = weekday_from_number(query.day_of_week).ok_or_else(|| {
        AppError::UnprocessableEntity(format!("不正な曜日番号です：{}", query.day_of_week))
    })?;

    registry
        .reservation_repository()
        .has_reservations_in_time_range(stylist_id, day_of_week, query.start, query.end)
        .await
        .map(HasReservationsResponse::from)
        .map(Json)
}
