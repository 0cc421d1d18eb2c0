use crate::model::reservation::{
    ChangeStatusRequest, CreateReservationRequest, DateQuery, DateRangeQuery,
    RescheduleReservationRequest, ReservationResponse, ReservationsResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::{ClientId, ReservationId, StylistId};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn register_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    req.validate(&())?;

    registry
        .reservation_repository()
        .create(req.into())
        .await
        .map(ReservationResponse::from)
        .map(|res| (StatusCode::CREATED, Json(res)))
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

pub async fn reschedule_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RescheduleReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    registry
        .reservation_repository()
        .reschedule(req.into_event(reservation_id))
        .await
        .map(ReservationResponse::from)
        .map(Json)
}

// キャンセルはレコードの削除ではなくステータス遷移である
pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .cancel(reservation_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn change_reservation_status(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ChangeStatusRequest>,
) -> AppResult<StatusCode> {
    registry
        .reservation_repository()
        .change_status(reservation_id, req.new_status)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}

pub async fn show_client_reservations(
    Path(client_id): Path<ClientId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_client(client_id)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_stylist_reservations(
    Path(stylist_id): Path<StylistId>,
    Query(query): Query<DateQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_stylist_on(stylist_id, query.date)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn show_stylist_reservations_in_range(
    Path(stylist_id): Path<StylistId>,
    Query(query): Query<DateRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_by_stylist_between(stylist_id, query.from, query.to)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}
