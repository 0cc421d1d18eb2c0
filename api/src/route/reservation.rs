use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, change_reservation_status, register_reservation, reschedule_reservation,
    show_client_reservations, show_reservation, show_stylist_reservations,
    show_stylist_reservations_in_range,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/", post(register_reservation))
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id", put(reschedule_reservation))
        .route("/:reservation_id", delete(cancel_reservation))
        .route("/:reservation_id/status", put(change_reservation_status))
        .route("/client/:client_id", get(show_client_reservations))
        .route("/stylist/:stylist_id", get(show_stylist_reservations))
        .route(
            "/stylist/:stylist_id/range",
            get(show_stylist_reservations_in_range),
        );

    Router::new().nest("/reservations", reservation_routers)
}
