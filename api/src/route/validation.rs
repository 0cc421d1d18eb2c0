use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::validation::{
    check_date_range_reservations, check_future_reservations, check_time_range_reservations,
    check_weekday_reservations,
};

pub fn build_validation_routers() -> Router<AppRegistry> {
    let validation_routers = Router::new()
        .route("/stylists/:stylist_id/future", get(check_future_reservations))
        .route(
            "/stylists/:stylist_id/weekday/:day_of_week",
            get(check_weekday_reservations),
        )
        .route(
            "/stylists/:stylist_id/date-range",
            get(check_date_range_reservations),
        )
        .route(
            "/stylists/:stylist_id/time-range",
            get(check_time_range_reservations),
        );

    Router::new().nest("/validation", validation_routers)
}
