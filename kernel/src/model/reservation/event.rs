use crate::model::id::{ClientId, ReservationId, ServiceId, StylistId};
use chrono::{NaiveDate, NaiveTime};
use derive_new::new;

#[derive(new)]
pub struct CreateReservation {
    pub reserved_date: NaiveDate,
    pub start_time: NaiveTime,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    pub stylist_id: StylistId,
}

#[derive(new)]
pub struct RescheduleReservation {
    pub reservation_id: ReservationId,
    pub new_date: NaiveDate,
    pub new_start_time: NaiveTime,
}
