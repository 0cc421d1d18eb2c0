use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{ClientId, ReservationId, ServiceId, StylistId},
    reservation::{
        event::{CreateReservation, RescheduleReservation},
        Reservation, ReservationStatus,
    },
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub start_time: NaiveTime,
    #[garde(custom(not_nil_client))]
    pub client_id: ClientId,
    #[garde(custom(not_nil_service))]
    pub service_id: ServiceId,
    #[garde(custom(not_nil_stylist))]
    pub stylist_id: StylistId,
}

impl From<CreateReservationRequest> for CreateReservation {
    fn from(value: CreateReservationRequest) -> Self {
        CreateReservation::new(
            value.date,
            value.start_time,
            value.client_id,
            value.service_id,
            value.stylist_id,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleReservationRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub start_time: NaiveTime,
}

impl RescheduleReservationRequest {
    pub fn into_event(self, reservation_id: ReservationId) -> RescheduleReservation {
        RescheduleReservation::new(reservation_id, self.date, self.start_time)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub new_status: ReservationStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
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

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
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
        Self {
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
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

fn not_nil_client(id: &ClientId, _ctx: &()) -> garde::Result {
    not_nil(id.is_nil())
}

fn not_nil_service(id: &ServiceId, _ctx: &()) -> garde::Result {
    not_nil(id.is_nil())
}

fn not_nil_stylist(id: &StylistId, _ctx: &()) -> garde::Result {
    not_nil(id.is_nil())
}

fn not_nil(is_nil: bool) -> garde::Result {
    if is_nil {
        return Err(garde::Error::new("ID が指定されていません"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_json() {
        let payload = r#"{
            "date": "2026-09-01",
            "startTime": "10:00:00",
            "clientId": "7f3c3f42-ffb1-4a26-b99e-2f9a7d5c0c11",
            "serviceId": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "stylistId": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102"
        }"#;
        let req: CreateReservationRequest = serde_json::from_str(payload).unwrap();
        assert!(req.validate(&()).is_ok());
    }

    #[test]
    fn nil_ids_fail_validation() {
        let payload = r#"{
            "date": "2026-09-01",
            "startTime": "10:00:00",
            "clientId": "00000000-0000-0000-0000-000000000000",
            "serviceId": "0e3d6f1c-43f4-44fc-8a4e-bf09e2a4a2f5",
            "stylistId": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102"
        }"#;
        let req: CreateReservationRequest = serde_json::from_str(payload).unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn change_status_request_parses_camel_case_status() {
        let req: ChangeStatusRequest =
            serde_json::from_str(r#"{"newStatus": "inProgress"}"#).unwrap();
        assert_eq!(req.new_status, ReservationStatus::InProgress);
    }
}
