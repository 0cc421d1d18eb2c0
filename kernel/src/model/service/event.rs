use crate::model::id::ServiceId;
use derive_new::new;

#[derive(new)]
pub struct UpsertService {
    pub service_id: ServiceId,
    pub service_name: String,
    pub duration_minutes: i32,
    pub is_available: bool,
}
