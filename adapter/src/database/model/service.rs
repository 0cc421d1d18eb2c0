use kernel::model::{id::ServiceId, service::Service};

#[derive(sqlx::FromRow)]
pub struct ServiceRow {
    pub service_id: ServiceId,
    pub service_name: String,
    pub duration_minutes: i32,
    pub is_available: bool,
}

impl From<ServiceRow> for Service {
    fn from(value: ServiceRow) -> Self {
        let ServiceRow {
            service_id,
            service_name,
            duration_minutes,
            is_available,
        } = value;
        Service {
            service_id,
            service_name,
            duration_minutes,
            is_available,
        }
    }
}
