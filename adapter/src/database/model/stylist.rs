use kernel::model::{id::StylistId, stylist::Stylist};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct StylistRow {
    pub stylist_id: StylistId,
    pub full_name: String,
    pub external_identity_id: Uuid,
    pub is_active: bool,
}

impl From<StylistRow> for Stylist {
    fn from(value: StylistRow) -> Self {
        let StylistRow {
            stylist_id,
            full_name,
            external_identity_id,
            is_active,
        } = value;
        Stylist {
            stylist_id,
            full_name,
            external_identity_id,
            is_active,
        }
    }
}
