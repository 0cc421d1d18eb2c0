use crate::model::id::StylistId;
use derive_new::new;
use uuid::Uuid;

#[derive(new)]
pub struct UpsertStylist {
    pub stylist_id: StylistId,
    pub full_name: String,
    pub external_identity_id: Uuid,
    pub is_active: bool,
}
