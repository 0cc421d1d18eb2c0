use crate::model::id::ClientId;
use derive_new::new;

#[derive(new)]
pub struct UpsertClient {
    pub external_identity_id: ClientId,
    pub username: String,
    pub full_name: String,
}
