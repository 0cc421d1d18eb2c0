use kernel::model::{client::Client, id::ClientId};

#[derive(sqlx::FromRow)]
pub struct ClientRow {
    pub external_identity_id: ClientId,
    pub username: String,
    pub full_name: String,
}

impl From<ClientRow> for Client {
    fn from(value: ClientRow) -> Self {
        let ClientRow {
            external_identity_id,
            username,
            full_name,
        } = value;
        Client {
            external_identity_id,
            username,
            full_name,
        }
    }
}
