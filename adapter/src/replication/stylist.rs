use super::{
    bind_topic_queue,
    event::{parse_event, EventAction, StylistEvent},
    map_broker_error,
};
use futures::StreamExt;
use kernel::repository::stylist::StylistRepository;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions},
    types::FieldTable,
    Connection, Consumer,
};
use shared::{config::AmqpConfig, error::AppResult};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const EXCHANGE: &str = "salon.stylist";
pub const QUEUE: &str = "reservation.stylist-replica";
pub const BINDING_KEY: &str = "stylist.#";

pub async fn start(
    connection: &Connection,
    config: &AmqpConfig,
    repository: Arc<dyn StylistRepository>,
) -> AppResult<JoinHandle<()>> {
    let channel = bind_topic_queue(connection, config, EXCHANGE, QUEUE, BINDING_KEY).await?;
    let consumer = channel
        .basic_consume(
            QUEUE,
            "stylist-replica-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;
    Ok(tokio::spawn(run(consumer, repository)))
}

async fn run(mut consumer: Consumer, repository: Arc<dyn StylistRepository>) {
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                tracing::warn!(error.message = %e, queue = QUEUE, "配信の受信に失敗しました");
                continue;
            }
        };

        if let Err(e) = apply(&delivery.data, repository.as_ref()).await {
            tracing::error!(
                error.message = %e,
                routing_key = %delivery.routing_key,
                "スタッフイベントの適用に失敗しました"
            );
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            tracing::error!(error.message = %e, queue = QUEUE, "ack に失敗しました");
        }
    }
}

async fn apply(payload: &[u8], repository: &dyn StylistRepository) -> AppResult<()> {
    let event: StylistEvent = parse_event(payload)?;
    match event.action {
        EventAction::Created | EventAction::Updated => repository.upsert(event.into_upsert()).await,
        EventAction::Deactivated => repository.deactivate(event.id).await,
        EventAction::Removed => {
            tracing::warn!(stylist_id = %event.id, "削除イベントは適用しません");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kernel::model::{
        id::StylistId,
        stylist::{event::UpsertStylist, Stylist},
    };
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Default)]
    struct InMemoryStylistRepository {
        stylists: Mutex<HashMap<StylistId, Stylist>>,
    }

    #[async_trait]
    impl StylistRepository for InMemoryStylistRepository {
        async fn upsert(&self, event: UpsertStylist) -> AppResult<()> {
            self.stylists.lock().unwrap().insert(
                event.stylist_id,
                Stylist {
                    stylist_id: event.stylist_id,
                    full_name: event.full_name,
                    external_identity_id: event.external_identity_id,
                    is_active: event.is_active,
                },
            );
            Ok(())
        }

        async fn deactivate(&self, stylist_id: StylistId) -> AppResult<()> {
            match self.stylists.lock().unwrap().get_mut(&stylist_id) {
                Some(stylist) => {
                    stylist.is_active = false;
                    Ok(())
                }
                None => Err(shared::error::AppError::EntityNotFound(format!(
                    "スタッフ（{stylist_id}）が見つかりませんでした。"
                ))),
            }
        }

        async fn find_by_id(&self, stylist_id: StylistId) -> AppResult<Option<Stylist>> {
            Ok(self.stylists.lock().unwrap().get(&stylist_id).cloned())
        }
    }

    #[tokio::test]
    async fn updated_event_overwrites_the_replica() {
        let repo = InMemoryStylistRepository::default();
        let id = "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102";
        let identity = "9bfb8d9c-5f93-4a08-8191-2c5c1e5a6e29";

        let created = format!(
            r#"{{
                "id": "{id}",
                "fullName": "山田 花子",
                "externalIdentityId": "{identity}",
                "active": true,
                "action": "CREATED"
            }}"#
        );
        apply(created.as_bytes(), &repo).await.unwrap();

        let updated = format!(
            r#"{{
                "id": "{id}",
                "fullName": "山田 はなこ",
                "externalIdentityId": "{identity}",
                "active": true,
                "action": "UPDATED"
            }}"#
        );
        apply(updated.as_bytes(), &repo).await.unwrap();

        let stylist = repo
            .find_by_id(id.parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stylist.full_name, "山田 はなこ");
    }

    #[tokio::test]
    async fn deactivation_for_an_unknown_stylist_is_an_error() {
        let repo = InMemoryStylistRepository::default();
        let payload = r#"{
            "id": "52c1c9e2-0d2d-4b1a-9b52-7b8a8a3ad102",
            "fullName": "山田 花子",
            "externalIdentityId": "9bfb8d9c-5f93-4a08-8191-2c5c1e5a6e29",
            "active": true,
            "action": "DEACTIVATED"
        }"#;
        assert!(apply(payload.as_bytes(), &repo).await.is_err());
    }
}
