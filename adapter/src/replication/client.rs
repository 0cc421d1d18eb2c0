use super::{
    bind_topic_queue,
    event::{parse_event, ClientEvent, EventAction},
    map_broker_error,
};
use futures::StreamExt;
use kernel::repository::client::ClientRepository;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions},
    types::FieldTable,
    Connection, Consumer,
};
use shared::{config::AmqpConfig, error::AppResult};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const EXCHANGE: &str = "salon.client";
pub const QUEUE: &str = "reservation.client-replica";
pub const BINDING_KEY: &str = "client.#";

pub async fn start(
    connection: &Connection,
    config: &AmqpConfig,
    repository: Arc<dyn ClientRepository>,
) -> AppResult<JoinHandle<()>> {
    let channel = bind_topic_queue(connection, config, EXCHANGE, QUEUE, BINDING_KEY).await?;
    let consumer = channel
        .basic_consume(
            QUEUE,
            "client-replica-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;
    Ok(tokio::spawn(run(consumer, repository)))
}

async fn run(mut consumer: Consumer, repository: Arc<dyn ClientRepository>) {
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
                "顧客イベントの適用に失敗しました"
            );
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            tracing::error!(error.message = %e, queue = QUEUE, "ack に失敗しました");
        }
    }
}

async fn apply(payload: &[u8], repository: &dyn ClientRepository) -> AppResult<()> {
    let event: ClientEvent = parse_event(payload)?;
    match event.action {
        EventAction::Created | EventAction::Updated => repository.upsert(event.into_upsert()).await,
        // 顧客レプリカには無効化フラグがないため、作成と更新以外は受け流す
        _ => {
            tracing::warn!(
                client_id = %event.external_identity_id,
                "作成と更新以外の顧客イベントは適用しません"
            );
            Ok(())
        }
    }
}
