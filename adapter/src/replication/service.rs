use super::{
    bind_topic_queue,
    event::{parse_event, EventAction, ServiceEvent},
    map_broker_error,
};
use futures::StreamExt;
use kernel::repository::service::ServiceRepository;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions},
    types::FieldTable,
    Connection, Consumer,
};
use shared::{config::AmqpConfig, error::AppResult};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const EXCHANGE: &str = "salon.service";
pub const QUEUE: &str = "reservation.service-replica";
pub const BINDING_KEY: &str = "service.#";

pub async fn start(
    connection: &Connection,
    config: &AmqpConfig,
    repository: Arc<dyn ServiceRepository>,
) -> AppResult<JoinHandle<()>> {
    let channel = bind_topic_queue(connection, config, EXCHANGE, QUEUE, BINDING_KEY).await?;
    let consumer = channel
        .basic_consume(
            QUEUE,
            "service-replica-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;
    Ok(tokio::spawn(run(consumer, repository)))
}

async fn run(mut consumer: Consumer, repository: Arc<dyn ServiceRepository>) {
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                tracing::warn!(error.message = %e, queue = QUEUE, "配信の受信に失敗しました");
                continue;
            }
        };

        // 適用に失敗したメッセージも ack する。リトライや DLQ への転送は行わない
        if let Err(e) = apply(&delivery.data, repository.as_ref()).await {
            tracing::error!(
                error.message = %e,
                routing_key = %delivery.routing_key,
                "メニューイベントの適用に失敗しました"
            );
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            tracing::error!(error.message = %e, queue = QUEUE, "ack に失敗しました");
        }
    }
}

async fn apply(payload: &[u8], repository: &dyn ServiceRepository) -> AppResult<()> {
    let event: ServiceEvent = parse_event(payload)?;
    match event.action {
        EventAction::Created | EventAction::Updated => repository.upsert(event.into_upsert()).await,
        EventAction::Deactivated => repository.deactivate(event.id).await,
        EventAction::Removed => {
            tracing::warn!(service_id = %event.id, "削除イベントは適用しません");
            Ok(())
        }
    }
}
