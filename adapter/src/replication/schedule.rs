use super::{
    bind_topic_queue,
    event::{parse_event, BaseScheduleEvent, BlockoutEvent, DailyBreaksEvent},
    map_broker_error,
};
use futures::StreamExt;
use kernel::repository::schedule::ScheduleRepository;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions},
    types::FieldTable,
    Connection, Consumer,
};
use shared::{config::AmqpConfig, error::AppResult};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const EXCHANGE: &str = "salon.schedule";
pub const QUEUE: &str = "reservation.schedule-replica";
pub const BINDING_KEY: &str = "schedule.#";

// スケジュール系は単一のキューに 3 種類のイベントが届くため、
// ルーティングキーの接頭辞で種類を見分ける
const BASE_SCHEDULE_PREFIX: &str = "schedule.base";
const BREAKS_PREFIX: &str = "schedule.breaks";
const BLOCKOUT_PREFIX: &str = "schedule.blockout";

pub async fn start(
    connection: &Connection,
    config: &AmqpConfig,
    repository: Arc<dyn ScheduleRepository>,
) -> AppResult<JoinHandle<()>> {
    let channel = bind_topic_queue(connection, config, EXCHANGE, QUEUE, BINDING_KEY).await?;
    let consumer = channel
        .basic_consume(
            QUEUE,
            "schedule-replica-consumer",
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;
    Ok(tokio::spawn(run(consumer, repository)))
}

async fn run(mut consumer: Consumer, repository: Arc<dyn ScheduleRepository>) {
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                tracing::warn!(error.message = %e, queue = QUEUE, "配信の受信に失敗しました");
                continue;
            }
        };

        let routing_key = delivery.routing_key.as_str().to_string();
        if let Err(e) = apply(&routing_key, &delivery.data, repository.as_ref()).await {
            tracing::error!(
                error.message = %e,
                routing_key = %routing_key,
                "スケジュールイベントの適用に失敗しました"
            );
        }

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            tracing::error!(error.message = %e, queue = QUEUE, "ack に失敗しました");
        }
    }
}

async fn apply(
    routing_key: &str,
    payload: &[u8],
    repository: &dyn ScheduleRepository,
) -> AppResult<()> {
    if routing_key.starts_with(BASE_SCHEDULE_PREFIX) {
        let event: BaseScheduleEvent = parse_event(payload)?;
        repository.update_weekly(event.into_update()?).await
    } else if routing_key.starts_with(BREAKS_PREFIX) {
        let event: DailyBreaksEvent = parse_event(payload)?;
        repository.update_breaks(event.into_update()?).await
    } else if routing_key.starts_with(BLOCKOUT_PREFIX) {
        let event: BlockoutEvent = parse_event(payload)?;
        if event.action.is_upsert() {
            repository.upsert_blockout(event.into_upsert()).await
        } else {
            // 休業期間の削除イベントは連携元で中身が未実装のため適用しない
            tracing::warn!(
                stylist_id = %event.stylist_id,
                "休業期間の削除イベントは適用しません"
            );
            Ok(())
        }
    } else {
        tracing::warn!(routing_key, "未知のルーティングキーのため読み飛ばします");
        Ok(())
    }
}
