use derive_new::new;
use kernel::repository::{
    client::ClientRepository, schedule::ScheduleRepository, service::ServiceRepository,
    stylist::StylistRepository,
};
use lapin::{
    options::{BasicQosOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::FieldTable,
    Channel, Connection, ConnectionProperties, ExchangeKind,
};
use shared::{
    config::AmqpConfig,
    error::{AppError, AppResult},
};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub mod client;
pub mod event;
pub mod schedule;
pub mod service;
pub mod stylist;

/// コンシューマー群が参照するリポジトリー
#[derive(Clone, new)]
pub struct ReplicationDeps {
    pub service_repository: Arc<dyn ServiceRepository>,
    pub stylist_repository: Arc<dyn StylistRepository>,
    pub client_repository: Arc<dyn ClientRepository>,
    pub schedule_repository: Arc<dyn ScheduleRepository>,
}

/// 連携元システムからのレプリケーションを担うコンシューマー群。
/// ファミリーごとに専用のチャネルとキューを持ち、別タスクとして動かす
pub struct ReplicationSupervisor {
    connection: Connection,
    handles: Vec<JoinHandle<()>>,
}

impl ReplicationSupervisor {
    pub async fn start(config: &AmqpConfig, deps: ReplicationDeps) -> AppResult<Self> {
        let connection = Connection::connect(
            &config.url,
            ConnectionProperties::default().with_connection_name("salon-reservation".into()),
        )
        .await
        .map_err(map_broker_error)?;

        tracing::info!(url = %config.url, "AMQP ブローカーに接続しました");

        let handles = vec![
            service::start(&connection, config, deps.service_repository.clone()).await?,
            stylist::start(&connection, config, deps.stylist_repository.clone()).await?,
            client::start(&connection, config, deps.client_repository.clone()).await?,
            schedule::start(&connection, config, deps.schedule_repository.clone()).await?,
        ];

        Ok(Self {
            connection,
            handles,
        })
    }

    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        if let Err(e) = self.connection.close(200, "shutting down").await {
            tracing::warn!(error.message = %e, "AMQP 接続のクローズに失敗しました");
        }
    }
}

// トピックエクスチェンジと永続キューを宣言してバインドし、
// プリフェッチ数を設定したチャネルを返す
pub(crate) async fn bind_topic_queue(
    connection: &Connection,
    config: &AmqpConfig,
    exchange: &str,
    queue: &str,
    binding_key: &str,
) -> AppResult<Channel> {
    let channel = connection
        .create_channel()
        .await
        .map_err(map_broker_error)?;

    channel
        .basic_qos(config.prefetch_count, BasicQosOptions::default())
        .await
        .map_err(map_broker_error)?;

    channel
        .exchange_declare(
            exchange,
            ExchangeKind::Topic,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;

    channel
        .queue_bind(
            queue,
            exchange,
            binding_key,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
        .map_err(map_broker_error)?;

    tracing::info!(exchange, queue, binding_key, "キューをバインドしました");

    Ok(channel)
}

pub(crate) fn map_broker_error(e: lapin::Error) -> AppError {
    AppError::ExternalServiceError(format!("AMQP ブローカーでエラーが発生しました：{e}"))
}
