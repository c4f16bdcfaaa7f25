// 数据库连接管理
// 延迟创建进程内唯一的连接池，并提供健康探测

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, SqlxMySqlConnector, Statement};
use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{error, info, instrument};

use crate::db::descriptor::ConnectionDescriptor;
use crate::db::health::{HealthResult, PROBE_SQL, ProbeRow};
use crate::db::tls::TlsMode;
use crate::errors::OmniservesError;

/// 连接池构建器
#[async_trait]
pub trait PoolBuilder: Send + Sync {
    async fn build(&self, descriptor: &ConnectionDescriptor) -> Result<DatabaseConnection, OmniservesError>;
}

/// 基于 sqlx 的 MySQL 连接池构建器
///
/// 连接池是惰性的：构建时不建立网络连接，第一次使用时才连接。
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlPoolBuilder;

#[async_trait]
impl PoolBuilder for MySqlPoolBuilder {
    async fn build(&self, descriptor: &ConnectionDescriptor) -> Result<DatabaseConnection, OmniservesError> {
        let pool = MySqlPoolOptions::new()
            .min_connections(descriptor.pool.min)
            .max_connections(descriptor.pool.max)
            .acquire_timeout(descriptor.connect_timeout)
            .connect_lazy_with(connect_options(descriptor));

        Ok(SqlxMySqlConnector::from_sqlx_mysql_pool(pool))
    }
}

/// 构建驱动连接参数，并注入 CA 证书
pub fn connect_options(descriptor: &ConnectionDescriptor) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&descriptor.host)
        .port(descriptor.port)
        .username(&descriptor.user)
        .password(&descriptor.password)
        .database(&descriptor.database)
        .ssl_mode(ssl_mode(descriptor.tls.mode));

    match &descriptor.tls.trust_bundle {
        Some(bundle) => options.ssl_ca_from_pem(bundle.to_pem_bytes()),
        None => options,
    }
}

pub fn ssl_mode(mode: TlsMode) -> MySqlSslMode {
    match mode {
        TlsMode::Disabled => MySqlSslMode::Disabled,
        TlsMode::Preferred => MySqlSslMode::Preferred,
        TlsMode::Required => MySqlSslMode::Required,
        TlsMode::VerifyCa => MySqlSslMode::VerifyCa,
        TlsMode::VerifyIdentity => MySqlSslMode::VerifyIdentity,
    }
}

/// 数据库连接管理器
///
/// 每个进程持有一个实例，通过 `web::Data` / `Arc` 注入到调用方。
pub struct DatabaseManager {
    descriptor: ConnectionDescriptor,
    builder: Box<dyn PoolBuilder>,
    connection: OnceCell<DatabaseConnection>,
}

impl DatabaseManager {
    /// 使用默认的 MySQL 构建器，不会建立网络连接
    pub fn new(descriptor: ConnectionDescriptor) -> Self {
        Self::with_builder(descriptor, MySqlPoolBuilder)
    }

    pub fn with_builder(descriptor: ConnectionDescriptor, builder: impl PoolBuilder + 'static) -> Self {
        Self {
            descriptor,
            builder: Box::new(builder),
            connection: OnceCell::new(),
        }
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// 连接池是否已创建
    pub fn is_initialized(&self) -> bool {
        self.connection.initialized()
    }

    /// 获取共享的连接池句柄
    ///
    /// 第一次调用时创建连接池，并发的首次调用只会创建一次。
    /// 创建成功后不会重建；连接故障只通过 `check_health` 体现。
    pub async fn get_handle(&self) -> Result<&DatabaseConnection, OmniservesError> {
        self.connection
            .get_or_try_init(|| async {
                info!(
                    url = %self.descriptor.display_url(),
                    min_connections = self.descriptor.pool.min,
                    max_connections = self.descriptor.pool.max,
                    tls_mode = ?self.descriptor.tls.mode,
                    "创建数据库连接池"
                );

                let connection = self.builder.build(&self.descriptor).await.map_err(|e| {
                    error!(error = %e, "创建数据库连接池失败");
                    e
                })?;

                info!("数据库连接池已创建");
                Ok::<_, OmniservesError>(connection)
            })
            .await
    }

    /// 数据库健康检查
    ///
    /// 所有失败（连接池创建、网络、TLS、认证、超时）都转换为 `success = false`。
    #[instrument(skip(self), fields(environment = %self.descriptor.environment))]
    pub async fn check_health(&self) -> HealthResult {
        let started = Instant::now();
        let timeout = self.descriptor.probe_timeout;

        let outcome = match tokio::time::timeout(timeout, self.probe()).await {
            Ok(result) => result,
            Err(_) => Err(OmniservesError::timeout(format!(
                "数据库健康检查 ({}s)",
                timeout.as_secs()
            ))),
        };

        let elapsed = started.elapsed();
        let tls = self.descriptor.tls.has_trust_bundle();
        let ssl = if tls { "OK" } else { "ABSENT" };

        match outcome {
            Ok(row) => {
                info!(
                    database = ?row.database,
                    server_time = ?row.server_time,
                    response_time_ms = elapsed.as_millis() as u64,
                    "数据库健康检查通过"
                );
                HealthResult::connected(row, elapsed)
            }
            Err(e) => {
                error!(
                    error = %e,
                    ssl,
                    "数据库健康检查失败"
                );
                HealthResult::failed(e.to_string(), tls, elapsed)
            }
        }
    }

    async fn probe(&self) -> Result<ProbeRow, OmniservesError> {
        let connection = self.get_handle().await?;

        let row = connection
            .query_one(Statement::from_string(
                DatabaseBackend::MySql,
                PROBE_SQL.to_string(),
            ))
            .await?
            .ok_or_else(|| OmniservesError::connectivity("健康检查查询没有返回结果"))?;

        Ok(ProbeRow {
            test: row.try_get("", "test")?,
            server_time: row.try_get("", "time")?,
            database: row.try_get("", "database")?,
        })
    }

    /// 获取连接池状态
    pub fn pool_status(&self) -> PoolStatus {
        PoolStatus {
            min_connections: self.descriptor.pool.min,
            max_connections: self.descriptor.pool.max,
            initialized: self.is_initialized(),
            tls_mode: self.descriptor.tls.mode,
            trust_bundle: self.descriptor.tls.has_trust_bundle(),
        }
    }

    /// 关闭数据库连接，进程退出前调用
    #[instrument(skip(self))]
    pub async fn close(self) -> Result<(), OmniservesError> {
        let Some(connection) = self.connection.into_inner() else {
            info!("连接池未创建，无需关闭");
            return Ok(());
        };

        info!("关闭数据库连接");
        connection.close().await?;
        info!("数据库连接已关闭");
        Ok(())
    }
}

/// 连接池状态
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub min_connections: u32,
    pub max_connections: u32,
    pub initialized: bool,
    pub tls_mode: TlsMode,
    pub trust_bundle: bool,
}
