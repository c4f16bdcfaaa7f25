// 连接描述符解析
// 根据运行环境从 DB_* 环境变量构建完整的连接参数

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::db::environment::{AppEnvironment, PoolBounds};
use crate::db::tls::{TlsMode, TlsPolicy, TlsSettings, TrustBundle};
use crate::errors::OmniservesError;

/// 数据库连接描述符，解析后不再修改
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub environment: AppEnvironment,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub pool: PoolBounds,
    pub tls: TlsSettings,
    pub connect_timeout: Duration,
    pub probe_timeout: Duration,
}

impl ConnectionDescriptor {
    /// 屏蔽密码的连接地址，用于日志记录
    pub fn display_url(&self) -> String {
        let fallback = || format!("mysql://{}:***@{}:{}/{}", self.user, self.host, self.port, self.database);

        let Ok(mut url) = url::Url::parse("mysql://localhost") else {
            return fallback();
        };
        if url.set_host(Some(&self.host)).is_err() {
            return fallback();
        }
        let _ = url.set_port(Some(self.port));
        let _ = url.set_username(&self.user);
        let _ = url.set_password(Some("***"));
        url.set_path(&format!("/{}", self.database));
        url.to_string()
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("pool", &self.pool)
            .field("tls", &self.tls)
            .field("connect_timeout", &self.connect_timeout)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

/// 解析过程中的非致命问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveWarning {
    /// 生产环境未提供 CA 证书，连接不校验服务端身份
    MissingTrustBundle,
    /// 开发环境的 CA 证书无效，已忽略
    InvalidTrustBundle { reason: String },
    /// DB_PORT 无法使用，回退到默认端口
    PortFallback { value: String, default: u16 },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrustBundle => {
                f.write_str("DB_SSL_CA_BASE64 未设置，TLS 连接不会校验服务端证书")
            }
            Self::InvalidTrustBundle { reason } => {
                write!(f, "CA 证书无效，已忽略: {}", reason)
            }
            Self::PortFallback { value, default } => {
                write!(f, "DB_PORT={:?} 不是有效端口，使用默认端口 {}", value, default)
            }
        }
    }
}

/// 解析结果：描述符及其警告
#[derive(Debug, Clone)]
pub struct Resolved {
    pub descriptor: ConnectionDescriptor,
    pub warnings: Vec<ResolveWarning>,
}

/// DB_ 前缀的原始变量
#[derive(Debug, Default, Deserialize)]
struct RawDatabaseVars {
    host: Option<String>,
    port: Option<String>,
    user: Option<String>,
    password: Option<String>,
    name: Option<String>,
    ssl_ca: Option<String>,
    ssl_ca_base64: Option<String>,
    tls_policy: Option<String>,
    connect_timeout_secs: Option<String>,
    probe_timeout_secs: Option<String>,
}

/// 从进程环境变量解析连接描述符
pub fn resolve(environment: AppEnvironment) -> Result<Resolved, OmniservesError> {
    resolve_with(environment, None)
}

/// 从给定的变量快照解析连接描述符
pub fn resolve_from(
    environment: AppEnvironment,
    vars: HashMap<String, String>,
) -> Result<Resolved, OmniservesError> {
    resolve_with(environment, Some(vars))
}

#[instrument(skip(vars), fields(environment = %environment))]
fn resolve_with(
    environment: AppEnvironment,
    vars: Option<HashMap<String, String>>,
) -> Result<Resolved, OmniservesError> {
    let raw: RawDatabaseVars = Config::builder()
        .add_source(
            Environment::with_prefix("DB")
                .prefix_separator("_")
                .source(vars),
        )
        .build()?
        .try_deserialize()?;

    let mut warnings = Vec::new();

    let host = non_empty(raw.host.as_deref());
    let user = non_empty(raw.user.as_deref());
    let database = non_empty(raw.name.as_deref());
    // 密码原样保留，不做 trim
    let password = raw.password.as_deref().filter(|v| !v.is_empty());

    let mut missing = Vec::new();
    if host.is_none() {
        missing.push("DB_HOST");
    }
    if user.is_none() {
        missing.push("DB_USER");
    }
    if password.is_none() && environment.is_production() {
        missing.push("DB_PASSWORD");
    }
    if database.is_none() {
        missing.push("DB_NAME");
    }
    if !missing.is_empty() {
        return Err(OmniservesError::configuration(format!(
            "缺少必需的环境变量: {}",
            missing.join(", ")
        )));
    }

    let port = resolve_port(environment, raw.port.as_deref(), &mut warnings);
    let policy = match non_empty(raw.tls_policy.as_deref()) {
        Some(value) => TlsPolicy::parse(value)?,
        None => TlsPolicy::default(),
    };
    let tls = resolve_tls(
        environment,
        policy,
        non_empty(raw.ssl_ca.as_deref()),
        non_empty(raw.ssl_ca_base64.as_deref()),
        &mut warnings,
    )?;

    let connect_timeout = parse_timeout(
        "DB_CONNECT_TIMEOUT_SECS",
        raw.connect_timeout_secs.as_deref(),
        environment.default_connect_timeout(),
    )?;
    let probe_timeout = parse_timeout(
        "DB_PROBE_TIMEOUT_SECS",
        raw.probe_timeout_secs.as_deref(),
        environment.default_probe_timeout(),
    )?;

    let descriptor = ConnectionDescriptor {
        environment,
        host: host.unwrap_or_default().to_string(),
        port,
        user: user.unwrap_or_default().to_string(),
        password: password.unwrap_or_default().to_string(),
        database: database.unwrap_or_default().to_string(),
        pool: environment.pool_bounds(),
        tls,
        connect_timeout,
        probe_timeout,
    };

    for warning in &warnings {
        warn!(environment = %environment, "{}", warning);
    }

    info!(
        url = %descriptor.display_url(),
        pool_min = descriptor.pool.min,
        pool_max = descriptor.pool.max,
        tls_mode = ?descriptor.tls.mode,
        trust_bundle = descriptor.tls.has_trust_bundle(),
        "数据库连接参数解析完成"
    );

    Ok(Resolved {
        descriptor,
        warnings,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_port(
    environment: AppEnvironment,
    raw: Option<&str>,
    warnings: &mut Vec<ResolveWarning>,
) -> u16 {
    let default = environment.default_port();
    let Some(value) = non_empty(raw) else {
        return default;
    };

    match value.parse::<u16>() {
        Ok(port) if port > 0 => port,
        _ => {
            warnings.push(ResolveWarning::PortFallback {
                value: value.to_string(),
                default,
            });
            default
        }
    }
}

fn resolve_tls(
    environment: AppEnvironment,
    policy: TlsPolicy,
    ca_path: Option<&str>,
    ca_base64: Option<&str>,
    warnings: &mut Vec<ResolveWarning>,
) -> Result<TlsSettings, OmniservesError> {
    match environment {
        AppEnvironment::Development => {
            let loaded = match (ca_path, ca_base64) {
                (Some(path), _) => Some(TrustBundle::from_file(path)),
                (None, Some(encoded)) => Some(TrustBundle::from_base64(encoded)),
                (None, None) => None,
            };

            match loaded {
                Some(Ok(bundle)) => Ok(TlsSettings {
                    mode: TlsMode::VerifyCa,
                    trust_bundle: Some(bundle),
                }),
                Some(Err(e)) => {
                    warnings.push(ResolveWarning::InvalidTrustBundle {
                        reason: e.to_string(),
                    });
                    Ok(TlsSettings {
                        mode: TlsMode::Preferred,
                        trust_bundle: None,
                    })
                }
                None => Ok(TlsSettings {
                    mode: TlsMode::Preferred,
                    trust_bundle: None,
                }),
            }
        }
        AppEnvironment::Production => match ca_base64 {
            Some(encoded) => Ok(TlsSettings {
                mode: TlsMode::VerifyIdentity,
                trust_bundle: Some(TrustBundle::from_base64(encoded)?),
            }),
            None => match policy {
                TlsPolicy::FailOpen => {
                    warnings.push(ResolveWarning::MissingTrustBundle);
                    Ok(TlsSettings {
                        mode: TlsMode::Required,
                        trust_bundle: None,
                    })
                }
                TlsPolicy::FailClosed => Err(OmniservesError::tls_material(
                    "生产环境要求 DB_SSL_CA_BASE64 (DB_TLS_POLICY=fail_closed)",
                )),
            },
        },
    }
}

fn parse_timeout(
    name: &str,
    raw: Option<&str>,
    default: Duration,
) -> Result<Duration, OmniservesError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(OmniservesError::configuration(format!(
                "{} 必须是正整数秒数，当前值: {}",
                name, value
            ))),
        },
    }
}
