// TLS 信任材料
// 从文件或 base64 环境变量加载并校验 PEM 格式的 CA 证书

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::OmniservesError;

/// 标准字母表，`=` 填充可有可无
const CA_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const PEM_BEGIN_CERTIFICATE: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END_CERTIFICATE: &str = "-----END CERTIFICATE-----";

/// TLS 模式，与驱动的 MySQL SSL 模式一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    Disabled,
    /// 服务端支持时加密，不校验证书
    Preferred,
    /// 强制加密，不校验证书
    Required,
    /// 校验 CA
    VerifyCa,
    /// 校验 CA 和主机名
    VerifyIdentity,
}

impl TlsMode {
    pub fn verifies_server(&self) -> bool {
        matches!(self, Self::VerifyCa | Self::VerifyIdentity)
    }
}

/// 生产环境缺少 CA 证书时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsPolicy {
    /// 记录警告并在不校验证书的情况下继续
    #[default]
    FailOpen,
    /// 拒绝启动
    FailClosed,
}

impl TlsPolicy {
    pub fn parse(raw: &str) -> Result<Self, OmniservesError> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_open" => Ok(Self::FailOpen),
            "fail_closed" => Ok(Self::FailClosed),
            other => Err(OmniservesError::configuration(format!(
                "无效的 DB_TLS_POLICY: {}，有效值: fail_open, fail_closed",
                other
            ))),
        }
    }
}

/// 证书来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustSource {
    File(PathBuf),
    Base64Env,
}

impl fmt::Display for TrustSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Base64Env => f.write_str("env:DB_SSL_CA_BASE64"),
        }
    }
}

/// 已校验的 PEM 证书包
#[derive(Clone, PartialEq, Eq)]
pub struct TrustBundle {
    pem: String,
    certificates: usize,
    source: TrustSource,
}

impl TrustBundle {
    /// 从 PEM 字节构建并校验
    pub fn from_pem_bytes(bytes: Vec<u8>, source: TrustSource) -> Result<Self, OmniservesError> {
        let pem = String::from_utf8(bytes)
            .map_err(|_| OmniservesError::tls_material(format!("{} 不是有效的 UTF-8 文本", source)))?;
        let certificates = count_certificates(&pem)
            .map_err(|reason| OmniservesError::tls_material(format!("{}: {}", source, reason)))?;

        Ok(Self {
            pem,
            certificates,
            source,
        })
    }

    /// 解码 base64 编码的 PEM 文本，允许换行和空白
    pub fn from_base64(encoded: &str) -> Result<Self, OmniservesError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(OmniservesError::tls_material("DB_SSL_CA_BASE64 为空"));
        }

        let bytes = CA_BASE64.decode(compact.as_bytes())?;
        Self::from_pem_bytes(bytes, TrustSource::Base64Env)
    }

    /// 读取 CA 证书文件
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OmniservesError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            OmniservesError::tls_material(format!("无法读取 CA 证书文件 {}: {}", path.display(), e))
        })?;

        Self::from_pem_bytes(bytes, TrustSource::File(path.to_path_buf()))
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates
    }

    pub fn source(&self) -> &TrustSource {
        &self.source
    }

    /// 交给驱动的 PEM 字节
    pub fn to_pem_bytes(&self) -> Vec<u8> {
        self.pem.as_bytes().to_vec()
    }
}

impl fmt::Debug for TrustBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustBundle")
            .field("source", &self.source)
            .field("certificates", &self.certificates)
            .finish()
    }
}

/// 已解析的 TLS 设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub mode: TlsMode,
    pub trust_bundle: Option<TrustBundle>,
}

impl TlsSettings {
    pub fn has_trust_bundle(&self) -> bool {
        self.trust_bundle.is_some()
    }
}

/// 统计证书块数量，并校验每个块的主体是合法的 base64
fn count_certificates(pem: &str) -> Result<usize, String> {
    let mut count = 0;
    let mut rest = pem;

    while let Some(begin) = rest.find(PEM_BEGIN_CERTIFICATE) {
        let after_begin = &rest[begin + PEM_BEGIN_CERTIFICATE.len()..];
        let end = after_begin
            .find(PEM_END_CERTIFICATE)
            .ok_or_else(|| format!("第 {} 个证书缺少结束标记", count + 1))?;

        let body: String = after_begin[..end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if body.is_empty() || CA_BASE64.decode(body.as_bytes()).is_err() {
            return Err(format!("第 {} 个证书内容不是有效的 base64", count + 1));
        }

        count += 1;
        rest = &after_begin[end + PEM_END_CERTIFICATE.len()..];
    }

    if count == 0 {
        return Err("未找到 PEM 格式的证书".to_string());
    }

    Ok(count)
}
