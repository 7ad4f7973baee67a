//! 密钥服务客户端
//!
//! 按 project / secret / version 读取一个密钥版本，返回解码后的文本

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::SecretError;

/// 密钥读取能力
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn access_secret_version(
        &self,
        project_id: &str,
        secret_id: &str,
        version_id: &str,
    ) -> Result<String, SecretError>;
}

/// Google Cloud Secret Manager（REST `:access` 接口）
pub struct GcpSecretManager {
    client: reqwest::Client,
    api_base_url: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: Option<String>,
}

impl GcpSecretManager {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: config.secret_api_base_url.trim_end_matches('/').to_string(),
            access_token: config.secret_access_token.clone(),
        }
    }
}

/// 密钥版本的资源名
pub fn secret_version_name(project_id: &str, secret_id: &str, version_id: &str) -> String {
    format!(
        "projects/{}/secrets/{}/versions/{}",
        project_id, secret_id, version_id
    )
}

#[async_trait]
impl SecretStore for GcpSecretManager {
    async fn access_secret_version(
        &self,
        project_id: &str,
        secret_id: &str,
        version_id: &str,
    ) -> Result<String, SecretError> {
        let name = secret_version_name(project_id, secret_id, version_id);
        let url = format!("{}/{}:access", self.api_base_url, name);
        debug!("读取密钥: {}", name);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| SecretError::RequestFailed {
                name: name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SecretError::BadStatus {
                name,
                status: status.as_u16(),
                body,
            });
        }

        let body: AccessSecretVersionResponse =
            response
                .json()
                .await
                .map_err(|source| SecretError::RequestFailed {
                    name: name.clone(),
                    source,
                })?;

        let data = body
            .payload
            .and_then(|p| p.data)
            .ok_or(SecretError::MissingPayload { name })?;

        decode_payload(&data)
    }
}

/// 解码 base64 编码的 payload
pub fn decode_payload(data: &str) -> Result<String, SecretError> {
    let bytes = BASE64.decode(data.trim())?;
    Ok(String::from_utf8(bytes)?)
}
