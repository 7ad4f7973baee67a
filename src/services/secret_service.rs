//! 密钥服务 - 业务能力层
//!
//! 读取密钥并解析为键值对，只在启动时用于获取 LLM 凭证

use std::collections::HashMap;

use tracing::info;

use crate::clients::SecretStore;
use crate::config::Config;
use crate::error::{AppResult, SecretError};

/// 默认读取最新版本
pub const LATEST_VERSION: &str = "latest";

/// 读取密钥并解析为 `HashMap<String, String>`
///
/// 密钥内容必须是一个值全为字符串的 JSON 对象
pub async fn get_secret_value_map(
    store: &dyn SecretStore,
    project_id: &str,
    secret_id: &str,
    version_id: Option<&str>,
) -> Result<HashMap<String, String>, SecretError> {
    let version_id = version_id.unwrap_or(LATEST_VERSION);
    let raw = store
        .access_secret_version(project_id, secret_id, version_id)
        .await?;
    Ok(serde_json::from_str(&raw)?)
}

/// 确定 LLM API key
///
/// 配置了密钥服务时从密钥中读取，否则使用环境变量中的 key
pub async fn resolve_api_key(config: &Config, store: &dyn SecretStore) -> AppResult<String> {
    let (project_id, secret_id) = match (&config.secret_project_id, &config.secret_id) {
        (Some(project_id), Some(secret_id)) => (project_id, secret_id),
        _ => return Ok(config.llm_api_key.clone()),
    };

    info!(
        "🔑 从密钥服务读取凭证: project={}, secret={}, version={}",
        project_id, secret_id, config.secret_version
    );

    let version_id = config.secret_version.as_str();
    let secrets = get_secret_value_map(store, project_id, secret_id, Some(version_id)).await?;

    let api_key = secrets
        .get(&config.secret_api_key_field)
        .cloned()
        .ok_or_else(|| SecretError::MissingField(config.secret_api_key_field.clone()))?;

    Ok(api_key)
}
