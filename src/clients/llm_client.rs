/// LLM API 客户端
///
/// 封装所有与 LLM API 相关的调用逻辑，以及唯一一处网络故障处理策略
use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{AppResult, LlmError};

/// 文本补全能力：给定提示词返回文本，或者失败
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn chat(&self, prompt: &str, model: &str) -> Result<String, LlmError>;
}

/// 基于 `async-openai` 的补全后端（兼容 OpenAI API 的服务）
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    temperature: Option<f32>,
    max_tokens: u32,
}

impl OpenAiBackend {
    pub fn new(config: &Config, api_key: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        // 关闭 SDK 默认对 5xx/429 的指数退避重试
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(openai_config).with_backoff(no_retry),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn chat(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args
            .build()
            .map_err(|e| LlmError::RequestBuildFailed(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| classify_openai_error(model, e))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::EmptyResponse {
                model: model.to_string(),
            })?;

        let content = choice
            .message
            .content
            .clone()
            .ok_or_else(|| LlmError::EmptyContent {
                model: model.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

/// 将 SDK 错误划分为暂时不可用（软失败）和其他（硬失败）
///
/// SDK 把 5xx 响应体原样放进 `ApiError.message`，`type`/`code`/`param` 均为空；
/// 结构化的错误体只有明确表示不可用时才算暂时失败
fn classify_openai_error(model: &str, err: OpenAIError) -> LlmError {
    let unavailable = match &err {
        OpenAIError::ApiError(api) => {
            let unstructured = api.r#type.is_none() && api.code.is_none() && api.param.is_none();
            unstructured
                || mentions_unavailable(api.r#type.as_deref().unwrap_or_default())
                || mentions_unavailable(api.code.as_deref().unwrap_or_default())
                || mentions_unavailable(&api.message)
        }
        _ => false,
    };

    if unavailable {
        LlmError::ServiceUnavailable {
            model: model.to_string(),
            message: err.to_string(),
        }
    } else {
        LlmError::ApiCallFailed {
            model: model.to_string(),
            source: Box::new(err),
        }
    }
}

fn mentions_unavailable(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    text.contains("service_unavailable")
        || text.contains("service unavailable")
        || text.contains("temporarily unavailable")
        || text.contains("overloaded")
}

/// LLM 客户端
///
/// 职责：
/// - 校验提示词并调用补全后端
/// - 暂时不可用 → 记录后返回 `None`，调用方跳过当前单元
/// - 其他错误 → 记录后原样向上传播
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn CompletionBackend>,
    model_name: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端（使用 OpenAI 兼容后端）
    pub fn new(config: &Config, api_key: &str) -> Self {
        Self::with_backend(
            Arc::new(OpenAiBackend::new(config, api_key)),
            config.llm_model_name.clone(),
        )
    }

    /// 使用自定义后端创建
    pub fn with_backend(backend: Arc<dyn CompletionBackend>, model_name: impl Into<String>) -> Self {
        Self {
            backend,
            model_name: model_name.into(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送提示词并返回第一条补全结果
    ///
    /// # 参数
    /// - `prompt`: 提示词，不能为空
    /// - `model`: 模型名称，`None` 时使用默认模型
    ///
    /// # 返回
    /// - `Ok(Some(text))`: 成功
    /// - `Ok(None)`: 服务暂时不可用，已跳过
    /// - `Err(_)`: 硬失败
    pub async fn complete(&self, prompt: &str, model: Option<&str>) -> AppResult<Option<String>> {
        if prompt.trim().is_empty() {
            error!("❌ 提示词为空，拒绝调用 LLM");
            return Err(LlmError::EmptyPrompt.into());
        }

        let model = model.unwrap_or(self.model_name.as_str());
        debug!("调用 LLM API，模型: {}", model);
        debug!("提示词:\n{}", prompt);

        match self.backend.chat(prompt, model).await {
            Ok(text) => {
                debug!("LLM 响应:\n{}", text);
                Ok(Some(text))
            }
            Err(e) if e.is_transient() => {
                warn!("⚠️ LLM 服务暂时不可用，跳过本次请求: {}", e);
                Ok(None)
            }
            Err(e) => {
                error!("❌ LLM 调用出错: {}", e);
                Err(e.into())
            }
        }
    }
}
