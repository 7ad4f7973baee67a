use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 结构化解析错误
    #[error("解析错误: {0}")]
    Decode(#[from] DecodeError),
    /// 密钥获取错误
    #[error("密钥错误: {0}")]
    Secret(#[from] SecretError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 服务暂时不可用（软失败，跳过当前单元）
    #[error("LLM 服务暂时不可用 (模型: {model}): {message}")]
    ServiceUnavailable { model: String, message: String },
    /// API 调用失败（硬失败）
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 提示词为空
    #[error("提示词不能为空")]
    EmptyPrompt,
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {0}")]
    RequestBuildFailed(String),
}

impl LlmError {
    /// 是否为可跳过的暂时性故障
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::ServiceUnavailable { .. })
    }
}

/// 结构化记录解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// LLM 没有给出响应
    #[error("没有可解析的响应")]
    MissingResponse,
    /// 字面量格式错误
    #[error("字面量格式错误 (位置 {position}): {reason}")]
    Malformed { position: usize, reason: String },
    /// 对象为空
    #[error("解析结果为空对象")]
    EmptyRecord,
    /// 重复的键
    #[error("重复的键: {0}")]
    DuplicateKey(String),
}

/// 密钥获取错误
#[derive(Debug, Error)]
pub enum SecretError {
    /// 网络请求失败
    #[error("密钥请求失败 ({name}): {source}")]
    RequestFailed {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务返回错误状态
    #[error("密钥服务返回错误 ({name}): status={status}, body={body}")]
    BadStatus {
        name: String,
        status: u16,
        body: String,
    },
    /// 响应缺少 payload
    #[error("密钥响应缺少 payload ({name})")]
    MissingPayload { name: String },
    /// base64 解码失败
    #[error("密钥 base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
    /// UTF-8 解码失败
    #[error("密钥不是合法的 UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// JSON 解析失败
    #[error("密钥 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
    /// 字段不存在
    #[error("密钥中不存在字段: {0}")]
    MissingField(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建环境变量缺失错误
    pub fn env_var_not_found(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::EnvVarNotFound {
            var_name: var_name.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
