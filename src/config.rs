use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 出题范围 ---
    pub course: String,
    pub chapter: String,
    pub topic: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: Option<f32>,
    pub llm_max_tokens: u32,
    /// 同时结构化的题目数量（1 表示顺序处理）
    pub max_concurrent_fragments: usize,
    // --- 密钥服务配置 ---
    pub secret_project_id: Option<String>,
    pub secret_id: Option<String>,
    pub secret_version: String,
    /// 密钥 JSON 中存放 API key 的字段
    pub secret_api_key_field: String,
    pub secret_access_token: Option<String>,
    pub secret_api_base_url: String,
    /// TOML 输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            course: "Computer Science".to_string(),
            chapter: "Algorithms".to_string(),
            topic: "Merge Sort".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            llm_temperature: None,
            llm_max_tokens: 2048,
            max_concurrent_fragments: 1,
            secret_project_id: None,
            secret_id: None,
            secret_version: "latest".to_string(),
            secret_api_key_field: "OPENAI_API_KEY".to_string(),
            secret_access_token: None,
            secret_api_base_url: "https://secretmanager.googleapis.com/v1".to_string(),
            output_dir: "output_toml".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            course: std::env::var("COURSE").unwrap_or(default.course),
            chapter: std::env::var("CHAPTER").unwrap_or(default.chapter),
            topic: std::env::var("TOPIC").unwrap_or(default.topic),
            llm_api_key: std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("LLM_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).or(default.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            max_concurrent_fragments: std::env::var("MAX_CONCURRENT_FRAGMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_fragments),
            secret_project_id: non_empty_env("SECRET_PROJECT_ID"),
            secret_id: non_empty_env("SECRET_ID"),
            secret_version: std::env::var("SECRET_VERSION").unwrap_or(default.secret_version),
            secret_api_key_field: std::env::var("SECRET_API_KEY_FIELD").unwrap_or(default.secret_api_key_field),
            secret_access_token: non_empty_env("SECRET_ACCESS_TOKEN"),
            secret_api_base_url: std::env::var("SECRET_API_BASE_URL").unwrap_or(default.secret_api_base_url),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 是否配置了密钥服务来获取 API key
    pub fn uses_secret_store(&self) -> bool {
        self.secret_project_id.is_some() && self.secret_id.is_some()
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_fragments == 0 {
            return Err(ConfigError::EnvVarParseFailed {
                var_name: "MAX_CONCURRENT_FRAGMENTS".to_string(),
                value: "0".to_string(),
                expected_type: "正整数".to_string(),
            }
            .into());
        }
        if self.llm_api_key.is_empty() && !self.uses_secret_store() {
            return Err(AppError::env_var_not_found("OPENAI_API_KEY"));
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_merge_sort() {
        let config = Config::default();
        assert_eq!(config.course, "Computer Science");
        assert_eq!(config.chapter, "Algorithms");
        assert_eq!(config.topic, "Merge Sort");
        assert_eq!(config.llm_model_name, "gpt-3.5-turbo");
        assert_eq!(config.secret_version, "latest");
        assert_eq!(config.max_concurrent_fragments, 1);
    }

    #[test]
    fn test_validate_requires_some_credential() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::EnvVarNotFound { .. }))
        ));

        let with_key = Config {
            llm_api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(with_key.validate().is_ok());

        let with_secret = Config {
            secret_project_id: Some("my-project".to_string()),
            secret_id: Some("openai".to_string()),
            ..Config::default()
        };
        assert!(with_secret.uses_secret_store());
        assert!(with_secret.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_fan_out() {
        let config = Config {
            llm_api_key: "sk-test".to_string(),
            max_concurrent_fragments: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Config(ConfigError::EnvVarParseFailed { .. }))
        ));
    }
}
