//! 应用 - 编排层
//!
//! 本模块是整个应用的入口，持有配置和出题流程。

use tracing::info;

use crate::clients::{GcpSecretManager, LlmClient, SecretStore};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{write_question_sheet, GenerationRequest, QuestionSheet};
use crate::services::resolve_api_key;
use crate::utils::logging;
use crate::workflow::QuestionPipeline;

/// 应用主结构
pub struct App {
    config: Config,
    pipeline: QuestionPipeline,
}

impl App {
    /// 初始化应用
    ///
    /// 配置了密钥服务时从 Secret Manager 读取 API key，读取失败直接中止
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let store = GcpSecretManager::new(&config);
        Self::initialize_with_store(config, &store).await
    }

    /// 使用指定的密钥服务初始化
    pub async fn initialize_with_store(config: Config, store: &dyn SecretStore) -> AppResult<Self> {
        config.validate()?;

        logging::log_startup(
            &config.course,
            &config.chapter,
            &config.topic,
            &config.llm_model_name,
        );

        let api_key = resolve_api_key(&config, store).await?;
        let llm_client = LlmClient::new(&config, &api_key);

        Ok(Self::with_client(config, llm_client))
    }

    /// 使用已经构建好的 LLM 客户端
    pub fn with_client(config: Config, llm_client: LlmClient) -> Self {
        let pipeline =
            QuestionPipeline::with_concurrency(llm_client, config.max_concurrent_fragments);
        Self { config, pipeline }
    }

    /// 本次运行的出题请求
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(
            self.config.course.as_str(),
            self.config.chapter.as_str(),
            self.config.topic.as_str(),
        )
    }

    /// 运行应用主逻辑
    ///
    /// 返回本次生成并已保存的题目单
    pub async fn run(&self) -> AppResult<QuestionSheet> {
        let request = self.request();
        info!("\n{} 📝 开始生成题目...", request);

        let outcome = self.pipeline.run(&request).await?;
        let fragments = outcome.fragments;

        let sheet = QuestionSheet::new(logging::session_id(), &request, outcome.records);
        let output_path = write_question_sheet(&self.config.output_dir, &sheet).await?;

        logging::log_run_summary(
            sheet.questions.len(),
            fragments,
            &output_path.display().to_string(),
        );

        Ok(sheet)
    }
}
