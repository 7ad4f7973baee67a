//! # Exam Question Gen
//!
//! 借助 LLM 为指定的课程 / 章节 / 知识点生成模拟考试选择题，并整理为结构化记录
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与外部服务交互，只暴露能力
//! - `LlmClient` - 文本补全，集中处理"暂时不可用 / 硬失败"策略
//! - `GcpSecretManager` - 读取密钥版本
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionSetGenerator` - 一次生成一批题目，按 `---` 切分
//! - `QuestionStructurer` - 把单个题目整理成键值对
//! - `record_decoder` - 严格解析整理结果，不做求值
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionPipeline` - 生成 → 切分 → 逐个整理 → 按序返回
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 配置、凭证、运行、保存题目单
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CompletionBackend, LlmClient, SecretStore};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{GenerationRequest, QuestionRecord, QuestionSheet};
pub use orchestrator::App;
pub use workflow::{PipelineOutcome, QuestionPipeline};
