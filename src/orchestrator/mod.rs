//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理一次运行的生命周期：校验配置 → 获取凭证 → 执行出题流程 → 保存题目单。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! workflow::QuestionPipeline (一批题目)
//!     ↓
//! services (能力层：出题 / 整理 / 解析 / 密钥)
//!     ↓
//! clients (LLM 与密钥服务的客户端)
//! ```

pub mod app;

pub use app::App;
