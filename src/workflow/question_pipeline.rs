//! 出题流程 - 流程层
//!
//! 核心职责：定义"一批题"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建出题提示词 → LLM 生成批量文本
//! 2. 按 `---` 切分为片段
//! 3. 逐个片段：LLM 整理 → 严格解析，失败的片段跳过
//! 4. 按片段顺序返回结果

use futures::{future, stream, StreamExt};
use tracing::{info, warn};

use crate::clients::LlmClient;
use crate::error::AppResult;
use crate::models::{GenerationRequest, QuestionRecord};
use crate::services::{split_batch, QuestionSetGenerator, QuestionStructurer};
use crate::workflow::fragment_ctx::FragmentCtx;

/// 一次流程的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// 批量文本切分出的片段数量（LLM 暂时不可用时为 0）
    pub fragments: usize,
    /// 成功整理的题目，顺序与片段一致
    pub records: Vec<QuestionRecord>,
}

/// 出题流程
///
/// - 批量生成阶段的硬失败会中止整个流程
/// - 单个片段的任何失败只会让该片段被跳过
/// - 片段可以并发整理，但结果顺序始终与片段顺序一致
pub struct QuestionPipeline {
    generator: QuestionSetGenerator,
    structurer: QuestionStructurer,
    max_concurrent_fragments: usize,
}

impl QuestionPipeline {
    /// 创建顺序处理的流程
    pub fn new(llm_client: LlmClient) -> Self {
        Self::with_concurrency(llm_client, 1)
    }

    pub fn with_concurrency(llm_client: LlmClient, max_concurrent_fragments: usize) -> Self {
        Self {
            generator: QuestionSetGenerator::new(llm_client.clone()),
            structurer: QuestionStructurer::new(llm_client),
            max_concurrent_fragments: max_concurrent_fragments.max(1),
        }
    }

    /// 生成题目列表
    pub async fn generate_question_list(
        &self,
        request: &GenerationRequest,
    ) -> AppResult<Vec<QuestionRecord>> {
        Ok(self.run(request).await?.records)
    }

    /// 生成题目列表，同时返回片段数量用于统计
    pub async fn run(&self, request: &GenerationRequest) -> AppResult<PipelineOutcome> {
        let raw = match self.generator.generate(request).await? {
            Some(raw) => raw,
            None => {
                warn!("{} ⚠️ LLM 暂时不可用，本次没有生成任何题目", request);
                return Ok(PipelineOutcome::default());
            }
        };

        let fragments = split_batch(&raw);
        let total = fragments.len();
        info!("{} ✓ 切分得到 {} 个片段", request, total);

        let records: Vec<QuestionRecord> = stream::iter(
            fragments
                .iter()
                .enumerate()
                .map(|(i, fragment)| self.structure_fragment(FragmentCtx::new(i + 1, total), fragment)),
        )
        .buffered(self.max_concurrent_fragments)
        .filter_map(future::ready)
        .collect()
        .await;

        info!(
            "{} ✓ 整理完成: {}/{} 个题目可用",
            request,
            records.len(),
            total
        );

        Ok(PipelineOutcome {
            fragments: total,
            records,
        })
    }

    async fn structure_fragment(&self, ctx: FragmentCtx, fragment: &str) -> Option<QuestionRecord> {
        info!("{} 🧩 正在整理题目...", ctx);
        let record = self.structurer.structure(fragment).await;
        match &record {
            Some(r) => info!("{} ✓ 整理成功 ({} 个字段)", ctx, r.len()),
            None => info!("{} ⏭️ 已跳过", ctx),
        }
        record
    }
}
