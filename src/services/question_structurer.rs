//! 题目整理服务 - 业务能力层
//!
//! 只负责把"一道"自由文本题目交给 LLM 整理成键值对，再严格解析

use tracing::{debug, warn};

use crate::clients::LlmClient;
use crate::error::{AppError, DecodeError};
use crate::models::QuestionRecord;
use crate::services::record_decoder::decode_record;
use crate::utils::logging::truncate_text;

/// 构建整理提示词，片段原样嵌入
pub fn build_structure_prompt(fragment: &str) -> String {
    format!(
        "Can you split following multi-choice questions into question and options. \
{fragment}\
Create a dict as follows: {{'question': ..., 'a': ..., 'b': ... etc}}"
    )
}

/// 题目整理服务
///
/// 职责：
/// - 只处理单个片段
/// - 永远不向调用方返回错误：要么得到记录，要么得到 `None`
pub struct QuestionStructurer {
    llm_client: LlmClient,
}

impl QuestionStructurer {
    pub fn new(llm_client: LlmClient) -> Self {
        Self { llm_client }
    }

    /// 将一个片段整理为题目记录，失败时返回 `None`
    pub async fn structure(&self, fragment: &str) -> Option<QuestionRecord> {
        match self.try_structure(fragment).await {
            Ok(record) => {
                debug!("✓ 题目解析成功: {:?}", record);
                Some(record)
            }
            Err(e) => {
                warn!(
                    "⚠️ 跳过题目 [{}]: {}",
                    truncate_text(fragment.trim(), 60),
                    e
                );
                None
            }
        }
    }

    async fn try_structure(&self, fragment: &str) -> Result<QuestionRecord, AppError> {
        let prompt = build_structure_prompt(fragment);
        let response = self
            .llm_client
            .complete(&prompt, None)
            .await?
            .ok_or(DecodeError::MissingResponse)?;

        Ok(decode_record(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CompletionBackend;
    use crate::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedBackend(fn() -> Result<String, LlmError>);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn chat(&self, _prompt: &str, _model: &str) -> Result<String, LlmError> {
            (self.0)()
        }
    }

    fn structurer(reply: fn() -> Result<String, LlmError>) -> QuestionStructurer {
        QuestionStructurer::new(LlmClient::with_backend(
            Arc::new(FixedBackend(reply)),
            "gpt-3.5-turbo",
        ))
    }

    #[test]
    fn test_prompt_embeds_fragment_verbatim() {
        let fragment = "\nWhat is merge sort?\na) x\nb) y\n";
        let prompt = build_structure_prompt(fragment);
        assert!(prompt.contains(fragment));
        assert!(prompt.contains("{'question': ..., 'a': ..., 'b': ... etc}"));
    }

    #[tokio::test]
    async fn test_structure_decodes_response() {
        let s = structurer(|| Ok("{'question': 'Q1 text', 'a': 'yes'}".to_string()));
        let record = s.structure("Q1 text").await.unwrap();
        assert_eq!(record.question(), Some("Q1 text"));
        assert_eq!(record.get("a"), Some("yes"));
    }

    #[tokio::test]
    async fn test_structure_skips_undecodable() {
        let s = structurer(|| Ok("oops".to_string()));
        assert!(s.structure("Q2 text").await.is_none());
    }

    #[tokio::test]
    async fn test_structure_skips_transient_and_hard_failures() {
        let transient = structurer(|| {
            Err(LlmError::ServiceUnavailable {
                model: "gpt-3.5-turbo".to_string(),
                message: "overloaded".to_string(),
            })
        });
        assert!(transient.structure("Q").await.is_none());

        let hard = structurer(|| {
            Err(LlmError::ApiCallFailed {
                model: "gpt-3.5-turbo".to_string(),
                source: "quota exceeded".into(),
            })
        });
        assert!(hard.structure("Q").await.is_none());
    }

    #[test]
    fn test_structure_never_fails_for_odd_fragments() {
        let s = structurer(|| Ok("{'question': 'ok'}".to_string()));
        // 空白片段会让提示词仍然非空，照常整理
        for fragment in ["", "   ", "---", "\u{0}"] {
            let result = tokio_test::block_on(s.structure(fragment));
            assert!(result.is_some());
        }
    }
}
