//! 出题服务 - 业务能力层
//!
//! 只负责"让 LLM 一次生成一批题目"能力，以及按分隔符切分返回文本

use tracing::info;

use crate::clients::LlmClient;
use crate::error::AppResult;
use crate::models::GenerationRequest;
use crate::utils::logging;

/// 题目之间的分隔符
pub const BATCH_DELIMITER: &str = "---";

/// 用于示范格式的样题
const EXAMPLE_QUESTION: &str = "Which of the following best describes the Binary Search algorithm?\n\
a) A linear search algorithm with a complexity of O(n).\n\
b) A divide-and-conquer algorithm that works on a sorted array with a complexity of O(log n).\n\
c) An algorithm that only works on doubly linked lists with a complexity of O(n^2).\n\
d) An iterative algorithm that performs a breadth-first search on a tree with a complexity of O(n).\n";

/// 构建批量出题提示词
///
/// 纯函数：相同输入总是得到相同的提示词
pub fn build_batch_prompt(course: &str, chapter: &str, topic: &str) -> String {
    format!(
        "I wanna generate mock exam question for course='{course}', chapter='{chapter}', topic='{topic}'. \
Come up with a multiple-choice questions for the subtopic.\n\
We are using these questions to test people's understanding of the subtopic,\n\
so focus more on testing peoples understanding. \n\
On a scale of 1 to 10 make all the questions difficulty between 5 and 10 with increasing difficulty.\n\
Make sure to make each question different from each other.\n\
an example question is as follows\n\
{EXAMPLE_QUESTION}\
make sure to put `{BATCH_DELIMITER}` between each question. Don't give the answer of the question"
    )
}

/// 按分隔符切分批量文本
///
/// 不裁剪、不校验、不合并；没有分隔符时整段文本就是唯一的片段
pub fn split_batch(text: &str) -> Vec<&str> {
    text.split(BATCH_DELIMITER).collect()
}

/// 出题服务
///
/// 职责：
/// - 为一个 (课程, 章节, 知识点) 构建提示词并调用 LLM
/// - 返回原始的、用分隔符连接的题目文本
/// - 不校验题目数量、难度递增或是否重复
pub struct QuestionSetGenerator {
    llm_client: LlmClient,
}

impl QuestionSetGenerator {
    pub fn new(llm_client: LlmClient) -> Self {
        Self { llm_client }
    }

    /// 生成一批题目
    ///
    /// # 返回
    /// - `Ok(Some(text))`: LLM 返回的原始批量文本
    /// - `Ok(None)`: LLM 暂时不可用，本批跳过
    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>> {
        let prompt = build_batch_prompt(&request.course, &request.chapter, &request.topic);
        info!("{} 📝 出题提示词:\n{}", request, prompt);

        let response = self.llm_client.complete(&prompt, None).await?;

        if let Some(text) = &response {
            logging::log_batch_received(text);
        }

        Ok(response)
    }
}
