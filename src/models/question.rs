use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 出题请求：课程 / 章节 / 知识点
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub course: String,
    pub chapter: String,
    pub topic: String,
}

impl GenerationRequest {
    pub fn new(
        course: impl Into<String>,
        chapter: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            course: course.into(),
            chapter: chapter.into(),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[课程 {} | 章节 {} | 知识点 {}]",
            self.course, self.chapter, self.topic
        )
    }
}

/// 一道结构化的选择题
///
/// 字段集合不固定，由 LLM 的整理结果决定，常见的是 `question`、`a`、`b`、`c`、`d`。
/// 不包含答案。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionRecord {
    fields: BTreeMap<String, String>,
}

impl QuestionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// 题干（如果 LLM 给出了 `question` 字段）
    pub fn question(&self) -> Option<&str> {
        self.get("question")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.fields.insert(key, value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QuestionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 一次运行产出的题目单，写入 TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSheet {
    pub session_id: String,
    pub course: String,
    pub chapter: String,
    pub topic: String,
    pub generated_at: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

impl QuestionSheet {
    pub fn new(
        session_id: impl Into<String>,
        request: &GenerationRequest,
        questions: Vec<QuestionRecord>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            course: request.course.clone(),
            chapter: request.chapter.clone(),
            topic: request.topic.clone(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            questions,
        }
    }
}
