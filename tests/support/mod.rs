#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_question_gen::clients::CompletionBackend;
use exam_question_gen::error::LlmError;
use exam_question_gen::LlmClient;

/// 按顺序返回预设结果的 LLM 后端，并记录收到的提示词
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedLlm {
    async fn chat(&self, prompt: &str, _model: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply left for prompt: {}", prompt))
    }
}

pub fn client(backend: Arc<ScriptedLlm>) -> LlmClient {
    LlmClient::with_backend(backend, "gpt-3.5-turbo")
}

pub fn ok(text: &str) -> Result<String, LlmError> {
    Ok(text.to_string())
}

pub fn unavailable() -> Result<String, LlmError> {
    Err(LlmError::ServiceUnavailable {
        model: "gpt-3.5-turbo".to_string(),
        message: "The server is overloaded or not ready yet.".to_string(),
    })
}

pub fn auth_failure() -> Result<String, LlmError> {
    Err(LlmError::ApiCallFailed {
        model: "gpt-3.5-turbo".to_string(),
        source: "Incorrect API key provided".into(),
    })
}

/// 收集日志输出的内存缓冲区
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 在当前线程安装日志订阅器，guard 存活期间的日志都写入缓冲区
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}
