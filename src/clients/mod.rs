pub mod llm_client;
pub mod secret_client;

pub use llm_client::{CompletionBackend, LlmClient, OpenAiBackend};
pub use secret_client::{GcpSecretManager, SecretStore};
