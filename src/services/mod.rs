pub mod question_generator;
pub mod question_structurer;
pub mod record_decoder;
pub mod secret_service;

pub use question_generator::{build_batch_prompt, split_batch, QuestionSetGenerator, BATCH_DELIMITER};
pub use question_structurer::{build_structure_prompt, QuestionStructurer};
pub use record_decoder::decode_record;
pub use secret_service::{get_secret_value_map, resolve_api_key};
