pub mod loaders;
pub mod question;

pub use loaders::{load_question_sheet, write_question_sheet};
pub use question::{GenerationRequest, QuestionRecord, QuestionSheet};
