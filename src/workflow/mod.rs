pub mod fragment_ctx;
pub mod question_pipeline;

pub use fragment_ctx::FragmentCtx;
pub use question_pipeline::{PipelineOutcome, QuestionPipeline};
