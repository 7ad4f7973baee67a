use anyhow::Result;
use exam_question_gen::utils::logging;
use exam_question_gen::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let sheet = App::initialize(config).await?.run().await?;
    tracing::info!("🎉 共生成 {} 道题目", sheet.questions.len());

    Ok(())
}
