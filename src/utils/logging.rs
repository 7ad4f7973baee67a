/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 `verbose` 为 true 时使用 debug 级别，默认 info。
/// 重复初始化会被忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(course: &str, chapter: &str, topic: &str, model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 模拟考试出题");
    info!("📚 课程: {} | 章节: {} | 知识点: {}", course, chapter, topic);
    info!("🤖 模型: {}", model);
    info!("{}", "=".repeat(60));
}

/// 记录 LLM 返回的原始批量文本
pub fn log_batch_received(raw: &str) {
    info!("{}", "#".repeat(100));
    info!("{}", raw);
    info!("{}", "#".repeat(100));
}

/// 打印最终统计信息
///
/// # 参数
/// - `structured`: 成功整理的题目数量
/// - `fragments`: 片段总数
/// - `output_path`: 题目单保存路径
pub fn log_run_summary(structured: usize, fragments: usize, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出题完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", structured, fragments);
    info!("⏭️ 跳过: {}", fragments.saturating_sub(structured));
    info!("{}", "=".repeat(60));
    info!("\n题目单已保存至: {}", output_path);
}

/// 会话 ID：当前本地时间，格式 `YYYY-MM-DD_HHMMSS`
pub fn session_id() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H%M%S").to_string()
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
