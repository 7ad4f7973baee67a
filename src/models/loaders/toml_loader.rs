use crate::error::{AppResult, FileError};
use crate::models::question::QuestionSheet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// 从 TOML 文件加载题目单
pub async fn load_question_sheet(toml_file_path: &Path) -> AppResult<QuestionSheet> {
    let path = toml_file_path.display().to_string();

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.clone(),
            source,
        })?;

    let sheet: QuestionSheet = toml::from_str(&content)
        .map_err(|source| FileError::TomlParseFailed { path, source })?;

    Ok(sheet)
}

/// 将题目单写入 `<folder>/<session_id>.toml`
///
/// 目录不存在时自动创建；同名文件已存在时改用 `<session_id>_<n>.toml`，不覆盖已有结果。
/// 返回写入的文件路径
pub async fn write_question_sheet(folder_path: &str, sheet: &QuestionSheet) -> AppResult<PathBuf> {
    let folder = PathBuf::from(folder_path);

    fs::create_dir_all(&folder)
        .await
        .map_err(|source| FileError::WriteFailed {
            path: folder_path.to_string(),
            source,
        })?;

    let content = toml::to_string(sheet).map_err(FileError::from)?;

    let mut suffix = 1;
    let (mut file, file_path) = loop {
        let file_name = if suffix == 1 {
            format!("{}.toml", sheet.session_id)
        } else {
            format!("{}_{}.toml", sheet.session_id, suffix)
        };
        let file_path = folder.join(file_name);

        match OpenOptions::new().write(true).create_new(true).open(&file_path).await {
            Ok(file) => break (file, file_path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("文件已存在，换一个文件名: {}", file_path.display());
                suffix += 1;
            }
            Err(source) => {
                return Err(FileError::WriteFailed {
                    path: file_path.display().to_string(),
                    source,
                }
                .into())
            }
        }
    };

    let written = match file.write_all(content.as_bytes()).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    written.map_err(|source| FileError::WriteFailed {
        path: file_path.display().to_string(),
        source,
    })?;

    tracing::info!("题目单已保存至: {}", file_path.display());

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::question::{GenerationRequest, QuestionRecord};

    fn temp_folder(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("exam_question_gen_{}_{}", name, std::process::id()))
            .display()
            .to_string()
    }

    #[tokio::test]
    async fn test_write_then_load_sheet() {
        let folder = temp_folder("sheet");
        let request = GenerationRequest::new("Computer Science", "Algorithms", "Merge Sort");
        let record: QuestionRecord = [
            ("question", "What is the worst-case complexity of merge sort?"),
            ("a", "O(n)"),
            ("b", "O(n log n)"),
        ]
        .into_iter()
        .collect();
        let sheet = QuestionSheet::new("2026-10-19_093000", &request, vec![record.clone()]);

        let path = write_question_sheet(&folder, &sheet).await.unwrap();
        assert!(path.ends_with("2026-10-19_093000.toml"));

        let loaded = load_question_sheet(&path).await.unwrap();
        assert_eq!(loaded.topic, "Merge Sort");
        assert_eq!(loaded.questions, vec![record]);

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[tokio::test]
    async fn test_empty_sheet_is_still_written() {
        let folder = temp_folder("empty");
        let request = GenerationRequest::new("Computer Science", "Algorithms", "Merge Sort");
        let sheet = QuestionSheet::new("empty-run", &request, Vec::new());

        let path = write_question_sheet(&folder, &sheet).await.unwrap();
        let loaded = load_question_sheet(&path).await.unwrap();
        assert!(loaded.questions.is_empty());

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[tokio::test]
    async fn test_same_session_never_overwrites() {
        let folder = temp_folder("same_session");
        let request = GenerationRequest::new("Computer Science", "Algorithms", "Merge Sort");
        let first: QuestionRecord = [("question", "first run")].into_iter().collect();
        let second: QuestionRecord = [("question", "second run")].into_iter().collect();

        let first_path = write_question_sheet(
            &folder,
            &QuestionSheet::new("2026-10-19_093000", &request, vec![first.clone()]),
        )
        .await
        .unwrap();
        let second_path = write_question_sheet(
            &folder,
            &QuestionSheet::new("2026-10-19_093000", &request, vec![second.clone()]),
        )
        .await
        .unwrap();

        assert_ne!(first_path, second_path);
        assert!(first_path.ends_with("2026-10-19_093000.toml"));
        assert!(second_path.ends_with("2026-10-19_093000_2.toml"));
        assert_eq!(load_question_sheet(&first_path).await.unwrap().questions, vec![first]);
        assert_eq!(load_question_sheet(&second_path).await.unwrap().questions, vec![second]);

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let result = load_question_sheet(Path::new("/definitely/not/here.toml")).await;
        assert!(matches!(
            result,
            Err(AppError::File(FileError::ReadFailed { .. }))
        ));
    }
}
