use crate::domain::manager::GradeManager;
use crate::domain::ports::GradeRepository;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "grade_data.json";

/// Stores the whole gradebook as one JSON document on the local file system.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    file_path: PathBuf,
    pretty: bool,
}

impl JsonFileRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn encode(&self, manager: &GradeManager) -> Result<Vec<u8>> {
        let data = if self.pretty {
            serde_json::to_vec_pretty(manager)?
        } else {
            serde_json::to_vec(manager)?
        };
        Ok(data)
    }

    // 先寫入暫存檔再改名，避免寫到一半的文件覆蓋舊資料
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

#[async_trait]
impl GradeRepository for JsonFileRepository {
    async fn save(&self, manager: &GradeManager) -> Result<()> {
        let data = self.encode(manager)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &data).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.file_path).await {
            tracing::warn!("Could not replace {}: {}", self.file_path.display(), e);
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(
            "Saved {} bytes to {}",
            data.len(),
            self.file_path.display()
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<GradeManager>> {
        let data = match tokio::fs::read(&self.file_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No data file at {}", self.file_path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let manager: GradeManager = serde_json::from_slice(&data)?;
        Ok(Some(manager))
    }

    fn location(&self) -> String {
        self.file_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Course, Student};
    use tempfile::TempDir;

    fn sample_manager() -> GradeManager {
        let mut manager = GradeManager::new();
        manager.add_student(Student::new("S2", "Bob"));
        manager.add_student(Student::new("S1", "Ada"));
        manager.add_course(Course::new("MA201", "Calculus"));
        manager.add_course(Course::new("CS101", "Programming"));
        manager.register_student_for_course("S2", "CS101");
        manager.register_student_for_course("S1", "CS101");
        manager.register_student_for_course("S1", "MA201");
        manager.assign_grade("S1", "MA201", 38.5);
        manager.assign_grade("S1", "CS101", 91.0);
        manager
    }

    #[tokio::test]
    async fn test_round_trip_preserves_everything() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(temp_dir.path().join("grades.json"));
        let manager = sample_manager();

        repository.save(&manager).await.unwrap();
        let loaded = repository.load().await.unwrap().unwrap();

        assert_eq!(loaded, manager);
        assert_eq!(loaded.enrollment_ids("CS101"), ["S2", "S1"]);
        let grade_order: Vec<String> = loaded
            .student("S1")
            .unwrap()
            .all_grades()
            .keys()
            .cloned()
            .collect();
        assert_eq!(grade_order, vec!["MA201", "CS101"]);
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonFileRepository::new(temp_dir.path().join("absent.json"));
        assert!(repository.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_document_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let repository = JsonFileRepository::new(&path);
        assert!(repository.load().await.is_err());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("grades.json");
        let repository = JsonFileRepository::new(&path).with_pretty(false);

        repository.save(&sample_manager()).await.unwrap();

        assert!(path.exists());
        assert!(!repository.temp_path().exists());
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(!raw.contains('\n'));
    }
}
