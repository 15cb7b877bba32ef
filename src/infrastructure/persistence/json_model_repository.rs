use crate::domain::ml::StreakModel;
use crate::domain::repositories::ModelRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Stores the active model as a single JSON document.
///
/// Saving replaces the previous document; the file is validated against the
/// feature registry when it is read back.
pub struct JsonFileModelRepository {
    file_path: PathBuf,
}

impl JsonFileModelRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl ModelRepository for JsonFileModelRepository {
    async fn save(&self, model: &StreakModel) -> Result<()> {
        let content =
            serde_json::to_string_pretty(model).context("Failed to serialize streak model")?;

        if let Some(dir) = self.file_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create model directory {:?}", dir))?;
        }

        // Write to a temp file then rename so readers never see a partial model
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .context("Failed to write temp model file")?;
        fs::rename(&temp_path, &self.file_path)
            .await
            .context("Failed to rename model file")?;

        info!("Saved streak model to {:?}", self.file_path);
        Ok(())
    }

    async fn load_active(&self) -> Result<Option<StreakModel>> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read model file {:?}", self.file_path));
            }
        };

        let model: StreakModel = serde_json::from_str(&content)
            .with_context(|| format!("Invalid model file {:?}", self.file_path))?;

        info!("Loaded streak model from {:?}", self.file_path);
        Ok(Some(model))
    }
}
