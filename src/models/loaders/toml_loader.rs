use crate::error::{PicclError, Result};
use crate::models::settings::RunSettings;
use std::path::Path;
use tokio::fs;

/// Load the job settings file written by the hosting framework
pub async fn load_run_settings(settings_path: &Path) -> Result<RunSettings> {
    let content = fs::read_to_string(settings_path)
        .await
        .map_err(|e| PicclError::Settings {
            path: settings_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let settings: RunSettings = toml::from_str(&content).map_err(|e| PicclError::Settings {
        path: settings_path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(
        "Loaded settings from {}: {} input file(s)",
        settings_path.display(),
        settings.inputs.len()
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[parameters]\nlang = \"eng\"\ntok = true\n\n[[input]]\nfilename = \"a.txt\"\ninputtemplate = \"textocr\"\n",
        )
        .unwrap();

        let settings = load_run_settings(&path).await.unwrap();
        assert_eq!(settings.parameters.lang, "eng");
        assert!(settings.parameters.tok);
        assert_eq!(settings.inputs[0].filename, "a.txt");
    }

    #[tokio::test]
    async fn test_missing_or_broken_settings() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_run_settings(&dir.path().join("nope.toml")).await;
        assert!(matches!(missing, Err(PicclError::Settings { .. })));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[parameters]\nrank = 3\n").unwrap();
        let broken = load_run_settings(&path).await.unwrap_err();
        assert_eq!(broken.exit_code(), 2);
    }
}
