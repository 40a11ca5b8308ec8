//! File saving functionality for screenshots.

use super::types::CaptureError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory of the storage root that receives screenshots.
pub const SCREENSHOT_DIR_NAME: &str = "Screenshots";

/// Local-time filename pattern, e.g. `2024-03-09 17-05-42`.
pub const FILENAME_TEMPLATE: &str = "%Y-%m-%d %H-%M-%S";

/// Configuration for file saving.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSaveConfig {
    /// Directory to save screenshots to.
    pub save_directory: PathBuf,
    /// Filename template (chrono format specifiers).
    pub filename_template: String,
    /// Image format extension.
    pub format: String,
}

impl FileSaveConfig {
    /// Screenshots go to `<root>/Screenshots/<timestamp>.png`.
    pub fn for_storage_root(root: &Path) -> Self {
        Self {
            save_directory: root.join(SCREENSHOT_DIR_NAME),
            filename_template: FILENAME_TEMPLATE.to_string(),
            format: "png".to_string(),
        }
    }
}

/// Generate a filename from the template and the current local time.
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    let filename = now.format(template).to_string();
    format!("{}.{}", filename, format)
}

/// Ensure the save directory exists, creating it if necessary.
///
/// Returns the canonicalized path to the directory.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, CaptureError> {
    if !directory.exists() {
        log::info!("Creating screenshot directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Save encoded image data to a timestamped file.
///
/// The timestamp is taken here, after encoding, so the name reflects when the
/// file was written. An existing file with the same name is overwritten.
pub fn save_screenshot(
    image_data: &[u8],
    config: &FileSaveConfig,
) -> Result<PathBuf, CaptureError> {
    let directory = ensure_directory_exists(&config.save_directory)?;

    let filename = generate_filename(&config.filename_template, &config.format);
    let file_path = directory.join(&filename);

    log::debug!(
        "Writing screenshot to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );

    fs::write(&file_path, image_data)?;

    let written_size = fs::metadata(&file_path)?.len();
    log::debug!("File written: {} bytes", written_size);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    #[test]
    fn generated_name_parses_back_as_timestamp() {
        let filename = generate_filename(FILENAME_TEMPLATE, "png");
        let stem = filename.strip_suffix(".png").expect("png extension");
        assert_eq!(stem.len(), "YYYY-MM-DD HH-MM-SS".len());
        NaiveDateTime::parse_from_str(stem, FILENAME_TEMPLATE).expect("timestamp stem");
    }

    #[test]
    fn storage_root_config_targets_screenshots_dir() {
        let config = FileSaveConfig::for_storage_root(Path::new("/games/mods/framesnap"));
        assert_eq!(
            config.save_directory,
            PathBuf::from("/games/mods/framesnap/Screenshots")
        );
        assert_eq!(config.format, "png");
    }

    #[test]
    fn save_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let config = FileSaveConfig::for_storage_root(&temp.path().join("deep").join("root"));

        let path = save_screenshot(b"png-bytes", &config).unwrap();

        assert!(path.starts_with(temp.path().canonicalize().unwrap()));
        assert_eq!(fs::read(&path).unwrap(), b"png-bytes");
        assert_eq!(
            path.parent().and_then(|p| p.file_name()).unwrap(),
            SCREENSHOT_DIR_NAME
        );
    }

    #[test]
    fn save_reports_io_errors() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("root");
        fs::write(&blocker, b"not a directory").unwrap();
        let config = FileSaveConfig::for_storage_root(&blocker);

        let err = save_screenshot(b"png-bytes", &config).unwrap_err();
        assert!(matches!(err, CaptureError::SaveError(_)));
    }
}
