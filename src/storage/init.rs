//! Storage initialization
//!
//! First-run setup: directories, a settings file and empty data files.

use crate::config::paths::SplitPaths;
use crate::config::settings::Settings;
use crate::error::SplitError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running this twice is harmless.
/// Returns true if anything was created.
pub fn initialize_storage(paths: &SplitPaths) -> Result<bool, SplitError> {
    paths.ensure_directories()?;
    let mut created = false;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created = true;
    }

    let empty_files = [
        (paths.groups_file(), "groups"),
        (paths.expenses_file(), "expenses"),
        (paths.settlements_file(), "settlements"),
    ];
    for (path, key) in empty_files {
        if !path.exists() {
            let mut root = serde_json::Map::new();
            root.insert(key.to_string(), serde_json::Value::Array(Vec::new()));
            write_json_atomic(&path, &root)?;
            created = true;
        }
    }

    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &SplitPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert!(initialize_storage(&paths).unwrap());

        assert!(!needs_initialization(&paths));
        assert!(paths.groups_file().exists());
        assert!(paths.expenses_file().exists());
        assert!(paths.settlements_file().exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        let settings = Settings {
            currency_symbol: "€".to_string(),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
    }
}
