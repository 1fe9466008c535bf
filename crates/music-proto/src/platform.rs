use std::path::PathBuf;

const APP_DIR: &str = "musicbox";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/musicbox/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .map(|home| home.join(".local").join("share").join(APP_DIR))
            .unwrap_or_else(|| temp_dir().join(APP_DIR))
    }
    #[cfg(windows)]
    {
        // Portable install: a data/ directory beside the executable wins
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_data = exe_dir.join("data");
                if portable_data.exists() {
                    return portable_data;
                }
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    // On macOS and Linux, always use ~/.config/musicbox/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

/// Default directory for persisted session records.
pub fn store_dir() -> PathBuf {
    data_dir().join("store")
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir()
}
