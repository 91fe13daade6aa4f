use dirs::data_dir;
use std::path::PathBuf;

/// ~/.local/share/RwkvMobile   (or platform-equivalent)
pub fn rwkv_home() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("RwkvMobile")
}

/// ~/.local/share/RwkvMobile/config.json
pub fn config_path() -> PathBuf {
    rwkv_home().join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lives_under_home() {
        assert_eq!(config_path().parent(), Some(rwkv_home().as_path()));
        assert!(rwkv_home().ends_with("RwkvMobile"));
    }
}
