use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DIST_DIR: &str = "client/dist";
pub const DEFAULT_DATA_DIR: &str = "data";

pub fn server_port() -> u16 {
    std::env::var("MIGRATION_MAP_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn dist_dir() -> PathBuf {
    dir_from_env("MIGRATION_MAP_DIST_DIR", DEFAULT_DIST_DIR)
}

pub fn data_dir() -> PathBuf {
    dir_from_env("MIGRATION_MAP_DATA_DIR", DEFAULT_DATA_DIR)
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        temp_env::with_vars_unset(
            [
                "MIGRATION_MAP_PORT",
                "MIGRATION_MAP_DIST_DIR",
                "MIGRATION_MAP_DATA_DIR",
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(dist_dir(), PathBuf::from("client/dist"));
                assert_eq!(data_dir(), PathBuf::from("data"));
            },
        );
    }

    #[test]
    fn reads_overrides() {
        temp_env::with_vars(
            [
                ("MIGRATION_MAP_PORT", Some(" 8080 ")),
                ("MIGRATION_MAP_DIST_DIR", Some("/srv/map")),
                ("MIGRATION_MAP_DATA_DIR", Some("/srv/data")),
            ],
            || {
                assert_eq!(server_port(), 8080);
                assert_eq!(dist_dir(), PathBuf::from("/srv/map"));
                assert_eq!(data_dir(), PathBuf::from("/srv/data"));
            },
        );
    }

    #[test]
    fn invalid_values_fall_back() {
        temp_env::with_vars(
            [
                ("MIGRATION_MAP_PORT", Some("0")),
                ("MIGRATION_MAP_DATA_DIR", Some("   ")),
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(data_dir(), PathBuf::from(DEFAULT_DATA_DIR));
            },
        );
        temp_env::with_var("MIGRATION_MAP_PORT", Some("not-a-port"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
    }
}
