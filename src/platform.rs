use std::path::PathBuf;

const SYSTEM_DRIVE_ENV: &str = "SystemDrive";
const DEFAULT_SYSTEM_DRIVE: &str = "C:";

pub fn resolve_root_path() -> PathBuf {
    if cfg!(windows) {
        drive_root(std::env::var(SYSTEM_DRIVE_ENV).ok().as_deref())
    } else {
        PathBuf::from("/")
    }
}

pub const fn supports_load_average() -> bool {
    !cfg!(windows)
}

fn drive_root(system_drive: Option<&str>) -> PathBuf {
    let drive = system_drive
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_DRIVE);
    if drive.ends_with('\\') {
        PathBuf::from(drive)
    } else {
        PathBuf::from(format!("{drive}\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_root_defaults_to_c() {
        assert_eq!(drive_root(None), PathBuf::from("C:\\"));
        assert_eq!(drive_root(Some("  ")), PathBuf::from("C:\\"));
    }

    #[test]
    fn drive_root_appends_separator() {
        assert_eq!(drive_root(Some("D:")), PathBuf::from("D:\\"));
        assert_eq!(drive_root(Some("E:\\")), PathBuf::from("E:\\"));
    }

    #[cfg(not(windows))]
    #[test]
    fn unix_root_is_slash() {
        assert_eq!(resolve_root_path(), PathBuf::from("/"));
        assert!(supports_load_average());
    }
}
