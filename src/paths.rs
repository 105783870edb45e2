//! Path utilities: the configuration directory and output file names.

use std::path::{Path, PathBuf};

use crate::translation::output_suffix;

/// Suffix marking a file written after the user stopped a job.
pub const PARTIAL_SUFFIX: &str = "_partial";

/// Returns the configuration directory for subtl.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/subtl` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/subtl` otherwise
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join("subtl"));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
    Ok(home.join(".config").join("subtl"))
}

/// Inserts `suffix` between the file stem and its extension.
///
/// `movie.en.srt` with `_cn` becomes `movie.en_cn.srt`; a path without an
/// extension simply gets the suffix appended.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(file_name)
}

/// Default output path for a translation of `input` into `target_language`.
pub fn derive_output_path(input: &Path, target_language: &str) -> PathBuf {
    with_suffix(input, &output_suffix(target_language))
}

/// Where a stopped job writes its partial result.
pub fn partial_output_path(output: &Path) -> PathBuf {
    with_suffix(output, PARTIAL_SUFFIX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_derive_output_path_chinese() {
        let out = derive_output_path(Path::new("/media/show/ep01.ass"), "Simplified Chinese");
        assert_eq!(out, PathBuf::from("/media/show/ep01_cn.ass"));
    }

    #[test]
    fn test_derive_output_path_other_language() {
        let out = derive_output_path(Path::new("ep01.srt"), "Brazilian Portuguese");
        assert_eq!(out, PathBuf::from("ep01_brazilianportuguese.srt"));
    }

    #[test]
    fn test_partial_output_path() {
        let out = partial_output_path(Path::new("/tmp/ep01_cn.srt"));
        assert_eq!(out, PathBuf::from("/tmp/ep01_cn_partial.srt"));
    }

    #[test]
    fn test_with_suffix_keeps_inner_dots() {
        let out = with_suffix(Path::new("movie.en.srt"), "_fr");
        assert_eq!(out, PathBuf::from("movie.en_fr.srt"));
    }

    #[test]
    fn test_with_suffix_without_extension() {
        assert_eq!(
            with_suffix(Path::new("dir/subtitles"), "_partial"),
            PathBuf::from("dir/subtitles_partial")
        );
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let dir = config_dir().unwrap();
        assert!(dir.ends_with(".config/subtl"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/custom/config") };

        let dir = config_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/custom/config/subtl"));

        if let Some(val) = original {
            unsafe { std::env::set_var("XDG_CONFIG_HOME", val) };
        } else {
            unsafe { std::env::remove_var("XDG_CONFIG_HOME") };
        }
    }
}
