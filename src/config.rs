//! Tool configuration
//!
//! External tools are located through [`ToolConfig`], which is passed to each
//! operation at call time. Bare command names are resolved through `PATH` when
//! the process is spawned.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Margin (in PostScript points) applied when cropping.
pub const CROP_MARGIN: u32 = 15;

/// Target tablet resolution, used for the aspect ratio when centering.
pub const TABLET_WIDTH: f64 = 1404.0;
pub const TABLET_HEIGHT: f64 = 1872.0;

/// Environment variable overriding the cropper path
pub const ENV_CROPPER: &str = "PAPER_PREP_PDFCROP";
/// Environment variable overriding the compressor path
pub const ENV_COMPRESSOR: &str = "PAPER_PREP_GS";

const DEFAULT_CROPPER: &str = "pdfcrop";
const DEFAULT_COMPRESSOR: &str = "gs";

/// Locations of the external tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// `pdfcrop` executable (default: `pdfcrop`)
    pub cropper_path: PathBuf,
    /// Ghostscript executable (default: `gs`)
    pub compressor_path: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            cropper_path: PathBuf::from(DEFAULT_CROPPER),
            compressor_path: PathBuf::from(DEFAULT_COMPRESSOR),
        }
    }
}

impl ToolConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: ToolConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `PAPER_PREP_PDFCROP` / `PAPER_PREP_GS`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values returned by `lookup` for the tool environment variables.
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CROPPER).filter(|v| !v.trim().is_empty()) {
            self.cropper_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_COMPRESSOR).filter(|v| !v.trim().is_empty()) {
            self.compressor_path = PathBuf::from(path);
        }
        self
    }

    /// Build the effective configuration, later sources winning:
    /// defaults, then the JSON file, then the environment seen through
    /// `lookup`, then explicit paths.
    pub fn resolve<F>(
        json_file: Option<&Path>,
        lookup: F,
        cropper_path: Option<PathBuf>,
        compressor_path: Option<PathBuf>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match json_file {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        let mut config = base.with_overrides(lookup);
        if let Some(path) = cropper_path {
            config.cropper_path = path;
        }
        if let Some(path) = compressor_path {
            config.compressor_path = path;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject empty tool paths.
    pub fn validate(&self) -> Result<()> {
        if self.cropper_path.as_os_str().is_empty() {
            return Err(Error::Config {
                reason: "cropper_path is empty".to_string(),
            });
        }
        if self.compressor_path.as_os_str().is_empty() {
            return Err(Error::Config {
                reason: "compressor_path is empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_bare_command_names() {
        let config = ToolConfig::default();
        assert_eq!(config.cropper_path, PathBuf::from("pdfcrop"));
        assert_eq!(config.compressor_path, PathBuf::from("gs"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ToolConfig =
            serde_json::from_str(r#"{"compressor_path": "/opt/gs/bin/gs"}"#).unwrap();
        assert_eq!(config.cropper_path, PathBuf::from("pdfcrop"));
        assert_eq!(config.compressor_path, PathBuf::from("/opt/gs/bin/gs"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        std::fs::write(&path, r#"{"cropper_path": "/usr/local/bin/pdfcrop"}"#).unwrap();

        let config = ToolConfig::from_json_file(&path).unwrap();
        assert_eq!(config.cropper_path, PathBuf::from("/usr/local/bin/pdfcrop"));
    }

    #[test]
    fn test_from_json_file_rejects_empty_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        std::fs::write(&path, r#"{"cropper_path": ""}"#).unwrap();

        assert!(matches!(
            ToolConfig::from_json_file(&path),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = ToolConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_resolve_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("tools.json");
        std::fs::write(
            &json,
            r#"{"cropper_path": "/json/pdfcrop", "compressor_path": "/json/gs"}"#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = [(ENV_CROPPER, "/env/pdfcrop"), (ENV_COMPRESSOR, "/env/gs")]
            .into_iter()
            .collect();
        let no_env = |_: &str| None;
        let with_env = |k: &str| env.get(k).map(|v| v.to_string());

        let config = ToolConfig::resolve(None, no_env, None, None).unwrap();
        assert_eq!(config, ToolConfig::default());

        let config = ToolConfig::resolve(Some(&json), no_env, None, None).unwrap();
        assert_eq!(config.cropper_path, PathBuf::from("/json/pdfcrop"));
        assert_eq!(config.compressor_path, PathBuf::from("/json/gs"));

        let config = ToolConfig::resolve(Some(&json), with_env, None, None).unwrap();
        assert_eq!(config.cropper_path, PathBuf::from("/env/pdfcrop"));
        assert_eq!(config.compressor_path, PathBuf::from("/env/gs"));

        let config = ToolConfig::resolve(
            Some(&json),
            with_env,
            Some(PathBuf::from("/flag/pdfcrop")),
            None,
        )
        .unwrap();
        assert_eq!(config.cropper_path, PathBuf::from("/flag/pdfcrop"));
        assert_eq!(config.compressor_path, PathBuf::from("/env/gs"));
    }

    #[test]
    fn test_resolve_rejects_empty_flag() {
        let result = ToolConfig::resolve(None, |_| None, None, Some(PathBuf::new()));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [(ENV_COMPRESSOR, "/custom/gs"), (ENV_CROPPER, "  ")]
            .into_iter()
            .collect();
        let config = ToolConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.compressor_path, PathBuf::from("/custom/gs"));
        assert_eq!(config.cropper_path, PathBuf::from("pdfcrop"));
    }
}
