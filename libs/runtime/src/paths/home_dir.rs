use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("home directory environment variable '{0}' is not set")]
    MissingEnv(&'static str),

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[cfg(target_os = "windows")]
const HOME_ENV: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const HOME_ENV: &str = "HOME";

fn platform_home() -> Result<PathBuf, HomeDirError> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::MissingEnv(HOME_ENV))
}

/// Expand a leading `~` (alone or followed by a separator) to the platform home.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(p))
}

/// Resolve the server home directory.
///
/// - `Some(path)`: `~` is expanded and relative paths are anchored at the cwd.
/// - `None`: `<platform home>/<default_subdir>`.
///
/// When `create` is set the directory (and parents) are created.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let resolved = match configured {
        Some(raw) => absolutize(&expand_tilde(raw.trim())?)?,
        None => platform_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved).map_err(|source| HomeDirError::Create {
            path: resolved.clone(),
            source,
        })?;
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let out = resolve_home_dir(
            Some(target.to_string_lossy().to_string()),
            ".ignored",
            true,
        )
        .unwrap();
        assert_eq!(out, target);
        assert!(out.is_dir());
    }

    #[test]
    fn relative_path_is_anchored_at_cwd() {
        let out = resolve_home_dir(Some("some/relative".into()), ".ignored", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("some/relative"));
    }

    #[test]
    fn plain_path_is_not_tilde_expanded() {
        let out = expand_tilde("/srv/~data").unwrap();
        assert_eq!(out, PathBuf::from("/srv/~data"));
    }
}
