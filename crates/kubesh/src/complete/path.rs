//! Filesystem path completion for manifest arguments.

use std::fs;
use std::path::{is_separator, Path, PathBuf, MAIN_SEPARATOR};

use tracing::debug;

/// Completes `text` as a path, resolving relative paths against `base`.
///
/// Candidates keep the directory part exactly as typed and end with a
/// separator when they name a directory. An unreadable directory yields
/// no candidates.
#[must_use]
pub fn complete_path_in(base: &Path, text: &str) -> Vec<String> {
    let (dir_part, name_prefix) = match text.rfind(is_separator) {
        Some(i) => text.split_at(i + 1),
        None => ("", text),
    };

    let dir = if dir_part.is_empty() {
        base.to_path_buf()
    } else if Path::new(dir_part).is_absolute() {
        PathBuf::from(dir_part)
    } else {
        base.join(dir_part)
    };

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "cannot list directory");
            return Vec::new();
        }
    };

    let mut candidates: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(name_prefix) {
                return None;
            }
            let mut candidate = format!("{dir_part}{name}");
            if entry.path().is_dir() {
                candidate.push(MAIN_SEPARATOR);
            }
            Some(candidate)
        })
        .collect();
    candidates.sort();
    candidates
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn layout() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("manifests")).expect("mkdir");
        fs::create_dir(dir.path().join("manual")).expect("mkdir");
        fs::write(dir.path().join("manifest.yaml"), "").expect("write");
        fs::write(dir.path().join("other.yaml"), "").expect("write");
        fs::write(dir.path().join("manifests").join("deploy.yaml"), "").expect("write");
        dir
    }

    #[test]
    fn dot_slash_prefix_is_kept() {
        let dir = layout();
        assert_eq!(
            complete_path_in(dir.path(), "./man"),
            vec!["./manifest.yaml", "./manifests/", "./manual/"]
        );
    }

    #[test]
    fn bare_prefix_lists_working_directory() {
        let dir = layout();
        assert_eq!(complete_path_in(dir.path(), "oth"), vec!["other.yaml"]);
    }

    #[test]
    fn empty_text_lists_everything() {
        let dir = layout();
        assert_eq!(complete_path_in(dir.path(), "").len(), 4);
    }

    #[test]
    fn descends_into_typed_directory() {
        let dir = layout();
        assert_eq!(
            complete_path_in(dir.path(), "manifests/"),
            vec!["manifests/deploy.yaml"]
        );
    }

    #[test]
    fn absolute_paths_ignore_base() {
        let dir = layout();
        let text = format!("{}/other", dir.path().display());
        assert_eq!(
            complete_path_in(Path::new("/nonexistent"), &text),
            vec![format!("{}/other.yaml", dir.path().display())]
        );
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let dir = layout();
        assert!(complete_path_in(dir.path(), "nope/x").is_empty());
    }
}
