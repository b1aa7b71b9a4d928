//! Input discovery: expand the paths given on the command line into the Java
//! files to check, honouring `.gitignore` and hidden-file rules.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::syntax::JavaParser;

/// A path that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Java files found under `roots`, sorted and deduplicated, plus the entries
/// that could not be visited.
///
/// A root that is itself a file is taken as-is when it has a `.java`
/// extension, whether or not an ignore rule would hide it.
pub fn collect_java_files(roots: &[PathBuf]) -> (Vec<PathBuf>, Vec<ScanFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for root in roots {
        if root.is_file() {
            if is_java(root) {
                files.push(root.clone());
            } else {
                debug!(path = %root.display(), "skipping non-Java input");
            }
            continue;
        }
        if !root.exists() {
            failures.push(ScanFailure {
                path: root.clone(),
                message: "path does not exist".to_string(),
            });
            continue;
        }

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .parents(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && is_java(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!("Failed to scan entry: {}", e);
                    failures.push(ScanFailure {
                        path: root.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    files.sort();
    files.dedup();
    (files, failures)
}

fn is_java(path: &Path) -> bool {
    JavaParser::is_supported(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "class A {}").unwrap();
        path
    }

    #[test]
    fn finds_java_files_recursively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "src/main/java/A.java");
        touch(tmp.path(), "src/main/java/b/B.java");
        touch(tmp.path(), "README.md");

        let (files, failures) = collect_java_files(&[tmp.path().to_path_buf()]);
        assert!(failures.is_empty());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "java"));
    }

    #[test]
    fn honours_gitignore() {
        let tmp = TempDir::new().unwrap();
        // The ignore crate only reads .gitignore inside a repository.
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".gitignore"), "generated/\n").unwrap();
        touch(tmp.path(), "A.java");
        touch(tmp.path(), "generated/G.java");

        let (files, _) = collect_java_files(&[tmp.path().to_path_buf()]);
        assert_eq!(files, vec![tmp.path().join("A.java")]);
    }

    #[test]
    fn explicit_file_and_duplicates() {
        let tmp = TempDir::new().unwrap();
        let a = touch(tmp.path(), "A.java");
        let (files, _) = collect_java_files(&[a.clone(), tmp.path().to_path_buf()]);
        assert_eq!(files, vec![a]);
    }

    #[test]
    fn missing_root_is_reported() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let (files, failures) = collect_java_files(&[missing.clone()]);
        assert!(files.is_empty());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, missing);
    }
}
