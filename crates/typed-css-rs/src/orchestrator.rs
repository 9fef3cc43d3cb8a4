//! Main orchestration logic.

use crate::cli::Args;
use crate::output::{FileReport, Formatter, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use css_locator::Locator;
use dts_content::{output_path, DtsContent};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Watch error.
    #[error("watch error: {0}")]
    WatchFailed(String),
}

/// Runs declaration generation over all matching stylesheets.
pub async fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    let input = absolutize(&args.input);

    let pattern_set = build_glob_set(&[args.pattern.clone()])?;
    let mut ignore_patterns = args.ignore.clone();
    for default in ["**/node_modules/**", "**/.git/**"] {
        ignore_patterns.push(default.to_string());
    }
    let ignore_set = build_glob_set(&ignore_patterns)?;

    let files = discover(&input, &pattern_set, &ignore_set);

    if args.list_files {
        for file in &files {
            let relative = file.strip_prefix(&input).unwrap_or(file);
            println!("{relative}");
        }
        return Ok(RunSummary {
            file_count: files.len(),
            ..Default::default()
        });
    }

    if args.watch {
        run_watch_mode(&args, &input, files).await
    } else {
        let locator = Locator::new();
        let mut formatter = Formatter::new(args.output, args.silent);
        let (summary, _deps) = run_pass(&locator, &args, &input, &files, &mut formatter).await;
        formatter.finish(&summary);
        Ok(summary)
    }
}

fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_owned();
    }
    let cwd = std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
        .unwrap_or_default();
    cwd.join(path)
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, OrchestratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

fn is_ignored_dir(ignore_set: &GlobSet, relative: &Utf8Path) -> bool {
    let rel = relative.as_str();
    if ignore_set.is_match(rel) {
        return true;
    }
    let mut rel_slash = String::with_capacity(rel.len() + 1);
    rel_slash.push_str(rel);
    rel_slash.push('/');
    ignore_set.is_match(&rel_slash)
}

/// Finds stylesheets under `input` matching the pattern, in deterministic
/// order. A file input is taken as-is.
fn discover(input: &Utf8Path, pattern_set: &GlobSet, ignore_set: &GlobSet) -> Vec<Utf8PathBuf> {
    if input.is_file() {
        return vec![input.to_owned()];
    }

    let mut files: Vec<Utf8PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let path = match Utf8Path::from_path(entry.path()) {
                Some(path) => path,
                None => return true,
            };
            let relative = path.strip_prefix(input).unwrap_or(path);
            !is_ignored_dir(ignore_set, relative)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| {
            let relative = p.strip_prefix(input).unwrap_or(p);
            pattern_set.is_match(relative.as_str()) && !ignore_set.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    files
}

/// The outcome of processing one stylesheet.
struct ProcessOutcome {
    report: FileReport,
    /// The sheet's transitive dependency set, for watch-mode invalidation.
    dependencies: Vec<Utf8PathBuf>,
}

/// Loads one stylesheet and writes its declaration file.
///
/// The write is skipped when the file already holds identical content.
async fn process_file(
    locator: &Locator,
    args: &Args,
    input_root: &Utf8Path,
    file: &Utf8Path,
) -> ProcessOutcome {
    let result = match locator.load(file).await {
        Ok(result) => result,
        Err(err) => {
            return ProcessOutcome {
                report: FileReport {
                    file: file.to_string(),
                    output: None,
                    status: "error".to_string(),
                    message: Some(err.to_string()),
                    warnings: Vec::new(),
                    tokens: 0,
                },
                dependencies: Vec::new(),
            };
        }
    };

    let options = args.dts_options();
    let content = DtsContent::new(&result.tokens, &options);

    let out_file = match &args.out_dir {
        Some(out_dir) => {
            let relative = file.strip_prefix(input_root).unwrap_or(file);
            output_path(&absolutize(out_dir).join(relative), &options)
        }
        None => output_path(file, &options),
    };

    let text = content.formatted();
    let unchanged = fs::read_to_string(out_file.as_std_path())
        .map(|existing| existing == text)
        .unwrap_or(false);

    let status = if unchanged {
        "unchanged"
    } else {
        if let Some(parent) = out_file.parent() {
            if let Err(err) = fs::create_dir_all(parent.as_std_path()) {
                return ProcessOutcome {
                    report: FileReport {
                        file: file.to_string(),
                        output: Some(out_file.to_string()),
                        status: "error".to_string(),
                        message: Some(format!("failed to create {parent}: {err}")),
                        warnings: content.warnings().to_vec(),
                        tokens: content.token_names().len(),
                    },
                    dependencies: result.dependencies,
                };
            }
        }
        if let Err(err) = fs::write(out_file.as_std_path(), &text) {
            return ProcessOutcome {
                report: FileReport {
                    file: file.to_string(),
                    output: Some(out_file.to_string()),
                    status: "error".to_string(),
                    message: Some(format!("failed to write {out_file}: {err}")),
                    warnings: content.warnings().to_vec(),
                    tokens: content.token_names().len(),
                },
                dependencies: result.dependencies,
            };
        }
        "written"
    };

    ProcessOutcome {
        report: FileReport {
            file: file.to_string(),
            output: Some(out_file.to_string()),
            status: status.to_string(),
            message: None,
            warnings: content.warnings().to_vec(),
            tokens: content.token_names().len(),
        },
        dependencies: result.dependencies,
    }
}

/// Processes a batch of stylesheets, returning totals and each sheet's
/// dependency set.
async fn run_pass(
    locator: &Locator,
    args: &Args,
    input_root: &Utf8Path,
    files: &[Utf8PathBuf],
    formatter: &mut Formatter,
) -> (RunSummary, HashMap<Utf8PathBuf, Vec<Utf8PathBuf>>) {
    let mut summary = RunSummary {
        file_count: files.len(),
        ..Default::default()
    };
    let mut dependency_map = HashMap::new();

    for file in files {
        let outcome = process_file(locator, args, input_root, file).await;
        match outcome.report.status.as_str() {
            "written" => summary.written_count += 1,
            "error" => summary.error_count += 1,
            _ => {}
        }
        formatter.report(outcome.report);
        dependency_map.insert(file.clone(), outcome.dependencies);
    }

    (summary, dependency_map)
}

/// Runs in watch mode: regenerates a sheet whenever it or anything in its
/// dependency set changes.
async fn run_watch_mode(
    args: &Args,
    input: &Utf8Path,
    initial_files: Vec<Utf8PathBuf>,
) -> Result<RunSummary, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let pattern_set = build_glob_set(&[args.pattern.clone()])?;
    let locator = Locator::new();
    let mut formatter = Formatter::new(args.output, args.silent);

    let mut tracked = initial_files;
    let (mut summary, mut dependency_map) =
        run_pass(&locator, args, input, &tracked, &mut formatter).await;
    formatter.finish(&summary);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(input.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    println!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let changed: Vec<Utf8PathBuf> = event
            .paths
            .iter()
            .filter_map(|p| Utf8PathBuf::from_path_buf(p.clone()).ok())
            .collect();
        if changed.is_empty() {
            continue;
        }

        // A tracked sheet is affected when it or any of its dependencies
        // changed; a new matching stylesheet joins the tracked set.
        let mut affected: Vec<Utf8PathBuf> = Vec::new();
        for root in &tracked {
            let deps = dependency_map.get(root);
            let hit = changed.iter().any(|c| {
                c == root || deps.is_some_and(|deps| deps.iter().any(|d| d == c))
            });
            if hit {
                affected.push(root.clone());
            }
        }
        for path in &changed {
            let relative = path.strip_prefix(input).unwrap_or(path);
            if pattern_set.is_match(relative.as_str())
                && path.is_file()
                && !tracked.contains(path)
            {
                tracked.push(path.clone());
                affected.push(path.clone());
            }
        }
        if affected.is_empty() {
            continue;
        }

        let (pass_summary, pass_deps) =
            run_pass(&locator, args, input, &affected, &mut formatter).await;
        formatter.finish(&pass_summary);
        summary.file_count = tracked.len();
        summary.written_count += pass_summary.written_count;
        summary.error_count += pass_summary.error_count;
        dependency_map.extend(pass_deps);
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn workspace() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_discover_matches_pattern() {
        let (_dir, root) = workspace();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/a.css"), "").unwrap();
        fs::write(root.join("src/nested/b.css"), "").unwrap();
        fs::write(root.join("src/skip.scss"), "").unwrap();

        let patterns = build_glob_set(&["**/*.css".to_string()]).unwrap();
        let ignores = build_glob_set(&[]).unwrap();
        let files = discover(&root, &patterns, &ignores);

        assert_eq!(
            files,
            vec![root.join("src/a.css"), root.join("src/nested/b.css")]
        );
    }

    #[test]
    fn test_discover_ignores_node_modules() {
        let (_dir, root) = workspace();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("node_modules/pkg/x.css"), "").unwrap();
        fs::write(root.join("a.css"), "").unwrap();

        let patterns = build_glob_set(&["**/*.css".to_string()]).unwrap();
        let ignores = build_glob_set(&["**/node_modules/**".to_string()]).unwrap();
        let files = discover(&root, &patterns, &ignores);

        assert_eq!(files, vec![root.join("a.css")]);
    }

    #[test]
    fn test_invalid_glob_is_reported() {
        let err = build_glob_set(&["{unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidGlob(_)));
    }

    #[tokio::test]
    async fn test_process_file_writes_declaration() {
        let (_dir, root) = workspace();
        let css = root.join("button.css");
        fs::write(&css, ".primary { color: red }\n").unwrap();

        let args = crate::cli::Args::parse_from(["typed-css-rs"]);
        let locator = Locator::new();
        let outcome = process_file(&locator, &args, &root, &css).await;

        assert_eq!(outcome.report.status, "written");
        let dts = fs::read_to_string(root.join("button.css.d.ts")).unwrap();
        assert!(dts.contains("readonly \"primary\": string;"));

        // A second pass finds identical content and skips the write.
        let outcome = process_file(&locator, &args, &root, &css).await;
        assert_eq!(outcome.report.status, "unchanged");
    }

    #[tokio::test]
    async fn test_process_file_reports_load_errors() {
        let (_dir, root) = workspace();
        let css = root.join("broken.css");
        fs::write(&css, ".a {").unwrap();

        let args = crate::cli::Args::parse_from(["typed-css-rs"]);
        let locator = Locator::new();
        let outcome = process_file(&locator, &args, &root, &css).await;

        assert_eq!(outcome.report.status, "error");
        assert!(outcome.report.message.is_some());
    }
}
