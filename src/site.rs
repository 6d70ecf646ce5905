use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::Config;
use crate::error;
use crate::html::document_to_node;
use crate::template::render_template;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Source directory {0} does not exist")]
    MissingSource(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to generate page from {path}: {source}")]
    Page {
        path: PathBuf,
        source: error::Error,
    },
}

/// A page that could not be generated
#[derive(Debug)]
pub struct PageFailure {
    pub source_path: PathBuf,
    pub error: SiteError,
}

/// Outcome of a site build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Generated HTML pages, in the order they were written
    pub pages: Vec<PathBuf>,
    /// Files copied verbatim, from both the static and content trees
    pub copied: usize,
    pub failures: Vec<PageFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SiteError {
    move |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_dir(dir: &Path) -> Result<(), SiteError> {
    if !dir.exists() {
        info!("creating target {} directory", dir.display());
        fs::create_dir_all(dir).map_err(io_error(dir))?;
    }
    Ok(())
}

/// Directory entries sorted by path, so builds are reproducible.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), SiteError> {
    debug!("Copying {} to {}", from.display(), to.display());
    fs::copy(from, to).map_err(io_error(from))?;
    Ok(())
}

/// Copy a directory tree into `dst`, creating it if needed. Returns the
/// number of files copied.
pub fn copy_recursive(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    if !src.exists() {
        return Err(SiteError::MissingSource(src.to_path_buf()));
    }
    ensure_dir(dst)?;

    let mut copied = 0;
    for path in sorted_entries(src)? {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = dst.join(name);

        if path.is_dir() {
            copied += copy_recursive(&path, &target)?;
        } else {
            copy_file(&path, &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Render one Markdown file through the template into `to`.
pub fn generate_page(from: &Path, template: &str, to: &Path) -> Result<(), SiteError> {
    let markdown = fs::read_to_string(from).map_err(io_error(from))?;

    let page_error = |source| SiteError::Page {
        path: from.to_path_buf(),
        source,
    };
    let root = document_to_node(&markdown).map_err(page_error)?;
    let title = root
        .extract_title()
        .ok_or(error::Error::MissingTitle)
        .map_err(page_error)?;
    let content = root.to_html().map_err(page_error)?;

    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    fs::write(to, render_template(template, &title, &content)).map_err(io_error(to))?;
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Walk a content tree, generating a page for every `.md` file and copying
/// everything else as is.
///
/// A page that fails is recorded in `report` and the walk moves on, unless
/// `fail_fast` is set, in which case its error is returned.
pub fn generate_recursive(
    content_dir: &Path,
    template: &str,
    target_dir: &Path,
    fail_fast: bool,
    report: &mut BuildReport,
) -> Result<(), SiteError> {
    if !content_dir.exists() {
        return Err(SiteError::MissingSource(content_dir.to_path_buf()));
    }
    ensure_dir(target_dir)?;

    for path in sorted_entries(content_dir)? {
        let Some(name) = path.file_name() else {
            continue;
        };
        let target = target_dir.join(name);

        if path.is_dir() {
            generate_recursive(&path, template, &target, fail_fast, report)?;
        } else if is_markdown(&path) {
            let target = target.with_extension("html");
            info!("Generating {} at {}", path.display(), target.display());
            match generate_page(&path, template, &target) {
                Ok(()) => report.pages.push(target),
                Err(error) if fail_fast => return Err(error),
                Err(error) => {
                    warn!("Skipping {}: {}", path.display(), error);
                    report.failures.push(PageFailure {
                        source_path: path,
                        error,
                    });
                }
            }
        } else {
            copy_file(&path, &target)?;
            report.copied += 1;
        }
    }
    Ok(())
}

/// Build the whole site described by `config`.
pub fn build_site(config: &Config) -> Result<BuildReport, SiteError> {
    let paths = &config.paths;

    if config.build.clean && paths.output_dir.exists() {
        info!("Removing {}", paths.output_dir.display());
        fs::remove_dir_all(&paths.output_dir).map_err(io_error(&paths.output_dir))?;
    }

    let mut report = BuildReport::default();
    if paths.static_dir.exists() {
        report.copied += copy_recursive(&paths.static_dir, &paths.output_dir)?;
    } else {
        info!(
            "No static directory at {}, skipping asset copy",
            paths.static_dir.display()
        );
    }

    let template = fs::read_to_string(&paths.template).map_err(io_error(&paths.template))?;
    generate_recursive(
        &paths.content_dir,
        &template,
        &paths.output_dir,
        config.build.fail_fast,
        &mut report,
    )?;

    Ok(report)
}
