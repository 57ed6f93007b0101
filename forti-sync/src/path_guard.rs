use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an `expand --output` target that would clobber one of the files the
/// payload was built from: the state file or the resource's schema override.
pub fn ensure_payload_target(
    output: &Path,
    state: &Path,
    schemas_dir: Option<&Path>,
    resource: &str,
) -> Result<()> {
    let target = resolve(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;

    if target == resolve(state)? {
        bail!(
            "refusing to overwrite state file: output {} is {}",
            output.display(),
            state.display()
        );
    }
    if let Some(dir) = schemas_dir {
        let schema = dir.join(format!("{resource}.toml"));
        if target == resolve(&schema)? {
            bail!(
                "refusing to overwrite schema file: output {} is {}",
                output.display(),
                schema.display()
            );
        }
    }
    Ok(())
}

/// Absolute form of `path` for comparison.
///
/// `.` and `..` are folded lexically first, so `out/../state.json` matches
/// `state.json` even when `out` does not exist. The result is canonicalized
/// when the path, or else its parent, exists.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().context("current_dir")?.join(path)
    };
    let folded = fold_dots(&absolute);

    if folded.exists() {
        return folded
            .canonicalize()
            .with_context(|| format!("canonicalize {}", folded.display()));
    }
    match (folded.parent(), folded.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(parent
            .canonicalize()
            .with_context(|| format!("canonicalize {}", parent.display()))?
            .join(name)),
        _ => Ok(folded),
    }
}

fn fold_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
