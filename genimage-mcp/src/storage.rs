//! Destination resolution, file naming and PNG persistence.
//!
//! Images are encoded in memory and then written through a temporary file
//! that is renamed into place. Two concurrent calls that name the same file
//! both succeed and the last rename wins; generated names are never shared.

use genimage_mcp_common::config::OUTPUT_DIR_VAR;
use genimage_mcp_common::error::{ConfigError, Error};
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Extension every saved image gets.
pub const IMAGE_EXTENSION: &str = "png";

/// Prefix of time-derived file names.
pub const GENERATED_PREFIX: &str = "gemini_image";

/// Pick the destination directory: the caller's, else the configured default.
///
/// # Errors
/// `ConfigError::NoDestination` when neither is available.
pub fn resolve_destination(requested: Option<&str>, default: Option<&Path>) -> Result<PathBuf, Error> {
    match requested.map(str::trim).filter(|d| !d.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default
            .map(Path::to_path_buf)
            .ok_or_else(|| ConfigError::NoDestination(OUTPUT_DIR_VAR.to_string()).into()),
    }
}

/// Create the directory and any missing parents.
pub async fn ensure_directory(dir: &Path) -> Result<(), Error> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::storage(dir, e))
}

/// Check a caller-supplied file name: one path component, nothing special.
///
/// The name is used verbatim; surrounding whitespace is kept.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Filename cannot be empty".to_string());
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(format!("Filename '{}' must not contain path separators", name));
    }
    if name == "." || name == ".." {
        return Err(format!("Filename '{}' is not a file name", name));
    }
    Ok(())
}

/// Append the image extension unless the name already carries it.
pub fn with_extension(name: &str) -> String {
    let has_ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION));
    if has_ext {
        name.to_string()
    } else {
        format!("{}.{}", name, IMAGE_EXTENSION)
    }
}

/// Time-derived file stem with microsecond resolution.
pub fn timestamp_stem(now: SystemTime) -> String {
    let micros = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    format!("{}_{}", GENERATED_PREFIX, micros)
}

/// Where an image will be written.
#[derive(Debug)]
pub struct Target {
    /// Final path of the PNG file.
    pub path: PathBuf,
    /// An empty placeholder was created at `path` to claim the name.
    reserved: bool,
}

/// Choose the path the image will be written to.
///
/// An explicit name is used as-is and overwrites any existing file. Without
/// one, a timestamped name is claimed by creating it exclusively, trying
/// `_1`, `_2`, ... suffixes until a free name is won. Concurrent callers
/// therefore never share a generated name.
pub async fn target_path(dir: &Path, filename: Option<&str>) -> Result<Target, Error> {
    if let Some(name) = filename {
        return Ok(Target {
            path: dir.join(with_extension(name)),
            reserved: false,
        });
    }

    let stem = timestamp_stem(SystemTime::now());
    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => stem.clone(),
            n => format!("{}_{}", stem, n),
        };
        let candidate = dir.join(with_extension(&name));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_) => {
                debug!(path = %candidate.display(), "Reserved generated file name");
                return Ok(Target {
                    path: candidate,
                    reserved: true,
                });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(Error::storage(&candidate, e)),
        }
    }
}

/// Encode the image as PNG in memory.
///
/// Float images (e.g. decoded HDR) are converted to 8-bit first since PNG
/// cannot hold them. Failures here are decode errors: nothing has touched
/// the disk yet.
pub fn encode_png(image: DynamicImage) -> Result<Vec<u8>, Error> {
    let image = match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb8(image.to_rgb8()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba8(image.to_rgba8()),
        other => other,
    };
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| Error::decode(format!("cannot encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

/// Write encoded PNG bytes to the target, replacing any existing file.
///
/// The bytes go to a temporary sibling first and are renamed into place, so
/// an existing file is only replaced by a complete one. On failure the
/// temporary file and any reserved placeholder are removed.
///
/// Returns the number of bytes written.
pub async fn write_png(png: &[u8], target: &Target) -> Result<u64, Error> {
    let temp = temp_sibling(&target.path);
    let written = async {
        tokio::fs::write(&temp, png)
            .await
            .map_err(|e| Error::storage(&temp, e))?;
        tokio::fs::rename(&temp, &target.path)
            .await
            .map_err(|e| Error::storage(&target.path, e))
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp).await;
        if target.reserved {
            let _ = tokio::fs::remove_file(&target.path).await;
        }
        return Err(e);
    }
    Ok(png.len() as u64)
}

fn temp_sibling(path: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
}
