//! Optional display of saved images.
//!
//! Display is best-effort: the handler logs a failure and carries on.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tracing::debug;

/// Something that can show an image file to the user.
#[async_trait]
pub trait ImageViewer: Send + Sync {
    /// Show the image at `path`. Must not wait for the user to close it.
    async fn show(&self, path: &Path) -> std::io::Result<()>;
}

/// Viewer that does nothing. Used when display is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewer;

#[async_trait]
impl ImageViewer for NoopViewer {
    async fn show(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

/// Opens images with the platform's default application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> tokio::process::Command {
        let mut cmd = if cfg!(target_os = "macos") {
            tokio::process::Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else {
            tokio::process::Command::new("xdg-open")
        };
        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl ImageViewer for SystemViewer {
    async fn show(&self, path: &Path) -> std::io::Result<()> {
        let child = Self::command(path).spawn()?;
        debug!(pid = ?child.id(), path = %path.display(), "Launched image viewer");
        Ok(())
    }
}
