//! Receipt uploads and opening stored documents.

use crate::api::Backend;
use crate::api::error::ApiError;
use std::io;
use std::path::Path;

/// Stores a file and returns the URL the backend assigned to it.
pub async fn upload(
    backend: &dyn Backend,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<String, ApiError> {
    backend.upload("archivos/upload", file_name, bytes).await
}

/// Reads a local file for upload, returning its bare name and contents.
pub async fn read_local(path: &Path) -> io::Result<(String, Vec<u8>)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "La ruta no apunta a un archivo")
        })?;
    let bytes = tokio::fs::read(path).await?;
    Ok((name, bytes))
}

/// Hands a document URL or file to the platform opener.
///
/// Whether it renders as an image or a document is up to the application
/// the system picks.
pub fn open_document(target: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", target])
            .spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(target).spawn()?;
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        std::process::Command::new("xdg-open").arg(target).spawn()?;
    }

    Ok(())
}
