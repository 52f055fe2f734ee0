use eyre::{Result, WrapErr};
use std::path::Path;
use tokio::{fs, io::AsyncWriteExt};

/// Append `content` to `path`, creating the file and its parent directory.
///
/// The block goes out in a single `write_all` on an `O_APPEND` handle, so
/// concurrent writers don't interleave inside a block.
pub async fn append_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .wrap_err_with(|| format!("creating {}", parent.display()))?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .wrap_err_with(|| format!("opening {}", path.display()))?;

    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Non-empty, non-comment lines of a text file. Missing file reads as empty.
pub async fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = match fs::read_to_string(path).await {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).wrap_err_with(|| format!("reading {}", path.display())),
    };

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}
