// Output target: stdout, or a file replaced atomically so readers never see a
// half-written script.

use crate::error::SeedError;
use crate::logger;
use std::io::{self, Write};
use std::path::Path;

pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), SeedError> {
    match path {
        Some(path) => write_file_atomic(path, content),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| SeedError::write("<stdout>", e))
        }
    }
}

fn write_file_atomic(path: &Path, content: &str) -> Result<(), SeedError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    logger::debug(&format!("WriteOutput: Staging {} in {}", path.display(), dir.display()));

    let mut tmp = tempfile::Builder::new()
        .prefix(".permseed-")
        .tempfile_in(dir)
        .map_err(|e| SeedError::write(path, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| SeedError::write(path, e))?;
    tmp.persist(path).map_err(|e| SeedError::write(path, e.error))?;

    logger::debug(&format!("WriteOutput: Wrote {} bytes to {}", content.len(), path.display()));
    Ok(())
}
