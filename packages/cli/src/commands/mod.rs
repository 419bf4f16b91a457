pub mod check;
pub mod generate;
pub mod init;

pub use check::{check, CheckArgs};
pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const PAGE_EXTENSION: &str = "ditto";

/// Page documents at a path: the file itself, or every `.ditto` file below
/// a directory in sorted order
pub fn find_page_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(anyhow::anyhow!("Input path does not exist: {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some(PAGE_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
