pub mod collections;
pub mod compare;
pub mod gaps;
pub mod report;
pub mod show_config;

use crate::errors::AppResult;
use std::path::Path;

/// Write output to file with safe directory creation
pub(crate) fn write_output_to_file(path: &Path, content: &str, description: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    eprintln!("{} written to: {}", description, path.display());
    Ok(())
}

/// Print to stdout, or write to `output` when given
pub(crate) fn emit(output: Option<&Path>, content: &str, description: &str) -> AppResult<()> {
    match output {
        Some(path) => write_output_to_file(path, content, description),
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
