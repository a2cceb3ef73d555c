use std::fs;
use std::path::{Path, PathBuf};

/// Read a simulation input file as text.
pub fn read_text(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let resolved = resolve_path(path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read '{}': {}", resolved.display(), e))?;
    Ok(contents)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.exists() {
        return Err(format!("Input file not found: {}", resolved.display()).into());
    }
    if !resolved.is_file() {
        return Err(format!("Input path is not a file: {}", resolved.display()).into());
    }

    Ok(resolved)
}
