//! Where the lines of a file come from: a path on disk or an interactive
//! pick among the `.hex` files of a directory.

use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FatalError, Result};

pub const HEX_EXTENSION: &str = "hex";

const KB: u64 = 1024;
const MB: u64 = KB * 1024;

const ENTER_PATH_OPTION: &str = "Enter a path...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexFile {
    pub path: PathBuf,
    pub size: u64,
}

impl HexFile {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn size_human(&self) -> String {
        if self.size >= MB {
            format!("{:.2} MB", self.size as f64 / MB as f64)
        } else if self.size >= KB {
            format!("{:.2} KB", self.size as f64 / KB as f64)
        } else {
            format!("{} B", self.size)
        }
    }
}

/// Splits raw single-byte content into lines. Invalid UTF-8 is replaced
/// rather than rejected; `\r` is left for the decoder's trim.
pub fn lines_from_bytes(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes
        .split(|&b| b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| FatalError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "read input file");
    Ok(lines_from_bytes(&bytes))
}

pub fn is_hex_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(HEX_EXTENSION))
}

/// Regular files with a `.hex` extension in `dir`, sorted by name.
pub fn hex_files_in(dir: impl AsRef<Path>) -> Result<Vec<HexFile>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| FatalError::io(dir, e))?;

    let mut files: Vec<HexFile> = entries
        .flatten()
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            let path = entry.path();
            (metadata.is_file() && is_hex_file(&path)).then(|| HexFile {
                path,
                size: metadata.len(),
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

pub fn file_selection_options(files: &[HexFile]) -> Vec<String> {
    files
        .iter()
        .map(|f| format!("{} ({})", f.name(), f.size_human()))
        .chain(std::iter::once(ENTER_PATH_OPTION.to_string()))
        .collect()
}

/// Interactive replacement for a file dialog. Cancelling or giving an
/// empty path yields [`FatalError::NoFileSelected`].
pub fn pick_file(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let files = hex_files_in(dir)?;
    let theme = ColorfulTheme::default();

    let selection = if files.is_empty() {
        eprintln!("{}", style("No .hex files in the current directory.").yellow());
        Some(files.len())
    } else {
        let options = file_selection_options(&files);
        Select::with_theme(&theme)
            .with_prompt("Select HEX file")
            .items(&options)
            .default(0)
            .interact_opt()?
    };

    match selection {
        None => Err(FatalError::NoFileSelected),
        Some(idx) if idx < files.len() => Ok(files[idx].path.clone()),
        Some(_) => {
            let entered: String = Input::with_theme(&theme)
                .with_prompt("Path to a .hex file")
                .allow_empty(true)
                .interact_text()?;
            let entered = entered.trim();
            if entered.is_empty() {
                Err(FatalError::NoFileSelected)
            } else {
                Ok(PathBuf::from(entered))
            }
        }
    }
}
