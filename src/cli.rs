use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};

use crate::engine::DecodePolicy;
use crate::error::Result;
use crate::source::pick_file;
use crate::validation::ValidationMode;

#[derive(Parser, Debug)]
#[command(name = "hexcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Check Intel HEX files for a missing end-of-file record, wrong data lengths and bad checksums",
    long_about = None
)]
#[command(group(ArgGroup::new("input").required(true).args(["gui", "files"])))]
pub struct Cli {
    /// Pick the file among the .hex files of the current directory
    #[arg(short, long)]
    pub gui: bool,

    /// Path of a .hex file to check; repeat to check several files
    #[arg(
        short = 'f',
        long = "file",
        visible_alias = "file_name",
        value_name = "PATH"
    )]
    pub files: Vec<PathBuf>,

    /// Keep going after the first error and print the total number of errors
    #[arg(short, long)]
    pub verbose: bool,

    /// Abort on the first malformed record instead of reporting it
    #[arg(long)]
    pub strict: bool,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn config(&self) -> CheckConfig {
        let input = if self.gui {
            InputSelection::Picker
        } else {
            InputSelection::Files(self.files.clone())
        };
        let mode = if self.verbose {
            ValidationMode::CollectAll
        } else {
            ValidationMode::FailFast
        };
        let output = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        CheckConfig::new(input)
            .with_mode(mode)
            .with_strict(self.strict)
            .with_output(output)
            .with_debug(self.debug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    Files(Vec<PathBuf>),
    Picker,
}

impl InputSelection {
    /// The picker prompts on the terminal; files are returned as given.
    pub fn resolve(&self, cwd: &Path) -> Result<Vec<PathBuf>> {
        match self {
            InputSelection::Files(files) => Ok(files.clone()),
            InputSelection::Picker => Ok(vec![pick_file(cwd)?]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Run configuration. Input selection and error aggregation are independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub input: InputSelection,
    pub mode: ValidationMode,
    pub strict: bool,
    pub output: OutputFormat,
    pub debug: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            input: InputSelection::Files(Vec::new()),
            mode: ValidationMode::FailFast,
            strict: false,
            output: OutputFormat::Text,
            debug: false,
        }
    }
}

impl CheckConfig {
    pub fn new(input: InputSelection) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.mode == ValidationMode::CollectAll
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        if self.strict {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        }
    }
}
