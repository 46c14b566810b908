use leon::{ParseError, RenderError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed table output: {}", .0)]
    Format(String),

    #[error("Invalid selection `{}`: expected an integer index", .0)]
    Input(String),

    #[error("Selection {} is out of range, expected a value between 1 and {}", .index, .len)]
    Index { index: i64, len: usize },

    #[error("There is nothing to select from, the table is empty.")]
    EmptyTable,

    #[error("Record {} has no `{}` column", .index, .field)]
    MissingField { index: usize, field: String },

    #[error("Could not connect to host `{}`: {}", .host, .reason)]
    Connection { host: String, reason: String },

    #[error("Remote command on `{}` failed with exit code {}: {}", .host, .status.map_or("unknown".to_string(), |s| s.to_string()), .stderr)]
    Command {
        host: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("Error reading JSON output: {}", .0)]
    Json(#[from] serde_json::Error),

    #[error("Error parsing placeholder string: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error placeholder template string: {}", .0)]
    Render(#[from] RenderError),

    #[error("I/O error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("No host with ID `{}` is configured", .0)]
    HostNotFound(String),

    #[error("Several hosts are configured ({}), pick one with `--host`", .0.join(", "))]
    AmbiguousHost(Vec<String>),

    #[error("No hosts were found in the host config. Is `{}` empty?", .path)]
    NoHosts { path: String },

    #[error("Found a non-unique host ID: `{}`", .0)]
    NonUniqueHostId(String),

    #[error("Invalid ID: ID may not be empty")]
    EmptyId,

    #[error("Invalid ID `{}`: ID may not contain spaces", .0)]
    IdWithSpace(String),

    #[error("Invalid status rule `{}` -> `{}`: {}", .phrase, .code, .reason)]
    InvalidStatusRule {
        phrase: String,
        code: String,
        reason: String,
    },

    #[error("Invalid MAC address: \"{}\"", .0)]
    InvalidMacAddress(String),

    #[error("Host `{}` has no `mac_address` configured", .0)]
    MissingMacAddress(String),
}

impl Error {
    pub fn format_error(reason: impl Into<String>) -> Self {
        Self::Format(reason.into())
    }

    pub fn connection_error(host: String, reason: String) -> Self {
        Self::Connection { host, reason }
    }

    pub fn command_error(host: String, status: Option<i32>, stderr: String) -> Self {
        Self::Command {
            host,
            status,
            stderr,
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether the operator can fix this by answering the selection prompt differently.
    #[must_use]
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Index { .. })
    }
}
