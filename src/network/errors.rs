/// Errors from the network domain layer.
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or rendering a pair network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A file could not be opened, read, or written.
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input file extension is not one we can read pairs from.
    #[error("Unsupported input file '{}': expected .h5 or a text date12 list", path.display())]
    UnsupportedInput {
        /// The rejected input path.
        path: PathBuf,
    },

    /// An HDF5 file whose `FILE_TYPE` is not a multi-group ifgram stack.
    #[error("Unsupported HDF5 file type '{found}'; supported: {}", supported.join(", "))]
    UnsupportedFileType {
        /// File type found in the file.
        found: String,
        /// File types we accept.
        supported: Vec<String>,
    },

    /// HDF5 input was given but the binary was built without HDF5 support.
    #[error("Cannot read '{}': built without HDF5 support (enable the `hdf5` feature)", path.display())]
    Hdf5Disabled {
        /// The HDF5 path that was requested.
        path: PathBuf,
    },

    /// A malformed line in a text input file.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        /// File containing the bad line.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Not a valid 6- or 8-digit acquisition date.
    #[error("Invalid acquisition date '{0}'")]
    InvalidDate(String),

    /// Not a valid `date1-date2` pair identifier.
    #[error("Invalid date12 '{0}'")]
    InvalidDate12(String),

    /// A pair references an acquisition with no known baseline.
    #[error("No perpendicular baseline for acquisition {date}")]
    MissingBaseline {
        /// The 8-digit acquisition date.
        date: String,
    },

    /// A template value could not be interpreted.
    #[error("Invalid template value for '{key}': '{value}'")]
    InvalidTemplateValue {
        /// Template key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// An error reported by the HDF5 library.
    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(String),

    /// A figure could not be rendered or saved.
    #[error("Cannot render {figure}: {message}")]
    Render {
        /// Figure name, e.g. `Network`.
        figure: String,
        /// Rendering error chain.
        message: String,
    },
}

impl NetworkError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 2,
            Self::UnsupportedInput { .. }
            | Self::UnsupportedFileType { .. }
            | Self::Hdf5Disabled { .. } => 3,
            Self::Parse { .. }
            | Self::InvalidDate(_)
            | Self::InvalidDate12(_)
            | Self::MissingBaseline { .. }
            | Self::InvalidTemplateValue { .. } => 4,
            // HDF5 library and render failures.
            _ => 1,
        }
    }

    /// Machine-readable error code for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io_error",
            Self::UnsupportedInput { .. } => "unsupported_input",
            Self::UnsupportedFileType { .. } => "unsupported_file_type",
            Self::Hdf5Disabled { .. } => "hdf5_disabled",
            Self::Parse { .. } => "parse_error",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidDate12(_) => "invalid_date12",
            Self::MissingBaseline { .. } => "missing_baseline",
            Self::InvalidTemplateValue { .. } => "invalid_template_value",
            #[cfg(feature = "hdf5")]
            Self::Hdf5(_) => "hdf5_error",
            Self::Render { .. } => "render_error",
        }
    }
}
