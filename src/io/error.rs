use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::io::cif::CifError;
use crate::ops;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to parse mmCIF {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Cif {
        path: Option<PathBuf>,
        #[source]
        source: CifError,
    },

    #[error(
        "category '{category}' in {path_desc} is missing required columns: {columns_desc}",
        path_desc = PathDisplay(path),
        columns_desc = columns.join(", ")
    )]
    MissingColumns {
        category: String,
        columns: Vec<String>,
        path: Option<PathBuf>,
    },

    #[error(
        "cannot cast '{value}' in column '{category}.{column}' of {path_desc} to {target}",
        path_desc = PathDisplay(path)
    )]
    InvalidValue {
        category: String,
        column: String,
        value: String,
        target: &'static str,
        path: Option<PathBuf>,
    },

    #[error(
        "inconsistent data in {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    InconsistentData {
        details: String,
        path: Option<PathBuf>,
    },

    #[error(
        "cannot build assembly from {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Assembly {
        path: Option<PathBuf>,
        #[source]
        source: ops::Error,
    },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn missing_columns(category: impl Into<String>, columns: Vec<String>) -> Self {
        Self::MissingColumns {
            category: category.into(),
            columns,
            path: None,
        }
    }

    pub fn invalid_value(
        category: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
        target: &'static str,
    ) -> Self {
        Self::InvalidValue {
            category: category.into(),
            column: column.into(),
            value: value.into(),
            target,
            path: None,
        }
    }

    pub fn inconsistent_data(details: impl Into<String>) -> Self {
        Self::InconsistentData {
            details: details.into(),
            path: None,
        }
    }

    /// Fills in the originating file on every variant that does not carry
    /// one yet. Applied once, at the read entry points.
    pub fn with_path(mut self, file: &Path) -> Self {
        let slot = match &mut self {
            Error::Io { path, .. }
            | Error::Cif { path, .. }
            | Error::MissingColumns { path, .. }
            | Error::InvalidValue { path, .. }
            | Error::InconsistentData { path, .. }
            | Error::Assembly { path, .. } => path,
        };
        if slot.is_none() {
            *slot = Some(file.to_path_buf());
        }
        self
    }
}

impl From<CifError> for Error {
    fn from(source: CifError) -> Self {
        Self::Cif { path: None, source }
    }
}

impl From<ops::Error> for Error {
    fn from(source: ops::Error) -> Self {
        Self::Assembly { path: None, source }
    }
}

struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_column() {
        let error = Error::missing_columns(
            "atom_site",
            vec!["label_asym_id".to_string(), "Cartn_x".to_string()],
        );
        let rendered = error.to_string();
        assert!(rendered.contains("atom_site"));
        assert!(rendered.contains("label_asym_id, Cartn_x"));
        assert!(rendered.contains("stream source"));
    }

    #[test]
    fn with_path_annotates_stream_errors() {
        let error = Error::inconsistent_data("bad rule").with_path(Path::new("/tmp/1abc.cif"));
        assert!(error.to_string().contains("1abc.cif"));
    }

    #[test]
    fn with_path_keeps_existing_path() {
        let error = Error::from_io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            Some(PathBuf::from("first.cif")),
        )
        .with_path(Path::new("second.cif"));
        assert!(error.to_string().contains("first.cif"));
    }
}
