use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(
        "unknown assembly '{requested}'; this structure defines: {known_desc}",
        known_desc = known.join(", ")
    )]
    UnknownAssembly {
        requested: String,
        known: Vec<String>,
    },

    #[error(
        "operator expression '{expr}' uses syntax beyond plain comma-separated lists and is not supported"
    )]
    UnsupportedExpression { expr: String },

    #[error("operator expression '{expr}' names operator '{id}', which is not defined")]
    UnresolvedOperator { id: String, expr: String },

    #[error("{operation} requires column '{column}', which the table does not have")]
    MissingColumn {
        column: String,
        operation: &'static str,
    },

    #[error("coordinate matrix has {found} rows but the table has {expected}")]
    RowCountMismatch { expected: usize, found: usize },
}

impl Error {
    pub fn unknown_assembly(requested: impl Into<String>, known: Vec<String>) -> Self {
        Self::UnknownAssembly {
            requested: requested.into(),
            known,
        }
    }

    pub fn unsupported_expression(expr: impl Into<String>) -> Self {
        Self::UnsupportedExpression { expr: expr.into() }
    }

    pub fn unresolved_operator(id: impl Into<String>, expr: impl Into<String>) -> Self {
        Self::UnresolvedOperator {
            id: id.into(),
            expr: expr.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>, operation: &'static str) -> Self {
        Self::MissingColumn {
            column: column.into(),
            operation,
        }
    }
}
