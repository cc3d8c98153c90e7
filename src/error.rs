//! Crate-wide error type.

use thiserror::Error;

/// Result type for quarry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Every error is fail-fast; the kind tells the caller which layer rejected
/// the chain and therefore whether retrying, rolling back or fixing the
/// metadata is the sensible reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed column, alias, order or insert shape supplied by the caller.
    Parse,
    /// Metadata is inconsistent with the chain (unknown relation, undeclared column).
    Configuration,
    /// A destructive statement was executed without a WHERE clause or a force flag.
    Guard,
    /// The record a statement depends on does not exist.
    NotFound,
    /// Surfaced from the execution collaborator.
    Execution,
}

/// Errors raised while composing, executing or reassembling statements.
#[derive(Error, Debug)]
pub enum Error {
    /// Expression does not match `<name> [AS <alias>]`.
    #[error("bad alias expression `{0}`")]
    BadAlias(String),

    /// Expression is not a plain (optionally dotted) column reference.
    #[error("bad column expression `{0}`")]
    BadColumn(String),

    /// Expression does not match `<name> [ASC|DESC]`.
    #[error("bad order expression `{0}`")]
    BadOrder(String),

    /// Sub-query alias is not a single identifier.
    #[error("bad from alias `{0}`")]
    BadFromAlias(String),

    /// A multi-row insert row does not repeat the first row's columns.
    #[error("insert row {row} does not match the columns of the first row ({expected})")]
    MismatchedInsertRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Comma-joined column list of the first row.
        expected: String,
    },

    /// INSERT or UPDATE given a record with no columns.
    #[error("{0} needs at least one column value")]
    EmptyRecord(&'static str),

    /// Entity name not present in the catalog.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    /// Entity declared twice in the same catalog.
    #[error("entity `{0}` is declared more than once")]
    DuplicateEntity(String),

    /// Relation name not declared on the entity.
    #[error("You should add relation {relation} for model {entity}")]
    UnknownRelation {
        /// Table of the entity the join was requested on.
        entity: String,
        /// Requested relation name.
        relation: String,
    },

    /// A relation column was referenced before the relation was joined.
    #[error("relation `{0}` is referenced but was never joined")]
    RelationNotJoined(String),

    /// Bind against a column absent from the merged definition.
    #[error("column `{0}` is not declared on the entity or any joined relation")]
    UndeclaredColumn(String),

    /// DELETE without WHERE and without force.
    #[error("Trying to execute a delete statement without where.")]
    UnguardedDelete,

    /// UPDATE without WHERE and without force.
    #[error("Trying to execute an update statement without where.")]
    UnguardedUpdate,

    /// Record addressed by primary key does not exist.
    #[error("Record does not exists: the id {id} was not found in {table}")]
    RecordNotFound {
        /// Table that was searched.
        table: String,
        /// Primary-key value, rendered for display.
        id: String,
    },

    /// Fetched row width disagrees with the select index.
    #[error("row {row} has {found} values but {expected} columns were selected")]
    RowShape {
        /// Zero-based row ordinal.
        row: usize,
        /// Width of the select index.
        expected: usize,
        /// Width of the fetched row.
        found: usize,
    },

    /// Opaque failure from the execution collaborator.
    #[error("execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a driver error.
    pub fn execution<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Execution(err.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadAlias(_)
            | Self::BadColumn(_)
            | Self::BadOrder(_)
            | Self::BadFromAlias(_)
            | Self::MismatchedInsertRow { .. }
            | Self::EmptyRecord(_) => ErrorKind::Parse,
            Self::UnknownEntity(_)
            | Self::DuplicateEntity(_)
            | Self::UnknownRelation { .. }
            | Self::RelationNotJoined(_)
            | Self::UndeclaredColumn(_) => ErrorKind::Configuration,
            Self::UnguardedDelete | Self::UnguardedUpdate => ErrorKind::Guard,
            Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::RowShape { .. } | Self::Execution(_) => ErrorKind::Execution,
        }
    }
}
