pub mod assemble;
pub mod diagnostics;
pub mod mass;
pub mod matcher;
pub mod modification;
pub mod protein;
pub mod row;

pub use assemble::{build, Assembly};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required column is absent from an input row.
    MissingColumn(String),
    /// A numeric column failed to parse. Corrupt rows abort the run;
    /// there is no partial-result recovery.
    InvalidNumber { column: String, value: String },
    /// A modification row named a residue with no known monoisotopic mass.
    UnknownResidue(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn(column) => write!(f, "missing column: {}", column),
            Self::InvalidNumber { column, value } => {
                write!(f, "column {} has non-numeric value {:?}", column, value)
            }
            Self::UnknownResidue(residue) => write!(f, "unknown residue: {}", residue),
        }
    }
}

impl std::error::Error for Error {}
