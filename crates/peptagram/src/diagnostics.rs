use std::fmt::Display;

/// A non-fatal condition encountered while assembling the protein map.
/// Each variant carries enough context to be asserted on directly,
/// rather than by parsing log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A bracketed modification token was not present in the
    /// modification table. The token is dropped.
    UnknownModification { token: String },
    /// Two protein groups claimed the same sequence identifier.
    /// The newest mapping wins.
    DuplicateSeqid { seqid: String },
    /// A PSM row listed no identifier known to the protein index.
    UnmatchedPeptide { description: String },
    /// A PSM matched a protein, but its clean sequence does not occur
    /// in that protein's canonical sequence.
    PeptideNotInProtein { sequence: String, seqid: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownModification { token } => {
                write!(f, "modification {} unknown", token)
            }
            Warning::DuplicateSeqid { seqid } => {
                write!(f, "different protein groups claim seqid {}", seqid)
            }
            Warning::UnmatchedPeptide { description } => {
                write!(f, "no protein group matches PSM for {}", description)
            }
            Warning::PeptideNotInProtein { sequence, seqid } => {
                write!(f, "{} not found in {}", sequence, seqid)
            }
        }
    }
}

/// Sink for warnings raised during assembly. Passed explicitly through
/// the pipeline so tests can assert on counts and kinds.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    /// PSMs that resolved through an alternate seqid rather than the
    /// canonical one. Informational only.
    pub matched_via_alternate: usize,
}

impl Diagnostics {
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn count_of(&self, matches: impl Fn(&Warning) -> bool) -> usize {
        self.warnings.iter().filter(|w| matches(w)).count()
    }
}
