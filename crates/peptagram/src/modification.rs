use fnv::FnvHashMap;
use serde::Serialize;

use crate::diagnostics::{Diagnostics, Warning};
use crate::mass;
use crate::row::Row;
use crate::Error;

/// Maps a modification description to its final monoisotopic mass.
pub type ModificationTable = FnvHashMap<String, f64>;

/// A decoded modification, attached to the residue at `position` within
/// the clean peptide sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modification {
    pub position: usize,
    pub mass: f64,
}

const RESIDUE_COLUMNS: &[&str] = &["residue", "amino acid residue"];

/// Build the modification mass table from the modifications TSV rows.
///
/// When a row names an associated residue, the residue's intrinsic
/// monoisotopic mass is folded into the declared shift, so later lookups
/// need only the description. Later rows silently overwrite earlier ones
/// with the same description.
pub fn build_modification_table(rows: &[Row]) -> Result<ModificationTable, Error> {
    let mut table = ModificationTable::default();
    for row in rows {
        let description = row.require("description")?.to_string();
        let mut shift = row.f64("monoisotopic mass shift (da)")?;
        if let Some(residue) = row.get_first(RESIDUE_COLUMNS) {
            let residue = residue.trim();
            if !residue.is_empty() && residue != "n/a" {
                shift += residue
                    .bytes()
                    .next()
                    .filter(|_| residue.len() == 1)
                    .and_then(mass::monoisotopic)
                    .ok_or_else(|| Error::UnknownResidue(residue.to_string()))?;
            }
        }
        table.insert(description, shift);
    }
    Ok(table)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Normal,
    InModification,
}

/// Two-state scanner over the body of an annotated peptide sequence.
///
/// In `Normal` state characters are residues; `[` opens a modification
/// token which accumulates until `]`. Nested brackets are not supported.
/// The scanner itself knows nothing about mass tables: it yields the raw
/// description tokens with the position of the residue they attach to.
#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    sequence: String,
    token: String,
    tokens: Vec<(usize, String)>,
}

impl Scanner {
    fn step(&mut self, c: char) {
        self.state = match (self.state, c) {
            (ScanState::Normal, '[') => {
                self.token.clear();
                ScanState::InModification
            }
            (ScanState::Normal, c) => {
                self.sequence.push(c);
                ScanState::Normal
            }
            (ScanState::InModification, ']') => {
                // The token attaches to the last residue emitted so far.
                let position = self.sequence.chars().count().saturating_sub(1);
                self.tokens.push((position, std::mem::take(&mut self.token)));
                ScanState::Normal
            }
            (ScanState::InModification, c) => {
                self.token.push(c);
                ScanState::InModification
            }
        };
    }

    fn finish(self) -> (String, Vec<(usize, String)>) {
        (self.sequence, self.tokens)
    }
}

/// Decode an annotated peptide of the form `K.AC[Phospho]DE.K` into the
/// clean residue sequence and its modifications, in encounter order.
///
/// Only the body between the first two `.` delimiters is scanned; the
/// flanking context residues are discarded. Tokens absent from the mass
/// table are dropped with a warning rather than aborting the peptide.
pub fn parse_peptide(
    annotated: &str,
    table: &ModificationTable,
    diagnostics: &mut Diagnostics,
) -> (String, Vec<Modification>) {
    let body = annotated.split('.').nth(1).unwrap_or(annotated);
    let mut scanner = Scanner::default();
    for c in body.chars() {
        scanner.step(c);
    }
    let (sequence, tokens) = scanner.finish();

    let mut modifications = Vec::new();
    for (position, token) in tokens {
        match table.get(&token) {
            Some(&mass) => modifications.push(Modification { position, mass }),
            None => diagnostics.warn(Warning::UnknownModification { token }),
        }
    }
    (sequence, modifications)
}
