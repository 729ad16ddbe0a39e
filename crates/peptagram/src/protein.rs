use std::ops::Index;

use fnv::FnvHashMap;
use serde::Serialize;

use crate::diagnostics::{Diagnostics, Warning};
use crate::mass::round4;
use crate::modification::Modification;
use crate::row::Row;
use crate::Error;

/// Handle into the protein arena. The seqid index stores handles rather
/// than copies, so a protein reachable through several identifiers is
/// one underlying record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProteinIx(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinAttr {
    pub coverage: f64,
    pub score: f64,
    pub group_index: usize,
    pub seqid: String,
    pub other_seqids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Protein {
    pub description: String,
    pub sequence: String,
    pub other_sequences: Vec<String>,
    pub attr: ProteinAttr,
    pub peptides: Vec<Peptide>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeptideAttr {
    pub scan_id: String,
    /// Absent in some upstream outputs; serialized as an empty string
    /// rather than omitted, like `scan_id`.
    #[serde(serialize_with = "empty_when_absent")]
    pub retention_time: Option<f64>,
    pub score: f64,
    pub mass: f64,
    pub mass_diff: f64,
    #[serde(rename = "m/z")]
    pub mz: f64,
    pub source_file: String,
    pub q_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifications: Option<Vec<Modification>>,
}

fn empty_when_absent<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str(""),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peptide {
    pub sequence: String,
    pub offset: usize,
    pub intensity: f64,
    pub attr: PeptideAttr,
}

/// First whitespace token of a protein description, used as its
/// sequence identifier.
pub fn seqid_of(description: &str) -> &str {
    description.split_whitespace().next().unwrap_or_default()
}

/// Split a PSM or protein-group description column into its
/// per-protein descriptions.
pub fn split_descriptions(column: &str) -> impl Iterator<Item = &str> {
    column.split(" / ")
}

const COVERAGE_COLUMN: &str = "protein sequence coverage (%)";

/// The protein arena plus the identifier index over it.
///
/// Every protein is created exactly once, from its protein-group row;
/// both its canonical seqid and all alternates resolve to the same
/// arena slot.
#[derive(Debug, Default)]
pub struct ProteinSet {
    proteins: Vec<Protein>,
    seqid_index: FnvHashMap<String, ProteinIx>,
}

impl ProteinSet {
    /// Build the arena and identifier index from protein-group rows.
    ///
    /// Identifier collisions keep the newest mapping and warn; they do
    /// not stop processing.
    pub fn from_rows(rows: &[Row], diagnostics: &mut Diagnostics) -> Result<Self, Error> {
        let mut set = ProteinSet::default();
        for (group_index, row) in rows.iter().enumerate() {
            let descriptions: Vec<&str> =
                split_descriptions(row.require("protein description")?).collect();
            let seqids: Vec<&str> = descriptions.iter().copied().map(seqid_of).collect();
            let mut sequences = row.require("protein sequence")?.split('/');

            // Coverage is occasionally reported as a ';'-joined list;
            // only the first value applies to this group.
            let coverage_column = row.require(COVERAGE_COLUMN)?;
            let coverage = coverage_column
                .split(';')
                .next()
                .unwrap_or(coverage_column)
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidNumber {
                    column: COVERAGE_COLUMN.to_string(),
                    value: coverage_column.to_string(),
                })?;

            let protein = Protein {
                description: descriptions.first().copied().unwrap_or_default().to_string(),
                sequence: sequences.next().unwrap_or_default().to_string(),
                other_sequences: sequences.map(String::from).collect(),
                attr: ProteinAttr {
                    coverage: round4(coverage),
                    score: round4(row.f64("summed morpheus score")?),
                    group_index,
                    seqid: seqids.first().copied().unwrap_or_default().to_string(),
                    other_seqids: seqids.iter().skip(1).map(|s| s.to_string()).collect(),
                },
                peptides: Vec::new(),
            };

            let ix = ProteinIx(set.proteins.len() as u32);
            set.proteins.push(protein);
            for seqid in seqids {
                if seqid.is_empty() {
                    continue;
                }
                if set.seqid_index.insert(seqid.to_string(), ix).is_some() {
                    diagnostics.warn(Warning::DuplicateSeqid {
                        seqid: seqid.to_string(),
                    });
                }
            }
        }
        Ok(set)
    }

    pub fn lookup(&self, seqid: &str) -> Option<ProteinIx> {
        self.seqid_index.get(seqid).copied()
    }

    pub fn push_peptide(&mut self, ix: ProteinIx, peptide: Peptide) {
        self.proteins[ix.0 as usize].peptides.push(peptide);
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Protein> {
        self.proteins.iter()
    }

    /// Consume the arena into the final seqid -> protein mapping.
    /// Only canonical seqids appear as keys.
    pub fn into_map(self) -> FnvHashMap<String, Protein> {
        self.proteins
            .into_iter()
            .map(|p| (p.attr.seqid.clone(), p))
            .collect()
    }
}

impl Index<ProteinIx> for ProteinSet {
    type Output = Protein;

    fn index(&self, ix: ProteinIx) -> &Self::Output {
        &self.proteins[ix.0 as usize]
    }
}
