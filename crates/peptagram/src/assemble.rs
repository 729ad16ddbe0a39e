use fnv::FnvHashMap;
use log::info;

use crate::diagnostics::Diagnostics;
use crate::matcher::{match_peptide, MatchResult};
use crate::modification::build_modification_table;
use crate::protein::{Protein, ProteinSet};
use crate::row::Row;
use crate::Error;

/// Result of one assembly run: the populated protein arena plus the
/// bookkeeping needed for the coverage summary.
#[derive(Debug)]
pub struct Assembly {
    pub proteins: ProteinSet,
    pub diagnostics: Diagnostics,
    pub matched: usize,
    pub unmatched: Vec<Row>,
}

impl Assembly {
    /// The final seqid -> protein mapping, keyed by canonical seqids only.
    pub fn into_map(self) -> FnvHashMap<String, Protein> {
        self.proteins.into_map()
    }
}

/// Assemble the protein-peptide hierarchy from the three input tables.
///
/// The modification table and the protein index are both materialized
/// before any PSM row is matched. PSM rows that resolve no protein, or
/// whose sequence is absent from the resolved protein, are dropped and
/// counted; malformed numerics abort the run.
pub fn build(
    protein_group_rows: &[Row],
    peptide_rows: &[Row],
    modification_rows: Option<&[Row]>,
) -> Result<Assembly, Error> {
    let table = match modification_rows {
        Some(rows) => build_modification_table(rows)?,
        None => Default::default(),
    };
    let mut diagnostics = Diagnostics::default();
    let mut proteins = ProteinSet::from_rows(protein_group_rows, &mut diagnostics)?;
    info!(
        "indexed {} protein groups from {} rows",
        proteins.len(),
        protein_group_rows.len()
    );

    let mut matched = 0;
    let mut unmatched = Vec::new();
    for row in peptide_rows {
        match match_peptide(row, &mut proteins, &table, &mut diagnostics)? {
            MatchResult::Matched(_) => matched += 1,
            MatchResult::NoProtein | MatchResult::NotInSequence => unmatched.push(row.clone()),
        }
    }
    info!(
        "assigned {}/{} PSMs to protein groups",
        matched,
        matched + unmatched.len()
    );
    if diagnostics.matched_via_alternate > 0 {
        info!(
            "{} PSMs resolved through an alternate seqid",
            diagnostics.matched_via_alternate
        );
    }

    Ok(Assembly {
        proteins,
        diagnostics,
        matched,
        unmatched,
    })
}
