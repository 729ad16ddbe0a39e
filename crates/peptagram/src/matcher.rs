use crate::diagnostics::{Diagnostics, Warning};
use crate::mass::round4;
use crate::modification::{parse_peptide, ModificationTable};
use crate::protein::{seqid_of, split_descriptions, Peptide, PeptideAttr, ProteinIx, ProteinSet};
use crate::row::Row;
use crate::Error;

/// Outcome of matching one PSM row against the protein index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The PSM was attached to this protein's peptide list.
    Matched(ProteinIx),
    /// No candidate identifier was present in the index.
    NoProtein,
    /// A protein matched, but the clean sequence does not occur in its
    /// canonical sequence. The row is dropped.
    NotInSequence,
}

const SCAN_ID_COLUMNS: &[&str] = &["scan number", "spectrum index"];
const RETENTION_TIME_COLUMNS: &[&str] = &["retention time (min)", "retention time (minutes)"];

/// Resolve one PSM row to its owning protein and append the peptide
/// evidence record to it.
///
/// Candidate identifiers are scanned in row order; the first one known
/// to the index wins. Rows that resolve no protein, or whose sequence
/// does not occur in the resolved protein, are reported but never abort
/// the run. Malformed numeric columns do abort.
pub fn match_peptide(
    row: &Row,
    proteins: &mut ProteinSet,
    table: &ModificationTable,
    diagnostics: &mut Diagnostics,
) -> Result<MatchResult, Error> {
    let description = row.require("protein description")?;
    let resolved = split_descriptions(description)
        .map(seqid_of)
        .find_map(|seqid| proteins.lookup(seqid).map(|ix| (seqid, ix)));

    let (matched_seqid, ix) = match resolved {
        Some(found) => found,
        None => {
            diagnostics.warn(Warning::UnmatchedPeptide {
                description: description.to_string(),
            });
            return Ok(MatchResult::NoProtein);
        }
    };
    if matched_seqid != proteins[ix].attr.seqid {
        diagnostics.matched_via_alternate += 1;
    }

    let (decoded, modifications) =
        parse_peptide(row.require("peptide sequence")?, table, diagnostics);
    // Morpheus supplies a pre-cleaned copy of the sequence; prefer it,
    // but the modifications always come from the annotated form.
    let sequence = row
        .get("base peptide sequence")
        .map(String::from)
        .unwrap_or(decoded);

    let offset = match proteins[ix].sequence.find(&sequence) {
        Some(offset) => offset,
        None => {
            diagnostics.warn(Warning::PeptideNotInProtein {
                sequence,
                seqid: proteins[ix].attr.seqid.clone(),
            });
            return Ok(MatchResult::NotInSequence);
        }
    };

    let q_value = row.f64("q-value (%)")?;
    let scan_id = row.get_first(SCAN_ID_COLUMNS).unwrap_or_default().to_string();
    let retention_time = row.f64_first(RETENTION_TIME_COLUMNS)?.map(round4);

    let modifications = if modifications.is_empty() {
        None
    } else {
        Some(
            modifications
                .into_iter()
                .map(|mut m| {
                    m.mass = round4(m.mass);
                    m
                })
                .collect(),
        )
    };

    let peptide = Peptide {
        sequence,
        offset,
        intensity: 1.0 - q_value / 100.0,
        attr: PeptideAttr {
            scan_id,
            retention_time,
            score: round4(row.f64("morpheus score")?),
            mass: round4(row.f64("precursor mass (da)")?),
            mass_diff: round4(row.f64("precursor mass error (da)")?),
            mz: round4(row.f64("precursor m/z")?),
            source_file: basename(row.require("filename")?).to_string(),
            q_value: round4(q_value),
            modifications,
        },
    };
    proteins.push_peptide(ix, peptide);
    Ok(MatchResult::Matched(ix))
}

/// Final path component of a filename column, tolerating either
/// path-separator convention.
fn basename(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn protein_set() -> (ProteinSet, Diagnostics) {
        let rows = vec![Row::from_iter([
            ("protein description", "P1 desc / P2 altdesc"),
            ("protein sequence", "ABCDEF/XYZ"),
            ("protein sequence coverage (%)", "50.0"),
            ("summed morpheus score", "10"),
        ])];
        let mut diagnostics = Diagnostics::default();
        let set = ProteinSet::from_rows(&rows, &mut diagnostics).unwrap();
        (set, diagnostics)
    }

    fn psm_row(description: &str, base_sequence: &str) -> Row {
        Row::from_iter([
            ("protein description", description),
            ("peptide sequence", &format!("K.{}.R", base_sequence)[..]),
            ("base peptide sequence", base_sequence),
            ("q-value (%)", "2.0"),
            ("morpheus score", "15.12345"),
            ("precursor mass (da)", "500.1"),
            ("precursor mass error (da)", "0.001"),
            ("precursor m/z", "251.05"),
            ("filename", "/data/run1/KO1.mzML"),
            ("scan number", "1234"),
            ("retention time (min)", "17.889944"),
        ])
    }

    #[test]
    fn matched_peptide_is_appended_with_offset() {
        let (mut set, mut diagnostics) = protein_set();
        let table = ModificationTable::default();
        let result = match_peptide(&psm_row("P1 desc", "CDE"), &mut set, &table, &mut diagnostics);
        let ix = set.lookup("P1").unwrap();
        assert_eq!(result, Ok(MatchResult::Matched(ix)));

        let peptide = &set[ix].peptides[0];
        assert_eq!(peptide.sequence, "CDE");
        assert_eq!(peptide.offset, 2);
        assert_eq!(peptide.intensity, 0.98);
        assert_eq!(peptide.attr.scan_id, "1234");
        assert_eq!(peptide.attr.retention_time, Some(17.8899));
        assert_eq!(peptide.attr.score, 15.1235);
        assert_eq!(peptide.attr.source_file, "KO1.mzML");
        assert_eq!(peptide.attr.modifications, None);
    }

    #[test]
    fn alternate_identifier_resolves_same_protein() {
        let (mut set, mut diagnostics) = protein_set();
        let table = ModificationTable::default();
        let result = match_peptide(
            &psm_row("P2 altdesc", "ABC"),
            &mut set,
            &table,
            &mut diagnostics,
        );
        let ix = set.lookup("P1").unwrap();
        assert_eq!(result, Ok(MatchResult::Matched(ix)));
        assert_eq!(set[ix].peptides.len(), 1);
        assert_eq!(diagnostics.matched_via_alternate, 1);
    }

    #[test]
    fn unknown_identifier_is_unmatched() {
        let (mut set, mut diagnostics) = protein_set();
        let table = ModificationTable::default();
        let result = match_peptide(
            &psm_row("Q9 unrelated", "CDE"),
            &mut set,
            &table,
            &mut diagnostics,
        );
        assert_eq!(result, Ok(MatchResult::NoProtein));
        assert_eq!(
            diagnostics.count_of(|w| matches!(w, Warning::UnmatchedPeptide { .. })),
            1
        );
    }

    #[test]
    fn sequence_not_in_protein_is_dropped() {
        let (mut set, mut diagnostics) = protein_set();
        let table = ModificationTable::default();
        let result = match_peptide(
            &psm_row("P1 desc", "ZZZ"),
            &mut set,
            &table,
            &mut diagnostics,
        );
        assert_eq!(result, Ok(MatchResult::NotInSequence));
        let ix = set.lookup("P1").unwrap();
        assert!(set[ix].peptides.is_empty());
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::PeptideNotInProtein {
                sequence: "ZZZ".into(),
                seqid: "P1".into()
            }]
        );
    }

    #[test]
    fn modifications_come_from_annotated_form() {
        let (mut set, mut diagnostics) = protein_set();
        let mut table = ModificationTable::default();
        table.insert("Phospho".to_string(), 79.96633);

        let mut row = psm_row("P1 desc", "CDE");
        row.insert("peptide sequence", "K.C[Phospho]DE.R");
        match_peptide(&row, &mut set, &table, &mut diagnostics).unwrap();

        let ix = set.lookup("P1").unwrap();
        let mods = set[ix].peptides[0].attr.modifications.as_ref().unwrap();
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].position, 0);
        assert_eq!(mods[0].mass, 79.9663);
    }
}
