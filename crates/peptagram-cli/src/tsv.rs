use std::path::Path;

use anyhow::Context;
use peptagram_core::row::Row;

/// Read a tab-separated table into column-name-addressed rows.
///
/// Header casing varies between Morpheus releases, so `Row` normalizes
/// the column names on insertion. Short records are tolerated; missing
/// trailing cells simply leave their columns absent from the row.
pub fn read_tsv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Row>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("failed to read record in {}", path.display()))?;
        rows.push(Row::from_iter(headers.iter().zip(record.iter())));
    }
    Ok(rows)
}
