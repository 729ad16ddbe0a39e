use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use fnv::FnvHashMap;
use peptagram_core::protein::Protein;

/// Write the seqid -> protein mapping as a JSON document for the
/// visualization tooling.
pub fn write_json<P: AsRef<Path>>(
    proteins: &FnvHashMap<String, Protein>,
    path: P,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(writer, proteins)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {} proteins to {}", proteins.len(), path.display());
    Ok(())
}
