//! Line-oriented cleaning of ligand structure files.
//!
//! Ligand PDB files coming out of docking or drawing tools carry records the
//! parameter generator chokes on (model terminators, connectivity, remarks, titles)
//! and residue names that differ from the canonical `LIG` expected downstream. Both
//! problems are fixed with plain text processing; no record is parsed.

/// Residue name every ligand is renamed to.
pub const CANONICAL_LIGAND_ID: &str = "LIG";

/// Record-name prefixes dropped from ligand files. `END` also covers `ENDMDL`.
pub const FILTERED_RECORDS: [&str; 4] = ["END", "CONECT", "REMARK", "TITLE"];

/// Returns `true` if the line starts with one of [`FILTERED_RECORDS`].
pub fn is_filtered_record(line: &str) -> bool {
    FILTERED_RECORDS
        .iter()
        .any(|marker| line.starts_with(marker))
}

/// Rewrites every occurrence of `ligand_id` in `line` to [`CANONICAL_LIGAND_ID`].
///
/// An empty identifier leaves the line untouched.
pub fn canonicalize_ligand_id(line: &str, ligand_id: &str) -> String {
    if ligand_id.is_empty() {
        return line.to_string();
    }
    line.replace(ligand_id, CANONICAL_LIGAND_ID)
}

/// Drops filtered records and canonicalizes the ligand identifier, line by line.
///
/// # Arguments
///
/// * `lines` - The input lines, with or without their terminators.
/// * `ligand_id` - The identifier to rewrite to `LIG`.
///
/// # Return
///
/// A lazy iterator over the surviving, rewritten lines in their original order.
pub fn clean_ligand_lines<'a, I>(lines: I, ligand_id: &'a str) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: 'a,
{
    lines
        .into_iter()
        .filter(|line| !is_filtered_record(line))
        .map(move |line| canonicalize_ligand_id(line, ligand_id))
}

/// Cleans a whole ligand file, preserving line terminators byte for byte.
pub fn clean_ligand_text(content: &str, ligand_id: &str) -> String {
    clean_ligand_lines(content.split_inclusive('\n'), ligand_id).collect()
}

/// Builds the protein-ligand complex by plain concatenation.
///
/// No terminator records are deduplicated; the protein file is expected to end where
/// the ligand should begin.
pub fn merge_complex(protein: &[u8], ligand: &[u8]) -> Vec<u8> {
    let mut merged = Vec::with_capacity(protein.len() + ligand.len());
    merged.extend_from_slice(protein);
    merged.extend_from_slice(ligand);
    merged
}
