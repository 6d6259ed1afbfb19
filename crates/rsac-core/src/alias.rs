//! District alias normalization.
//!
//! The census tables were digitized from field sheets and carry several
//! spellings of the Raebareli district. Filtering or grouping by any of the
//! known spellings must produce the same rows and the same chart bucket, so
//! the merge rule lives here as data and is consumed by every query-building
//! path.

/// Canonical display name for the merged district.
pub const RAEBARELI: &str = "Raebareli";

/// Known spellings of Raebareli as they appear in the tables.
pub const RAEBARELI_VARIANTS: &[&str] = &["Raebareli", "Rae Bareli", "Raibareli"];

/// Normalized comparison key: lowercased, spaces stripped.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Distinct normalized forms of the merged district's spellings.
///
/// "Raebareli" and "Rae Bareli" collapse to the same normalized key, so the
/// result is shorter than [`RAEBARELI_VARIANTS`].
pub fn merged_normalized_keys() -> Vec<String> {
    let mut keys: Vec<String> = RAEBARELI_VARIANTS.iter().map(|v| normalize(v)).collect();
    keys.sort();
    keys.dedup();
    keys
}

/// True when `name` is one of the spellings that merge into [`RAEBARELI`].
pub fn is_merged(name: &str) -> bool {
    let key = normalize(name);
    RAEBARELI_VARIANTS.iter().any(|v| normalize(v) == key)
}

/// Canonical display form of a district name: merged spellings collapse to
/// [`RAEBARELI`], everything else passes through unchanged.
pub fn canonical(name: &str) -> String {
    if is_merged(name) {
        RAEBARELI.to_string()
    } else {
        name.to_string()
    }
}

/// Canonicalize, sort and deduplicate a list of raw district values.
/// Used by the district dropdown endpoint on both store backends.
pub fn canonical_list<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = names
        .into_iter()
        .map(|n| canonical(n.as_ref()))
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_spaces_and_case() {
        assert_eq!(normalize("Rae Bareli"), "raebareli");
        assert_eq!(normalize("RAEBARELI"), "raebareli");
        assert_eq!(normalize("Raibareli"), "raibareli");
    }

    #[test]
    fn test_all_variants_merge() {
        for v in RAEBARELI_VARIANTS {
            assert!(is_merged(v), "{v} should merge");
            assert_eq!(canonical(v), RAEBARELI);
        }
        // case-insensitive on top of the listed spellings
        assert!(is_merged("rae bareli"));
        assert!(is_merged("RAIBARELI"));
    }

    #[test]
    fn test_canonical_is_idempotent() {
        for v in RAEBARELI_VARIANTS {
            assert_eq!(canonical(&canonical(v)), canonical(v));
        }
        assert_eq!(canonical("Lucknow"), "Lucknow");
    }

    #[test]
    fn test_other_districts_pass_through() {
        assert!(!is_merged("Lucknow"));
        assert!(!is_merged("Barabanki"));
        assert_eq!(canonical("Etawah"), "Etawah");
    }

    #[test]
    fn test_canonical_list_dedupes_merged_spellings() {
        let out = canonical_list(["Lucknow", "Rae Bareli", "Raibareli", "Raebareli", "Etawah"]);
        assert_eq!(out, vec!["Etawah", "Lucknow", "Raebareli"]);
    }

    #[test]
    fn test_merged_keys_are_deduplicated() {
        let keys = merged_normalized_keys();
        assert_eq!(keys, vec!["raebareli", "raibareli"]);
    }
}
