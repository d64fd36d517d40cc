//! Deterministic names for revision indexes and constraints.
//!
//! Names embed an MD5 of the audit table name so they stay unique per
//! database even when index names share a global namespace (SQLite,
//! PostgreSQL).

use md5::{Digest, Md5};

/// Lower-case hex MD5 of `input`.
pub(crate) fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

/// `<revisionColumn>_<md5(tableName)>_idx`
pub fn revision_index_name(revision_field: &str, table_name: &str) -> String {
    format!("{revision_field}_{}_idx", md5_hex(table_name))
}

/// `<revisionColumn>_<md5(tableName)>_fk`
pub fn revision_foreign_key_name(revision_field: &str, table_name: &str) -> String {
    format!("{revision_field}_{}_fk", md5_hex(table_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_matches_reference_digest() {
        assert_eq!(md5_hex("user_audit"), "e06395edc291d0719bee26fd39a32e8a");
    }

    #[test]
    fn index_and_fk_names() {
        assert_eq!(
            revision_index_name("rev", "user_audit"),
            "rev_e06395edc291d0719bee26fd39a32e8a_idx"
        );
        assert_eq!(
            revision_foreign_key_name("rev", "user_audit"),
            "rev_e06395edc291d0719bee26fd39a32e8a_fk"
        );
    }

    #[test]
    fn names_differ_per_table() {
        assert_ne!(
            revision_index_name("rev", "posts_audit"),
            revision_index_name("rev", "user_audit")
        );
    }
}
