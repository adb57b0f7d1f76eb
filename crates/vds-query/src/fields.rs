//! Field naming conventions.

/// Maps logical field names onto the backend's document layout.
///
/// Record values live under a namespace (`data.` by default) so users refer to `genus` while the
/// backend sees `data.genus`. The free-text and geo fields are backend-level fields and are
/// never prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Namespace prepended to every logical field name.
    pub prefix: String,
    /// Copy field holding every value, used for free-text search.
    pub all_text: String,
    /// Geo-point field.
    pub geo: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            prefix: "data".to_string(),
            all_text: "meta.all".to_string(),
            geo: "meta.geo".to_string(),
        }
    }
}

impl FieldNames {
    /// Returns `<prefix>.<field>`.
    pub fn prefixed(&self, field: &str) -> String {
        format!("{}.{field}", self.prefix)
    }

    /// Returns `<prefix>.<field>.<subfield>`, e.g. `data.year.number`.
    pub fn subfield(&self, field: &str, subfield: &str) -> String {
        format!("{}.{field}.{subfield}", self.prefix)
    }
}
