use serde::{Deserialize, Serialize};

/// One externally supplied, normalized resistance-mutation record.
///
/// The identifier follows the conventional `<ref><position><alt>` shape
/// (e.g. `L755S`). Records are immutable inputs; the pipeline never creates
/// or modifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Identifier such as `L755S`.
    pub id: String,
    /// Protein domain the mutation falls in (e.g. "Kinase domain").
    pub domain: String,
    /// Clinical significance tag (e.g. "Resistance").
    pub clinical_significance: String,
}

impl MutationRecord {
    /// Splits a `<ref><position><alt>` identifier into its components.
    ///
    /// Returns `None` when the identifier does not follow that shape; callers
    /// treat such identifiers as opaque, never as errors.
    pub fn components(&self) -> Option<(char, u32, char)> {
        let mut chars = self.id.chars();
        let reference = chars.next().filter(char::is_ascii_uppercase)?;
        let rest: String = chars.collect();
        let alt = rest.chars().last().filter(char::is_ascii_uppercase)?;
        let position = rest[..rest.len() - 1].parse().ok()?;
        Some((reference, position, alt))
    }
}
