use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One user progress snapshot, as exported by the game save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub uuid: String,
    pub starter_prompted: bool,
    pub starter_locked: bool,
    pub starter_selected: bool,
    #[serde(rename = "starterUUID", default)]
    pub starter_uuid: Option<String>,
    pub advancement_data: AdvancementData,
}

/// Capture progress. Keys of `aspects_collected` are namespace-qualified
/// species identifiers (e.g. `cobblemon:pikachu`); values are the aspect
/// tags recorded for that capture, in capture order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancementData {
    /// Informational only; reconciliation counts captures itself.
    pub total_capture_count: u32,
    pub aspects_collected: HashMap<String, Vec<String>>,
}

impl ProgressRecord {
    /// Capture map keyed by normalized species name, ready to join against
    /// catalog entries. Raw keys that normalize to the same name overwrite
    /// each other, matching the catalog's own collision policy.
    pub fn normalized_aspects(&self) -> HashMap<String, Vec<String>> {
        self.advancement_data
            .aspects_collected
            .iter()
            .map(|(raw, aspects)| (normalize_species_key(raw), aspects.clone()))
            .collect()
    }
}

/// Strip the namespace up to and including the first `:`, lowercase, and
/// trim. `"cobblemon:Pikachu "` and `"pikachu"` both normalize to
/// `"pikachu"`.
pub fn normalize_species_key(raw: &str) -> String {
    let stripped = raw.split_once(':').map_or(raw, |(_, rest)| rest);
    stripped.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_namespace_case_and_whitespace() {
        assert_eq!(normalize_species_key("cobblemon:Pikachu "), "pikachu");
        assert_eq!(normalize_species_key("modns:MR-MIME"), "mr-mime");
        assert_eq!(normalize_species_key("pikachu"), "pikachu");
        assert_eq!(normalize_species_key("  Eevee"), "eevee");
        assert_eq!(normalize_species_key("ns:"), "");
    }

    #[test]
    fn only_first_separator_is_stripped() {
        assert_eq!(normalize_species_key("a:b:c"), "b:c");
    }

    #[test]
    fn normalized_aspects_preserves_tag_order() {
        let record = ProgressRecord {
            uuid: "u-1".to_string(),
            starter_prompted: true,
            starter_locked: false,
            starter_selected: true,
            starter_uuid: None,
            advancement_data: AdvancementData {
                total_capture_count: 1,
                aspects_collected: HashMap::from([(
                    "cobblemon:Pikachu".to_string(),
                    vec!["shiny".to_string(), "male".to_string()],
                )]),
            },
        };
        let normalized = record.normalized_aspects();
        assert_eq!(
            normalized.get("pikachu"),
            Some(&vec!["shiny".to_string(), "male".to_string()])
        );
    }
}
