//! Open annotations attached to connector outputs.
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as Json;

/// Marker annotation: the resource kind has no entitlements/grants phase.
pub const SKIP_ENTITLEMENTS_AND_GRANTS: &str = "connector/skip-entitlements-and-grants";

/// Open map of annotations passed through the connector unexamined.
///
/// Orchestrators inspect only the fixed markers they know about; everything
/// else is carried as-is.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(flatten)]
    entries: BTreeMap<String, Json>,
}

impl Annotations {
    /// A map with no annotations set.
    pub fn new() -> Annotations {
        Annotations::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.entries.get(key)
    }

    /// Set or replace an annotation.
    pub fn update<K>(&mut self, key: K, value: Json)
    where
        K: Into<String>,
    {
        self.entries.insert(key.into(), value);
    }

    /// Mark the annotated object as having no entitlements/grants phase.
    pub fn skip_entitlements_and_grants(&mut self) {
        self.update(SKIP_ENTITLEMENTS_AND_GRANTS, Json::Bool(true));
    }

    /// Check for the "no entitlements/grants phase" marker.
    pub fn skips_entitlements_and_grants(&self) -> bool {
        matches!(
            self.get(SKIP_ENTITLEMENTS_AND_GRANTS),
            Some(Json::Bool(true)),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value as Json;

    use super::Annotations;

    #[test]
    fn skip_marker_round_trip() {
        let mut annotations = Annotations::new();
        assert!(!annotations.skips_entitlements_and_grants());
        annotations.skip_entitlements_and_grants();
        assert!(annotations.skips_entitlements_and_grants());
    }

    #[test]
    fn unknown_annotations_are_carried() {
        let mut annotations = Annotations::new();
        annotations.update("upstream/extra", Json::String("value".to_string()));
        let encoded = serde_json::to_string(&annotations).expect("annotations to encode");
        let decoded: Annotations = serde_json::from_str(&encoded).expect("annotations to decode");
        assert_eq!(decoded.get("upstream/extra"), Some(&Json::String("value".to_string())));
    }
}
