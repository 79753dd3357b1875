use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value_objects::Iri;

const NO_DESCRIPTION: &str = "No description available.";

/// Ontology class record as published by the class store.
///
/// Relation lists keep their source order and never contain the same IRI
/// twice. They may reference IRIs that have no record in the store, including
/// the class itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwlClass {
    pub iri: Iri,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub preferred_label: Option<String>,
    #[serde(default)]
    pub alternative_labels: Vec<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, deserialize_with = "relations::deserialize")]
    pub sub_class_of: Vec<Iri>,
    #[serde(default, deserialize_with = "relations::deserialize")]
    pub parent_class_of: Vec<Iri>,
    #[serde(default, deserialize_with = "relations::deserialize")]
    pub see_also: Vec<Iri>,
    #[serde(default, deserialize_with = "relations::deserialize_optional")]
    pub is_defined_by: Option<Iri>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl OwlClass {
    /// Creates an empty [`OwlClass`] with the supplied identifier.
    #[must_use]
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            label: None,
            preferred_label: None,
            alternative_labels: Vec::new(),
            definition: None,
            description: None,
            examples: Vec::new(),
            sub_class_of: Vec::new(),
            parent_class_of: Vec::new(),
            see_also: Vec::new(),
            is_defined_by: None,
            deprecated: false,
            translations: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_preferred_label(mut self, label: impl Into<String>) -> Self {
        self.preferred_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_alternative_label(mut self, label: impl Into<String>) -> Self {
        self.alternative_labels.push(label.into());
        self
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    #[must_use]
    pub fn with_is_defined_by(mut self, iri: Iri) -> Self {
        self.is_defined_by = Some(iri);
        self
    }

    /// Declares `child` as a direct descendant of this class.
    pub fn add_child(&mut self, child: Iri) -> bool {
        push_unique(&mut self.parent_class_of, child)
    }

    /// Declares `parent` as a direct ancestor of this class.
    pub fn add_parent(&mut self, parent: Iri) -> bool {
        push_unique(&mut self.sub_class_of, parent)
    }

    pub fn add_see_also(&mut self, related: Iri) -> bool {
        push_unique(&mut self.see_also, related)
    }

    /// Label shown to users: preferred label, label, first alternative label,
    /// then the IRI itself.
    #[must_use]
    pub fn display_label(&self) -> &str {
        non_empty(self.preferred_label.as_deref())
            .or_else(|| non_empty(self.label.as_deref()))
            .or_else(|| {
                self.alternative_labels
                    .first()
                    .map(String::as_str)
                    .filter(|label| !label.is_empty())
            })
            .unwrap_or_else(|| self.iri.as_str())
    }

    /// Short description combining label and definition.
    #[must_use]
    pub fn summary(&self) -> String {
        match (
            non_empty(self.label.as_deref()),
            non_empty(self.definition.as_deref()),
        ) {
            (Some(label), Some(definition)) => format!("{label} - {definition}"),
            (Some(label), None) => label.to_string(),
            (None, Some(definition)) => definition.to_string(),
            (None, None) => NO_DESCRIPTION.to_string(),
        }
    }

    /// Every label usable for lexical matching, primary labels first.
    pub fn labels(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.preferred_label
            .iter()
            .chain(self.label.iter())
            .map(|label| (label.as_str(), true))
            .chain(
                self.alternative_labels
                    .iter()
                    .map(|label| (label.as_str(), false)),
            )
            .filter(|(label, _)| !label.is_empty())
    }

    /// Removes repeated relation entries keeping the first occurrence.
    pub(crate) fn normalize_relations(&mut self) {
        dedup_in_order(&mut self.sub_class_of);
        dedup_in_order(&mut self.parent_class_of);
        dedup_in_order(&mut self.see_also);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn push_unique(list: &mut Vec<Iri>, iri: Iri) -> bool {
    if list.contains(&iri) {
        return false;
    }
    list.push(iri);
    true
}

fn dedup_in_order(list: &mut Vec<Iri>) {
    let mut seen = std::collections::HashSet::with_capacity(list.len());
    list.retain(|iri| seen.insert(iri.clone()));
}

/// Lenient decoding for relation fields: entries that are not valid IRIs are
/// dropped instead of failing the whole snapshot.
mod relations {
    use serde::{Deserialize, Deserializer};
    use tracing::debug;

    use crate::ontology::value_objects::Iri;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Iri>, D::Error> {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.into_iter().filter_map(parse).collect())
    }

    pub fn deserialize_optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Iri>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.and_then(parse))
    }

    fn parse(value: String) -> Option<Iri> {
        match Iri::new(value) {
            Ok(iri) => Some(iri),
            Err(err) => {
                debug!(err.msg = %err, "ontology_relation_dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OwlClass;
    use crate::ontology::value_objects::Iri;

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn display_label_follows_priority() {
        let bare = OwlClass::new(iri("https://example.org/A"));
        assert_eq!(bare.display_label(), "https://example.org/A");

        let alt = bare.clone().with_alternative_label("Alt");
        assert_eq!(alt.display_label(), "Alt");

        let labelled = alt.clone().with_label("Label");
        assert_eq!(labelled.display_label(), "Label");

        let preferred = labelled.with_preferred_label("Preferred");
        assert_eq!(preferred.display_label(), "Preferred");
    }

    #[test]
    fn summary_combines_label_and_definition() {
        let class = OwlClass::new(iri("https://example.org/A"));
        assert_eq!(class.summary(), "No description available.");
        let class = class.with_definition("Something");
        assert_eq!(class.summary(), "Something");
        let class = class.with_label("Thing");
        assert_eq!(class.summary(), "Thing - Something");
    }

    #[test]
    fn relations_are_unique() {
        let mut class = OwlClass::new(iri("https://example.org/A"));
        assert!(class.add_child(iri("https://example.org/B")));
        assert!(!class.add_child(iri("https://example.org/B")));
        assert_eq!(class.parent_class_of.len(), 1);
    }

    #[test]
    fn decoding_drops_invalid_relations_and_keeps_order() {
        let class: OwlClass = serde_json::from_value(serde_json::json!({
            "iri": "https://example.org/A",
            "label": "A",
            "parent_class_of": ["https://example.org/C", "not valid", "https://example.org/B", "https://example.org/C"],
            "is_defined_by": "also not valid",
        }))
        .expect("decoded");
        let mut class = class;
        class.normalize_relations();
        assert_eq!(
            class.parent_class_of,
            vec![iri("https://example.org/C"), iri("https://example.org/B")]
        );
        assert!(class.is_defined_by.is_none());
        assert!(class.sub_class_of.is_empty());
    }
}
