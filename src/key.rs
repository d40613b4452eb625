//! Cache key derivation
//!
//! Builds the canonical string key addressing an entity's cached form.
//! Derivation is a pure function of (namespace, category name, ordered
//! identity values): identical inputs always yield the identical key, across
//! processes and time, as long as the [`KeyConfig`] matches.
//!
//! The wire format is byte-stable for cache compatibility across versions:
//!
//! ```text
//! <namespace>_<entryName>#[<field1>:<value1>]-[<field2>:<value2>]-...
//! ```

use crate::entry::{CacheEntry, EntryField};

const DEFAULT_TAG: &str = "cache";

/// Key derivation settings: namespace prefix and identity annotation name.
///
/// This is an explicit value, not process-wide state: coordinators capture one
/// at construction, and standalone key utilities accept one as a parameter, so
/// coordinators with different namespaces can coexist in one process.
#[derive(Debug, Clone)]
pub struct KeyConfig {
    namespace: String,
    tag: String,
}

impl KeyConfig {
    /// Settings with the given namespace prefix and the default `cache`
    /// annotation name.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            tag: DEFAULT_TAG.to_owned(),
        }
    }

    /// Replace the namespace prefix.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Replace the annotation name that marks identity fields.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Namespace prefix disambiguating keys across services sharing a cache.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Annotation name that marks identity fields.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::new("")
    }
}

/// One identity field's contribution to a cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyComponent {
    /// Component name: the annotation's value, or the literal fallback name.
    pub name: &'static str,
    /// String-formatted field value.
    pub value: String,
}

/// The entity exposes neither annotated identity fields nor an `id`/`key`
/// field, so no cache key can be derived.
#[derive(Debug, thiserror::Error)]
#[error("entry type `{entry}` has no `{tag}`-annotated field and no `id` or `key` field")]
pub struct NoIdentityField {
    /// Logical category name of the offending entity.
    pub entry: &'static str,
    /// The annotation name that was searched for.
    pub tag: String,
}

/// Derive the canonical cache key for one entity.
///
/// Identity fields are the fields carrying the configured annotation, in
/// declaration order. When no field is annotated, a field literally named
/// `id` (case-insensitive) is used alone, then one named `key`; when neither
/// exists derivation fails.
pub fn entry_cache_key<E: CacheEntry>(
    config: &KeyConfig,
    entry: &E,
) -> Result<String, NoIdentityField> {
    let components = identity_components::<E>(config, &entry.entry_fields())?;
    Ok(render_key(config.namespace(), E::entry_name(), &components))
}

/// Derive the keys for an ordered sequence of entities, preserving order.
///
/// Aborts with the error of the first entity that fails derivation; no
/// partial list is returned.
pub fn entry_cache_keys<E: CacheEntry>(
    config: &KeyConfig,
    entries: &[E],
) -> Result<Vec<String>, NoIdentityField> {
    entries
        .iter()
        .map(|entry| entry_cache_key(config, entry))
        .collect()
}

fn identity_components<E: CacheEntry>(
    config: &KeyConfig,
    fields: &[EntryField],
) -> Result<Vec<KeyComponent>, NoIdentityField> {
    let tagged: Vec<KeyComponent> = fields
        .iter()
        .filter_map(|field| {
            field.tag_value(config.tag()).map(|name| KeyComponent {
                name,
                value: field.value().to_string(),
            })
        })
        .collect();
    if !tagged.is_empty() {
        return Ok(tagged);
    }

    // No annotated field: fall back to a field named `id`, then `key`.
    for fallback in ["id", "key"] {
        if let Some(field) = fields
            .iter()
            .find(|field| field.name().eq_ignore_ascii_case(fallback))
        {
            return Ok(vec![KeyComponent {
                name: fallback,
                value: field.value().to_string(),
            }]);
        }
    }

    Err(NoIdentityField {
        entry: E::entry_name(),
        tag: config.tag().to_owned(),
    })
}

fn render_key(namespace: &str, entry_name: &str, components: &[KeyComponent]) -> String {
    let parts: Vec<String> = components
        .iter()
        .map(|component| format!("[{}:{}]", component.name, component.value))
        .collect();
    format!("{}_{}#{}", namespace, entry_name, parts.join("-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FieldValue;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    struct MockEntry {
        relate_id: i64,
        source_id: i64,
        property_id: i64,
    }

    impl CacheEntry for MockEntry {
        fn entry_name() -> &'static str {
            "MockEntry"
        }

        fn entry_fields(&self) -> Vec<EntryField> {
            vec![
                EntryField::tagged("relate_id", &[("cache", "relateId")], self.relate_id),
                EntryField::tagged("source_id", &[("cache", "sourceId")], self.source_id),
                EntryField::tagged("property_id", &[("cache", "propertyId")], self.property_id),
            ]
        }
    }

    // Carries both an annotated field and an `id` field; the annotation wins.
    #[derive(Debug, Serialize, Deserialize)]
    struct AnnotatedWithId {
        id: i64,
        code: String,
    }

    impl CacheEntry for AnnotatedWithId {
        fn entry_name() -> &'static str {
            "AnnotatedWithId"
        }

        fn entry_fields(&self) -> Vec<EntryField> {
            vec![
                EntryField::new("id", self.id),
                EntryField::tagged("code", &[("cache", "code")], self.code.clone()),
            ]
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct IdAndKey {
        key: String,
        id: i64,
    }

    impl CacheEntry for IdAndKey {
        fn entry_name() -> &'static str {
            "IdAndKey"
        }

        fn entry_fields(&self) -> Vec<EntryField> {
            vec![
                EntryField::new("key", self.key.clone()),
                EntryField::new("id", self.id),
            ]
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct KeyOnly {
        key: String,
    }

    impl CacheEntry for KeyOnly {
        fn entry_name() -> &'static str {
            "KeyOnly"
        }

        fn entry_fields(&self) -> Vec<EntryField> {
            vec![EntryField::new("key", self.key.clone())]
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Anonymous {
        weight: f64,
    }

    impl CacheEntry for Anonymous {
        fn entry_name() -> &'static str {
            "Anonymous"
        }

        fn entry_fields(&self) -> Vec<EntryField> {
            vec![EntryField::new("weight", self.weight)]
        }
    }

    fn mock_entry() -> MockEntry {
        MockEntry {
            relate_id: 1,
            source_id: 2,
            property_id: 3,
        }
    }

    #[test]
    fn derives_annotated_key() {
        let config = KeyConfig::new("test");
        let key = entry_cache_key(&config, &mock_entry()).unwrap();
        assert_eq!(key, "test_MockEntry#[relateId:1]-[sourceId:2]-[propertyId:3]");
    }

    #[test]
    fn derivation_is_deterministic() {
        let config = KeyConfig::new("test");
        let entry = mock_entry();
        assert_eq!(
            entry_cache_key(&config, &entry).unwrap(),
            entry_cache_key(&config, &entry).unwrap()
        );
    }

    #[test]
    fn annotated_fields_win_over_id_fallback() {
        let config = KeyConfig::default();
        let entry = AnnotatedWithId {
            id: 42,
            code: "abc".to_owned(),
        };
        let key = entry_cache_key(&config, &entry).unwrap();
        assert_eq!(key, "_AnnotatedWithId#[code:abc]");
    }

    #[test]
    fn fallback_prefers_id_over_key() {
        let config = KeyConfig::default();
        let entry = IdAndKey {
            key: "k".to_owned(),
            id: 7,
        };
        assert_eq!(entry_cache_key(&config, &entry).unwrap(), "_IdAndKey#[id:7]");
    }

    #[test]
    fn fallback_uses_key_when_id_is_absent() {
        let config = KeyConfig::default();
        let entry = KeyOnly {
            key: "k1".to_owned(),
        };
        assert_eq!(entry_cache_key(&config, &entry).unwrap(), "_KeyOnly#[key:k1]");
    }

    #[test]
    fn missing_identity_is_an_error() {
        let config = KeyConfig::default();
        let err = entry_cache_key(&config, &Anonymous { weight: 1.5 }).unwrap_err();
        assert_eq!(err.entry, "Anonymous");
        assert_eq!(err.tag, "cache");
    }

    #[test]
    fn custom_tag_ignores_default_annotations() {
        let config = KeyConfig::new("svc").with_tag("pk");
        let entry = mock_entry();
        // None of the fields carry a `pk` annotation and none is named
        // `id`/`key`, so derivation fails under the custom tag.
        assert!(entry_cache_key(&config, &entry).is_err());
    }

    #[test]
    fn batch_preserves_order() {
        let config = KeyConfig::new("test");
        let first = mock_entry();
        let second = MockEntry {
            relate_id: 4,
            source_id: 5,
            property_id: 6,
        };
        let keys = entry_cache_keys(&config, &[first.clone(), second]).unwrap();
        assert_eq!(
            keys,
            vec![
                "test_MockEntry#[relateId:1]-[sourceId:2]-[propertyId:3]".to_owned(),
                "test_MockEntry#[relateId:4]-[sourceId:5]-[propertyId:6]".to_owned(),
            ]
        );
        assert_eq!(keys[0], entry_cache_key(&config, &first).unwrap());
    }

    #[test]
    fn batch_fails_without_partial_result() {
        let config = KeyConfig::default();
        let entries = vec![
            Anonymous { weight: 1.0 },
            Anonymous { weight: 2.0 },
        ];
        assert!(entry_cache_keys(&config, &entries).is_err());
    }

    #[test]
    fn absent_value_renders_as_null() {
        assert_eq!(FieldValue::from(None::<i64>).to_string(), "null");
        assert_eq!(FieldValue::from(Some(5i64)).to_string(), "5");
    }
}
