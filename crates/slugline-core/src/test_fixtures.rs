use crate::{
    config::SlugConfig,
    error::SlugError,
    fields::SlugFields,
    lifecycle::{self, SaveEvent},
    traits::{FieldScope, ResolveRequest, SlugDocument, SlugStore, UniquenessResolver},
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Person
///
/// Fixture document with host-style change tracking: a dirty-field set
/// cleared on persist, a newness flag, and embedded slug fields.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Person {
    id: u64,
    model_type: &'static str,
    first_name: String,
    last_name: String,
    site_id: u64,
    new_record: bool,
    dirty: BTreeSet<String>,
    slug_fields: SlugFields,
}

impl Person {
    pub(crate) fn new(id: u64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            model_type: "person",
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            site_id: 0,
            new_record: true,
            dirty: BTreeSet::new(),
            slug_fields: SlugFields::default(),
        }
    }

    pub(crate) fn with_site(mut self, site_id: u64) -> Self {
        self.site_id = site_id;
        self
    }

    pub(crate) fn with_model_type(mut self, model_type: &'static str) -> Self {
        self.model_type = model_type;
        self
    }

    /// Set a field through the host's tracked-write path.
    pub(crate) fn set_field(&mut self, field: &str, value: &str) {
        match field {
            "first_name" => self.first_name = value.to_string(),
            "last_name" => self.last_name = value.to_string(),
            other => panic!("fixture has no field named {other}"),
        }
        self.dirty.insert(field.to_string());
    }

    /// User-supplied slug write, as the host's slug setter would record it.
    pub(crate) fn preset_slug(&mut self, slug: &str) {
        self.slug_fields.assign(slug, false);
        self.dirty.insert("slug".to_string());
    }

    /// Mark the document persisted: clears newness and dirty tracking.
    pub(crate) fn mark_persisted(&mut self) {
        self.new_record = false;
        self.dirty.clear();
    }
}

impl SlugDocument for Person {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }

    fn model_type(&self) -> &'static str {
        self.model_type
    }

    fn is_new(&self) -> bool {
        self.new_record
    }

    fn is_field_changed(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            _ => None,
        }
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "first_name" => Some(Value::Text(self.first_name.clone())),
            "last_name" => Some(Value::Text(self.last_name.clone())),
            "site_id" => Some(Value::Uint(self.site_id)),
            _ => None,
        }
    }

    fn slug_fields(&self) -> &SlugFields {
        &self.slug_fields
    }

    fn slug_fields_mut(&mut self) -> &mut SlugFields {
        &mut self.slug_fields
    }
}

///
/// MemoryStore
///
/// In-memory stand-in for the persistence collaborator. Rows are persisted
/// `Person` snapshots keyed by id; writes can be toggled to fail for
/// atomicity tests.
///

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    rows: BTreeMap<u64, Person>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Upsert a persisted snapshot.
    pub(crate) fn insert(&mut self, person: Person) {
        self.rows.insert(person.id, person);
    }

    /// Make every subsequent write fail.
    pub(crate) fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    fn row_mut(&mut self, key: u64) -> Result<&mut Person, SlugError> {
        self.rows
            .get_mut(&key)
            .ok_or_else(|| SlugError::persistence(format!("unknown document: {key}")))
    }
}

impl SlugStore<Person> for MemoryStore {
    fn write_slug(&mut self, key: u64, fields: &SlugFields) -> Result<(), SlugError> {
        if self.fail_writes {
            return Err(SlugError::persistence("write failed"));
        }

        *self.row_mut(key)?.slug_fields_mut() = fields.clone();
        Ok(())
    }

    fn unset_slug(&mut self, key: u64) -> Result<(), SlugError> {
        if self.fail_writes {
            return Err(SlugError::persistence("write failed"));
        }

        self.row_mut(key)?.slug_fields_mut().clear();
        Ok(())
    }

    fn load_slug(&self, key: u64) -> Result<SlugFields, SlugError> {
        self.rows
            .get(&key)
            .map(|row| row.slug_fields().clone())
            .ok_or_else(|| SlugError::persistence(format!("unknown document: {key}")))
    }

    fn find_any_slug_in(
        &self,
        tokens: &[String],
        model_type: Option<&str>,
        include_history: bool,
    ) -> Result<Vec<Person>, SlugError> {
        // One hit per (token, row) pair, like an index scan over an
        // any-of predicate; deduplication is the coordinator's job.
        let mut hits = Vec::new();
        for token in tokens {
            for row in self.rows.values() {
                if model_type.is_some_and(|name| name != row.model_type) {
                    continue;
                }
                if row.slug_fields().matches_token(token, include_history) {
                    hits.push(row.clone());
                }
            }
        }

        Ok(hits)
    }
}

///
/// SuffixResolver
///
/// Minimal uniqueness collaborator: slugifies the candidate, refuses
/// reserved words, and disambiguates collisions within a
/// (scope, type) namespace by appending `-1`, `-2`, ... Counts calls so
/// tests can assert trigger idempotence.
///

#[derive(Debug, Default)]
pub(crate) struct SuffixResolver {
    taken: BTreeSet<(String, String, String)>,
    calls: u64,
    fail: Option<String>,
}

impl SuffixResolver {
    /// A resolver whose every call fails, for propagation tests.
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub(crate) const fn calls(&self) -> u64 {
        self.calls
    }
}

impl UniquenessResolver for SuffixResolver {
    fn resolve_unique(&mut self, request: &ResolveRequest<'_>) -> Result<String, SlugError> {
        self.calls += 1;

        if let Some(message) = &self.fail {
            return Err(SlugError::resolution(message.clone()));
        }

        let base = slugify(request.candidate);
        if base.is_empty() {
            return Ok(String::new());
        }

        let base: String = base.chars().take(request.max_length).collect();
        let scope = request.scope.map(ToString::to_string).unwrap_or_default();
        let model_type = request.model_type.unwrap_or_default().to_string();

        let mut resolved = base.clone();
        let mut suffix = 0u64;
        while request.reserved_words.contains(&resolved)
            || self
                .taken
                .contains(&(scope.clone(), model_type.clone(), resolved.clone()))
        {
            suffix += 1;
            resolved = format!("{base}-{suffix}");
        }

        self.taken.insert((scope, model_type, resolved.clone()));
        Ok(resolved)
    }
}

/// ASCII-only stand-in for the external transliteration collaborator.
fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }

    out.trim_matches('-').to_string()
}

/// Run the host-side save path: pre-save hook, then persist the snapshot.
pub(crate) fn saved(
    config: &SlugConfig<Person>,
    store: &mut MemoryStore,
    resolver: &mut SuffixResolver,
    mut person: Person,
) -> Person {
    let event = if person.is_new() {
        SaveEvent::Create
    } else {
        SaveEvent::Update
    };

    lifecycle::on_save(config, &mut person, event, resolver, &FieldScope)
        .expect("fixture save should succeed");
    person.mark_persisted();
    store.insert(person.clone());

    person
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slugify_folds_case_and_separators() {
        assert_eq!(slugify("Jane Doe"), "jane-doe");
        assert_eq!(slugify("  --Jane__Doe--  "), "jane-doe");
        assert_eq!(slugify("!!!"), "");
    }
}
