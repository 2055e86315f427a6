//! Recursive translation of proto fields and messages into schema nodes.
//!
//! Priority order per field: map → empty object; repeated → array; then
//! scalar kind dispatch, recursing into message-typed fields. Kinds without
//! a dedicated mapping (string, bytes, group, unknown ids, type names the
//! index cannot resolve) fall back to `type: string`.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::GeneratorConfig;
use crate::descriptor::{FieldDescriptorProto, FieldKind};
use crate::document::{Schema, SchemaKind};
use crate::index::{MessageEntry, TypeIndex};
use crate::naming::normalize_qualified_name;

/// Builds schema nodes against a [`TypeIndex`].
///
/// Tracks the messages currently being expanded; a message reached again
/// while it is still open becomes a `$ref` to its component schema, so
/// self-referential types terminate.
#[derive(Debug)]
pub struct SchemaBuilder<'i, 'a> {
    index: &'i TypeIndex<'a>,
    array_items: bool,
    expanding: Vec<String>,
    cycle_refs: BTreeSet<String>,
}

impl<'i, 'a> SchemaBuilder<'i, 'a> {
    /// New builder honoring `config.array_items`.
    #[must_use]
    pub fn new(index: &'i TypeIndex<'a>, config: &GeneratorConfig) -> Self {
        Self {
            index,
            array_items: config.array_items,
            expanding: Vec::new(),
            cycle_refs: BTreeSet::new(),
        }
    }

    /// Object schema for a whole message: one property per field, keyed by
    /// the proto field name and described by the field's leading comment.
    pub fn build_message(&mut self, entry: &MessageEntry<'_>) -> Schema {
        self.expanding.push(entry.full_name.clone());

        let mut properties = BTreeMap::new();
        for (i, field) in entry.descriptor.field.iter().enumerate() {
            let name = field.name.clone().unwrap_or_default();
            let schema = self
                .build_field(field)
                .with_description(self.index.field_description(entry, i));
            properties.insert(name, schema);
        }

        self.expanding.pop();
        Schema::new(SchemaKind::Object(properties))
    }

    /// Schema for a single field.
    pub fn build_field(&mut self, field: &FieldDescriptorProto) -> Schema {
        if self.is_map(field) {
            return Schema::new(SchemaKind::Object(BTreeMap::new()));
        }
        if field.is_repeated() {
            let items = self
                .array_items
                .then(|| Box::new(self.build_element(field)));
            return Schema::new(SchemaKind::Array(items));
        }
        self.build_element(field)
    }

    /// Fully qualified names of messages emitted as cycle-breaking `$ref`s.
    ///
    /// Every name here needs a component schema for the reference to resolve.
    #[must_use]
    pub fn cycle_refs(&self) -> &BTreeSet<String> {
        &self.cycle_refs
    }

    fn is_map(&self, field: &FieldDescriptorProto) -> bool {
        field.is_repeated()
            && field.kind() == FieldKind::Message
            && field
                .type_name
                .as_deref()
                .and_then(|t| self.index.message(t))
                .is_some_and(|e| e.descriptor.is_map_entry())
    }

    /// Schema for one value of the field, ignoring `repeated`.
    fn build_element(&mut self, field: &FieldDescriptorProto) -> Schema {
        let kind = match field.kind() {
            FieldKind::Bool => SchemaKind::Boolean,
            FieldKind::Int32 | FieldKind::Sint32 | FieldKind::Uint32 => SchemaKind::Integer32,
            FieldKind::Int64 | FieldKind::Sint64 | FieldKind::Uint64 => SchemaKind::Integer64,
            FieldKind::Fixed32
            | FieldKind::Sfixed32
            | FieldKind::Float
            | FieldKind::Fixed64
            | FieldKind::Sfixed64
            | FieldKind::Double => SchemaKind::Float64,
            FieldKind::Message => return self.build_nested(field.type_name.as_deref()),
            FieldKind::Enum => self.build_enum(field.type_name.as_deref()),
            FieldKind::String | FieldKind::Bytes | FieldKind::Group | FieldKind::Unknown => {
                SchemaKind::String
            }
        };
        Schema::new(kind)
    }

    fn build_nested(&mut self, type_name: Option<&str>) -> Schema {
        let index = self.index;
        let Some(entry) = type_name.and_then(|t| index.message(t)) else {
            tracing::debug!(?type_name, "unresolved message type, using string schema");
            return Schema::new(SchemaKind::String);
        };

        if self.expanding.contains(&entry.full_name) {
            self.cycle_refs.insert(entry.full_name.clone());
            return Schema::reference(&normalize_qualified_name(&entry.full_name));
        }

        self.build_message(entry)
    }

    fn build_enum(&self, type_name: Option<&str>) -> SchemaKind {
        let Some(en) = type_name.and_then(|t| self.index.enumeration(t)) else {
            tracing::debug!(?type_name, "unresolved enum type, using string schema");
            return SchemaKind::String;
        };
        SchemaKind::Enumeration(
            en.value
                .iter()
                .map(|v| v.name.clone().unwrap_or_default())
                .collect(),
        )
    }
}
