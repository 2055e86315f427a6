//! In-memory `OpenAPI` 3.0 document model.
//!
//! Only the subset the generator emits is modeled. Maps are `BTreeMap` so
//! the serialized output is deterministic across runs.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::binding::HttpVerb;
use crate::config::OutputFormat;
use crate::error;

/// `OpenAPI` version written into every document.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Prefix of every component schema `$ref`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Structural shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// `type: boolean`
    Boolean,
    /// `type: integer, format: int32`
    Integer32,
    /// `type: integer, format: int64`
    Integer64,
    /// `type: number, format: double`
    Float64,
    /// `type: string`
    String,
    /// `enum: [...]` with the value names in declaration order.
    Enumeration(Vec<String>),
    /// `type: object` with named properties (empty for map fields).
    Object(BTreeMap<String, Schema>),
    /// `type: array`; the item schema is optional.
    Array(Option<Box<Schema>>),
    /// `$ref` to a component schema, used to cut self-referential cycles.
    Reference(String),
}

/// A schema node with an optional description.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// What the node describes.
    pub kind: SchemaKind,
    /// Human-readable description (field comment).
    pub description: Option<String>,
}

impl Schema {
    /// A schema of `kind` with no description.
    #[must_use]
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    /// `$ref` to the component schema registered under `name`.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self::new(SchemaKind::Reference(format!("{SCHEMA_REF_PREFIX}{name}")))
    }

    /// Attach a description; an empty string leaves it unset.
    #[must_use]
    pub fn with_description(mut self, description: String) -> Self {
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Object properties, if this is an object node.
    #[must_use]
    pub fn properties(&self) -> Option<&BTreeMap<String, Schema>> {
        match &self.kind {
            SchemaKind::Object(props) => Some(props),
            _ => None,
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.kind {
            SchemaKind::Boolean => map.serialize_entry("type", "boolean")?,
            SchemaKind::Integer32 => {
                map.serialize_entry("type", "integer")?;
                map.serialize_entry("format", "int32")?;
            }
            SchemaKind::Integer64 => {
                map.serialize_entry("type", "integer")?;
                map.serialize_entry("format", "int64")?;
            }
            SchemaKind::Float64 => {
                map.serialize_entry("type", "number")?;
                map.serialize_entry("format", "double")?;
            }
            SchemaKind::String => map.serialize_entry("type", "string")?,
            SchemaKind::Enumeration(values) => map.serialize_entry("enum", values)?,
            SchemaKind::Object(properties) => {
                map.serialize_entry("type", "object")?;
                if !properties.is_empty() {
                    map.serialize_entry("properties", properties)?;
                }
            }
            SchemaKind::Array(items) => {
                map.serialize_entry("type", "array")?;
                if let Some(items) = items {
                    map.serialize_entry("items", items)?;
                }
            }
            SchemaKind::Reference(target) => map.serialize_entry("$ref", target)?,
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        map.end()
    }
}

/// Root of a generated `OpenAPI` document.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDocument {
    /// `OpenAPI` version string.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// One tag per service.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Path template → path item.
    pub paths: BTreeMap<String, PathItem>,
    /// Reusable schemas.
    pub components: Components,
}

impl ApiDocument {
    /// Empty document carrying only metadata.
    #[must_use]
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            tags: Vec::new(),
            paths: BTreeMap::new(),
            components: Components::default(),
        }
    }

    /// Serialize the document in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer rejects the document.
    pub fn render(&self, format: OutputFormat) -> error::Result<String> {
        Ok(match format {
            OutputFormat::Yaml => serde_yaml_ng::to_string(self)?,
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    /// Title (the proto package).
    pub title: String,
    /// Description (the proto package).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// API version (last package segment).
    pub version: String,
}

/// A service-level grouping tag.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// Fully qualified service name.
    pub name: String,
    /// Service comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// `components` section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Components {
    /// Normalized message name → schema.
    pub schemas: BTreeMap<String, Schema>,
}

/// All operations sharing one path template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    /// Name of the RPC method that last contributed an operation.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    /// Comment of that RPC method.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// `GET` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// `PUT` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// `POST` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// `DELETE` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// `OPTIONS` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// `HEAD` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// `PATCH` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// `CONNECT` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<Operation>,
    /// `TRACE` operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// The operation slot for `verb`; `None` for verbs with no slot.
    pub fn slot_mut(&mut self, verb: &HttpVerb) -> Option<&mut Option<Operation>> {
        Some(match verb {
            HttpVerb::Get => &mut self.get,
            HttpVerb::Put => &mut self.put,
            HttpVerb::Post => &mut self.post,
            HttpVerb::Delete => &mut self.delete,
            HttpVerb::Options => &mut self.options,
            HttpVerb::Head => &mut self.head,
            HttpVerb::Patch => &mut self.patch,
            HttpVerb::Connect => &mut self.connect,
            HttpVerb::Trace => &mut self.trace,
            HttpVerb::Other(_) => return None,
        })
    }

    /// Read-only counterpart of [`slot_mut`](Self::slot_mut).
    #[must_use]
    pub fn operation(&self, verb: &HttpVerb) -> Option<&Operation> {
        match verb {
            HttpVerb::Get => self.get.as_ref(),
            HttpVerb::Put => self.put.as_ref(),
            HttpVerb::Post => self.post.as_ref(),
            HttpVerb::Delete => self.delete.as_ref(),
            HttpVerb::Options => self.options.as_ref(),
            HttpVerb::Head => self.head.as_ref(),
            HttpVerb::Patch => self.patch.as_ref(),
            HttpVerb::Connect => self.connect.as_ref(),
            HttpVerb::Trace => self.trace.as_ref(),
            HttpVerb::Other(_) => None,
        }
    }
}

/// One HTTP operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Owning service tags.
    pub tags: Vec<String>,
    /// Method comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    /// Method comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// `{Service}_{Method}`, suffixed with the binding ordinal when non-zero.
    pub operation_id: String,
    /// Query or path parameters.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body for body-carrying verbs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code → response.
    pub responses: BTreeMap<String, Response>,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// `?name=value`
    Query,
    /// `{name}` in the path template.
    Path,
}

/// An operation parameter.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    /// JSON name of the request field.
    pub name: String,
    /// Query or path.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Field comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Always `true` for path parameters.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Parameter schema.
    pub schema: Schema,
}

impl Parameter {
    /// A string-typed parameter; path parameters are marked required.
    #[must_use]
    pub fn string(name: String, location: ParameterLocation, description: String) -> Self {
        Self {
            name,
            location,
            description,
            required: location == ParameterLocation::Path,
            schema: Schema::new(SchemaKind::String),
        }
    }
}

/// A request body.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    /// Request message comment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Whether the body must be present.
    pub required: bool,
    /// Media type → schema.
    pub content: BTreeMap<String, MediaType>,
}

/// A response.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Response description.
    pub description: String,
    /// Media type → schema.
    pub content: BTreeMap<String, MediaType>,
}

/// A media type entry.
#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    /// Body schema.
    pub schema: Schema,
}

/// `application/json` content map for `schema`.
#[must_use]
pub fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(JSON_CONTENT_TYPE.to_string(), MediaType { schema })])
}
