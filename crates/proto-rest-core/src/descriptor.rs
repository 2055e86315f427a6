//! Minimal protobuf descriptor types with `google.api.http` extension support.
//!
//! Standard `prost_types::MethodOptions` drops the `google.api.http` extension
//! (field 72295728) during decoding because prost doesn't retain unknown fields.
//! These custom types preserve it, together with the descriptor parts the
//! `OpenAPI` generator reads: labels, JSON names, map entries, nested enums
//! and `SourceCodeInfo` comments.

#[allow(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
mod types {
    use prost::Message;

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorSet {
        #[prost(message, repeated, tag = "1")]
        pub file: Vec<FileDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FileDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub package: Option<String>,
        #[prost(string, repeated, tag = "3")]
        pub dependency: Vec<String>,
        #[prost(message, repeated, tag = "4")]
        pub message_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "5")]
        pub enum_type: Vec<EnumDescriptorProto>,
        #[prost(message, repeated, tag = "6")]
        pub service: Vec<ServiceDescriptorProto>,
        /// Comments and spans, present when the file was compiled with source info.
        #[prost(message, optional, tag = "9")]
        pub source_code_info: Option<SourceCodeInfo>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct DescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub field: Vec<FieldDescriptorProto>,
        #[prost(message, repeated, tag = "3")]
        pub nested_type: Vec<DescriptorProto>,
        #[prost(message, repeated, tag = "4")]
        pub enum_type: Vec<EnumDescriptorProto>,
        #[prost(message, optional, tag = "7")]
        pub options: Option<MessageOptions>,
    }

    /// Message-level options. Only `map_entry` is read.
    #[derive(Clone, PartialEq, Message)]
    pub struct MessageOptions {
        /// Set by protoc on the synthesized `XxxEntry` type behind a `map<K, V>` field.
        #[prost(bool, optional, tag = "7")]
        pub map_entry: Option<bool>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct FieldDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(int32, optional, tag = "3")]
        pub number: Option<i32>,
        /// 1=optional, 2=required, 3=repeated.
        #[prost(int32, optional, tag = "4")]
        pub label: Option<i32>,
        /// Protobuf field type enum: 1=double, 5=int32, 9=string, 11=message, 14=enum, …
        #[prost(int32, optional, tag = "5")]
        pub r#type: Option<i32>,
        /// Fully-qualified type name for message/enum fields (e.g., `.helloworld.Locale`).
        #[prost(string, optional, tag = "6")]
        pub type_name: Option<String>,
        /// JSON name computed by protoc (e.g., `userId` for `user_id`).
        #[prost(string, optional, tag = "10")]
        pub json_name: Option<String>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct EnumDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub value: Vec<EnumValueDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct EnumValueDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(int32, optional, tag = "2")]
        pub number: Option<i32>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct ServiceDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(message, repeated, tag = "2")]
        pub method: Vec<MethodDescriptorProto>,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct MethodDescriptorProto {
        #[prost(string, optional, tag = "1")]
        pub name: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub input_type: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub output_type: Option<String>,
        #[prost(message, optional, tag = "4")]
        pub options: Option<MethodOptions>,
        #[prost(bool, optional, tag = "5")]
        pub client_streaming: Option<bool>,
        #[prost(bool, optional, tag = "6")]
        pub server_streaming: Option<bool>,
    }

    /// Method options with the `google.api.http` extension (field 72295728).
    #[derive(Clone, PartialEq, Message)]
    pub struct MethodOptions {
        #[prost(message, optional, tag = "72295728")]
        pub http: Option<HttpRule>,
    }

    /// `google.api.HttpRule`: the REST mapping of one RPC.
    #[derive(Clone, PartialEq, Message)]
    pub struct HttpRule {
        #[prost(oneof = "HttpPattern", tags = "2, 3, 4, 5, 6, 8")]
        pub pattern: Option<HttpPattern>,
        #[prost(string, tag = "7")]
        pub body: String,
        #[prost(message, repeated, tag = "11")]
        pub additional_bindings: Vec<HttpRule>,
        #[prost(string, tag = "12")]
        pub response_body: String,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum HttpPattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(CustomHttpPattern),
    }

    /// `google.api.CustomHttpPattern`: a verb outside the five built-in ones.
    #[derive(Clone, PartialEq, Message)]
    pub struct CustomHttpPattern {
        #[prost(string, tag = "1")]
        pub kind: String,
        #[prost(string, tag = "2")]
        pub path: String,
    }

    #[derive(Clone, PartialEq, Message)]
    pub struct SourceCodeInfo {
        #[prost(message, repeated, tag = "1")]
        pub location: Vec<Location>,
    }

    /// One commented/spanned element, addressed by its descriptor `path`.
    #[derive(Clone, PartialEq, Message)]
    pub struct Location {
        #[prost(int32, repeated, tag = "1")]
        pub path: Vec<i32>,
        #[prost(string, optional, tag = "3")]
        pub leading_comments: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub trailing_comments: Option<String>,
    }
}

pub use types::*;

/// Proto field type constants (from `google.protobuf.FieldDescriptorProto.Type`).
pub mod field_type {
    /// `TYPE_DOUBLE = 1`
    pub const DOUBLE: i32 = 1;
    /// `TYPE_FLOAT = 2`
    pub const FLOAT: i32 = 2;
    /// `TYPE_INT64 = 3`
    pub const INT64: i32 = 3;
    /// `TYPE_UINT64 = 4`
    pub const UINT64: i32 = 4;
    /// `TYPE_INT32 = 5`
    pub const INT32: i32 = 5;
    /// `TYPE_FIXED64 = 6`
    pub const FIXED64: i32 = 6;
    /// `TYPE_FIXED32 = 7`
    pub const FIXED32: i32 = 7;
    /// `TYPE_BOOL = 8`
    pub const BOOL: i32 = 8;
    /// `TYPE_STRING = 9`
    pub const STRING: i32 = 9;
    /// `TYPE_GROUP = 10`
    pub const GROUP: i32 = 10;
    /// `TYPE_MESSAGE = 11`
    pub const MESSAGE: i32 = 11;
    /// `TYPE_BYTES = 12`
    pub const BYTES: i32 = 12;
    /// `TYPE_UINT32 = 13`
    pub const UINT32: i32 = 13;
    /// `TYPE_ENUM = 14`
    pub const ENUM: i32 = 14;
    /// `TYPE_SFIXED32 = 15`
    pub const SFIXED32: i32 = 15;
    /// `TYPE_SFIXED64 = 16`
    pub const SFIXED64: i32 = 16;
    /// `TYPE_SINT32 = 17`
    pub const SINT32: i32 = 17;
    /// `TYPE_SINT64 = 18`
    pub const SINT64: i32 = 18;
}

/// `LABEL_REPEATED = 3` from `google.protobuf.FieldDescriptorProto.Label`.
pub const LABEL_REPEATED: i32 = 3;

/// Field numbers used to address descriptor elements in [`Location::path`].
pub mod source_path {
    /// `FileDescriptorProto.message_type`
    pub const FILE_MESSAGE: i32 = 4;
    /// `FileDescriptorProto.enum_type`
    pub const FILE_ENUM: i32 = 5;
    /// `FileDescriptorProto.service`
    pub const FILE_SERVICE: i32 = 6;
    /// `DescriptorProto.field`
    pub const MESSAGE_FIELD: i32 = 2;
    /// `DescriptorProto.nested_type`
    pub const MESSAGE_NESTED: i32 = 3;
    /// `DescriptorProto.enum_type`
    pub const MESSAGE_ENUM: i32 = 4;
    /// `ServiceDescriptorProto.method`
    pub const SERVICE_METHOD: i32 = 2;
}

/// Closed classification of a proto field's scalar type.
///
/// Unknown type ids map to [`FieldKind::Unknown`] rather than failing, so a
/// newer descriptor never breaks generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `double`
    Double,
    /// `float`
    Float,
    /// `int64`
    Int64,
    /// `uint64`
    Uint64,
    /// `int32`
    Int32,
    /// `fixed64`
    Fixed64,
    /// `fixed32`
    Fixed32,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// proto2 `group`
    Group,
    /// A message-typed field.
    Message,
    /// `bytes`
    Bytes,
    /// `uint32`
    Uint32,
    /// An enum-typed field.
    Enum,
    /// `sfixed32`
    Sfixed32,
    /// `sfixed64`
    Sfixed64,
    /// `sint32`
    Sint32,
    /// `sint64`
    Sint64,
    /// Missing or unrecognized type id.
    Unknown,
}

impl FieldKind {
    /// Classify a raw `FieldDescriptorProto.type` value.
    #[must_use]
    pub fn from_type_id(id: i32) -> Self {
        match id {
            field_type::DOUBLE => Self::Double,
            field_type::FLOAT => Self::Float,
            field_type::INT64 => Self::Int64,
            field_type::UINT64 => Self::Uint64,
            field_type::INT32 => Self::Int32,
            field_type::FIXED64 => Self::Fixed64,
            field_type::FIXED32 => Self::Fixed32,
            field_type::BOOL => Self::Bool,
            field_type::STRING => Self::String,
            field_type::GROUP => Self::Group,
            field_type::MESSAGE => Self::Message,
            field_type::BYTES => Self::Bytes,
            field_type::UINT32 => Self::Uint32,
            field_type::ENUM => Self::Enum,
            field_type::SFIXED32 => Self::Sfixed32,
            field_type::SFIXED64 => Self::Sfixed64,
            field_type::SINT32 => Self::Sint32,
            field_type::SINT64 => Self::Sint64,
            _ => Self::Unknown,
        }
    }
}

impl FieldDescriptorProto {
    /// Scalar kind of this field.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.r#type.map_or(FieldKind::Unknown, FieldKind::from_type_id)
    }

    /// Whether the field is declared `repeated` (maps included).
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.label == Some(LABEL_REPEATED)
    }
}

impl DescriptorProto {
    /// Whether this is the synthesized entry type of a `map<K, V>` field.
    #[must_use]
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false)
    }
}

/// The `google.api.http` rule attached to a method, if any.
#[must_use]
pub fn http_rule(method: &MethodDescriptorProto) -> Option<&HttpRule> {
    method.options.as_ref().and_then(|o| o.http.as_ref())
}

impl HttpRule {
    /// Extract `(verb, path)` from whichever pattern is set.
    ///
    /// Built-in patterns yield upper-case verbs (`"GET"`, `"POST"`, …); a
    /// custom pattern yields its `kind` verbatim.
    #[must_use]
    pub fn verb_and_path(&self) -> Option<(&str, &str)> {
        Some(match self.pattern.as_ref()? {
            HttpPattern::Get(p) => ("GET", p.as_str()),
            HttpPattern::Put(p) => ("PUT", p.as_str()),
            HttpPattern::Post(p) => ("POST", p.as_str()),
            HttpPattern::Delete(p) => ("DELETE", p.as_str()),
            HttpPattern::Patch(p) => ("PATCH", p.as_str()),
            HttpPattern::Custom(c) => (c.kind.as_str(), c.path.as_str()),
        })
    }
}
