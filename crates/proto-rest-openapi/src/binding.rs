//! HTTP binding resolution from `google.api.http` annotations.
//!
//! One RPC method may yield several [`MethodBinding`]s: every entry of
//! `additional_bindings` in declared order, then the primary rule last. A
//! method without an annotation gets a synthesized
//! `POST /{package.Service}/{Method}` binding.

use std::collections::HashMap;
use std::fmt;

use crate::descriptor::{self, HttpRule, MethodDescriptorProto};
use crate::naming::camel_case_path;

/// HTTP verb of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpVerb {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
    /// `CONNECT`
    Connect,
    /// `TRACE`
    Trace,
    /// A custom verb with no `OpenAPI` path-item slot (kept verbatim).
    Other(String),
}

impl HttpVerb {
    /// Parse a verb, ignoring ASCII case.
    #[must_use]
    pub fn parse(verb: &str) -> Self {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "PUT" => Self::Put,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            "OPTIONS" => Self::Options,
            "HEAD" => Self::Head,
            "CONNECT" => Self::Connect,
            "TRACE" => Self::Trace,
            _ => Self::Other(verb.to_string()),
        }
    }

    /// Upper-case wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
            Self::Other(verb) => verb,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP exposure of an RPC method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBinding {
    /// Proto method name (e.g., `SayHello`).
    pub method_name: String,
    /// How many bindings were built for this method name before this one.
    pub ordinal: usize,
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Path template (e.g., `/v1/{name}/messages/{message_id}`).
    pub path: String,
    /// Variables bound by `path`, in order.
    pub path_vars: Vec<String>,
    /// Fully qualified request type (`.helloworld.HelloRequest`).
    pub request_type: String,
    /// Fully qualified response type.
    pub response_type: String,
    /// Request field mapped to the HTTP body: `*` for the whole message,
    /// otherwise a camel-cased field selector. `None` when unset.
    pub body: Option<String>,
    /// Response field mapped to the HTTP body, same encoding as `body`.
    pub response_body: Option<String>,
}

/// Per-method-name binding counters.
///
/// Owned by the caller so its lifetime is explicit: one instance per plugin
/// request keeps ordinals increasing across all files of that request.
#[derive(Debug, Default)]
pub struct MethodOrdinals {
    counts: HashMap<String, usize>,
}

impl MethodOrdinals {
    /// Fresh counters, all at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current ordinal for `method_name` and advance it.
    pub fn next(&mut self, method_name: &str) -> usize {
        let count = self.counts.entry(method_name.to_string()).or_insert(0);
        let ordinal = *count;
        *count += 1;
        ordinal
    }
}

/// Resolve every HTTP binding of `method`, additional bindings first.
pub fn resolve_bindings(
    service_full_name: &str,
    method: &MethodDescriptorProto,
    ordinals: &mut MethodOrdinals,
) -> Vec<MethodBinding> {
    let method_name = method.name.as_deref().unwrap_or("");

    let Some(rule) = descriptor::http_rule(method) else {
        let path = format!("/{service_full_name}/{method_name}");
        return vec![build_binding(method, HttpVerb::Post, path, ordinals)];
    };

    rule.additional_bindings
        .iter()
        .chain(std::iter::once(rule))
        .map(|r| build_rule_binding(method, r, ordinals))
        .collect()
}

fn build_rule_binding(
    method: &MethodDescriptorProto,
    rule: &HttpRule,
    ordinals: &mut MethodOrdinals,
) -> MethodBinding {
    // A rule without a pattern still consumes an ordinal; the assembler
    // skips its empty verb.
    let (verb, path) = rule.verb_and_path().unwrap_or(("", ""));
    let mut binding = build_binding(method, HttpVerb::parse(verb), path.to_string(), ordinals);
    binding.body = body_selector(&rule.body);
    binding.response_body = body_selector(&rule.response_body);
    binding
}

fn build_binding(
    method: &MethodDescriptorProto,
    verb: HttpVerb,
    path: String,
    ordinals: &mut MethodOrdinals,
) -> MethodBinding {
    let method_name = method.name.clone().unwrap_or_default();
    MethodBinding {
        ordinal: ordinals.next(&method_name),
        path_vars: extract_path_vars(&path),
        method_name,
        verb,
        path,
        request_type: method.input_type.clone().unwrap_or_default(),
        response_type: method.output_type.clone().unwrap_or_default(),
        body: None,
        response_body: None,
    }
}

fn body_selector(raw: &str) -> Option<String> {
    match raw {
        "" => None,
        "*" => Some("*".to_string()),
        selector => Some(camel_case_path(selector)),
    }
}

/// Ordered variable names bound by a path template.
///
/// Every `/`-separated segment shaped `{...}` contributes its inner text.
/// Nothing is validated or de-duplicated.
#[must_use]
pub fn extract_path_vars(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(str::to_string)
        .collect()
}
