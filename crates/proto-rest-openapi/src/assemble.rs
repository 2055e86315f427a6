//! Document assembly: services → tags, messages → components, methods → paths.

use std::collections::{BTreeMap, BTreeSet};

use crate::binding::{resolve_bindings, HttpVerb, MethodBinding, MethodOrdinals};
use crate::config::GeneratorConfig;
use crate::descriptor::{source_path, FileDescriptorProto};
use crate::document::{
    json_content, ApiDocument, Info, Operation, Parameter, ParameterLocation, RequestBody,
    Response, Schema, Tag,
};
use crate::index::{Comments, TypeIndex};
use crate::naming::{lower_camel_case, normalize_qualified_name};
use crate::schema::SchemaBuilder;

/// Build the `OpenAPI` document for one proto file.
///
/// Returns `None` for files without services. `index` must cover `file` and
/// everything it imports; `ordinals` is shared by every file of one request.
pub fn assemble_document(
    file: &FileDescriptorProto,
    index: &TypeIndex<'_>,
    ordinals: &mut MethodOrdinals,
    config: &GeneratorConfig,
) -> Option<ApiDocument> {
    if file.service.is_empty() {
        return None;
    }

    let package = file.package.as_deref().unwrap_or("");
    tracing::debug!(
        file = file.name.as_deref().unwrap_or(""),
        package,
        services = file.service.len(),
        "assembling document"
    );

    let mut assembler = Assembler {
        index,
        config,
        comments: Comments::new(file),
        builder: SchemaBuilder::new(index, config),
        doc: ApiDocument::new(Info {
            title: package.to_string(),
            description: package.to_string(),
            version: package.rsplit('.').next().unwrap_or("").to_string(),
        }),
        referenced: BTreeSet::new(),
    };

    assembler.add_tags(file, package);
    assembler.add_components(file, package);
    assembler.add_paths(file, package, ordinals);
    assembler.resolve_references();

    Some(assembler.doc)
}

struct Assembler<'i, 'a, 'f> {
    index: &'i TypeIndex<'a>,
    config: &'i GeneratorConfig,
    comments: Comments<'f>,
    builder: SchemaBuilder<'i, 'a>,
    doc: ApiDocument,
    /// Message types referenced by `$ref` from operations.
    referenced: BTreeSet<String>,
}

impl Assembler<'_, '_, '_> {
    fn add_tags(&mut self, file: &FileDescriptorProto, package: &str) {
        for (si, service) in file.service.iter().enumerate() {
            let name = service.name.as_deref().unwrap_or("");
            self.doc.tags.push(Tag {
                name: qualify(package, name),
                description: self
                    .comments
                    .description(&[source_path::FILE_SERVICE, to_i32(si)]),
            });
        }
    }

    fn add_components(&mut self, file: &FileDescriptorProto, package: &str) {
        let prefix = if package.is_empty() {
            String::new()
        } else {
            format!(".{package}")
        };

        for msg in &file.message_type {
            let name = msg.name.as_deref().unwrap_or("");
            let full_name = format!("{prefix}.{name}");
            self.ensure_component(&full_name);
        }
    }

    fn add_paths(
        &mut self,
        file: &FileDescriptorProto,
        package: &str,
        ordinals: &mut MethodOrdinals,
    ) {
        for (si, service) in file.service.iter().enumerate() {
            let service_name = service.name.as_deref().unwrap_or("");
            let service_full_name = qualify(package, service_name);

            for (mi, method) in service.method.iter().enumerate() {
                let comment = self.comments.description(&[
                    source_path::FILE_SERVICE,
                    to_i32(si),
                    source_path::SERVICE_METHOD,
                    to_i32(mi),
                ]);

                for binding in resolve_bindings(&service_full_name, method, ordinals) {
                    self.add_operation(service_name, &service_full_name, &comment, &binding);
                }
            }
        }
    }

    fn add_operation(
        &mut self,
        service_name: &str,
        service_full_name: &str,
        comment: &str,
        binding: &MethodBinding,
    ) {
        if let HttpVerb::Other(verb) = &binding.verb {
            tracing::warn!(
                method = %binding.method_name,
                verb = %verb,
                path = %binding.path,
                "skipping binding without a supported HTTP verb"
            );
            return;
        }
        tracing::debug!(
            method = %binding.method_name,
            verb = %binding.verb,
            path = %binding.path,
            ordinal = binding.ordinal,
            "adding operation"
        );

        let operation_id = if binding.ordinal == 0 {
            format!("{service_name}_{}", binding.method_name)
        } else {
            format!("{service_name}_{}_{}", binding.method_name, binding.ordinal)
        };

        let mut operation = Operation {
            tags: vec![service_full_name.to_string()],
            summary: comment.to_string(),
            description: comment.to_string(),
            operation_id,
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::from([(
                "200".to_string(),
                Response {
                    description: "ok".to_string(),
                    content: json_content(self.schema_ref(&binding.response_type)),
                },
            )]),
        };

        match binding.verb {
            HttpVerb::Get => {
                operation.parameters =
                    self.field_parameters(&binding.request_type, ParameterLocation::Query);
            }
            HttpVerb::Delete => {
                let params = self.field_parameters(&binding.request_type, ParameterLocation::Path);
                if self.config.attach_delete_params {
                    operation.parameters = params;
                }
            }
            _ => {
                let description = self
                    .index
                    .message(&binding.request_type)
                    .map(|entry| self.index.message_description(entry))
                    .unwrap_or_default();
                operation.request_body = Some(RequestBody {
                    description,
                    required: true,
                    content: json_content(self.schema_ref(&binding.request_type)),
                });
            }
        }

        let item = self.doc.paths.entry(binding.path.clone()).or_default();
        item.summary.clone_from(&binding.method_name);
        item.description = comment.to_string();
        if let Some(slot) = item.slot_mut(&binding.verb) {
            if slot.is_some() {
                tracing::warn!(
                    path = %binding.path,
                    verb = %binding.verb,
                    "replacing existing operation on the same path and verb"
                );
            }
            *slot = Some(operation);
        }
    }

    /// One string-typed parameter per field of the request message.
    fn field_parameters(&self, request_type: &str, location: ParameterLocation) -> Vec<Parameter> {
        let Some(entry) = self.index.message(request_type) else {
            return Vec::new();
        };

        entry
            .descriptor
            .field
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let name = field.json_name.clone().unwrap_or_else(|| {
                    lower_camel_case(field.name.as_deref().unwrap_or(""))
                });
                Parameter::string(name, location, self.index.field_description(entry, i))
            })
            .collect()
    }

    /// `$ref` to the component for `type_name`, remembered for resolution.
    fn schema_ref(&mut self, type_name: &str) -> Schema {
        self.referenced.insert(type_name.to_string());
        Schema::reference(&normalize_qualified_name(type_name))
    }

    /// Add components for referenced messages not defined at the top level
    /// of this file (imports, nested types, cycle targets).
    ///
    /// Repeats until every cycle target the builder recorded, including those
    /// found while building top-level components, has a component.
    fn resolve_references(&mut self) {
        let mut pending: Vec<String> = std::mem::take(&mut self.referenced).into_iter().collect();
        let mut attempted = BTreeSet::new();

        loop {
            while let Some(type_name) = pending.pop() {
                if attempted.insert(type_name.clone()) {
                    self.ensure_component(&type_name);
                }
            }

            pending = self
                .builder
                .cycle_refs()
                .iter()
                .filter(|name| !attempted.contains(*name))
                .cloned()
                .collect();
            if pending.is_empty() {
                break;
            }
        }
    }

    fn ensure_component(&mut self, full_name: &str) {
        let key = normalize_qualified_name(full_name);
        if self.doc.components.schemas.contains_key(&key) {
            return;
        }
        let index = self.index;
        let Some(entry) = index.message(full_name) else {
            tracing::debug!(type_name = full_name, "no descriptor for referenced message");
            return;
        };
        let schema = self.builder.build_message(entry);
        self.doc.components.schemas.insert(key, schema);
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn to_i32(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::descriptor::{
        field_type, DescriptorProto, FieldDescriptorProto, HttpPattern, HttpRule, Location,
        MethodDescriptorProto, MethodOptions, ServiceDescriptorProto, SourceCodeInfo,
    };
    use crate::document::SchemaKind;

    use super::*;

    fn field(name: &str, json: &str, ty: i32) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            json_name: Some(json.to_string()),
            r#type: Some(ty),
            ..FieldDescriptorProto::default()
        }
    }

    fn method(name: &str, pattern: Option<HttpPattern>) -> MethodDescriptorProto {
        MethodDescriptorProto {
            name: Some(name.to_string()),
            input_type: Some(".helloworld.HelloRequest".to_string()),
            output_type: Some(".helloworld.HelloReply".to_string()),
            options: pattern.map(|p| MethodOptions {
                http: Some(HttpRule {
                    pattern: Some(p),
                    body: "*".to_string(),
                    ..HttpRule::default()
                }),
            }),
            client_streaming: None,
            server_streaming: None,
        }
    }

    fn greeter(methods: Vec<MethodDescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("helloworld.proto".to_string()),
            package: Some("helloworld".to_string()),
            message_type: vec![
                DescriptorProto {
                    name: Some("HelloRequest".to_string()),
                    field: vec![
                        field("name", "name", field_type::STRING),
                        field("user_id", "userId", field_type::INT64),
                    ],
                    ..DescriptorProto::default()
                },
                DescriptorProto {
                    name: Some("HelloReply".to_string()),
                    field: vec![field("message", "message", field_type::STRING)],
                    ..DescriptorProto::default()
                },
            ],
            service: vec![ServiceDescriptorProto {
                name: Some("Greeter".to_string()),
                method: methods,
            }],
            source_code_info: Some(SourceCodeInfo {
                location: vec![
                    Location {
                        path: vec![6, 0],
                        leading_comments: Some(" The greeting service.\n".to_string()),
                        trailing_comments: None,
                    },
                    Location {
                        path: vec![6, 0, 2, 0],
                        leading_comments: Some(" Sends a greeting.\n".to_string()),
                        trailing_comments: None,
                    },
                    Location {
                        path: vec![4, 0, 2, 1],
                        leading_comments: Some(" Caller id.\n".to_string()),
                        trailing_comments: None,
                    },
                ],
            }),
            ..FileDescriptorProto::default()
        }
    }

    fn assemble(file: FileDescriptorProto, config: &GeneratorConfig) -> ApiDocument {
        let files = vec![file];
        let index = TypeIndex::new(&files);
        assemble_document(&files[0], &index, &mut MethodOrdinals::new(), config).unwrap()
    }

    #[test]
    fn file_without_services_yields_nothing() {
        let mut file = greeter(vec![]);
        file.service.clear();
        let files = vec![file];
        let index = TypeIndex::new(&files);
        let doc = assemble_document(
            &files[0],
            &index,
            &mut MethodOrdinals::new(),
            &GeneratorConfig::default(),
        );
        assert!(doc.is_none());
    }

    #[test]
    fn metadata_tags_and_components() {
        let doc = assemble(greeter(vec![method("SayHello", None)]), &GeneratorConfig::default());

        assert_eq!(doc.openapi, "3.0.0");
        assert_eq!(doc.info.title, "helloworld");
        assert_eq!(doc.info.version, "helloworld");
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tags[0].name, "helloworld.Greeter");
        assert_eq!(doc.tags[0].description, "The greeting service.");

        let keys: Vec<&str> = doc.components.schemas.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["HelloworldHelloReply", "HelloworldHelloRequest"]);

        let user_id = &doc.components.schemas["HelloworldHelloRequest"]
            .properties()
            .unwrap()["user_id"];
        assert_eq!(user_id.kind, SchemaKind::Integer64);
        assert_eq!(user_id.description.as_deref(), Some("Caller id."));
    }

    #[test]
    fn unannotated_method_posts_to_service_path() {
        let doc = assemble(greeter(vec![method("SayHello", None)]), &GeneratorConfig::default());

        let item = &doc.paths["/helloworld.Greeter/SayHello"];
        assert_eq!(item.summary, "SayHello");
        let op = item.post.as_ref().unwrap();
        assert_eq!(op.operation_id, "Greeter_SayHello");
        assert_eq!(op.tags, vec!["helloworld.Greeter"]);
        assert_eq!(op.summary, "Sends a greeting.");

        let body = op.request_body.as_ref().unwrap();
        assert!(body.required);
        assert_eq!(
            body.content["application/json"].schema,
            Schema::reference("HelloworldHelloRequest")
        );
        assert_eq!(
            op.responses["200"].content["application/json"].schema,
            Schema::reference("HelloworldHelloReply")
        );
    }

    #[test]
    fn get_uses_query_parameters() {
        let doc = assemble(
            greeter(vec![method("SayHello", Some(HttpPattern::Get("/v1/hello".into())))]),
            &GeneratorConfig::default(),
        );

        let op = doc.paths["/v1/hello"].get.as_ref().unwrap();
        assert!(op.request_body.is_none());
        let names: Vec<&str> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "userId"]);
        assert!(op
            .parameters
            .iter()
            .all(|p| p.location == ParameterLocation::Query
                && p.schema.kind == SchemaKind::String));
        assert_eq!(op.parameters[1].description, "Caller id.");
    }

    #[test]
    fn delete_parameters_detached_unless_enabled() {
        let file = || greeter(vec![method("Bye", Some(HttpPattern::Delete("/v1/{name}".into())))]);

        let doc = assemble(file(), &GeneratorConfig::default());
        let op = doc.paths["/v1/{name}"].delete.as_ref().unwrap();
        assert!(op.parameters.is_empty());
        assert!(op.request_body.is_none());

        let config = GeneratorConfig {
            attach_delete_params: true,
            ..GeneratorConfig::default()
        };
        let doc = assemble(file(), &config);
        let op = doc.paths["/v1/{name}"].delete.as_ref().unwrap();
        assert_eq!(op.parameters.len(), 2);
        assert!(op.parameters.iter().all(|p| p.required));
    }

    #[test]
    fn bindings_on_one_path_share_item() {
        let mut m = method("SayHello", Some(HttpPattern::Post("/v1/hello".into())));
        if let Some(rule) = m.options.as_mut().and_then(|o| o.http.as_mut()) {
            rule.additional_bindings.push(HttpRule {
                pattern: Some(HttpPattern::Get("/v1/hello".into())),
                ..HttpRule::default()
            });
        }
        let doc = assemble(greeter(vec![m]), &GeneratorConfig::default());

        let item = &doc.paths["/v1/hello"];
        assert_eq!(item.operation(&HttpVerb::Get).unwrap().operation_id, "Greeter_SayHello");
        assert_eq!(
            item.operation(&HttpVerb::Post).unwrap().operation_id,
            "Greeter_SayHello_1"
        );
        assert!(item.operation(&HttpVerb::Delete).is_none());
    }

    #[test]
    fn unsupported_custom_verb_is_skipped() {
        use crate::descriptor::CustomHttpPattern;

        let m = method(
            "Purge",
            Some(HttpPattern::Custom(CustomHttpPattern {
                kind: "PURGE".into(),
                path: "/v1/cache".into(),
            })),
        );
        let doc = assemble(greeter(vec![m]), &GeneratorConfig::default());
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn imported_response_type_gets_component() {
        let empty = FileDescriptorProto {
            name: Some("google/protobuf/empty.proto".to_string()),
            package: Some("google.protobuf".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Empty".to_string()),
                ..DescriptorProto::default()
            }],
            ..FileDescriptorProto::default()
        };
        let mut m = method("Ping", None);
        m.output_type = Some(".google.protobuf.Empty".to_string());

        let files = vec![empty, greeter(vec![m])];
        let index = TypeIndex::new(&files);
        let doc = assemble_document(
            &files[1],
            &index,
            &mut MethodOrdinals::new(),
            &GeneratorConfig::default(),
        )
        .unwrap();

        assert!(doc.components.schemas.contains_key("GoogleProtobufEmpty"));
    }

    fn collect_refs(schema: &Schema, refs: &mut Vec<String>) {
        match &schema.kind {
            SchemaKind::Reference(target) => refs.push(target.clone()),
            SchemaKind::Object(props) => props.values().for_each(|p| collect_refs(p, refs)),
            SchemaKind::Array(Some(items)) => collect_refs(items, refs),
            _ => {}
        }
    }

    #[test]
    fn cycle_targets_get_components_without_operations() {
        let nested = |field_name: &str| FieldDescriptorProto {
            type_name: Some(".p.Outer.Node".to_string()),
            ..field(field_name, field_name, field_type::MESSAGE)
        };
        let file = FileDescriptorProto {
            name: Some("p.proto".to_string()),
            package: Some("p".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Outer".to_string()),
                field: vec![nested("root")],
                nested_type: vec![DescriptorProto {
                    name: Some("Node".to_string()),
                    field: vec![nested("next")],
                    ..DescriptorProto::default()
                }],
                ..DescriptorProto::default()
            }],
            service: vec![ServiceDescriptorProto {
                name: Some("Idle".to_string()),
                method: vec![],
            }],
            ..FileDescriptorProto::default()
        };
        let doc = assemble(file, &GeneratorConfig::default());

        let mut keys: Vec<&str> = doc.components.schemas.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["POuter", "POuterNode"]);

        let mut refs = Vec::new();
        doc.components.schemas.values().for_each(|s| collect_refs(s, &mut refs));
        assert!(!refs.is_empty());
        for target in refs {
            let key = target.trim_start_matches(crate::document::SCHEMA_REF_PREFIX);
            assert!(doc.components.schemas.contains_key(key), "unresolved {target}");
        }
    }
}
