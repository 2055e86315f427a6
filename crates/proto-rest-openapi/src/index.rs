//! Cross-file lookup of message/enum descriptors and their source comments.
//!
//! Field `type_name`s are fully qualified (`.pkg.Outer.Inner`) and may point
//! into any file of the request, so schemas are resolved through one index
//! built over every descriptor protoc hands us.

use std::collections::HashMap;

use crate::descriptor::{
    source_path, DescriptorProto, EnumDescriptorProto, FileDescriptorProto,
};
use crate::naming::comment_to_description;

/// Leading comments of one file, keyed by `SourceCodeInfo` location path.
#[derive(Debug, Default)]
pub(crate) struct Comments<'a> {
    leading: HashMap<Vec<i32>, &'a str>,
}

impl<'a> Comments<'a> {
    pub(crate) fn new(file: &'a FileDescriptorProto) -> Self {
        let leading = file
            .source_code_info
            .iter()
            .flat_map(|info| &info.location)
            .filter_map(|loc| {
                loc.leading_comments
                    .as_deref()
                    .map(|c| (loc.path.clone(), c))
            })
            .collect();
        Self { leading }
    }

    /// Flattened leading comment of the element at `path`; empty when absent.
    pub(crate) fn description(&self, path: &[i32]) -> String {
        self.leading
            .get(path)
            .map(|c| comment_to_description(c))
            .unwrap_or_default()
    }
}

/// A message descriptor plus where it lives, for comment lookups.
#[derive(Debug)]
pub struct MessageEntry<'a> {
    /// The message itself.
    pub descriptor: &'a DescriptorProto,
    /// Fully qualified name with leading dot (`.helloworld.HelloRequest`).
    pub full_name: String,
    file: usize,
    path: Vec<i32>,
}

impl MessageEntry<'_> {
    /// Location path of field number `index` (position in `descriptor.field`).
    fn field_path(&self, index: usize) -> Vec<i32> {
        let mut path = self.path.clone();
        path.extend([source_path::MESSAGE_FIELD, to_i32(index)]);
        path
    }
}

/// Fully qualified name → descriptor index over a set of proto files.
#[derive(Debug, Default)]
pub struct TypeIndex<'a> {
    messages: HashMap<String, MessageEntry<'a>>,
    enums: HashMap<String, &'a EnumDescriptorProto>,
    comments: Vec<Comments<'a>>,
}

impl<'a> TypeIndex<'a> {
    /// Index every message and enum (nested ones included) in `files`.
    #[must_use]
    pub fn new(files: &'a [FileDescriptorProto]) -> Self {
        let mut index = Self::default();

        for (file_idx, file) in files.iter().enumerate() {
            let package = file.package.as_deref().unwrap_or("");
            let prefix = if package.is_empty() {
                String::new()
            } else {
                format!(".{package}")
            };

            for (i, msg) in file.message_type.iter().enumerate() {
                let path = vec![source_path::FILE_MESSAGE, to_i32(i)];
                index.insert_message(file_idx, &prefix, path, msg);
            }
            for en in &file.enum_type {
                let name = en.name.as_deref().unwrap_or("");
                index.enums.insert(format!("{prefix}.{name}"), en);
            }

            index.comments.push(Comments::new(file));
        }

        index
    }

    fn insert_message(
        &mut self,
        file: usize,
        parent: &str,
        path: Vec<i32>,
        msg: &'a DescriptorProto,
    ) {
        let name = msg.name.as_deref().unwrap_or("");
        let full_name = format!("{parent}.{name}");

        for (i, nested) in msg.nested_type.iter().enumerate() {
            let mut nested_path = path.clone();
            nested_path.extend([source_path::MESSAGE_NESTED, to_i32(i)]);
            self.insert_message(file, &full_name, nested_path, nested);
        }
        for en in &msg.enum_type {
            let en_name = en.name.as_deref().unwrap_or("");
            self.enums.insert(format!("{full_name}.{en_name}"), en);
        }

        self.messages.insert(
            full_name.clone(),
            MessageEntry {
                descriptor: msg,
                full_name,
                file,
                path,
            },
        );
    }

    /// Look up a message by fully qualified name (leading dot optional).
    #[must_use]
    pub fn message(&self, full_name: &str) -> Option<&MessageEntry<'a>> {
        self.messages.get(&qualify(full_name))
    }

    /// Look up an enum by fully qualified name (leading dot optional).
    #[must_use]
    pub fn enumeration(&self, full_name: &str) -> Option<&'a EnumDescriptorProto> {
        self.enums.get(&qualify(full_name)).copied()
    }

    /// Leading comment of field `index` of `entry`; empty when absent.
    #[must_use]
    pub fn field_description(&self, entry: &MessageEntry<'_>, index: usize) -> String {
        self.comments
            .get(entry.file)
            .map(|c| c.description(&entry.field_path(index)))
            .unwrap_or_default()
    }

    /// Leading comment of the message itself; empty when absent.
    #[must_use]
    pub fn message_description(&self, entry: &MessageEntry<'_>) -> String {
        self.comments
            .get(entry.file)
            .map(|c| c.description(&entry.path))
            .unwrap_or_default()
    }
}

fn qualify(name: &str) -> String {
    if name.starts_with('.') {
        name.to_string()
    } else {
        format!(".{name}")
    }
}

fn to_i32(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::descriptor::{FieldDescriptorProto, Location, SourceCodeInfo};

    use super::*;

    fn file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("shop.proto".to_string()),
            package: Some("shop.v1".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Order".to_string()),
                field: vec![FieldDescriptorProto {
                    name: Some("id".to_string()),
                    ..FieldDescriptorProto::default()
                }],
                nested_type: vec![DescriptorProto {
                    name: Some("Line".to_string()),
                    ..DescriptorProto::default()
                }],
                enum_type: vec![EnumDescriptorProto {
                    name: Some("State".to_string()),
                    value: vec![],
                }],
                options: None,
            }],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Currency".to_string()),
                value: vec![],
            }],
            source_code_info: Some(SourceCodeInfo {
                location: vec![
                    Location {
                        path: vec![4, 0],
                        leading_comments: Some(" An order.\n".to_string()),
                        trailing_comments: None,
                    },
                    Location {
                        path: vec![4, 0, 2, 0],
                        leading_comments: Some(" Order id.\n".to_string()),
                        trailing_comments: None,
                    },
                ],
            }),
            ..FileDescriptorProto::default()
        }
    }

    #[test]
    fn indexes_nested_types() {
        let files = vec![file()];
        let index = TypeIndex::new(&files);

        assert!(index.message(".shop.v1.Order").is_some());
        assert!(index.message("shop.v1.Order.Line").is_some());
        assert!(index.enumeration(".shop.v1.Currency").is_some());
        assert!(index.enumeration(".shop.v1.Order.State").is_some());
        assert!(index.message(".shop.v1.Missing").is_none());
    }

    #[test]
    fn resolves_comments_by_path() {
        let files = vec![file()];
        let index = TypeIndex::new(&files);
        let order = index.message(".shop.v1.Order").unwrap();

        assert_eq!(index.message_description(order), "An order.");
        assert_eq!(index.field_description(order, 0), "Order id.");
        assert_eq!(index.field_description(order, 1), "");
    }

    #[test]
    fn empty_package_has_single_dot() {
        let mut f = file();
        f.package = None;
        let files = vec![f];
        let index = TypeIndex::new(&files);
        assert_eq!(index.message(".Order").unwrap().full_name, ".Order");
    }
}
