//! The resolved field tree.

use serde::{Deserialize, Serialize};

/// One selected field and the fields selected beneath it.
///
/// `sub_fields` preserves first-occurrence order across all selector
/// strings of a resolution. An empty `sub_fields` means the whole
/// subtree under `name` is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<FieldInfo>,
}

impl FieldInfo {
    /// A leaf selection: the whole subtree under `name`.
    pub fn leaf(name: impl Into<String>) -> FieldInfo {
        FieldInfo {
            name: name.into(),
            sub_fields: Vec::new(),
        }
    }

    /// A parent selection with explicit children.
    pub fn with_sub_fields(name: impl Into<String>, sub_fields: Vec<FieldInfo>) -> FieldInfo {
        FieldInfo {
            name: name.into(),
            sub_fields,
        }
    }

    /// Flatten a tree to dotted leaf paths, depth-first.
    pub fn flatten(infos: &[FieldInfo]) -> Vec<String> {
        let mut out = Vec::new();
        for info in infos {
            flatten_into(info, None, &mut out);
        }
        out
    }
}

fn flatten_into(info: &FieldInfo, prefix: Option<&str>, out: &mut Vec<String>) {
    let path = match prefix {
        Some(prefix) => format!("{}.{}", prefix, info.name),
        None => info.name.clone(),
    };
    if info.sub_fields.is_empty() {
        out.push(path);
        return;
    }
    for sub in &info.sub_fields {
        flatten_into(sub, Some(&path), out);
    }
}
