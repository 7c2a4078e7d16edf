//! The parser's semantic sink: a deduplicated, limit-checked tree of
//! registered field names.
//!
//! Every name is either a [`Registration::Leaf`] (no children yet) or a
//! [`Registration::Parent`] holding the sub-collector one level deeper.
//! Limits live in a [`ParseSession`] shared across all selector strings
//! of one resolution, so the field budget is global.

use std::collections::HashMap;

use crate::error::FieldError;
use crate::info::FieldInfo;
use crate::options::FieldOptions;

/// Shared state for one resolution pass: the configured limits plus the
/// running field count.
pub(crate) struct ParseSession<'a> {
    options: &'a FieldOptions,
    field_count: usize,
}

impl<'a> ParseSession<'a> {
    pub(crate) fn new(options: &'a FieldOptions) -> ParseSession<'a> {
        ParseSession {
            options,
            field_count: 0,
        }
    }
}

/// How a name is registered at one level of the tree.
enum Registration {
    Leaf,
    Parent(Collector),
}

pub(crate) struct Collector {
    depth: usize,
    order: Vec<String>,
    entries: HashMap<String, Registration>,
}

impl Collector {
    pub(crate) fn new() -> Collector {
        Collector::at_depth(1)
    }

    fn at_depth(depth: usize) -> Collector {
        Collector {
            depth,
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Register `name` at this level. The first registration succeeds
    /// (within limits); a repeat succeeds only when both the existing
    /// entry and the new request treat the name as a parent.
    pub(crate) fn add_if_absent(
        &mut self,
        name: &str,
        as_parent: bool,
        session: &mut ParseSession<'_>,
    ) -> Result<(), FieldError> {
        if name.chars().count() > session.options.max_field_component_length {
            return Err(FieldError::ExceededMaxComponentLength);
        }
        match self.entries.get(name) {
            None => {
                self.entries.insert(name.to_owned(), Registration::Leaf);
                self.order.push(name.to_owned());
                session.field_count += 1;
                if session.field_count > session.options.max_fields {
                    return Err(FieldError::ExceededMaxFields);
                }
                Ok(())
            }
            Some(Registration::Parent(_)) if as_parent => Ok(()),
            Some(_) => Err(FieldError::DuplicatedField(name.to_owned())),
        }
    }

    /// Enter the sub-collector for `name`, upgrading a fresh leaf to a
    /// parent. The caller registers `name` first via `add_if_absent`.
    pub(crate) fn child(
        &mut self,
        name: &str,
        session: &ParseSession<'_>,
    ) -> Result<&mut Collector, FieldError> {
        if self.depth >= session.options.max_field_depth {
            return Err(FieldError::ExceededMaxDepth);
        }
        let depth = self.depth + 1;
        let entry = self
            .entries
            .entry(name.to_owned())
            .or_insert(Registration::Leaf);
        if let Registration::Leaf = entry {
            *entry = Registration::Parent(Collector::at_depth(depth));
        }
        match entry {
            Registration::Parent(sub) => Ok(sub),
            Registration::Leaf => unreachable!("entry was upgraded above"),
        }
    }

    /// Check that every requested node exists in this tree at the same
    /// path. Requesting less than allowed is fine; requesting below an
    /// allowed leaf fails, naming the first offending child.
    pub(crate) fn ensure_allows(&self, requested: &[FieldInfo]) -> Result<(), FieldError> {
        for info in requested {
            match self.entries.get(&info.name) {
                None => return Err(FieldError::FieldNotFound(info.name.clone())),
                Some(Registration::Parent(sub)) => {
                    sub.ensure_allows(&info.sub_fields)
                        .map_err(|err| err.with_parent(&info.name))?;
                }
                Some(Registration::Leaf) => {
                    if let Some(first) = info.sub_fields.first() {
                        return Err(
                            FieldError::FieldNotFound(first.name.clone())
                                .with_parent(&info.name),
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Materialize the immutable result tree in first-registration order.
    pub(crate) fn to_field_infos(&self) -> Vec<FieldInfo> {
        let mut result = Vec::with_capacity(self.order.len());
        for name in &self.order {
            let sub_fields = match self.entries.get(name) {
                Some(Registration::Parent(sub)) => sub.to_field_infos(),
                _ => Vec::new(),
            };
            result.push(FieldInfo {
                name: name.clone(),
                sub_fields,
            });
        }
        result
    }
}
