//! Cross-schema field mapping: which destination fields are affected
//! when a source field changes.

use std::collections::{HashMap, HashSet};

use crate::decl::Ordinal;
use crate::field_map::FieldMap;

/// One mapping rule: a source field and the destination fields it
/// feeds. A rule with several destinations fans out to all of them;
/// several rules for the same source field are alternatives, and only
/// the first one declared fires.
pub struct MappingRule<F1, F2> {
    from: F1,
    to: Vec<F2>,
}

impl<F1: Ordinal, F2: Ordinal> MappingRule<F1, F2> {
    /// # Panics
    ///
    /// When `to` is empty.
    pub fn new(from: F1, to: &[F2]) -> MappingRule<F1, F2> {
        if to.is_empty() {
            panic!("missing destination fields");
        }
        MappingRule {
            from,
            to: to.to_vec(),
        }
    }
}

/// Collects rules against a source and a destination map, validating
/// them on [`build`](MapperBuilder::build).
pub struct MapperBuilder<'a, F1: Ordinal, T1, F2: Ordinal, T2> {
    source: &'a FieldMap<F1, T1>,
    dest: &'a FieldMap<F2, T2>,
    rules: Vec<MappingRule<F1, F2>>,
}

impl<'a, F1: Ordinal, T1, F2: Ordinal, T2> MapperBuilder<'a, F1, T1, F2, T2> {
    pub fn rule(mut self, rule: MappingRule<F1, F2>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = MappingRule<F1, F2>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Splice a mapper built for nested schema families into this one.
    /// `source_mount` and `dest_mount` are the roots the nested
    /// families were declared under; every inherited rule is shifted by
    /// the mount ordinals.
    pub fn inherit<S1: Ordinal, S2: Ordinal>(
        mut self,
        sub: &Mapper<S1, S2>,
        source_mount: F1,
        dest_mount: F2,
    ) -> Self {
        let from_offset = source_mount.index() - 1;
        let to_offset = dest_mount.index() - 1;
        for rule in &sub.rules {
            let to = rule
                .to
                .iter()
                .map(|dest| F2::from_index(dest.index() + to_offset))
                .collect();
            self.rules.push(MappingRule {
                from: F1::from_index(rule.from.index() + from_offset),
                to,
            });
        }
        self
    }

    /// # Panics
    ///
    /// When two single-destination rules repeat the same source and
    /// destination pair. Multi-destination rules may overlap freely.
    pub fn build(self) -> Mapper<F1, F2> {
        let mut single_dests: HashMap<F1, HashSet<F2>> = HashMap::new();
        let mut rules_by_source: HashMap<F1, Vec<Vec<F2>>> = HashMap::new();
        for rule in &self.rules {
            if rule.to.len() == 1 {
                let only = rule.to[0];
                if !single_dests.entry(rule.from).or_default().insert(only) {
                    panic!(
                        "duplicated destination field {:?} for source field {:?}",
                        self.dest.full_field_name(only),
                        self.source.full_field_name(rule.from),
                    );
                }
            }
            rules_by_source
                .entry(rule.from)
                .or_default()
                .push(rule.to.clone());
        }
        Mapper {
            source_parents: self.source.parent_table(),
            rules_by_source,
            rules: self.rules,
        }
    }
}

/// A validated rule table between two schema families.
pub struct Mapper<F1: Ordinal, F2: Ordinal> {
    source_parents: Vec<Option<F1>>,
    rules_by_source: HashMap<F1, Vec<Vec<F2>>>,
    rules: Vec<MappingRule<F1, F2>>,
}

impl<F1: Ordinal, F2: Ordinal> Mapper<F1, F2> {
    pub fn builder<'a, T1, T2>(
        source: &'a FieldMap<F1, T1>,
        dest: &'a FieldMap<F2, T2>,
    ) -> MapperBuilder<'a, F1, T1, F2, T2> {
        MapperBuilder {
            source,
            dest,
            rules: Vec::new(),
        }
    }

    /// Destination fields affected by changes to `sources`, without
    /// repeats across the whole query.
    ///
    /// Each source fires the first rule declared for it; a source with
    /// no rules of its own falls back to the nearest ancestor that has
    /// one.
    pub fn find_affected(&self, sources: &[F1]) -> Vec<F2> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for &source in sources {
            self.collect_affected(source, &mut seen, &mut result);
        }
        result
    }

    fn collect_affected(&self, source: F1, seen: &mut HashSet<F2>, result: &mut Vec<F2>) {
        let mut current = Some(source);
        while let Some(field) = current {
            if let Some(lists) = self.rules_by_source.get(&field) {
                for list in lists {
                    for &dest in list {
                        if seen.insert(dest) {
                            result.push(dest);
                        }
                    }
                    if !list.is_empty() {
                        return;
                    }
                }
            }
            current = self.source_parents[(field.index() - 1) as usize];
        }
    }
}
