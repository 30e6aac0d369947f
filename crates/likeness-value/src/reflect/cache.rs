use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::decl::{Accessor, MemberSource};
use crate::value::{type_id_of, Value};

/// Readable members of one type, in declaration order.
#[derive(Debug)]
pub struct AccessorTable {
    type_name: &'static str,
    accessors: Vec<Accessor>,
    by_name: HashMap<&'static str, usize>,
}

impl AccessorTable {
    fn build(value: &dyn Value) -> Self {
        match value.members() {
            Some(source) => Self::from_source(&source),
            None => Self {
                type_name: value.type_name(),
                accessors: Vec::new(),
                by_name: HashMap::new(),
            },
        }
    }

    fn from_source(source: &MemberSource) -> Self {
        let accessors = source.accessors();
        let by_name = accessors
            .iter()
            .enumerate()
            .map(|(index, accessor)| (accessor.name(), index))
            .collect();
        Self {
            type_name: source.type_name(),
            accessors,
            by_name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Accessor> {
        self.accessors.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.by_name.get(name).map(|&index| &self.accessors[index])
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.accessors.iter().map(Accessor::name)
    }
}

/// Memoized accessor tables keyed by concrete type.
///
/// Lookups take the read lock; a miss builds the table without holding any
/// lock and then inserts it unless another thread got there first, in which
/// case the stored table wins and the fresh one is dropped.
#[derive(Debug, Default)]
pub struct AccessorCache {
    tables: RwLock<HashMap<TypeId, Arc<AccessorTable>>>,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache, created on first use.
    pub fn global() -> Arc<AccessorCache> {
        static GLOBAL: OnceLock<Arc<AccessorCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(AccessorCache::new())))
    }

    pub fn accessors_for(&self, value: &dyn Value) -> Arc<AccessorTable> {
        let type_id = type_id_of(value);
        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Arc::clone(table);
        }

        let table = Arc::new(AccessorTable::build(value));
        log::debug!(
            "accessor table for {} built with {} member(s)",
            table.type_name(),
            table.len()
        );
        let mut tables = self
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(tables.entry(type_id).or_insert(table))
    }

    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
