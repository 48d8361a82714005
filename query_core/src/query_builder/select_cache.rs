//! Default column list per entity
//!
//! Shared by every builder in the process. Filled once per entity and read
//! afterwards.

use crate::metadata::EntityMeta;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

type CacheKey = (&'static str, &'static str);

static SELECT_CACHE: LazyLock<Mutex<HashMap<CacheKey, Arc<str>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock() -> MutexGuard<'static, HashMap<CacheKey, Arc<str>>> {
    // Only complete entries are inserted
    SELECT_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `Table.Col1, Table.Col2, ...` of the selectable columns, or `*`
pub fn build_select_list(entity: &EntityMeta) -> String {
    let columns: Vec<String> = entity
        .selectable_columns()
        .map(|column| format!("{}.{}", entity.table, column.column))
        .collect();
    if entity.is_query_result() || columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    }
}

pub fn default_select(entity: &'static EntityMeta) -> Arc<str> {
    let mut cache = lock();
    let entry = cache.entry((entity.name, entity.table)).or_insert_with(|| {
        crate::debug_log!("[SELECT_CACHE] Building column list for {}", entity.name);
        Arc::from(build_select_list(entity))
    });
    Arc::clone(entry)
}

pub fn is_cached(entity: &EntityMeta) -> bool {
    lock().contains_key(&(entity.name, entity.table))
}

pub fn len() -> usize {
    lock().len()
}
