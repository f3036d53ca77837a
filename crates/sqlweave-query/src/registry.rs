//! Process-wide adapter registry.
//!
//! Dialects register a factory under their name, usually once at startup.
//! Statement generation asks the registry for a fresh adapter each time, so
//! state an adapter captures while rendering one statement is never seen by
//! the next.
//!
//! # Example
//!
//! ```
//! use sqlweave_query::{AdapterConfig, has_adapter, new_adapter, register_config};
//!
//! let config = AdapterConfig {
//!     quote_rune: '`',
//!     ..AdapterConfig::default()
//! };
//! register_config("doc-backtick", config);
//!
//! assert!(has_adapter("doc-backtick"));
//! assert_eq!(new_adapter("doc-backtick").config().quote_rune, '`');
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::adapter::{Adapter, DefaultAdapter};
use crate::config::AdapterConfig;

/// Builds a new adapter for one statement.
pub type AdapterFactory = Arc<dyn Fn() -> Box<dyn Adapter> + Send + Sync>;

static ADAPTERS: OnceLock<RwLock<HashMap<String, AdapterFactory>>> = OnceLock::new();

fn adapters() -> &'static RwLock<HashMap<String, AdapterFactory>> {
    ADAPTERS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Register (or replace) the factory for a dialect. Names are case-insensitive.
pub fn register_adapter<F>(name: &str, factory: F)
where
    F: Fn() -> Box<dyn Adapter> + Send + Sync + 'static,
{
    let key = normalize(name);
    let mut map = adapters().write().unwrap_or_else(|poisoned| poisoned.into_inner());
    let replaced = map.insert(key.clone(), Arc::new(factory)).is_some();
    tracing::debug!(dialect = %key, replaced, "Registered adapter");
}

/// Register a dialect that differs from the default only in its configuration.
pub fn register_config(name: &str, config: AdapterConfig) {
    let adapter_name = normalize(name);
    register_adapter(name, move || {
        Box::new(DefaultAdapter::with_config(
            adapter_name.clone(),
            config.clone(),
        ))
    });
}

pub fn has_adapter(name: &str) -> bool {
    adapters()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .contains_key(&normalize(name))
}

/// Registered dialect names, sorted.
pub fn registered_adapters() -> Vec<String> {
    let map = adapters()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

/// A fresh adapter for `name`, or a [`DefaultAdapter`] when nothing is
/// registered under it.
pub fn new_adapter(name: &str) -> Box<dyn Adapter> {
    let key = normalize(name);
    let factory = adapters()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
        .cloned();

    match factory {
        // Called outside the lock so a factory may consult the registry.
        Some(factory) => factory(),
        None => {
            tracing::debug!(dialect = %key, "No adapter registered, using default adapter");
            Box::new(DefaultAdapter::new(key))
        }
    }
}
