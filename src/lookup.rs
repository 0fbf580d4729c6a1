use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api;
use crate::config::ApiConfig;
use crate::error::PipelineError;

/// Resolved name for a null code. Distinct from a missing entry for a
/// real code, which is a hard `LookupKeyMissing`.
pub const NULL_CODE_NAME: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Types,
    Countries,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Types, Namespace::Countries];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Types => "types",
            Namespace::Countries => "countries",
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            Namespace::Types => "types",
            Namespace::Countries => "countries",
        }
    }
}

/// Code-to-name tables for the two lookup namespaces, persisted as JSON
/// object files under a lookup directory. Keys are stringified integers
/// on disk and coerced back to `i64` on read.
///
/// The store is constructed once at startup and passed by reference into
/// enrichment and the table builders; `refresh` is the only mutation.
#[derive(Debug, Default)]
pub struct LookupStore {
    dir: PathBuf,
    types: HashMap<i64, String>,
    countries: HashMap<i64, String>,
}

impl LookupStore {
    /// Load whatever cache files exist under `dir`; missing files leave
    /// the namespace empty.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let mut store = Self {
            dir,
            ..Self::default()
        };
        for ns in Namespace::ALL {
            if let Some(table) = load_namespace(&store.dir, ns)? {
                *store.table_mut(ns) = table;
            }
        }
        Ok(store)
    }

    /// Load from `dir`, fetching any namespace whose cache file does not
    /// exist yet.
    pub fn load_or_refresh(dir: impl Into<PathBuf>, config: &ApiConfig) -> Result<Self> {
        let dir = dir.into();
        let mut store = Self {
            dir,
            ..Self::default()
        };
        for ns in Namespace::ALL {
            match load_namespace(&store.dir, ns)? {
                Some(table) => *store.table_mut(ns) = table,
                None => store.refresh(config, ns)?,
            }
        }
        Ok(store)
    }

    /// In-memory store with fixed tables; nothing is persisted.
    pub fn from_tables(types: HashMap<i64, String>, countries: HashMap<i64, String>) -> Self {
        Self {
            dir: PathBuf::new(),
            types,
            countries,
        }
    }

    pub fn len(&self, ns: Namespace) -> usize {
        self.table(ns).len()
    }

    /// Hard lookup: the code must exist.
    pub fn get(&self, ns: Namespace, code: i64) -> Result<&str, PipelineError> {
        self.table(ns)
            .get(&code)
            .map(String::as_str)
            .ok_or(PipelineError::LookupKeyMissing {
                namespace: ns.as_str(),
                code,
            })
    }

    /// Lookup tolerating a null code: `None` resolves to the `"N/A"`
    /// sentinel, a present code still has to exist.
    pub fn resolve(&self, ns: Namespace, code: Option<i64>) -> Result<String, PipelineError> {
        match code {
            None => Ok(NULL_CODE_NAME.to_string()),
            Some(code) => self.get(ns, code).map(str::to_string),
        }
    }

    /// Soft lookup: null and unknown codes both come back as `None`.
    pub fn find(&self, ns: Namespace, code: Option<i64>) -> Option<String> {
        self.table(ns).get(&code?).cloned()
    }

    /// Re-fetch all entries for a namespace through the paginated
    /// fetcher and overwrite both the persisted file and the in-memory
    /// table.
    pub fn refresh(&mut self, config: &ApiConfig, ns: Namespace) -> Result<()> {
        let url = api::gen_url(config, api::PRODUCT_CORE, ns.endpoint(), &[]);
        let pages = api::fetch_paginated(&url)
            .with_context(|| format!("fetch {} lookup entries", ns.as_str()))?;
        let mut table = HashMap::new();
        for entry in pages.data()? {
            let Some(id) = entry.get("id").and_then(Value::as_i64) else {
                continue;
            };
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                continue;
            };
            table.insert(id, name.to_string());
        }
        self.replace(ns, table)
    }

    /// Swap in a full table for a namespace, persisting it first.
    pub fn replace(&mut self, ns: Namespace, table: HashMap<i64, String>) -> Result<()> {
        persist_namespace(&self.dir, ns, &table)?;
        *self.table_mut(ns) = table;
        Ok(())
    }

    fn table(&self, ns: Namespace) -> &HashMap<i64, String> {
        match ns {
            Namespace::Types => &self.types,
            Namespace::Countries => &self.countries,
        }
    }

    fn table_mut(&mut self, ns: Namespace) -> &mut HashMap<i64, String> {
        match ns {
            Namespace::Types => &mut self.types,
            Namespace::Countries => &mut self.countries,
        }
    }
}

fn namespace_path(dir: &Path, ns: Namespace) -> PathBuf {
    dir.join(format!("{}.json", ns.as_str()))
}

fn load_namespace(dir: &Path, ns: Namespace) -> Result<Option<HashMap<i64, String>>> {
    if dir.as_os_str().is_empty() {
        return Ok(None);
    }
    let path = namespace_path(dir, ns);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("read lookup file {}", path.display()));
        }
    };
    let table = serde_json::from_str::<HashMap<i64, String>>(&raw)
        .with_context(|| format!("parse lookup file {}", path.display()))?;
    Ok(Some(table))
}

fn persist_namespace(dir: &Path, ns: Namespace, table: &HashMap<i64, String>) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("create lookup directory {}", dir.display()))?;
    let path = namespace_path(dir, ns);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(table).context("serialize lookup table")?;
    fs::write(&tmp, json).with_context(|| format!("write lookup file {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("swap lookup file {}", path.display()))?;
    Ok(())
}
