//! Cache key derivation
//!
//! Key layout, segments separated by `:`:
//!
//! ```text
//! list:    <collection>:<page>:<limit>[:<view>][:<param>=<value>...][:@<scope>]
//! record:  <record>:<id>[:<view>][:<param>=<value>...][:@<scope>]
//! ```
//!
//! Absent page/limit become `~`. Every caller-supplied value is escaped so
//! it can never contain a raw separator, `=`, `@` or `~`, which keeps
//! distinct selectors on distinct keys.

use std::collections::BTreeMap;

/// Placeholder for a selector field that was not provided
pub const ABSENT: &str = "~";

/// Names a resource uses in cache keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType {
    /// Prefix of single-record keys, e.g. `vehicle`
    record: &'static str,
    /// Prefix of listing keys, e.g. `vehicles`
    collection: &'static str,
}

impl ResourceType {
    pub const fn new(record: &'static str, collection: &'static str) -> Self {
        Self { record, collection }
    }

    /// Prefix shared by every listing key of this resource
    pub fn collection_prefix(&self) -> String {
        format!("{}:", self.collection)
    }

    /// Exact key of a record's plain by-id entry
    pub fn record_key(&self, id: &str) -> String {
        build_key(*self, &Selector::record(id))
    }

    /// Prefix shared by every derived view of one record
    pub fn record_view_prefix(&self, id: &str) -> String {
        format!("{}:", self.record_key(id))
    }
}

/// What subset of a resource a read addresses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Target {
    List {
        page: Option<u32>,
        limit: Option<u32>,
    },
    Record {
        id: String,
    },
}

/// Query parameters that shape a cached result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    target: Target,
    view: Option<String>,
    params: BTreeMap<String, String>,
    scope: Option<String>,
}

impl Selector {
    /// A page of the resource's listing
    pub fn list(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            target: Target::List { page, limit },
            view: None,
            params: BTreeMap::new(),
            scope: None,
        }
    }

    /// A single record
    pub fn record(id: impl Into<String>) -> Self {
        Self {
            target: Target::Record { id: id.into() },
            view: None,
            params: BTreeMap::new(),
            scope: None,
        }
    }

    /// Builder: a derived view of the target, e.g. `slots`
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Builder: a named filter parameter; parameters are ordered by name
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Builder: the caller scope, required whenever results are role-dependent
    pub fn scoped(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }
}

/// Build the cache key for a selector
///
/// Pure and total: equal selectors give equal keys and any differing
/// field gives a differing key.
pub fn build_key(resource: ResourceType, selector: &Selector) -> String {
    let mut key = String::new();

    match &selector.target {
        Target::List { page, limit } => {
            key.push_str(resource.collection);
            key.push(':');
            push_optional(&mut key, *page);
            key.push(':');
            push_optional(&mut key, *limit);
        }
        Target::Record { id } => {
            key.push_str(resource.record);
            key.push(':');
            key.push_str(&escape(id));
        }
    }

    if let Some(view) = &selector.view {
        key.push(':');
        key.push_str(&escape(view));
    }

    for (name, value) in &selector.params {
        key.push(':');
        key.push_str(&escape(name));
        key.push('=');
        key.push_str(&escape(value));
    }

    if let Some(scope) = &selector.scope {
        key.push_str(":@");
        key.push_str(&escape(scope));
    }

    key
}

fn push_optional(key: &mut String, value: Option<u32>) {
    match value {
        Some(v) => key.push_str(&v.to_string()),
        None => key.push_str(ABSENT),
    }
}

/// Percent-escape the characters that carry structure in a key
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '=' => out.push_str("%3D"),
            '@' => out.push_str("%40"),
            '~' => out.push_str("%7E"),
            _ => out.push(c),
        }
    }
    out
}
