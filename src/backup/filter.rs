//! rsync filter rules derived from a job's `include` map.

use derive_more::Display;
use indexmap::IndexMap;
use tracing::trace;

/// One rsync filter directive, rendered in rsync's short rule syntax.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum FilterRule {
    #[display("+ {_0}")]
    Include(String),
    #[display("- {_0}")]
    Exclude(String),
}

/// Builds the ordered rule list for an include map.
///
/// Excluded paths come first so they win over any later include of a parent.
/// Each included path then gets an allow rule for every ancestor directory,
/// otherwise rsync would never descend far enough to reach it. A trailing
/// catch-all exclude turns the list into a whitelist. An empty map produces
/// no rules at all, which means a full copy.
pub fn build_filters(include: &IndexMap<String, bool>) -> Vec<FilterRule> {
    let mut filters = Vec::new();

    for path in include.iter().filter(|(_, keep)| !**keep).map(|(p, _)| p) {
        filters.push(FilterRule::Exclude(format!("{}/***", path_segments(path).join("/"))));
    }

    for path in include.iter().filter(|(_, keep)| **keep).map(|(p, _)| p) {
        let parts = path_segments(path);
        for depth in 1..parts.len() {
            filters.push(FilterRule::Include(format!("{}/", parts[..depth].join("/"))));
        }
        filters.push(FilterRule::Include(format!("{}/***", parts.join("/"))));
    }

    if !filters.is_empty() {
        filters.push(FilterRule::Exclude("*".to_string()));
    }

    trace!("Built {} filter rules from {} include entries", filters.len(), include.len());
    filters
}

/// Directory names of an include key; stray `/` never produce empty names.
fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
