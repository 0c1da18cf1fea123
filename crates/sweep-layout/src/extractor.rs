//! Layout document scan.
//!
//! The layout document is `{ filters?, sections: [ { filters?,
//! visualContainers: [ { filters?, query?, config? } ] } ] }` where every
//! `filters`, `query` and `config` value is itself a JSON document encoded as
//! a string. Each such payload is one scope: it is decoded and walked on its
//! own, and a scope that fails is skipped without affecting the others.

use crate::alias::AliasTable;
use crate::error::{LayoutError, LayoutResult};
use crate::walker::{HierarchyLevelRef, ReferenceCollector};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use sweep_core::{FieldRef, LayoutConfig};

/// Kind of payload being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    ReportFilters,
    PageFilters,
    VisualFilters,
    VisualQuery,
    VisualConfig,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::ReportFilters => "report filters",
            ScopeKind::PageFilters => "page filters",
            ScopeKind::VisualFilters => "visual filters",
            ScopeKind::VisualQuery => "visual query",
            ScopeKind::VisualConfig => "visual config",
        };
        f.write_str(name)
    }
}

/// Counters describing what a layout scan covered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub pages: usize,
    pub visuals: usize,
    pub scopes_scanned: usize,
    pub scopes_skipped: usize,
}

/// Everything the layout references
#[derive(Debug, Clone, Default)]
pub struct LayoutUsage {
    /// `Table[Name]` references, whether or not the catalog declares them
    pub fields: BTreeSet<FieldRef>,
    /// Hierarchy levels, for mapping onto the columns they are built on
    pub hierarchy_levels: BTreeSet<HierarchyLevelRef>,
    pub stats: LayoutStats,
}

/// Extracts field references from a decoded layout document
#[derive(Debug, Clone)]
pub struct LayoutExtractor {
    scan_report_filters: bool,
}

impl Default for LayoutExtractor {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayoutExtractor {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            scan_report_filters: config.scan_report_filters,
        }
    }

    /// Scan the whole layout document. Never fails; see [`LayoutStats`]
    /// for how many scopes were skipped.
    pub fn extract(&self, layout: &Value) -> LayoutUsage {
        let mut collector = ReferenceCollector::new();
        let mut stats = LayoutStats::default();

        if !layout.is_object() {
            log::warn!("Layout document is not an object; no references found");
            return LayoutUsage::default();
        }

        if self.scan_report_filters {
            self.scan_scope(
                ScopeKind::ReportFilters,
                layout.get("filters"),
                "report",
                &mut collector,
                &mut stats,
            );
        }

        let sections = layout
            .get("sections")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if sections.is_empty() {
            log::warn!("Layout document has no sections");
        }

        for (page_idx, section) in sections.iter().enumerate() {
            stats.pages += 1;
            let page = page_label(section, page_idx);
            self.scan_scope(
                ScopeKind::PageFilters,
                section.get("filters"),
                &page,
                &mut collector,
                &mut stats,
            );

            let visuals = section
                .get("visualContainers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for (visual_idx, visual) in visuals.iter().enumerate() {
                stats.visuals += 1;
                let location = format!("{} visual #{}", page, visual_idx);
                for (kind, key) in [
                    (ScopeKind::VisualFilters, "filters"),
                    (ScopeKind::VisualQuery, "query"),
                    (ScopeKind::VisualConfig, "config"),
                ] {
                    self.scan_scope(kind, visual.get(key), &location, &mut collector, &mut stats);
                }
            }
        }

        let (fields, hierarchy_levels) = collector.into_parts();
        log::debug!(
            "Layout scan: {} pages, {} visuals, {} scopes scanned, {} skipped, {} references",
            stats.pages,
            stats.visuals,
            stats.scopes_scanned,
            stats.scopes_skipped,
            fields.len()
        );
        LayoutUsage {
            fields,
            hierarchy_levels,
            stats,
        }
    }

    fn scan_scope(
        &self,
        kind: ScopeKind,
        raw: Option<&Value>,
        location: &str,
        collector: &mut ReferenceCollector,
        stats: &mut LayoutStats,
    ) {
        let Some(raw) = raw.filter(|v| !is_blank_payload(v)) else {
            return;
        };

        // Walk into a scratch collector so a failing scope contributes nothing
        let mut scope = ReferenceCollector::new();
        let result =
            decode_payload(kind, raw).and_then(|payload| scan_payload(kind, &payload, &mut scope));
        match result {
            Ok(()) => {
                stats.scopes_scanned += 1;
                collector.absorb(scope);
            }
            Err(e) => {
                log::debug!("Skipping {} of {}: {}", kind, location, e);
                stats.scopes_skipped += 1;
            }
        }
    }
}

fn page_label(section: &Value, idx: usize) -> String {
    section
        .get("displayName")
        .or_else(|| section.get("name"))
        .and_then(Value::as_str)
        .map(|name| format!("page '{}'", name))
        .unwrap_or_else(|| format!("page #{}", idx))
}

fn is_blank_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Decode an embedded payload string. Payloads already stored as JSON
/// structures are accepted as they are.
fn decode_payload(kind: ScopeKind, raw: &Value) -> LayoutResult<Value> {
    match raw {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|source| LayoutError::PayloadDecode {
                scope: kind.to_string(),
                source,
            })
        }
        Value::Object(_) | Value::Array(_) => Ok(raw.clone()),
        other => Err(unexpected(kind, format!("expected a JSON string, found {}", other))),
    }
}

/// Walk one decoded payload according to its kind
pub fn scan_payload(
    kind: ScopeKind,
    payload: &Value,
    collector: &mut ReferenceCollector,
) -> LayoutResult<()> {
    match kind {
        ScopeKind::ReportFilters | ScopeKind::PageFilters | ScopeKind::VisualFilters => {
            if !(payload.is_array() || payload.is_object()) {
                return Err(unexpected(kind, "expected a list of filters"));
            }
            collector.collect(payload, &AliasTable::new());
        }
        ScopeKind::VisualQuery => {
            if !payload.is_object() {
                return Err(unexpected(kind, "expected an object"));
            }
            let commands = match payload.get("Commands") {
                None | Some(Value::Null) => return Ok(()),
                Some(Value::Array(commands)) => commands,
                Some(_) => return Err(unexpected(kind, "'Commands' is not a list")),
            };
            for command in commands {
                let Some(query) = command
                    .get("SemanticQueryDataShapeCommand")
                    .and_then(|c| c.get("Query"))
                else {
                    continue;
                };
                let aliases = AliasTable::from_list(query.get("From").unwrap_or(&Value::Null));
                collector.collect(query, &aliases);
            }
        }
        ScopeKind::VisualConfig => {
            if !payload.is_object() {
                return Err(unexpected(kind, "expected an object"));
            }
            let from = payload
                .get("singleVisual")
                .and_then(|v| v.get("prototypeQuery"))
                .and_then(|q| q.get("From"))
                .unwrap_or(&Value::Null);
            collector.collect(payload, &AliasTable::from_list(from));
        }
    }
    Ok(())
}

fn unexpected(kind: ScopeKind, message: impl Into<String>) -> LayoutError {
    LayoutError::UnexpectedShape {
        scope: kind.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
