//! # Bulk Import
//!
//! Parses a pasted or uploaded stock sheet and turns it into items.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Import Pipeline                                  │
//! │                                                                         │
//! │  raw text                                                               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  parse_table()        delimiter: '|' if any pipe, else ','              │
//! │     │                 quoted cells, "" escapes                          │
//! │     ▼                                                                   │
//! │  ColumnMap::resolve() header row → field → column index | absent        │
//! │     │                 no product-code column → MissingRequiredColumn    │
//! │     ▼                                                                   │
//! │  plan_import()        per row: code, dedup, defaults, status            │
//! │     │                 (pure: nothing is mutated yet)                    │
//! │     ▼                                                                   │
//! │  Ledger::import_batch() applies the whole plan at once                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::code::normalize_code;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Item, ItemStatus, NewItem};

// =============================================================================
// Table Parsing
// =============================================================================

/// `|` if the text contains any pipe, otherwise `,`.
pub fn detect_delimiter(text: &str) -> u8 {
    if text.contains('|') {
        b'|'
    } else {
        b','
    }
}

/// Splits text into trimmed rows of cells. Blank rows are dropped.
///
/// ```rust
/// use stall_core::import::parse_table;
///
/// let rows = parse_table("code|mrp\nSAR1|\"1,200\"").unwrap();
/// assert_eq!(rows[1], vec!["SAR1", "1,200"]);
/// ```
pub fn parse_table(text: &str) -> CoreResult<Vec<Vec<String>>> {
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = detect_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), delimiter = %(delimiter as char), "Parsed import table");
    Ok(rows)
}

// =============================================================================
// Column Resolution
// =============================================================================

/// Which column holds each field. Only the product code is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub code: usize,
    pub name: Option<usize>,
    pub shop_name: Option<usize>,
    pub shop_code: Option<usize>,
    pub cost_price: Option<usize>,
    pub list_price: Option<usize>,
    pub alternate_price: Option<usize>,
    pub status: Option<usize>,
}

impl ColumnMap {
    /// Resolves header cells to columns, case-insensitively.
    ///
    /// ## Header Synonyms
    /// | Field | Matches |
    /// |-------|---------|
    /// | shop name | `shop_name`, `shop name`, `shopname` |
    /// | shop code | `shop_code`, `shop code`, `shopcode` |
    /// | product code | `product_code`, `product code`, `productcode`, `code` |
    /// | cost price | `cp`, or contains `cost` |
    /// | list price | `mrp` |
    /// | alternate price | `asp`, or contains `asp60` |
    /// | status | contains `status` |
    /// | name | `type`, `name`, `saree type`, `saree_type`, `description` |
    ///
    /// When several columns match a field, the leftmost wins.
    pub fn resolve(headers: &[String]) -> CoreResult<Self> {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| h.replace('"', "").trim().to_lowercase())
            .collect();

        let find = |matches: fn(&str) -> bool| headers.iter().position(|h| matches(h.as_str()));

        let code = find(|h| matches!(h, "product_code" | "product code" | "productcode" | "code"))
            .ok_or_else(|| CoreError::MissingRequiredColumn("product_code".to_string()))?;

        let map = ColumnMap {
            code,
            name: find(|h| matches!(h, "type" | "name" | "saree type" | "saree_type" | "description")),
            shop_name: find(|h| matches!(h, "shop_name" | "shop name" | "shopname")),
            shop_code: find(|h| matches!(h, "shop_code" | "shop code" | "shopcode")),
            cost_price: find(|h| h == "cp" || h.contains("cost")),
            list_price: find(|h| h == "mrp"),
            alternate_price: find(|h| h == "asp" || h.contains("asp60")),
            status: find(|h| h.contains("status")),
        };

        debug!(?map, "Resolved import columns");
        Ok(map)
    }
}

// =============================================================================
// Planning (pure accumulate phase)
// =============================================================================

/// Items accepted from an import, plus the tallies of skipped rows.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Accepted items in input row order.
    pub items: Vec<Item>,
    /// Rows whose code already exists in stock or earlier in the batch.
    pub duplicate_count: usize,
    /// Rows with no code at all.
    pub blank_count: usize,
    /// Rows whose code is present but unusable (e.g. too long).
    pub invalid_count: usize,
}

/// Counts reported back to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub added_count: usize,
    pub duplicate_count: usize,
    pub blank_count: usize,
    pub invalid_count: usize,
}

impl From<&ImportPlan> for ImportSummary {
    fn from(plan: &ImportPlan) -> Self {
        ImportSummary {
            added_count: plan.items.len(),
            duplicate_count: plan.duplicate_count,
            blank_count: plan.blank_count,
            invalid_count: plan.invalid_count,
        }
    }
}

/// Interprets data rows (header excluded) against a column map.
///
/// `exists` reports whether a normalized code is already in stock. Codes
/// repeated within `rows` are caught here too: only the first occurrence
/// is accepted.
pub fn plan_import<F>(rows: &[Vec<String>], columns: &ColumnMap, exists: F) -> ImportPlan
where
    F: Fn(&str) -> bool,
{
    let mut plan = ImportPlan::default();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        let cell = |index: Option<usize>| -> Option<String> {
            index.and_then(|i| row.get(i)).map(|value| value.trim().to_string())
        };

        let raw_code = row.get(columns.code).map(String::as_str).unwrap_or("");
        let code = match normalize_code(raw_code) {
            Ok(code) => code,
            Err(ValidationError::Required { .. }) => {
                plan.blank_count += 1;
                continue;
            }
            Err(err) => {
                debug!(raw_code, error = %err, "Skipping import row with unusable code");
                plan.invalid_count += 1;
                continue;
            }
        };

        if exists(&code) || !seen.insert(code.clone()) {
            plan.duplicate_count += 1;
            continue;
        }

        let fields = NewItem {
            code: Some(code.clone()),
            name: cell(columns.name),
            shop_name: cell(columns.shop_name),
            shop_code: cell(columns.shop_code),
            cost_price: cell(columns.cost_price),
            list_price: cell(columns.list_price),
            alternate_price: cell(columns.alternate_price),
        };
        let status = cell(columns.status)
            .map(|text| ItemStatus::from_status_text(&text))
            .unwrap_or_default();

        plan.items.push(Item::from_new(code, &fields, status));
    }

    plan
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn rows(text: &str) -> Vec<Vec<String>> {
        parse_table(text).unwrap()
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b|c"), b'|');
        assert_eq!(detect_delimiter("a,b,c"), b',');
    }

    #[test]
    fn test_parse_quoted_cells() {
        let table = rows("code,name\n\"SAR1\",\"Silk \"\"Gold\"\" border, red\"\n\n  ,  \n");
        assert_eq!(table.len(), 2);
        assert_eq!(table[1], vec!["SAR1", "Silk \"Gold\" border, red"]);
    }

    #[test]
    fn test_resolve_synonyms() {
        let map = ColumnMap::resolve(&headers(&[
            "Shop Name", "SHOPCODE", "Product Code", "Cost Price", "MRP", "ASP60 (60%)", "Item Status",
        ]))
        .unwrap();

        assert_eq!(map.shop_name, Some(0));
        assert_eq!(map.shop_code, Some(1));
        assert_eq!(map.code, 2);
        assert_eq!(map.cost_price, Some(3));
        assert_eq!(map.list_price, Some(4));
        assert_eq!(map.alternate_price, Some(5));
        assert_eq!(map.status, Some(6));
        assert_eq!(map.name, None);
    }

    #[test]
    fn test_resolve_requires_code_column() {
        let err = ColumnMap::resolve(&headers(&["shop_name", "mrp"])).unwrap_err();
        assert!(matches!(err, CoreError::MissingRequiredColumn(_)));
    }

    #[test]
    fn test_plan_counts_duplicates_within_batch_and_stock() {
        let table = rows("code,mrp\nA1,100\nB2,200\na1,300\nEXIST,400\n,500\n");
        let map = ColumnMap::resolve(&table[0]).unwrap();

        let plan = plan_import(&table[1..], &map, |code| code == "EXIST");

        let codes: Vec<&str> = plan.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2"]);
        assert_eq!(plan.items[0].list_price.paise(), 10000);
        assert_eq!(plan.duplicate_count, 2);
        assert_eq!(plan.blank_count, 1);
    }

    #[test]
    fn test_plan_status_column() {
        let table = rows("code|status\nCODE_A|\nCODE_B|Sold - floor 2\n");
        let map = ColumnMap::resolve(&table[0]).unwrap();

        let plan = plan_import(&table[1..], &map, |_| false);

        assert_eq!(plan.items[0].status, ItemStatus::Available);
        assert_eq!(plan.items[1].status, ItemStatus::Sold);
    }

    #[test]
    fn test_plan_short_rows_default_missing_cells() {
        let table = rows("code,shop_name,mrp\nX1\n");
        let map = ColumnMap::resolve(&table[0]).unwrap();

        let plan = plan_import(&table[1..], &map, |_| false);

        assert_eq!(plan.items[0].shop_name, "Unknown Shop");
        assert!(plan.items[0].list_price.is_zero());
    }
}
