//! Per-column, per-strategy detection summaries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one strategy on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Source column name.
    pub column: String,
    /// Strategy label.
    pub method: String,
    /// Number of flagged rows.
    pub anomalies: usize,
    /// Number of rows that entered the sample.
    pub sample_size: usize,
    /// Strategy parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// All summary records of a detector run, in column-then-strategy order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryTable {
    records: Vec<SummaryRecord>,
}

impl SummaryTable {
    pub fn new(records: Vec<SummaryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SummaryRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SummaryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for one column, in strategy order.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a SummaryRecord> {
        self.records.iter().filter(move |r| r.column == column)
    }

    pub fn total_anomalies(&self) -> usize {
        self.records.iter().map(|r| r.anomalies).sum()
    }
}

impl Extend<SummaryRecord> for SummaryTable {
    fn extend<I: IntoIterator<Item = SummaryRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl IntoIterator for SummaryTable {
    type Item = SummaryRecord;
    type IntoIter = std::vec::IntoIter<SummaryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const HEADERS: [&str; 3] = ["Column", "Method", "Num_Anomalies"];

        let column_width = self
            .records
            .iter()
            .map(|r| r.column.len())
            .chain([HEADERS[0].len()])
            .max()
            .unwrap_or_default();
        let method_width = self
            .records
            .iter()
            .map(|r| r.method.len())
            .chain([HEADERS[1].len()])
            .max()
            .unwrap_or_default();

        writeln!(
            f,
            "{:<cw$}  {:<mw$}  {}",
            HEADERS[0],
            HEADERS[1],
            HEADERS[2],
            cw = column_width,
            mw = method_width
        )?;
        for record in &self.records {
            writeln!(
                f,
                "{:<cw$}  {:<mw$}  {:>aw$}",
                record.column,
                record.method,
                record.anomalies,
                cw = column_width,
                mw = method_width,
                aw = HEADERS[2].len()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(column: &str, method: &str, anomalies: usize) -> SummaryRecord {
        SummaryRecord {
            column: column.to_string(),
            method: method.to_string(),
            anomalies,
            sample_size: 10,
            params: BTreeMap::new(),
        }
    }

    #[test]
    fn test_for_column_and_total() {
        let table = SummaryTable::new(vec![
            record("a", "ZScore", 1),
            record("a", "InterquartileRange", 2),
            record("b", "ZScore", 4),
        ]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.total_anomalies(), 7);
        let methods: Vec<_> = table.for_column("a").map(|r| r.method.as_str()).collect();
        assert_eq!(methods, vec!["ZScore", "InterquartileRange"]);
    }

    #[test]
    fn test_display_aligns_columns() {
        let table = SummaryTable::new(vec![
            record("LoanAmount", "ZScore", 3),
            record("LoanAmount", "IsolationForest", 12),
        ]);
        let rendered = table.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Column      Method           Num_Anomalies"));
        assert!(lines[1].starts_with("LoanAmount  ZScore"));
        assert!(lines[2].ends_with("12"));
    }

    #[test]
    fn test_serializes_as_list() {
        let table = SummaryTable::new(vec![record("a", "ZScore", 1)]);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["method"], "ZScore");
        assert!(json[0].get("params").is_none());
    }
}
