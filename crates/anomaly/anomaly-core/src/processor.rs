//! Column processing: sample selection, strategy execution and annotation.

use std::collections::BTreeMap;

use anomaly_spi::{
    AnomalyError, AnomalyResult, AnomalyStrategy, Column, Result, Sample, SampleFilter,
    SummaryRecord, Table,
};
use tracing::{debug, info, warn};

/// Name of the 0/1 flag column written for `column` and strategy `label`.
pub fn flag_column_name(column: &str, label: &str) -> String {
    format!("{}_anomaly_flag_{}", column, label)
}

/// Name of the score column written for `column` and strategy `label`.
pub fn score_column_name(column: &str, label: &str) -> String {
    format!("{}_anomaly_score_{}", column, label)
}

/// A strategy together with the label that names its annotation columns
/// and summary records.
#[derive(Debug, Clone)]
pub struct LabeledStrategy {
    label: String,
    strategy: Box<dyn AnomalyStrategy>,
}

impl LabeledStrategy {
    pub fn new(label: impl Into<String>, strategy: Box<dyn AnomalyStrategy>) -> Self {
        Self {
            label: label.into(),
            strategy,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn strategy(&self) -> &dyn AnomalyStrategy {
        self.strategy.as_ref()
    }

    pub fn strategy_mut(&mut self) -> &mut dyn AnomalyStrategy {
        self.strategy.as_mut()
    }
}

/// Label strategies by name; the k-th repeat of a name (k >= 2) becomes
/// `{name}_{k}`.
pub fn assign_labels(strategies: Vec<Box<dyn AnomalyStrategy>>) -> Vec<LabeledStrategy> {
    let mut seen: BTreeMap<&'static str, usize> = BTreeMap::new();
    strategies
        .into_iter()
        .map(|strategy| {
            let name = strategy.name();
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            let label = if *count == 1 {
                name.to_string()
            } else {
                format!("{}_{}", name, count)
            };
            LabeledStrategy::new(label, strategy)
        })
        .collect()
}

/// Row-aligned output of one strategy on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub label: String,
    pub params: BTreeMap<String, String>,
    /// One flag per table row; rows outside the sample are `false`.
    pub flags: Vec<bool>,
    /// One score per table row; rows outside the sample are `0.0`.
    pub scores: Vec<f64>,
    pub anomalies: usize,
}

/// Everything computed for one column, ready to be applied to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnOutcome {
    pub column: String,
    pub sample_size: usize,
    pub annotations: Vec<Annotation>,
}

/// Runs strategies against one column at a time.
///
/// Processing is split in two: [`evaluate`](ColumnProcessor::evaluate)
/// reads the table and fits the strategies, [`apply`](ColumnProcessor::apply)
/// writes annotation columns. A failing column therefore leaves the table
/// untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnProcessor {
    filter: SampleFilter,
}

impl ColumnProcessor {
    pub fn new(filter: SampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> SampleFilter {
        self.filter
    }

    /// Evaluate and annotate `column` in one step.
    pub fn process(
        &self,
        table: &mut Table,
        column: &str,
        strategies: &mut [LabeledStrategy],
    ) -> Result<Vec<SummaryRecord>> {
        let outcome = self.evaluate(table, column, strategies)?;
        self.apply(table, outcome)
    }

    /// Fit every strategy on the column's sample and collect row-aligned
    /// flags and scores. An empty sample skips the strategies entirely.
    pub fn evaluate(
        &self,
        table: &Table,
        column: &str,
        strategies: &mut [LabeledStrategy],
    ) -> Result<ColumnOutcome> {
        let cells = table.numeric_values(column)?;
        let sample = Sample::from_column(&cells, self.filter);
        let rows = table.row_count();

        info!(
            column = column,
            rows = rows,
            sample_size = sample.len(),
            "Processing column"
        );

        if sample.is_empty() {
            warn!(column = column, "No eligible values; skipping strategies");
        }

        let mut annotations = Vec::with_capacity(strategies.len());
        for labeled in strategies.iter_mut() {
            let params = labeled.strategy().params();
            let annotation = if sample.is_empty() {
                Annotation {
                    label: labeled.label.clone(),
                    params,
                    flags: vec![false; rows],
                    scores: vec![0.0; rows],
                    anomalies: 0,
                }
            } else {
                let result = run_strategy(labeled.strategy_mut(), sample.values())
                    .map_err(|e| e.in_strategy(column, labeled.label()))?;
                debug!(
                    column = column,
                    strategy = labeled.label(),
                    anomalies = result.anomaly_count(),
                    "Strategy finished"
                );
                Annotation {
                    label: labeled.label.clone(),
                    params,
                    flags: sample.scatter(&result.is_anomaly, rows, false),
                    scores: sample.scatter(&result.scores, rows, 0.0),
                    anomalies: result.anomaly_count(),
                }
            };
            annotations.push(annotation);
        }

        Ok(ColumnOutcome {
            column: column.to_string(),
            sample_size: sample.len(),
            annotations,
        })
    }

    /// Write the annotation columns of `outcome` into `table` and return
    /// one summary record per strategy, in strategy order.
    pub fn apply(&self, table: &mut Table, outcome: ColumnOutcome) -> Result<Vec<SummaryRecord>> {
        let ColumnOutcome {
            column,
            sample_size,
            annotations,
        } = outcome;

        let mut records = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            table.insert_column(Column::flag(
                flag_column_name(&column, &annotation.label),
                annotation.flags,
            ))?;
            table.insert_column(Column::dense(
                score_column_name(&column, &annotation.label),
                annotation.scores,
            ))?;
            records.push(SummaryRecord {
                column: column.clone(),
                method: annotation.label,
                anomalies: annotation.anomalies,
                sample_size,
                params: annotation.params,
            });
        }
        Ok(records)
    }
}

fn run_strategy(strategy: &mut dyn AnomalyStrategy, values: &[f64]) -> Result<AnomalyResult> {
    strategy.fit(values)?;
    let result = strategy.detect(values)?;

    if result.is_anomaly.len() != values.len() || result.scores.len() != values.len() {
        return Err(AnomalyError::DetectionError(format!(
            "expected {} results, got {} flags and {} scores",
            values.len(),
            result.is_anomaly.len(),
            result.scores.len()
        )));
    }
    if let Some(bad) = result.scores.iter().find(|s| !s.is_finite()) {
        return Err(AnomalyError::DetectionError(format!(
            "non-finite score {}",
            bad
        )));
    }
    Ok(result)
}
