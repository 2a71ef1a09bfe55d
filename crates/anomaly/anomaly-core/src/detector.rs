//! Multi-strategy, multi-column anomaly detector.

use std::path::{Path, PathBuf};

use anomaly_api::DetectorConfig;
use anomaly_spi::{AnomalyError, AnomalyStrategy, Result, SampleFilter, SummaryTable, Table};
use rayon::prelude::*;
use tracing::info;

use crate::persistence;
use crate::processor::{
    assign_labels, flag_column_name, score_column_name, ColumnOutcome, ColumnProcessor,
    LabeledStrategy,
};
use crate::strategies::{
    build_strategy, IQRStrategy, IsolationForestStrategy, LocalOutlierFactorStrategy,
    ZScoreStrategy,
};

/// Suffix inserted before the extension of the saved table's file name.
pub const DEFAULT_SUFFIX: &str = "_anomaly";

/// Runs an ordered list of strategies over the requested columns of a
/// table, annotates the table and summarises the anomalies found.
///
/// # Example
///
/// ```no_run
/// use anomaly_core::{read_csv, AnomalyDetector};
///
/// let mut table = read_csv("loans.csv")?;
/// let mut detector = AnomalyDetector::default();
/// let summary = detector.create_summary(&mut table, &["LoanAmount"])?;
/// println!("{}", summary);
/// detector.save_results(&table, "loans.csv")?;
/// # Ok::<(), anomaly_core::AnomalyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    strategies: Vec<LabeledStrategy>,
    processor: ColumnProcessor,
    suffix: String,
    parallel: bool,
}

impl AnomalyDetector {
    /// Create a detector running `strategies` in the given order.
    pub fn new(strategies: Vec<Box<dyn AnomalyStrategy>>) -> Self {
        Self {
            strategies: assign_labels(strategies),
            processor: ColumnProcessor::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            parallel: false,
        }
    }

    /// Create from configuration, validating every strategy.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let strategies = config
            .strategies
            .iter()
            .map(build_strategy)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(strategies)
            .with_sample_filter(config.sample_filter)
            .with_suffix(config.suffix.clone())
            .with_parallel(config.parallel))
    }

    pub fn with_sample_filter(mut self, filter: SampleFilter) -> Self {
        self.processor = ColumnProcessor::new(filter);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Evaluate columns concurrently, each with its own strategy clones.
    ///
    /// Every column is read from the table as it was before the run, and
    /// outcomes are applied in request order. A request may therefore not
    /// name an annotation column written by an earlier column of the same
    /// run; `create_summary` rejects that in either mode.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Strategy labels, in run order.
    pub fn labels(&self) -> Vec<&str> {
        self.strategies.iter().map(LabeledStrategy::label).collect()
    }

    pub fn strategies(&self) -> &[LabeledStrategy] {
        &self.strategies
    }

    pub fn sample_filter(&self) -> SampleFilter {
        self.processor.filter()
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Run every strategy on every column in `columns`, adding flag and
    /// score columns to `table`.
    ///
    /// Records come back column by column, strategies in configured order
    /// within each column. The first failing column aborts the run; columns
    /// before it keep their annotations.
    ///
    /// A column that an earlier requested column annotates in this run is
    /// rejected with `InvalidParameter` before any work is done.
    pub fn create_summary<S>(&mut self, table: &mut Table, columns: &[S]) -> Result<SummaryTable>
    where
        S: AsRef<str> + Sync,
    {
        self.check_requested_columns(columns)?;
        info!(
            columns = columns.len(),
            strategies = self.strategies.len(),
            parallel = self.parallel,
            "Creating anomaly summary"
        );

        let mut summary = SummaryTable::default();
        if self.parallel {
            for outcome in self.evaluate_parallel(table, columns) {
                summary.extend(self.processor.apply(table, outcome?)?);
            }
        } else {
            for column in columns {
                let records =
                    self.processor
                        .process(table, column.as_ref(), &mut self.strategies)?;
                summary.extend(records);
            }
        }

        info!(
            records = summary.len(),
            anomalies = summary.total_anomalies(),
            "Anomaly summary created"
        );
        Ok(summary)
    }

    fn check_requested_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        for (i, later) in columns.iter().enumerate() {
            let later = later.as_ref();
            let produced_earlier = columns[..i].iter().any(|earlier| {
                self.strategies.iter().any(|s| {
                    later == flag_column_name(earlier.as_ref(), s.label())
                        || later == score_column_name(earlier.as_ref(), s.label())
                })
            });
            if produced_earlier {
                return Err(AnomalyError::invalid_parameter(
                    "columns",
                    format!("'{}' is annotated earlier in the same run", later),
                ));
            }
        }
        Ok(())
    }

    fn evaluate_parallel<S>(&self, table: &Table, columns: &[S]) -> Vec<Result<ColumnOutcome>>
    where
        S: AsRef<str> + Sync,
    {
        columns
            .par_iter()
            .map(|column| {
                let mut strategies = self.strategies.clone();
                self.processor
                    .evaluate(table, column.as_ref(), &mut strategies)
            })
            .collect()
    }

    /// Write `table` next to `source` with the detector's suffix inserted
    /// before the extension, returning the written path.
    pub fn save_results(&self, table: &Table, source: impl AsRef<Path>) -> Result<PathBuf> {
        let path = persistence::derive_output_path(source.as_ref(), &self.suffix);
        persistence::write_csv(table, &path)?;
        info!(path = %path.display(), rows = table.row_count(), "Saved annotated table");
        Ok(path)
    }
}

impl Default for AnomalyDetector {
    /// Local outlier factor, isolation forest, z-score and IQR with their
    /// default parameters.
    fn default() -> Self {
        Self::new(vec![
            Box::new(LocalOutlierFactorStrategy::default()),
            Box::new(IsolationForestStrategy::default()),
            Box::new(ZScoreStrategy::default()),
            Box::new(IQRStrategy::default()),
        ])
    }
}
