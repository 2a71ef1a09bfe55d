//! End-to-end tests for the anomaly crate
//!
//! Tests complete load, detect and save workflows using only this crate's API.

use std::fs;
use std::path::Path;

use anomaly::{
    read_csv, AnomalyDetector, ColumnData, DetectorConfig, SampleFilter, SummaryTable,
};

/// A loan book with a few implausible amounts and terms.
fn write_loans(dir: &Path) -> std::path::PathBuf {
    let mut csv = String::from("Loan_ID,Gender,ApplicantIncome,LoanAmount,Loan_Amount_Term\n");
    for i in 0..60 {
        let income = 3000 + (i * 137) % 2500;
        let amount = if i % 11 == 4 {
            String::new()
        } else {
            (100 + (i * 29) % 80).to_string()
        };
        let term = if i % 9 == 0 { 0 } else { 360 - (i % 3) * 60 };
        let gender = if i % 2 == 0 { "Male" } else { "Female" };
        csv.push_str(&format!(
            "LP{:04},{},{},{},{}\n",
            i, gender, income, amount, term
        ));
    }
    csv.push_str("LP9998,Male,81000,700,360\n");
    csv.push_str("LP9999,Female,3500,2500,12\n");

    let path = dir.join("loans.csv");
    fs::write(&path, csv).unwrap();
    path
}

#[test]
fn e2e_detect_and_save_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_loans(dir.path());

    let mut table = read_csv(&source).unwrap();
    assert_eq!(table.row_count(), 62);

    let mut detector = AnomalyDetector::default();
    let columns = ["ApplicantIncome", "LoanAmount"];
    let summary = detector.create_summary(&mut table, &columns).unwrap();

    // Two columns, four strategies each.
    assert_eq!(summary.len(), 8);
    assert_eq!(table.column_count(), 5 + 8 * 2);

    let income_zscore = summary
        .for_column("ApplicantIncome")
        .find(|r| r.method == "ZScore")
        .unwrap();
    assert_eq!(income_zscore.anomalies, 1);
    assert_eq!(income_zscore.sample_size, 62);

    let amount_iqr = summary
        .for_column("LoanAmount")
        .find(|r| r.method == "InterquartileRange")
        .unwrap();
    assert!(amount_iqr.anomalies >= 2);
    assert!(amount_iqr.sample_size < 62);

    let saved = detector.save_results(&table, &source).unwrap();
    assert_eq!(saved, dir.path().join("loans_anomaly.csv"));

    let reloaded = read_csv(&saved).unwrap();
    assert_eq!(reloaded.row_count(), 62);
    assert_eq!(reloaded.column_names(), table.column_names());
    assert!(matches!(
        reloaded.column("Gender").unwrap().data(),
        ColumnData::Text(_)
    ));

    let flags = reloaded
        .numeric_values("ApplicantIncome_anomaly_flag_ZScore")
        .unwrap();
    assert_eq!(flags[60], Some(1.0));
    assert_eq!(flags.iter().filter(|f| **f == Some(1.0)).count(), 1);

    // Rows with a missing amount keep the default annotation.
    let amount_scores = reloaded
        .numeric_values("LoanAmount_anomaly_score_InterquartileRange")
        .unwrap();
    assert_eq!(amount_scores[4], Some(0.0));
    assert_eq!(reloaded.numeric_values("LoanAmount").unwrap()[4], None);
}

#[test]
fn e2e_parallel_run_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_loans(dir.path());
    let columns = ["ApplicantIncome", "LoanAmount", "Loan_Amount_Term"];

    let mut sequential = read_csv(&source).unwrap();
    let expected = AnomalyDetector::default()
        .create_summary(&mut sequential, &columns)
        .unwrap();

    let mut parallel = read_csv(&source).unwrap();
    let actual = AnomalyDetector::default()
        .with_parallel(true)
        .create_summary(&mut parallel, &columns)
        .unwrap();

    assert_eq!(actual, expected);
    assert_eq!(parallel.column_names(), sequential.column_names());
    for name in parallel.column_names() {
        assert_eq!(
            parallel.column(name).unwrap().data(),
            sequential.column(name).unwrap().data(),
            "column {} differs",
            name
        );
    }
}

#[test]
fn e2e_config_file_with_zero_exclusion() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_loans(dir.path());
    let config_path = dir.path().join("detector.toml");
    fs::write(
        &config_path,
        r#"
sample_filter = "drop_missing_and_zero"
suffix = "_checked"

[[strategies]]
method = "iqr"
multiplier = 1.5
"#,
    )
    .unwrap();

    let config = DetectorConfig::from_file(&config_path).unwrap();
    assert_eq!(config.sample_filter, SampleFilter::DropMissingAndZero);

    let mut detector = AnomalyDetector::from_config(&config).unwrap();
    let mut table = read_csv(&source).unwrap();
    let summary = detector
        .create_summary(&mut table, &["Loan_Amount_Term"])
        .unwrap();

    // Rows 0, 9, ..., 54 have a zero term and are left out.
    assert_eq!(summary.records()[0].sample_size, 62 - 7);
    let saved = detector.save_results(&table, &source).unwrap();
    assert!(saved.ends_with("loans_checked.csv"));
    assert!(saved.exists());
}

#[test]
fn e2e_summary_json_and_display() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_loans(dir.path());
    let mut table = read_csv(&source).unwrap();

    let summary = AnomalyDetector::default()
        .create_summary(&mut table, &["ApplicantIncome"])
        .unwrap();

    let json = serde_json::to_string(&summary).unwrap();
    let back: SummaryTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);

    let text = summary.to_string();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("Column"));
    assert!(header.contains("Method"));
    assert!(header.ends_with("Num_Anomalies"));
    assert_eq!(text.lines().count(), 1 + 4);
}

#[test]
fn e2e_text_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_loans(dir.path());
    let mut table = read_csv(&source).unwrap();

    let err = AnomalyDetector::default()
        .create_summary(&mut table, &["Gender"])
        .unwrap_err();
    assert!(matches!(err, anomaly::AnomalyError::NonNumericColumn(_)));
}
