//! Basic example demonstrating multi-strategy anomaly detection
//!
//! Run with: cargo run --example basic -p anomaly

use anomaly::{
    AnomalyDetector, AnomalyStrategy, Column, IQRStrategy, Table, ZScoreStrategy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== anomaly Basic Examples ===\n");

    let amounts = vec![
        Some(120.0), Some(66.0), None, Some(141.0), Some(128.0),
        Some(135.0), Some(110.0), Some(700.0), Some(95.0), Some(132.0),
        Some(118.0), Some(104.0), Some(99.0), Some(150.0), Some(126.0),
        Some(139.0), Some(112.0), None, Some(108.0), Some(131.0),
        Some(127.0), Some(115.0), Some(122.0), Some(9.0), Some(119.0),
    ];
    let incomes: Vec<f64> = (0..25).map(|i| 3000.0 + (i * 211 % 1700) as f64).collect();

    // 1. One strategy on its own
    println!("1. Z-Score on LoanAmount (threshold=3.0)");
    let sample: Vec<f64> = amounts.iter().flatten().copied().collect();
    let mut zscore = ZScoreStrategy::new(3.0)?;
    zscore.fit(&sample)?;
    let result = zscore.detect(&sample)?;
    println!("   mean={:.2}, std={:.2}", zscore.mean(), zscore.std_dev());
    println!("   anomalous sample positions: {:?}\n", result.anomaly_indices());

    // 2. IQR fences
    println!("2. IQR on LoanAmount (multiplier=1.5)");
    let mut iqr = IQRStrategy::new(1.5)?;
    iqr.fit(&sample)?;
    let (lower, upper) = iqr.bounds();
    println!("   Q1={:.1}, Q3={:.1}, bounds=[{:.1}, {:.1}]", iqr.q1(), iqr.q3(), lower, upper);
    println!("   anomalies: {}\n", iqr.detect(&sample)?.anomaly_count());

    // 3. Every default strategy over a table
    println!("3. Default detector over a table");
    let mut table = Table::from_columns(vec![
        Column::numeric("LoanAmount", amounts),
        Column::dense("ApplicantIncome", incomes),
    ])?;
    let mut detector = AnomalyDetector::default();
    let summary = detector.create_summary(&mut table, &["LoanAmount", "ApplicantIncome"])?;
    println!("{}", summary);
    println!("   table now has {} columns:", table.column_count());
    for name in table.column_names().iter().skip(2) {
        println!("     {}", name);
    }

    Ok(())
}
