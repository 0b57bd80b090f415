//! # 逐条记录报告
//!
//! 每条原始记录一行：输入位置、状态、原因、化学式、准入序号。
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 构建，被 `commands/filter.rs` 导出
//! - 使用 `csv` 库写入 CSV 文件

use super::pipeline::{RecordOutcome, Verdict};
use crate::error::{FilterError, Result};

use serde::Serialize;
use std::path::Path;

/// 报告行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    pub status: &'static str,
    pub reason: Option<String>,
    pub formula: Option<String>,
    pub num_atoms: usize,
    pub volume: Option<f64>,
    pub admission_index: Option<usize>,
}

impl ReportRow {
    pub fn from_outcome(outcome: &RecordOutcome) -> Self {
        let record = &outcome.record;
        let (status, admission_index) = match outcome.verdict {
            Verdict::Failed(_) => ("failed", None),
            Verdict::Rejected => ("rejected", None),
            Verdict::Admitted(i) => ("admitted", Some(i)),
        };

        ReportRow {
            index: record.index(),
            status,
            reason: outcome.reason().map(str::to_string),
            formula: record.structure().map(|s| s.formula()),
            num_atoms: record.raw().num_atoms(),
            volume: record.lattice().map(|l| l.volume()),
            admission_index,
        }
    }
}

/// 导出报告为 CSV
pub fn write_csv(rows: &[ReportRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|e| FilterError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::pipeline::run_batch;
    use crate::composition::SiteRules;
    use crate::models::RawCrystalArray;

    #[test]
    fn test_rows_follow_verdicts() {
        let records = vec![
            RawCrystalArray::new([4.0; 3], [90.0; 3], vec![20, 22, 8], vec![[0.0; 3]; 3]).unwrap(),
            RawCrystalArray::new([4.0; 3], [0.0, 90.0, 90.0], vec![8], vec![[0.0; 3]]).unwrap(),
        ];
        let result = run_batch(records, SiteRules::perovskite()).unwrap();

        assert_eq!(result.rows.len(), 2);
        let admitted = &result.rows[0];
        assert_eq!(admitted.status, "admitted");
        assert_eq!(admitted.formula.as_deref(), Some("CaOTi"));
        assert_eq!(admitted.admission_index, Some(0));
        assert!((admitted.volume.unwrap() - 64.0).abs() < 1e-6);

        let failed = &result.rows[1];
        assert_eq!(failed.status, "failed");
        assert_eq!(failed.reason.as_deref(), Some("lattice: angle out of range"));
        assert!(failed.volume.is_none());
    }

    #[test]
    fn test_csv_output_has_header() {
        let records =
            vec![RawCrystalArray::new([4.0; 3], [90.0; 3], vec![20, 8], vec![[0.0; 3]; 2]).unwrap()];
        let result = run_batch(records, SiteRules::perovskite()).unwrap();

        let path = std::env::temp_dir()
            .join(format!("crystal_filter_report_{}.csv", std::process::id()));
        write_csv(&result.rows, &path).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("index,status,reason,formula,num_atoms,volume,admission_index")
        );
        assert_eq!(
            lines.next(),
            Some("0,rejected,composition not valid,CaO,2,64.0,")
        );
    }
}
