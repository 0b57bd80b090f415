//! # filter 命令实现
//!
//! 重建原始晶体数组，按站点规则过滤，并写出通过的结构。
//!
//! ## 功能
//! - 两层加载原始数据（records / batched），报告实际使用的层级
//! - 站点规则来自 `--site`、`--rules` 或默认钙钛矿预设，启动时校验
//! - 顺序或并行重建，准入序号按输入顺序分配
//! - 写出 `structure_<i>.vasp` 与 `structure_<i>.cif`
//! - 可选逐条 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/filter.rs` 定义的参数
//! - 使用 `parsers/`, `batch/`, `writers/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{report, BatchPipeline, PipelineResult, PipelineStats, RecordOutcome, Verdict};
use crate::cli::filter::FilterArgs;
use crate::composition::SiteRules;
use crate::error::{FilterError, Result};
use crate::models::{LatticeBuilder, RawCrystalArray};
use crate::parsers::{self, TextEncoding};
use crate::utils::{output, progress};
use crate::writers::{self, WriteStatus};

use std::fs;
use tabled::{Table, Tabled};

/// 汇总表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

/// 执行 filter 命令
pub fn execute(args: FilterArgs) -> Result<()> {
    output::print_header("Crystal Reconstruction & Composition Filter");

    if !args.min_volume.is_finite() || args.min_volume < 0.0 {
        return Err(FilterError::InvalidArgument(format!(
            "--min-volume must be a non-negative number, got {}",
            args.min_volume
        )));
    }

    let encoding = TextEncoding::from(args.encoding);

    // 站点规则：启动时一次性校验
    let rules = resolve_rules(&args, encoding)?;
    let pipeline = BatchPipeline::new(rules, LatticeBuilder::with_min_volume(args.min_volume))?
        .with_jobs(args.jobs);

    output::print_info(&format!("Site rules: {}", pipeline.rules().describe()));
    for (element, labels) in pipeline.rules().shared_elements() {
        output::print_warning(&format!(
            "Element {} is listed under sites {}; one atom of it covers all of them",
            element,
            labels.join(", ")
        ));
    }

    // 加载原始数据
    let loaded = parsers::load_raw_file(&args.input, encoding, args.format.into())?;
    output::print_info(&format!(
        "Loaded {} raw crystals from '{}' ({} layout)",
        loaded.records.len(),
        args.input.display(),
        loaded.tier
    ));

    if loaded.records.is_empty() {
        output::print_warning("No raw crystals to process.");
        return Ok(());
    }

    // 重建与过滤
    let result = if args.jobs == 1 {
        run_sequential(&pipeline, loaded.records, args.verbose)
    } else {
        let result = pipeline.run_parallel(loaded.records);
        if args.verbose {
            for row in &result.rows {
                match (&row.reason, row.admission_index) {
                    (_, Some(i)) => output::print_success(&format!(
                        "Structure {} admitted as #{}",
                        row.index, i
                    )),
                    (Some(reason), None) => {
                        output::print_skip(&format!("Structure {}: {}", row.index, reason))
                    }
                    (None, None) => {}
                }
            }
        }
        result
    };

    // 写出结构
    if args.dry_run {
        output::print_info("Dry run: no structure files written");
    } else if !result.admitted.is_empty() {
        export_admitted(&result, &args)?;
    }

    // 逐条报告
    if let Some(ref report_path) = args.report {
        report::write_csv(&result.rows, report_path)?;
        output::print_success(&format!(
            "Per-record report saved to '{}'",
            report_path.display()
        ));
    }

    print_summary(&result.stats);
    print_failures(&result);

    output::print_done(&format!(
        "Processing complete: {} of {} structures admitted",
        result.stats.admitted, result.stats.total
    ));

    Ok(())
}

/// 解析站点规则来源
fn resolve_rules(args: &FilterArgs, encoding: TextEncoding) -> Result<SiteRules> {
    if let Some(ref path) = args.rules {
        if !path.exists() {
            return Err(FilterError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        return parsers::load_site_rules_file(path, encoding);
    }

    if !args.site.is_empty() {
        return Ok(SiteRules::from_cli_args(args.site.as_slice())?);
    }

    Ok(SiteRules::perovskite())
}

/// 顺序处理，逐条显示进度
fn run_sequential(
    pipeline: &BatchPipeline,
    records: Vec<RawCrystalArray>,
    verbose: bool,
) -> PipelineResult {
    let pb = progress::create_progress_bar(records.len() as u64, "Reconstructing");
    let mut result = PipelineResult::default();

    for outcome in pipeline.outcomes(records) {
        if verbose {
            pb.suspend(|| print_outcome(&outcome));
        }
        result.merge(outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();
    result
}

fn print_outcome(outcome: &RecordOutcome) {
    let index = outcome.record.index();
    match &outcome.verdict {
        Verdict::Failed(reason) => {
            output::print_skip(&format!("Structure {} construction failed: {}", index, reason))
        }
        Verdict::Rejected => {
            let formula = outcome
                .record
                .structure()
                .map(|s| s.formula())
                .unwrap_or_default();
            output::print_skip(&format!(
                "Structure {} composition not valid ({})",
                index, formula
            ))
        }
        Verdict::Admitted(i) => {
            output::print_success(&format!("Structure {} admitted as #{}", index, i))
        }
    }
}

/// 写出所有通过的结构
fn export_admitted(result: &PipelineResult, args: &FilterArgs) -> Result<()> {
    fs::create_dir_all(&args.output).map_err(|e| FilterError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let targets = writers::default_writers();
    let pb = progress::create_progress_bar(result.admitted.len() as u64, "Writing");
    let mut written = 0;
    let mut skipped = 0;

    for admitted in &result.admitted {
        for writer in &targets {
            match writers::write_structure(
                writer.as_ref(),
                &admitted.structure,
                admitted.admission_index,
                &args.output,
                args.overwrite,
            )? {
                WriteStatus::Written(_) => written += 1,
                WriteStatus::Skipped(path) => {
                    skipped += 1;
                    if args.verbose {
                        pb.suspend(|| {
                            output::print_skip(&format!(
                                "Output exists: {} (input record {})",
                                path.display(),
                                admitted.source_index
                            ))
                        });
                    }
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    output::print_success(&format!(
        "Wrote {} file(s) to '{}' ({} skipped)",
        written,
        args.output.display(),
        skipped
    ));

    Ok(())
}

/// 打印统计表格
fn print_summary(stats: &PipelineStats) {
    let rows = vec![
        SummaryRow {
            category: "Total structures",
            count: stats.total,
        },
        SummaryRow {
            category: "Failed construction",
            count: stats.failed_construction,
        },
        SummaryRow {
            category: "Rejected composition",
            count: stats.rejected_composition,
        },
        SummaryRow {
            category: "Admitted",
            count: stats.admitted,
        },
    ];

    output::print_header("Summary");
    println!("{}", Table::new(&rows));
}

/// 按原因汇总失败与拒绝
fn print_failures(result: &PipelineResult) {
    use std::collections::BTreeMap;

    let mut by_reason: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, reason) in result.failures() {
        *by_reason.entry(reason).or_insert(0) += 1;
    }

    if by_reason.is_empty() {
        return;
    }

    output::print_separator();
    for (reason, count) in by_reason {
        output::print_warning(&format!("{:>6} x {}", count, reason));
    }
}
