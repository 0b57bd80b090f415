//! # 批量重建与过滤流水线
//!
//! 对每条原始记录依次执行：重建 → (仅 Constructed) 成分过滤 → 分配准入序号。
//!
//! ## 功能
//! - 惰性单遍迭代器 `Outcomes`，按输入顺序逐条产出结果
//! - 单条记录失败不会中断批处理
//! - 准入序号从 0 开始按输入顺序递增，用于导出文件命名
//! - 可选 rayon 并行重建；序号仍在并行阶段之后按输入顺序分配
//!
//! ## 依赖关系
//! - 被 `commands/filter.rs` 调用
//! - 使用 `models/`、`composition/`
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use super::report::ReportRow;
use crate::composition::{is_admissible, SiteRules};
use crate::error::ConfigError;
use crate::models::{CrystalRecord, LatticeBuilder, RawCrystalArray, Structure};
use crate::utils::progress;

use rayon::prelude::*;

/// 成分不满足规则时的拒绝原因
pub const COMPOSITION_REJECTED: &str = "composition not valid";

/// 单条记录的最终判定
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// 重建失败 (原因)
    Failed(String),
    /// 重建成功但成分被拒绝
    Rejected,
    /// 被接受 (准入序号)
    Admitted(usize),
}

/// 单条记录处理结果
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub record: CrystalRecord,
    pub verdict: Verdict,
}

impl RecordOutcome {
    /// 失败或拒绝的原因
    pub fn reason(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Failed(reason) => Some(reason),
            Verdict::Rejected => Some(COMPOSITION_REJECTED),
            Verdict::Admitted(_) => None,
        }
    }
}

/// 被接受的结构
#[derive(Debug, Clone)]
pub struct AdmittedStructure {
    /// 准入序号（导出文件名使用）
    pub admission_index: usize,
    /// 在输入中的位置
    pub source_index: usize,
    pub structure: Structure,
}

/// 汇总统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub total: usize,
    pub failed_construction: usize,
    pub rejected_composition: usize,
    pub admitted: usize,
}

impl PipelineStats {
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Failed(_) => self.failed_construction += 1,
            Verdict::Rejected => self.rejected_composition += 1,
            Verdict::Admitted(_) => self.admitted += 1,
        }
    }
}

/// 流水线运行结果
#[derive(Debug, Default)]
pub struct PipelineResult {
    /// 按准入序号排列的结构
    pub admitted: Vec<AdmittedStructure>,
    pub stats: PipelineStats,
    /// 每条记录一行，按输入顺序
    pub rows: Vec<ReportRow>,
}

impl PipelineResult {
    /// 合并单条处理结果
    pub fn merge(&mut self, outcome: RecordOutcome) {
        self.stats.record(&outcome.verdict);
        self.rows.push(ReportRow::from_outcome(&outcome));

        if let Verdict::Admitted(admission_index) = outcome.verdict {
            let source_index = outcome.record.index();
            if let Some(structure) = outcome.record.into_structure() {
                self.admitted.push(AdmittedStructure {
                    admission_index,
                    source_index,
                    structure,
                });
            }
        }
    }

    /// 失败与拒绝详情 (输入位置, 原因)
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.rows
            .iter()
            .filter_map(|row| row.reason.as_deref().map(|r| (row.index, r)))
    }
}

/// 批量流水线
#[derive(Debug, Clone)]
pub struct BatchPipeline {
    rules: SiteRules,
    builder: LatticeBuilder,
    /// 并行作业数
    jobs: usize,
}

impl BatchPipeline {
    /// 创建流水线；站点规则在此一次性校验
    pub fn new(rules: SiteRules, builder: LatticeBuilder) -> Result<Self, ConfigError> {
        rules.validate()?;
        Ok(BatchPipeline {
            rules,
            builder,
            jobs: 1,
        })
    }

    /// 设置并行作业数 (0 = 自动)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn rules(&self) -> &SiteRules {
        &self.rules
    }

    /// 重建并判断成分，不分配序号
    fn judge(&self, index: usize, raw: RawCrystalArray) -> (CrystalRecord, Option<bool>) {
        let record = CrystalRecord::pending(index, raw).reconstruct(&self.builder);
        let admissible = record.structure().map(|s| is_admissible(s, &self.rules));
        (record, admissible)
    }

    /// 惰性逐条处理
    pub fn outcomes<I>(&self, records: I) -> Outcomes<'_, I::IntoIter>
    where
        I: IntoIterator<Item = RawCrystalArray>,
    {
        Outcomes {
            pipeline: self,
            inner: records.into_iter().enumerate(),
            admissions: Admissions::default(),
        }
    }

    /// 顺序处理全部记录
    pub fn run<I>(&self, records: I) -> PipelineResult
    where
        I: IntoIterator<Item = RawCrystalArray>,
    {
        let mut result = PipelineResult::default();
        for outcome in self.outcomes(records) {
            result.merge(outcome);
        }
        result
    }

    /// 并行重建，按输入顺序分配准入序号
    pub fn run_parallel(&self, records: Vec<RawCrystalArray>) -> PipelineResult {
        if self.jobs <= 1 {
            return self.run(records);
        }

        let pb = progress::create_progress_bar(records.len() as u64, "Reconstructing");

        let pool = match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
            Ok(pool) => pool,
            Err(_) => {
                pb.finish_and_clear();
                return self.run(records);
            }
        };

        // 并行阶段只做纯计算；indexed collect 保持输入顺序
        let judged: Vec<(CrystalRecord, Option<bool>)> = pool.install(|| {
            records
                .into_par_iter()
                .enumerate()
                .map(|(index, raw)| {
                    let judged = self.judge(index, raw);
                    pb.inc(1);
                    judged
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut admissions = Admissions::default();
        let mut result = PipelineResult::default();
        for (record, admissible) in judged {
            result.merge(admissions.assign(record, admissible));
        }
        result
    }
}

/// 准入序号分配器
#[derive(Debug, Default)]
struct Admissions {
    next: usize,
}

impl Admissions {
    fn assign(&mut self, record: CrystalRecord, admissible: Option<bool>) -> RecordOutcome {
        let verdict = match admissible {
            None => Verdict::Failed(
                record
                    .invalid_reason()
                    .unwrap_or("construction failed")
                    .to_string(),
            ),
            Some(false) => Verdict::Rejected,
            Some(true) => {
                let index = self.next;
                self.next += 1;
                Verdict::Admitted(index)
            }
        };
        RecordOutcome { record, verdict }
    }
}

/// 惰性结果迭代器（单遍，不可重启）
pub struct Outcomes<'a, I> {
    pipeline: &'a BatchPipeline,
    inner: std::iter::Enumerate<I>,
    admissions: Admissions,
}

impl<I> Iterator for Outcomes<'_, I>
where
    I: Iterator<Item = RawCrystalArray>,
{
    type Item = RecordOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, raw) = self.inner.next()?;
        let (record, admissible) = self.pipeline.judge(index, raw);
        Some(self.admissions.assign(record, admissible))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// 以默认晶格构建器运行整个批次
pub fn run_batch<I>(records: I, rules: SiteRules) -> Result<PipelineResult, ConfigError>
where
    I: IntoIterator<Item = RawCrystalArray>,
{
    let pipeline = BatchPipeline::new(rules, LatticeBuilder::default())?;
    Ok(pipeline.run(records))
}
