//! # inspect 命令实现
//!
//! 打印单条原始记录的晶格参数、原子类型、分数坐标以及重建结果。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::inspect::InspectArgs;
use crate::error::{FilterError, Result};
use crate::models::{classify_record, CrystalRecord};
use crate::parsers;
use crate::utils::output;

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Raw Crystal Inspection");

    let mut loaded =
        parsers::load_raw_file(&args.input, args.encoding.into(), args.format.into())?;
    output::print_info(&format!(
        "Loaded {} raw crystals ({} layout)",
        loaded.records.len(),
        loaded.tier
    ));

    if args.index >= loaded.records.len() {
        return Err(FilterError::InvalidArgument(format!(
            "record index {} out of range (file has {} records)",
            args.index,
            loaded.records.len()
        )));
    }

    let raw = loaded.records.swap_remove(args.index);
    let record = classify_record(args.index, raw);

    for line in describe_record(&record) {
        println!("  {}", line);
    }
    output::print_separator();

    match record.invalid_reason() {
        None => output::print_success(&format!("Structure {} constructed", record.index())),
        Some(reason) => output::print_warning(&format!("Invalid reason: {}", reason)),
    }

    Ok(())
}

/// 生成记录的文本描述
fn describe_record(record: &CrystalRecord) -> Vec<String> {
    let raw = record.raw();
    let mut lines = vec![
        format!("Record:          {}", record.index()),
        format!(
            "Lengths:         {:.4} {:.4} {:.4}",
            raw.lengths[0], raw.lengths[1], raw.lengths[2]
        ),
        format!(
            "Angles:          {:.4} {:.4} {:.4}",
            raw.angles[0], raw.angles[1], raw.angles[2]
        ),
        format!("Atom types:      {:?}", raw.atom_types),
        "Fractional coordinates:".to_string(),
    ];

    for coord in &raw.frac_coords {
        lines.push(format!(
            "  {:12.6} {:12.6} {:12.6}",
            coord[0], coord[1], coord[2]
        ));
    }

    lines.push(format!("State:           {:?}", record.state()));
    lines.push(format!("Constructed:     {}", record.constructed()));
    if let Some(lattice) = record.lattice() {
        lines.push(format!("Volume:          {:.4}", lattice.volume()));
    }
    if let Some(structure) = record.structure() {
        lines.push(format!("Formula:         {}", structure.formula()));
    }

    lines
}
