//! # 成分过滤模块
//!
//! 按站点规则判断结构的元素组成是否可接受。
//!
//! ## 判定规则
//! 1. 闭世界检查：结构中每种元素都必须属于某个站点的可用集合
//! 2. 覆盖检查：每个站点至少有一种可用元素出现在结构中（各站点取 AND）
//!
//! 两项同时满足才可接受。空结构不可接受；空规则不接受任何非空结构。
//! 同一元素出现在多个站点下时，它会同时满足这些站点的覆盖检查。
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 使用
//! - 子模块: rules

pub mod rules;

pub use rules::SiteRules;

use crate::models::Structure;

/// 判断结构成分是否满足站点规则
pub fn is_admissible(structure: &Structure, rules: &SiteRules) -> bool {
    if structure.is_empty() {
        return false;
    }

    let present = structure.distinct_elements();
    let all_allowed = rules.all_allowed();

    if !present.iter().all(|e| all_allowed.contains(e)) {
        return false;
    }

    rules
        .sites()
        .all(|(_, allowed)| allowed.iter().any(|e| present.contains(e)))
}
