//! # 站点规则
//!
//! 站点标签 (如 "A"、"B"、"X") 到可用元素集合的映射。
//!
//! ## 来源
//! - `--site A=Bi,Pb,Ca` 命令行参数（可重复）
//! - JSON 文件 `{"A": ["Bi", "Pb", "Ca"], ...}`
//! - 默认钙钛矿预设
//!
//! ## 依赖关系
//! - 被 `composition/mod.rs`、`batch/pipeline.rs` 和 `commands/filter.rs` 使用
//! - 使用 `models/element.rs`

use crate::error::ConfigError;
use crate::models::Element;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// 站点规则集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRules {
    sites: BTreeMap<String, BTreeSet<Element>>,
}

impl SiteRules {
    /// ABX3 钙钛矿预设: A = {Bi, Pb, Ca}, B = {Fe, Ti}, X = {O}
    pub fn perovskite() -> Self {
        let preset: [(&str, &[&str]); 3] = [
            ("A", &["Bi", "Pb", "Ca"]),
            ("B", &["Fe", "Ti"]),
            ("X", &["O"]),
        ];
        let sites = preset
            .iter()
            .map(|(label, symbols)| {
                let set = symbols.iter().filter_map(|s| Element::from_symbol(s)).collect();
                (label.to_string(), set)
            })
            .collect();
        SiteRules { sites }
    }

    /// 解析命令行规则，如 `["A=Bi,Pb,Ca", "B=Fe,Ti", "X=O"]`
    pub fn from_cli_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let mut sites: BTreeMap<String, BTreeSet<Element>> = BTreeMap::new();

        for arg in args {
            let arg = arg.as_ref();
            let (label, symbols) = arg
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedRule(arg.to_string()))?;
            let label = label.trim();
            if label.is_empty() {
                return Err(ConfigError::MalformedRule(arg.to_string()));
            }
            if sites.contains_key(label) {
                return Err(ConfigError::DuplicateSite(label.to_string()));
            }

            let set = parse_symbols(label, symbols.split(','))?;
            sites.insert(label.to_string(), set);
        }

        Ok(SiteRules { sites })
    }

    /// 解析 JSON 规则文件内容，重复的站点标签报错
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: RuleEntries = serde_json::from_str(content)
            .map_err(|e| ConfigError::MalformedRule(format!("rules file: {}", e)))?;

        let mut sites = BTreeMap::new();
        for (label, symbols) in file.0 {
            if sites.contains_key(&label) {
                return Err(ConfigError::DuplicateSite(label));
            }
            let set = parse_symbols(&label, symbols.iter().map(String::as_str))?;
            sites.insert(label, set);
        }
        Ok(SiteRules { sites })
    }

    /// 启动时校验：至少一个站点，每个站点非空
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sites.is_empty() {
            return Err(ConfigError::NoSites);
        }
        if let Some((label, _)) = self.sites.iter().find(|(_, set)| set.is_empty()) {
            return Err(ConfigError::EmptySite(label.clone()));
        }
        Ok(())
    }

    /// 出现在多个站点下的元素及其站点标签
    pub fn shared_elements(&self) -> Vec<(Element, Vec<&str>)> {
        let mut owners: BTreeMap<Element, Vec<&str>> = BTreeMap::new();
        for (label, set) in &self.sites {
            for &element in set {
                owners.entry(element).or_default().push(label.as_str());
            }
        }
        owners.into_iter().filter(|(_, labels)| labels.len() > 1).collect()
    }

    /// 所有站点可用元素的并集
    pub fn all_allowed(&self) -> BTreeSet<Element> {
        self.sites.values().flatten().copied().collect()
    }

    pub fn sites(&self) -> impl Iterator<Item = (&str, &BTreeSet<Element>)> {
        self.sites.iter().map(|(label, set)| (label.as_str(), set))
    }

    /// 单行描述，如 `A=[Ca,Pb,Bi] B=[Ti,Fe] X=[O]`
    pub fn describe(&self) -> String {
        self.sites
            .iter()
            .map(|(label, set)| {
                let symbols: Vec<&str> = set.iter().map(|e| e.symbol()).collect();
                format!("{}=[{}]", label, symbols.join(","))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// JSON 规则文件的条目，按出现顺序保留（含重复键）
struct RuleEntries(Vec<(String, Vec<String>)>);

impl<'de> Deserialize<'de> for RuleEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RuleEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from site label to element symbols")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(RuleEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn parse_symbols<'a>(
    label: &str,
    symbols: impl Iterator<Item = &'a str>,
) -> Result<BTreeSet<Element>, ConfigError> {
    symbols
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Element::from_symbol(s).ok_or_else(|| ConfigError::UnknownElement {
                site: label.to_string(),
                symbol: s.to_string(),
            })
        })
        .collect()
}
