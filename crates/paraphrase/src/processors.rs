//! 样本记录处理
//!
//! 把 Paraphase 的原始基因记录整理成便于判读的扁平结构：
//! 按字段名套用处理函数、丢弃无用字段、按基因过滤，最后用规则集标注状态。

use crate::error::{PipelineError, Result};
use rule_engine::{Record, RuleBook, RuleResolver};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// 字段处理函数，输入形状不符时返回 `None`
pub type Handler = fn(&Value) -> Option<Value>;

/// 写入记录的状态字段
pub const STATUS_KEY: &str = "status";
/// 写入记录的命中追踪字段
pub const STATUS_MATCHES_KEY: &str = "status_matches";

/// 按字段名查找处理函数
pub fn handler_for(metric: &str) -> Option<Handler> {
    match metric {
        "region_depth" => Some(handle_region_depth),
        "final_haplotypes" | "smn1_haplotypes" | "smn2_haplotypes" | "smn_del78_haplotypes"
        | "smn2_del78_haplotypes" => Some(handle_haplotypes),
        "flanking_summary" => Some(handle_map_to_list),
        "fusions_called" => Some(handle_fusions_called),
        "phase_region" => Some(handle_phase_region),
        _ => None,
    }
}

/// `{"median": 38.0, "percentile80": 45.2}` → `38.0`
pub fn handle_region_depth(value: &Value) -> Option<Value> {
    value.as_object()?.get("median").cloned()
}

/// 单倍型映射（序列 → 名称）→ 名称列表
pub fn handle_haplotypes(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    Some(Value::Array(map.values().cloned().collect()))
}

/// `{"f8_int22h1hap1": "region1-region1"}` → `["f8_int22h1hap1:region1-region1"]`
pub fn handle_map_to_list(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    Some(Value::Array(
        map.iter()
            .map(|(k, v)| Value::String(format!("{}:{}", k, plain_text(v))))
            .collect(),
    ))
}

/// 去掉每个单倍型融合信息中的 `sequence`
pub fn handle_fusions_called(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    let stripped = map
        .iter()
        .map(|(haplotype, info)| {
            let info = match info {
                Value::Object(fields) => Value::Object(
                    fields
                        .iter()
                        .filter(|(k, _)| k.as_str() != "sequence")
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ),
                other => other.clone(),
            };
            (haplotype.clone(), info)
        })
        .collect();

    Some(Value::Object(stripped))
}

/// `"38:chr1:196740000-196772000,38:chr1:196786000-196830000"`
/// → `["chr1:196740000-196772000", "chr1:196786000-196830000"]`
///
/// 不含 `:` 的片段被丢弃，空字符串得到空列表。
pub fn handle_phase_region(value: &Value) -> Option<Value> {
    let regions = value.as_str()?;
    Some(Value::Array(
        regions
            .split(',')
            .filter_map(|region| region.split_once(':'))
            .map(|(_, rest)| Value::String(rest.to_string()))
            .collect(),
    ))
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 处理单个基因的记录
///
/// 跳过 `skip_keys` 中的字段和 null 值，其余字段套用对应的处理函数。
/// 处理函数无法识别输入形状时保留原值。
pub fn process_gene_info(gene_info: &Map<String, Value>, skip_keys: &HashSet<String>) -> Record {
    let mut processed = Record::new();

    for (metric, value) in gene_info {
        if value.is_null() || skip_keys.contains(metric) {
            continue;
        }

        let value = match handler_for(metric) {
            Some(handler) => handler(value).unwrap_or_else(|| {
                warn!(metric = %metric, "字段形状不符合预期, 保留原值");
                value.clone()
            }),
            None => value.clone(),
        };

        processed.insert(metric.clone(), value);
    }

    processed
}

/// 记录处理选项
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// 需要丢弃的字段
    pub skip_keys: HashSet<String>,
    /// 只保留的基因，`None` 或空列表表示全部保留
    pub genes: Option<Vec<String>>,
    /// 规则集，`None` 时不做状态标注
    pub rules: Option<RuleBook>,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genes(mut self, genes: Vec<String>) -> Self {
        self.genes = Some(genes);
        self
    }

    pub fn with_rules(mut self, rules: RuleBook) -> Self {
        self.rules = Some(rules);
        self
    }

    /// 空白基因名忽略；没有有效基因名时不过滤
    fn gene_filter(&self) -> Option<HashSet<String>> {
        let genes: HashSet<String> = self
            .genes
            .as_ref()?
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        (!genes.is_empty()).then_some(genes)
    }
}

/// 处理单个样本的 Paraphase 结果（基因 → 记录）
pub fn process_sample(data: &Value, options: &ProcessingOptions) -> Result<Map<String, Value>> {
    let genes = data.as_object().ok_or_else(|| {
        PipelineError::InvalidSample("顶层必须是基因到记录的映射".to_string())
    })?;
    let keep = options.gene_filter();
    let resolver = RuleResolver::new();

    let mut out = Map::new();
    for (gene, info) in genes {
        if keep.as_ref().is_some_and(|k| !k.contains(&gene.to_lowercase())) {
            continue;
        }

        let Some(info) = info.as_object() else {
            warn!(gene = %gene, "基因记录不是映射, 跳过");
            continue;
        };

        let mut processed = process_gene_info(info, &options.skip_keys);
        if let Some(book) = &options.rules {
            annotate(&resolver, gene, &mut processed, book)?;
        }

        out.insert(gene.clone(), Value::Object(processed));
    }

    Ok(out)
}

/// 用规则集为记录写入 `status` 和 `status_matches`
fn annotate(resolver: &RuleResolver, gene: &str, record: &mut Record, book: &RuleBook) -> Result<()> {
    let classification = resolver.evaluate(gene, record, book)?;

    let Some(status) = classification.status else {
        return Ok(());
    };
    debug!(gene = %gene, status = %status, matches = classification.matches.len(), "基因状态已判定");

    record.insert(STATUS_KEY.to_string(), Value::String(status));
    if !classification.matches.is_empty() {
        record.insert(
            STATUS_MATCHES_KEY.to_string(),
            serde_json::to_value(&classification.matches)?,
        );
    }

    Ok(())
}
