//! 输入输出
//!
//! 读取样本 JSON 与规则文件，把合并结果写成 JSON 或 TSV。

use crate::error::{PipelineError, Result};
use rule_engine::RuleBook;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// TSV 表头
pub const TSV_HEADER: [&str; 5] = ["sample", "locus", "status", "metric", "value"];

/// 读取 JSON 文件
pub fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::JsonLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| PipelineError::JsonLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// 读取 YAML 文件，空文件得到 null
pub fn load_yaml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::YamlLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_yaml::from_str(&content).map_err(|e| PipelineError::YamlLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// 是否按 YAML 解析（`.yaml` / `.yml`）
fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// 读取并编译规则文件
///
/// 根据扩展名选择 YAML 或 JSON 解析。空文档得到空规则集，
/// 任一规则配置错误都会使整份文件加载失败。
pub fn load_rules(path: &Path) -> Result<RuleBook> {
    let document = if is_yaml(path) {
        load_yaml(path)?
    } else {
        load_json(path)?
    };

    let book = RuleBook::new();
    if document.is_null() {
        warn!(path = %path.display(), "规则文件为空");
        return Ok(book);
    }

    let genes = book.load_document(&document)?;
    info!(path = %path.display(), genes, "规则文件已加载");
    Ok(book)
}

/// 写出格式化的 JSON
pub fn write_json<W: Write>(writer: &mut W, merged: &Map<String, Value>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, merged)?;
    writeln!(writer)?;
    Ok(())
}

/// 写出 TSV：每个样本、基因、字段一行
///
/// `status` 与 `status_matches` 不单独成行；未判定状态的基因显示 `unknown`。
pub fn write_tsv<W: Write>(writer: &mut W, merged: &Map<String, Value>) -> Result<()> {
    writeln!(writer, "{}", TSV_HEADER.join("\t"))?;

    for (sample, loci) in merged {
        let Some(loci) = loci.as_object() else {
            continue;
        };

        for (locus, info) in loci {
            let Some(info) = info.as_object() else {
                continue;
            };
            let status = info
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("unknown");

            for (metric, value) in info {
                if metric == "status" || metric == "status_matches" {
                    continue;
                }
                let cell = stringify_value(value).unwrap_or_default();
                writeln!(writer, "{}\t{}\t{}\t{}\t{}", sample, locus, status, metric, cell)?;
            }
        }
    }

    Ok(())
}

/// 把任意值压平成单元格文本，空值返回 `None`
///
/// - 标量原样输出
/// - 简单列表以 `,` 连接并丢弃 null；嵌套列表内层以 `|` 连接
/// - 映射输出为 `k:v`，以 `,` 连接并跳过空值；嵌套映射输出为 `k:sub=v|sub2=v`
pub fn stringify_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Array(inner) => {
                        let inner: Vec<String> = inner.iter().filter_map(stringify_value).collect();
                        (!inner.is_empty()).then(|| inner.join("|"))
                    }
                    other => stringify_value(other),
                })
                .collect();
            join_non_empty(parts, ",")
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(key, value)| match value {
                    Value::Object(sub) => {
                        let sub_items: Vec<String> = sub
                            .iter()
                            .filter_map(|(k, v)| stringify_value(v).map(|s| format!("{}={}", k, s)))
                            .collect();
                        join_non_empty(sub_items, "|").map(|s| format!("{}:{}", key, s))
                    }
                    other => stringify_value(other).map(|s| format!("{}:{}", key, s)),
                })
                .collect();
            join_non_empty(parts, ",")
        }
    }
}

fn join_non_empty(parts: Vec<String>, separator: &str) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(separator))
    }
}
