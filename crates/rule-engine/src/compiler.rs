//! 规则编译器
//!
//! 将规则文档（基因 → 规则集）解析为内存中的条件树。配置错误（未知操作符、
//! 一个字段写了多个操作符、状态不在 `status_order` 中）在编译阶段即报错。

use crate::error::{Result, RuleError};
use crate::models::{default_status_order, Condition, Leaf, Rule, RuleSet, DEFAULT_STATUS};
use crate::operators::{LogicalOperator, Operator};
use serde_json::{Map, Value};
use tracing::debug;

/// 规则编译器
#[derive(Debug, Default)]
pub struct RuleCompiler;

impl RuleCompiler {
    pub fn new() -> Self {
        Self
    }

    /// 从 JSON 字符串编译整份规则文档
    pub fn compile_from_json(&self, json: &str) -> Result<Vec<RuleSet>> {
        let document: Value = serde_json::from_str(json)?;
        self.compile_document(&document)
    }

    /// 编译规则文档
    ///
    /// 文档顶层为基因名到规则集的映射。规则集为 null 或空映射的基因视为未配置，
    /// 不会出现在结果中。
    pub fn compile_document(&self, document: &Value) -> Result<Vec<RuleSet>> {
        let genes = document.as_object().ok_or_else(|| {
            RuleError::ParseError(format!(
                "规则文档顶层必须是基因到规则集的映射, 实际为 {}",
                type_name(document)
            ))
        })?;

        let mut rule_sets = Vec::with_capacity(genes.len());
        for (gene, value) in genes {
            if is_blank(value) {
                debug!(gene = %gene, "规则集为空, 跳过");
                continue;
            }
            rule_sets.push(self.compile_rule_set(gene, value)?);
        }

        Ok(rule_sets)
    }

    /// 编译单个基因的规则集
    pub fn compile_rule_set(&self, gene: &str, value: &Value) -> Result<RuleSet> {
        let map = value.as_object().ok_or_else(|| {
            RuleError::ParseError(format!("基因 '{}' 的规则集必须是映射", gene))
        })?;

        let default_status = match map.get("default_status") {
            None | Some(Value::Null) => DEFAULT_STATUS.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(RuleError::ParseError(format!(
                    "基因 '{}' 的 default_status 必须是字符串, 实际为 {}",
                    gene,
                    type_name(other)
                )));
            }
        };

        let status_order = self.compile_status_order(gene, map)?;

        let raw_rules = match map.get("rules") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(rules)) => rules.as_slice(),
            Some(other) => {
                return Err(RuleError::ParseError(format!(
                    "基因 '{}' 的 rules 必须是列表, 实际为 {}",
                    gene,
                    type_name(other)
                )));
            }
        };

        let mut rules = Vec::with_capacity(raw_rules.len());
        for (index, raw) in raw_rules.iter().enumerate() {
            if let Some(rule) = self.compile_rule(gene, index, raw)? {
                rules.push(rule);
            }
        }

        let rule_set = RuleSet {
            gene: gene.to_string(),
            default_status,
            status_order,
            rules,
        };

        self.validate_statuses(&rule_set)?;

        Ok(rule_set)
    }

    /// 编译 `when` 表达式
    pub fn compile_condition(&self, when: &Value) -> Result<Condition> {
        self.compile_node(when, "when")
    }

    fn compile_status_order(&self, gene: &str, map: &Map<String, Value>) -> Result<Vec<String>> {
        let order = match map.get("status_order") {
            None | Some(Value::Null) => return Ok(default_status_order()),
            Some(Value::Array(order)) if order.is_empty() => return Ok(default_status_order()),
            Some(Value::Array(order)) => order,
            Some(other) => {
                return Err(RuleError::ParseError(format!(
                    "基因 '{}' 的 status_order 必须是列表, 实际为 {}",
                    gene,
                    type_name(other)
                )));
            }
        };

        order
            .iter()
            .map(|status| {
                status.as_str().map(str::to_string).ok_or_else(|| {
                    RuleError::ParseError(format!(
                        "基因 '{}' 的 status_order 只能包含字符串",
                        gene
                    ))
                })
            })
            .collect()
    }

    /// 编译单条规则，没有状态的规则返回 `None`
    fn compile_rule(&self, gene: &str, index: usize, raw: &Value) -> Result<Option<Rule>> {
        let location = format!("{}.rules[{}]", gene, index);

        let map = raw.as_object().ok_or_else(|| {
            RuleError::ParseError(format!("规则 '{}' 必须是映射", location))
        })?;

        let status = match map.get("status") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                debug!(rule = %location, "规则缺少 status, 跳过");
                return Ok(None);
            }
        };

        let when = match map.get("when") {
            Some(when) => self.compile_node(when, &format!("{}.when", location))?,
            None => Condition::Absent,
        };

        let reason = match map.get("reason") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(Some(Rule {
            index,
            status,
            when,
            reason,
            source: raw.clone(),
        }))
    }

    /// 递归编译条件节点
    fn compile_node(&self, node: &Value, location: &str) -> Result<Condition> {
        let map = match node {
            Value::Null => return Ok(Condition::Absent),
            Value::Object(map) => map,
            other => return Ok(Condition::Unsupported(other.clone())),
        };

        if map.is_empty() {
            return Ok(Condition::Absent);
        }

        if let (1, Some((key, value))) = (map.len(), map.iter().next()) {
            if let Some(logical) = LogicalOperator::from_keyword(key) {
                return self.compile_group(logical, node, value, location);
            }
        }

        // 多个键为隐式 AND，每个键都按叶子条件处理
        let leaves = map
            .iter()
            .map(|(field, spec)| self.compile_leaf(field, spec, location))
            .collect::<Result<Vec<_>>>()?;

        Ok(Condition::FieldMap(leaves))
    }

    fn compile_group(
        &self,
        logical: LogicalOperator,
        node: &Value,
        value: &Value,
        location: &str,
    ) -> Result<Condition> {
        match logical {
            LogicalOperator::Not => {
                // 操作数无法识别时整个节点不匹配
                match self.compile_node(value, &format!("{}.not", location))? {
                    Condition::Unsupported(_) => Ok(Condition::Unsupported(node.clone())),
                    inner => Ok(Condition::not(inner)),
                }
            }
            LogicalOperator::All | LogicalOperator::Any => {
                let Some(children) = value.as_array() else {
                    return Ok(Condition::Unsupported(node.clone()));
                };

                let keyword = if logical == LogicalOperator::All { "all" } else { "any" };
                let children = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| {
                        self.compile_node(child, &format!("{}.{}[{}]", location, keyword, i))
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(if logical == LogicalOperator::All {
                    Condition::AllOf(children)
                } else {
                    Condition::AnyOf(children)
                })
            }
        }
    }

    /// 编译叶子条件：`{field: scalar}` 或 `{field: {op: expected}}`
    fn compile_leaf(&self, field: &str, spec: &Value, location: &str) -> Result<Leaf> {
        if field.is_empty() {
            return Err(RuleError::ParseError(format!(
                "条件 '{}' 的字段不能为空",
                location
            )));
        }

        let Value::Object(ops) = spec else {
            return Ok(Leaf::new(field, Operator::Eq, spec.clone()));
        };

        let path = format!("{}.{}", location, field);
        let (symbol, expected) = match ops.iter().next() {
            Some(entry) if ops.len() == 1 => entry,
            _ => {
                return Err(RuleError::OperatorCount {
                    path,
                    count: ops.len(),
                });
            }
        };
        let operator = Operator::from_symbol(symbol).ok_or_else(|| RuleError::UnsupportedOperator {
            operator: symbol.clone(),
            path,
        })?;

        Ok(Leaf::new(field, operator, expected.clone()))
    }

    /// 校验每条规则的状态都在 `status_order` 中
    fn validate_statuses(&self, rule_set: &RuleSet) -> Result<()> {
        for rule in &rule_set.rules {
            rule_set.rank(&rule.status)?;
        }
        Ok(())
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// 获取值的类型名称
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
