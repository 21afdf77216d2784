//! 条件表达式执行器
//!
//! 对编译后的条件树做短路求值，可选地记录每个节点的评估追踪。

use crate::compiler::RuleCompiler;
use crate::error::Result;
use crate::evaluator::ConditionEvaluator;
use crate::models::{Condition, Leaf, Record};
use serde_json::Value;

/// 评估条件表达式
pub fn eval_when(record: &Record, condition: &Condition) -> bool {
    RuleExecutor::new().execute(record, condition).matched
}

/// 编译并评估一段原始的 `when` 表达式
///
/// 未知操作符、单个字段多个操作符等配置错误以 `Err` 返回。
pub fn eval_when_value(record: &Record, when: &Value) -> Result<bool> {
    let condition = RuleCompiler::new().compile_condition(when)?;
    Ok(eval_when(record, &condition))
}

/// 表达式评估结果
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub matched: bool,
    pub evaluation_trace: Vec<String>,
}

/// 条件执行器
#[derive(Debug, Default)]
pub struct RuleExecutor {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    /// 执行条件评估
    pub fn execute(&self, record: &Record, condition: &Condition) -> ExecutionResult {
        let mut result = ExecutionResult::default();
        let matched = self.evaluate_node(condition, record, &mut result, "when");
        result.matched = matched;
        result
    }

    /// 递归评估条件节点
    fn evaluate_node(
        &self,
        node: &Condition,
        record: &Record,
        result: &mut ExecutionResult,
        path: &str,
    ) -> bool {
        match node {
            Condition::Absent => {
                self.trace(result, || format!("{}: 空条件 => MATCHED", path));
                true
            }
            Condition::AllOf(children) => self.evaluate_all(children, record, result, path),
            Condition::AnyOf(children) => self.evaluate_any(children, record, result, path),
            Condition::Not(inner) => {
                let matched = !self.evaluate_node(inner, record, result, &format!("{}.not", path));
                self.trace(result, || format!("{}: NOT => {}", path, label(matched)));
                matched
            }
            Condition::FieldMap(leaves) => self.evaluate_field_map(leaves, record, result, path),
            Condition::Unsupported(value) => {
                self.trace(result, || format!("{}: 无法识别的表达式 {} => NOT_MATCHED", path, value));
                false
            }
        }
    }

    /// AND：遇到 false 立即返回
    fn evaluate_all(
        &self,
        children: &[Condition],
        record: &Record,
        result: &mut ExecutionResult,
        path: &str,
    ) -> bool {
        for (i, child) in children.iter().enumerate() {
            let child_path = format!("{}.all[{}]", path, i);
            if !self.evaluate_node(child, record, result, &child_path) {
                self.trace(result, || format!("{}: ALL 短路 - 子节点 {} 不匹配", path, i));
                return false;
            }
        }

        self.trace(result, || format!("{}: ALL 组全部匹配", path));
        true
    }

    /// OR：遇到 true 立即返回
    fn evaluate_any(
        &self,
        children: &[Condition],
        record: &Record,
        result: &mut ExecutionResult,
        path: &str,
    ) -> bool {
        for (i, child) in children.iter().enumerate() {
            let child_path = format!("{}.any[{}]", path, i);
            if self.evaluate_node(child, record, result, &child_path) {
                self.trace(result, || format!("{}: ANY 短路 - 子节点 {} 匹配", path, i));
                return true;
            }
        }

        self.trace(result, || format!("{}: ANY 组无匹配", path));
        false
    }

    /// 字段映射：所有叶子都满足才为真（隐式 AND）
    fn evaluate_field_map(
        &self,
        leaves: &[Leaf],
        record: &Record,
        result: &mut ExecutionResult,
        path: &str,
    ) -> bool {
        for leaf in leaves {
            let matched = ConditionEvaluator::evaluate_leaf(record, leaf);
            self.trace(result, || {
                format!(
                    "{}: {} {} {} => {}",
                    path,
                    leaf.path,
                    leaf.operator,
                    leaf.expected,
                    label(matched)
                )
            });

            if !matched {
                return false;
            }
        }

        true
    }

    fn trace<F>(&self, result: &mut ExecutionResult, line: F)
    where
        F: FnOnce() -> String,
    {
        if self.trace_enabled {
            result.evaluation_trace.push(line());
        }
    }
}

fn label(matched: bool) -> &'static str {
    if matched { "MATCHED" } else { "NOT_MATCHED" }
}
