//! 条件评估器
//!
//! 实现各操作符的谓词以及叶子条件的求值。数值比较失败、字段缺失等
//! 数据层面的问题一律得到 `false`，不会返回错误。

use crate::models::{Leaf, Record};
use crate::operators::Operator;
use crate::path;
use serde_json::Value;

/// 条件评估器
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// 评估叶子条件
    ///
    /// 期望值若是字符串且恰好是记录顶层的某个字段名，则改用该字段的当前值，
    /// 从而支持字段之间的比较（如 `{"smn1_depth": {"<": "genome_depth"}}`）。
    pub fn evaluate_leaf(record: &Record, leaf: &Leaf) -> bool {
        let actual = path::resolve(record, &leaf.path);
        let expected = Self::resolve_expected(record, &leaf.expected);

        Self::evaluate(actual, leaf.operator, expected)
    }

    /// 评估条件
    ///
    /// # Arguments
    /// * `actual` - 从记录中取得的字段值，`None` 表示缺失或为 null
    /// * `operator` - 操作符
    /// * `expected` - 规则中定义的期望值（已完成字段引用替换）
    pub fn evaluate(actual: Option<&Value>, operator: Operator, expected: Option<&Value>) -> bool {
        match operator {
            Operator::Eq => Self::eq(actual, expected),
            Operator::Neq => !Self::eq(actual, expected),
            Operator::Gt => Self::compare(actual, expected, |a, b| a > b),
            Operator::Gte => Self::compare(actual, expected, |a, b| a >= b),
            Operator::Lt => Self::compare(actual, expected, |a, b| a < b),
            Operator::Lte => Self::compare(actual, expected, |a, b| a <= b),
            Operator::In => Self::is_member(actual, expected),
            Operator::NotIn => !Self::is_member(actual, expected),
            Operator::Contains => Self::is_member(expected, actual),
            Operator::NotContains => !Self::is_member(expected, actual),
            Operator::NotEmpty => !Self::is_empty(actual),
        }
    }

    fn resolve_expected<'a>(record: &'a Record, expected: &'a Value) -> Option<&'a Value> {
        if let Value::String(name) = expected {
            if record.contains_key(name) {
                return path::resolve_direct(record, name);
            }
        }

        if expected.is_null() { None } else { Some(expected) }
    }

    /// 判断值是否为空
    fn is_empty(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(arr)) => arr.is_empty(),
            Some(Value::Object(obj)) => obj.is_empty(),
            _ => false,
        }
    }

    /// 相等比较（缺失与缺失视为相等）
    fn eq(actual: Option<&Value>, expected: Option<&Value>) -> bool {
        match (actual, expected) {
            (None, None) => true,
            (Some(a), Some(b)) => Self::values_equal(a, b),
            (Some(v), None) | (None, Some(v)) => v.is_null(),
        }
    }

    /// 结构相等
    ///
    /// 数值统一按数值比较，避免 `13` 与 `13.0` 不相等；字符串不做数值转换。
    pub fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                (Some(i), Some(j)) => i == j,
                _ => x.as_f64() == y.as_f64(),
            },
            (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| Self::values_equal(x, y))
            }
            (Value::Object(xs), Value::Object(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|(k, x)| ys.get(k).is_some_and(|y| Self::values_equal(x, y)))
            }
            _ => a == b,
        }
    }

    /// 数值比较，任一侧无法转换为数值时返回 false
    fn compare<F>(actual: Option<&Value>, expected: Option<&Value>, cmp: F) -> bool
    where
        F: Fn(f64, f64) -> bool,
    {
        match (Self::coerce_numeric(actual), Self::coerce_numeric(expected)) {
            (Some(a), Some(b)) => cmp(a, b),
            _ => false,
        }
    }

    /// `item` 是否为 `container` 的成员
    ///
    /// - 数组：存在结构相等的元素
    /// - 字符串：`item` 为其子串
    /// - 对象：`item` 为其键
    /// - 缺失：视为空序列
    fn is_member(item: Option<&Value>, container: Option<&Value>) -> bool {
        match container {
            None => false,
            Some(Value::Array(arr)) => arr.iter().any(|v| Self::eq(item, Some(v))),
            Some(Value::String(s)) => item
                .and_then(Value::as_str)
                .is_some_and(|sub| s.contains(sub)),
            Some(Value::Object(map)) => item
                .and_then(Value::as_str)
                .is_some_and(|key| map.contains_key(key)),
            Some(_) => false,
        }
    }

    /// 尝试将值转换为 f64
    ///
    /// 数值原样接受，字符串尝试解析，其余类型（包括布尔值）不可比较。
    pub fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
        match value? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
