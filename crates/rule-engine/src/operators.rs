//! 规则操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 条件操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // 通用比较
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,

    // 数值比较
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,

    // 成员检查
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,

    // 空值检查
    #[serde(rename = "not_empty")]
    NotEmpty,
}

/// 操作符登记表
///
/// 规则文档中的操作符名称与枚举变体的唯一对应关系。新增操作符时在此登记，
/// 并在 `ConditionEvaluator::evaluate` 中给出对应的谓词。
pub const OPERATOR_TABLE: &[(&str, Operator)] = &[
    ("==", Operator::Eq),
    ("!=", Operator::Neq),
    (">", Operator::Gt),
    (">=", Operator::Gte),
    ("<", Operator::Lt),
    ("<=", Operator::Lte),
    ("in", Operator::In),
    ("not_in", Operator::NotIn),
    ("contains", Operator::Contains),
    ("not_contains", Operator::NotContains),
    ("not_empty", Operator::NotEmpty),
];

impl Operator {
    /// 按规则文档中的名称查找操作符
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|(name, _)| *name == symbol)
            .map(|(_, op)| *op)
    }

    pub fn symbol(&self) -> &'static str {
        OPERATOR_TABLE
            .iter()
            .find(|(_, op)| op == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    /// 是否为数值比较操作符（操作数需先做数值转换）
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 逻辑操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    All,
    Any,
    Not,
}

impl LogicalOperator {
    /// 识别规则文档中的组合关键字 `all` / `any` / `not`
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "all" => Some(Self::All),
            "any" => Some(Self::Any),
            "not" => Some(Self::Not),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Any => write!(f, "ANY"),
            Self::Not => write!(f, "NOT"),
        }
    }
}
