//! 规则引擎领域模型

use crate::error::{Result, RuleError};
use crate::operators::Operator;
use serde::Serialize;
use serde_json::{Map, Value};

/// 单个样本中单个基因的处理后字段集合
pub type Record = Map<String, Value>;

/// 未配置 `default_status` 时的默认状态
pub const DEFAULT_STATUS: &str = "normal";

/// 未配置 `status_order` 时的默认严重度顺序（由轻到重）
pub const DEFAULT_STATUS_ORDER: [&str; 3] = ["normal", "intermediate", "pathological"];

pub fn default_status_order() -> Vec<String> {
    DEFAULT_STATUS_ORDER.iter().map(|s| s.to_string()).collect()
}

/// 条件表达式（规则中的 `when`）
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// 表达式为空或缺失，恒为真
    Absent,
    /// 全部子条件为真（空列表为真）
    AllOf(Vec<Condition>),
    /// 任一子条件为真（空列表为假）
    AnyOf(Vec<Condition>),
    Not(Box<Condition>),
    /// 字段映射，多个字段之间为隐式 AND
    FieldMap(Vec<Leaf>),
    /// 无法识别的表达式形态，恒为假
    Unsupported(Value),
}

impl Condition {
    pub fn leaf(path: impl Into<String>, operator: Operator, expected: impl Into<Value>) -> Self {
        Self::FieldMap(vec![Leaf::new(path, operator, expected)])
    }

    pub fn all(children: Vec<Condition>) -> Self {
        Self::AllOf(children)
    }

    pub fn any(children: Vec<Condition>) -> Self {
        Self::AnyOf(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Condition) -> Self {
        Self::Not(Box::new(inner))
    }

    /// 收集条件中引用的所有字段路径
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut Vec<&'a str>) {
        match self {
            Self::AllOf(children) | Self::AnyOf(children) => {
                for child in children {
                    child.collect_fields(fields);
                }
            }
            Self::Not(inner) => inner.collect_fields(fields),
            Self::FieldMap(leaves) => {
                for leaf in leaves {
                    if !fields.contains(&leaf.path.as_str()) {
                        fields.push(&leaf.path);
                    }
                }
            }
            Self::Absent | Self::Unsupported(_) => {}
        }
    }
}

/// 叶子条件：一个字段路径、一个操作符和一个期望值
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub path: String,
    pub operator: Operator,
    pub expected: Value,
}

impl Leaf {
    pub fn new(path: impl Into<String>, operator: Operator, expected: impl Into<Value>) -> Self {
        Self {
            path: path.into(),
            operator,
            expected: expected.into(),
        }
    }
}

/// 编译后的单条规则
#[derive(Debug, Clone)]
pub struct Rule {
    /// 在规则文档 `rules` 列表中的原始位置（从 0 开始）
    pub index: usize,
    pub status: String,
    pub when: Condition,
    pub reason: Option<String>,
    /// 规则原文，用于输出匹配追踪
    pub source: Value,
}

impl Rule {
    pub fn new(index: usize, status: impl Into<String>, when: Condition) -> Self {
        let status = status.into();
        Self {
            index,
            source: serde_json::json!({ "status": status.clone() }),
            status,
            when,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if let Value::Object(map) = &mut self.source {
            map.insert("reason".to_string(), Value::String(reason.clone()));
        }
        self.reason = Some(reason);
        self
    }
}

/// 单个基因的规则集
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub gene: String,
    pub default_status: String,
    /// 严重度顺序，位置越靠后越严重
    pub status_order: Vec<String>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(gene: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            gene: gene.into(),
            default_status: DEFAULT_STATUS.to_string(),
            status_order: default_status_order(),
            rules,
        }
    }

    pub fn with_default_status(mut self, status: impl Into<String>) -> Self {
        self.default_status = status.into();
        self
    }

    pub fn with_status_order(mut self, order: Vec<String>) -> Self {
        self.status_order = order;
        self
    }

    /// 状态的严重度排名，即其在 `status_order` 中的位置
    pub fn rank(&self, status: &str) -> Result<usize> {
        self.status_order
            .iter()
            .position(|s| s == status)
            .ok_or_else(|| RuleError::UnknownStatus {
                status: status.to_string(),
                allowed: self.status_order.clone(),
            })
    }
}

/// 一条规则命中的证据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMatch {
    pub status: String,
    pub rule_index: usize,
    pub reason: String,
    pub rule: Value,
}

/// 一次基因分类的结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    /// `None` 表示该基因没有配置规则，调用方不应写入状态
    pub status: Option<String>,
    /// 所有命中的规则（不只是被选中的那一条）
    pub matches: Vec<RuleMatch>,
}

impl Classification {
    pub fn unclassified() -> Self {
        Self::default()
    }

    pub fn is_classified(&self) -> bool {
        self.status.is_some()
    }
}
