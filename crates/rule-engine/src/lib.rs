//! 基因分型规则引擎
//!
//! 对每个样本、每个基因的记录评估声明式规则，给出严重度状态：
//! - 点号路径查找与字段引用
//! - `all` / `any` / `not` 组合以及多键隐式 AND
//! - 按 `status_order` 选出最严重的命中状态，并保留全部命中追踪

pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod models;
pub mod operators;
pub mod path;
pub mod resolver;
pub mod store;

pub use compiler::RuleCompiler;
pub use error::{Result, RuleError};
pub use evaluator::ConditionEvaluator;
pub use executor::{eval_when, eval_when_value, ExecutionResult, RuleExecutor};
pub use models::{
    Classification, Condition, Leaf, Record, Rule, RuleMatch, RuleSet, DEFAULT_STATUS,
    DEFAULT_STATUS_ORDER,
};
pub use operators::{LogicalOperator, Operator, OPERATOR_TABLE};
pub use resolver::RuleResolver;
pub use store::{RuleBook, RuleBookStats};
