//! 规则引擎错误类型
//!
//! 只有规则文档的书写错误才会以错误返回；字段缺失、数值无法比较、
//! 没有规则命中等数据层面的情况都不是错误。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    ParseError(String),

    #[error("不支持的操作符: '{operator}' (字段 {path})")]
    UnsupportedOperator { operator: String, path: String },

    #[error("字段 {path} 只允许一个操作符, 实际 {count} 个")]
    OperatorCount { path: String, count: usize },

    #[error("未知状态 '{status}', 允许的状态: {allowed:?}")]
    UnknownStatus {
        status: String,
        allowed: Vec<String>,
    },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    /// 是否为规则配置错误（区别于 JSON 文本本身无法解析）
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::JsonError(_))
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_message() {
        let err = RuleError::UnknownStatus {
            status: "severe".to_string(),
            allowed: vec!["normal".to_string(), "pathological".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"未知状态 'severe', 允许的状态: ["normal", "pathological"]"#
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_json_error_is_not_configuration_error() {
        let err: RuleError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(!err.is_configuration_error());
        assert!(RuleError::ParseError("bad".to_string()).is_configuration_error());
    }
}
