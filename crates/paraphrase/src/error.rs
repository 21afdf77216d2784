//! 处理流程错误定义

use rule_engine::RuleError;
use std::path::PathBuf;
use thiserror::Error;

/// 处理流程错误类型
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("输入文件数量 ({inputs}) 与样本名数量 ({samples}) 不一致")]
    InputMismatch { inputs: usize, samples: usize },

    #[error("读取 JSON 文件失败 {}: {message}", .path.display())]
    JsonLoad { path: PathBuf, message: String },

    #[error("读取 YAML 文件失败 {}: {message}", .path.display())]
    YamlLoad { path: PathBuf, message: String },

    #[error("样本数据格式错误: {0}")]
    InvalidSample(String),

    #[error("规则配置错误: {0}")]
    Rule(#[from] RuleError),

    #[error("序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_mismatch_message() {
        let err = PipelineError::InputMismatch {
            inputs: 2,
            samples: 1,
        };
        assert_eq!(err.to_string(), "输入文件数量 (2) 与样本名数量 (1) 不一致");
    }

    #[test]
    fn test_load_error_includes_path() {
        let err = PipelineError::JsonLoad {
            path: PathBuf::from("/data/S1.json"),
            message: "EOF".to_string(),
        };
        assert!(err.to_string().contains("/data/S1.json"));
    }

    #[test]
    fn test_rule_error_conversion() {
        let err: PipelineError = RuleError::ParseError("bad".to_string()).into();
        assert!(matches!(err, PipelineError::Rule(_)));
    }
}
