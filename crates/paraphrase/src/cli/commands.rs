//! CLI 参数定义
//!
//! 使用 clap derive 宏定义命令行接口。未指定的选项回退到配置文件。

use clap::Parser;
use paraphrase_shared::config::OutputFormat;
use paraphrase_shared::observability::LogFormat;
use std::path::PathBuf;

/// Paraphase 结果整理工具
///
/// 压平 Paraphase JSON 中的特殊字段，按基因规则判定状态，
/// 并把多个样本合并为一个 JSON 或 TSV。
#[derive(Parser, Debug)]
#[command(name = "paraphrase")]
#[command(version, about = "Paraphase 结果整理与基因状态判定")]
pub struct Cli {
    /// 输入的 Paraphase JSON 文件
    #[arg(short = 'f', long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// 与输入文件一一对应的样本名
    #[arg(short = 's', long = "sample", required = true, num_args = 1..)]
    pub samples: Vec<String>,

    /// 基因规则文件（YAML 或 JSON）
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// 需要丢弃的字段，逗号分隔
    #[arg(long, value_delimiter = ',')]
    pub skip_keys: Option<Vec<String>>,

    /// 只保留的基因，逗号分隔，忽略大小写
    #[arg(long, value_delimiter = ',')]
    pub genes: Option<Vec<String>>,

    /// 输出格式 (json, tsv)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// 输出文件，默认写到标准输出
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// 日志格式 (pretty, json)
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

// ============================================================================
// 单元测试
// ============================================================================
