//! 配置管理模块
//!
//! 支持多层配置文件加载、环境变量覆盖，以及类型安全的配置访问。

use crate::observability::ObservabilityConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// 处理时默认丢弃的原始字段
///
/// 这些字段是 Paraphase 的中间产物，体积大且不参与判读。
pub const DEFAULT_SKIP_KEYS: &[&str] = &[
    "sites_for_phasing",
    "assembled_haplotypes",
    "unique_supporting_reads",
    "het_sites_not_used_in_phasing",
    "nonunique_supporting_reads",
    "read_details",
    "haplotype_details",
    "heterozygous_sites",
    "homozygous_sites",
    "final_haplotypes",
    "flanking_summary",
    "linked_haplotypes",
    "alleles_raw",
    "links_loose",
    "directional_links",
    "hap_links",
    "alleles_full",
    "first_copies",
    "last_copies",
    "middle_copies",
    "sample_sex",
    "smn1_read_number",
    "smn2_read_number",
    "smn2_del78_read_number",
    "highest_total_cn",
    "gene_reads",
    "pseudo_reads",
    "del_read_number",
    "intergenic_depth",
    "phasing_success",
];

/// 格式名无法识别
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("不支持的格式: {0}")]
pub struct ParseFormatError(pub String);

/// 结果输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Tsv,
}

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "tsv" => Ok(Self::Tsv),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

/// 记录处理配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// 需要丢弃的字段
    pub skip_keys: Vec<String>,
    /// 只保留这些基因（忽略大小写），为空表示全部保留
    pub genes: Option<Vec<String>>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            skip_keys: DEFAULT_SKIP_KEYS.iter().map(|k| k.to_string()).collect(),
            genes: None,
        }
    }
}

/// 规则配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// 规则文件（YAML 或 JSON），未配置时不做状态判读
    pub path: Option<PathBuf>,
}

/// 输出配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// 输出文件，未配置时写到标准输出
    pub path: Option<PathBuf>,
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub processing: ProcessingConfig,
    pub rules: RulesConfig,
    pub output: OutputConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "paraphrase".to_string(),
            environment: "development".to_string(),
            processing: ProcessingConfig::default(),
            rules: RulesConfig::default(),
            output: OutputConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. {config_dir}/default.toml（默认配置）
    /// 2. {config_dir}/{environment}.toml（环境特定配置）
    /// 3. 环境变量（PARAPHRASE_ 前缀，层级用双下划线分隔，
    ///    如 PARAPHRASE_OUTPUT__FORMAT -> output.format）
    ///
    /// 配置目录取自 PARAPHRASE_CONFIG_DIR，默认 `config`；
    /// 环境名取自 PARAPHRASE_ENV，默认 `development`。
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("PARAPHRASE_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir =
            std::env::var("PARAPHRASE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    /// 从指定目录加载配置，文件均为可选
    pub fn load_from(config_dir: &Path, env: &str, service_name: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            // 列表型配置支持逗号分隔（PARAPHRASE_PROCESSING__GENES=smn1,f8）
            .add_source(
                Environment::with_prefix("PARAPHRASE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("processing.skip_keys")
                    .with_list_parse_key("processing.genes")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
