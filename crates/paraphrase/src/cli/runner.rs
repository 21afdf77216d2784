//! 命令执行器
//!
//! 把命令行参数与配置文件合并为最终设置，执行处理流程并写出结果。

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use paraphrase_shared::config::{AppConfig, OutputFormat};
use tracing::info;

use super::commands::Cli;
use crate::io::{load_rules, write_json, write_tsv};
use crate::pipeline::merge_files;
use crate::processors::ProcessingOptions;

/// 合并后的运行设置，命令行优先于配置文件
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub inputs: Vec<PathBuf>,
    pub samples: Vec<String>,
    pub rules: Option<PathBuf>,
    pub skip_keys: Vec<String>,
    pub genes: Option<Vec<String>>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl RunSettings {
    pub fn resolve(cli: Cli, config: &AppConfig) -> Self {
        Self {
            inputs: cli.inputs,
            samples: cli.samples,
            rules: cli.rules.or_else(|| config.rules.path.clone()),
            skip_keys: cli
                .skip_keys
                .map(non_blank)
                .unwrap_or_else(|| config.processing.skip_keys.clone()),
            // `--genes ""` 等同于不过滤
            genes: match cli.genes {
                Some(genes) => Some(non_blank(genes)).filter(|genes| !genes.is_empty()),
                None => config.processing.genes.clone(),
            },
            format: cli.format.unwrap_or(config.output.format),
            output: cli.output.or_else(|| config.output.path.clone()),
        }
    }
}

/// 去掉首尾空白并丢弃空项
fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// 命令执行器
pub struct CommandRunner {
    settings: RunSettings,
}

impl CommandRunner {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    /// 执行完整流程：加载规则 → 处理样本 → 写出结果
    pub fn run(&self) -> Result<()> {
        let settings = &self.settings;

        let mut options = ProcessingOptions::new().with_skip_keys(settings.skip_keys.iter().cloned());
        if let Some(genes) = &settings.genes {
            options = options.with_genes(genes.clone());
        }
        if let Some(path) = &settings.rules {
            let book = load_rules(path)
                .with_context(|| format!("加载规则文件失败: {}", path.display()))?;
            info!(genes = book.len(), "规则集就绪");
            options = options.with_rules(book);
        }

        let merged = merge_files(&settings.inputs, &settings.samples, &options)?;

        match &settings.output {
            Some(path) => {
                let file = fs::File::create(path)
                    .with_context(|| format!("创建输出文件失败: {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                self.write_output(&mut writer, &merged)?;
                writer.flush().context("写入输出文件失败")?;
                info!(path = %path.display(), format = %settings.format, "结果已写入文件");
            }
            None => {
                let stdout = io::stdout();
                let mut writer = BufWriter::new(stdout.lock());
                self.write_output(&mut writer, &merged)?;
                writer.flush().context("写入标准输出失败")?;
            }
        }

        Ok(())
    }

    fn write_output<W: Write>(&self, writer: &mut W, merged: &serde_json::Map<String, serde_json::Value>) -> Result<()> {
        match self.settings.format {
            OutputFormat::Json => write_json(writer, merged)?,
            OutputFormat::Tsv => write_tsv(writer, merged)?,
        }
        Ok(())
    }
}
