//! CLI 模块
//!
//! # 使用示例
//!
//! ```bash
//! # 合并两个样本并输出 JSON
//! paraphrase -f S1.json S2.json -s S1 S2
//!
//! # 按规则判定状态，输出 TSV
//! paraphrase -f S1.json -s S1 -r rules.yaml --format tsv -o S1.tsv
//!
//! # 只保留部分基因，并自定义丢弃字段
//! paraphrase -f S1.json -s S1 --genes smn1,f8 --skip-keys read_details,final_haplotypes
//! ```

pub mod commands;
pub mod runner;

pub use commands::Cli;
pub use runner::{CommandRunner, RunSettings};
