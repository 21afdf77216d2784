//! Paraphase 结果整理
//!
//! 读取 Paraphase 的每样本 JSON，整理字段、按基因规则判定状态，
//! 合并为多样本的 JSON 或 TSV。

pub mod cli;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod processors;

pub use error::{PipelineError, Result};
pub use pipeline::{assert_equal_inputs_and_samples, merge_and_process, merge_files};
pub use processors::{process_gene_info, process_sample, ProcessingOptions};
