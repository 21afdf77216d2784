//! 多样本合并
//!
//! 每个输入文件对应一个样本名，处理后合并为 `{样本: {基因: 记录}}`。

use crate::error::{PipelineError, Result};
use crate::io;
use crate::processors::{process_sample, ProcessingOptions};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, instrument};

/// 校验输入文件与样本名数量一致
pub fn assert_equal_inputs_and_samples(inputs: &[PathBuf], samples: &[String]) -> Result<()> {
    if inputs.len() != samples.len() {
        return Err(PipelineError::InputMismatch {
            inputs: inputs.len(),
            samples: samples.len(),
        });
    }
    Ok(())
}

/// 处理已加载的样本数据并按样本名合并
///
/// 样本名重复时后出现的覆盖先出现的。
pub fn merge_and_process(
    data: &[Value],
    samples: &[String],
    options: &ProcessingOptions,
) -> Result<Map<String, Value>> {
    if data.len() != samples.len() {
        return Err(PipelineError::InputMismatch {
            inputs: data.len(),
            samples: samples.len(),
        });
    }

    let mut merged = Map::new();
    for (sample_data, sample) in data.iter().zip(samples) {
        let processed = process_sample(sample_data, options)?;
        info!(sample = %sample, genes = processed.len(), "样本处理完成");
        merged.insert(sample.clone(), Value::Object(processed));
    }

    Ok(merged)
}

/// 从文件读取样本并合并
#[instrument(skip(options), fields(inputs = inputs.len()))]
pub fn merge_files(
    inputs: &[PathBuf],
    samples: &[String],
    options: &ProcessingOptions,
) -> Result<Map<String, Value>> {
    assert_equal_inputs_and_samples(inputs, samples)?;

    let data = inputs
        .iter()
        .map(|path| io::load_json(path))
        .collect::<Result<Vec<_>>>()?;

    merge_and_process(&data, samples, options)
}
