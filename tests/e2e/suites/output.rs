//! 命令执行器输出

use crate::fixtures::{paraphase_sample, scratch_dir, write_file, write_sample, RULES_YAML};
use paraphrase::cli::{CommandRunner, RunSettings};
use paraphrase_shared::config::OutputFormat;
use serde_json::Value;
use std::fs;
use std::path::Path;

fn settings(dir: &Path, format: OutputFormat, output: &str) -> RunSettings {
    RunSettings {
        inputs: vec![
            write_sample(dir, "S1.json", &paraphase_sample(0, true, 20.0)),
            write_sample(dir, "S2.json", &paraphase_sample(2, false, 35.0)),
        ],
        samples: vec!["S1".to_string(), "S2".to_string()],
        rules: Some(write_file(dir, "rules.yaml", RULES_YAML)),
        skip_keys: vec!["read_details".to_string()],
        genes: Some(vec!["SMN1".to_string(), "cfh".to_string()]),
        format,
        output: Some(dir.join(output)),
    }
}

#[test]
fn test_json_output_file() {
    let dir = scratch_dir("json-output");
    CommandRunner::new(settings(&dir, OutputFormat::Json, "out.json"))
        .run()
        .expect("运行失败");

    let text = fs::read_to_string(dir.join("out.json")).unwrap();
    let merged: Value = serde_json::from_str(&text).unwrap();

    let samples: Vec<&String> = merged.as_object().unwrap().keys().collect();
    assert_eq!(samples, vec!["S1", "S2"]);
    let genes: Vec<&String> = merged["S1"].as_object().unwrap().keys().collect();
    assert_eq!(genes, vec!["smn1", "CFH"]);
    assert_eq!(merged["S1"]["smn1"]["status"], "pathological");
    assert_eq!(merged["S2"]["smn1"]["status"], "normal");
}

#[test]
fn test_tsv_output_file() {
    let dir = scratch_dir("tsv-output");
    CommandRunner::new(settings(&dir, OutputFormat::Tsv, "out.tsv"))
        .run()
        .expect("运行失败");

    let text = fs::read_to_string(dir.join("out.tsv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "sample\tlocus\tstatus\tmetric\tvalue");
    assert!(lines.contains(&"S1\tsmn1\tpathological\tsmn1_cn\t0"));
    assert!(lines.contains(&"S1\tsmn1\tpathological\tsmn1_haplotypes\tsmn1_smn1hap1"));
    assert!(lines.contains(&"S1\tCFH\tintermediate\tregion_depth\t20.0"));
    assert!(lines.contains(
        &"S1\tCFH\tintermediate\tfusions_called\tCFH_hap1:type=deletion|breakpoint=196757557|196760029"
    ));
    assert!(lines.contains(&"S2\tsmn1\tnormal\tregion_depth\t44.0"));
    assert!(!lines.iter().any(|l| l.contains("status_matches")));
    assert!(!lines.iter().any(|l| l.contains("\tF8\t")));
}

#[test]
fn test_mismatched_inputs_fail() {
    let dir = scratch_dir("mismatch");
    let mut settings = settings(&dir, OutputFormat::Json, "out.json");
    settings.samples.pop();

    let err = CommandRunner::new(settings).run().unwrap_err();
    assert!(err.to_string().contains("不一致"));
    assert!(!dir.join("out.json").exists());
}
