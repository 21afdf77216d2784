//! 多基因规则判定

use crate::fixtures::{paraphase_sample, scratch_dir, write_file, write_sample, RULES_YAML};
use paraphrase::io::load_rules;
use paraphrase::{merge_files, PipelineError, ProcessingOptions};
use paraphrase_shared::config::DEFAULT_SKIP_KEYS;
use serde_json::{json, Map, Value};

fn run(skip_keys: &[&str]) -> Map<String, Value> {
    let dir = scratch_dir("classification");
    let s1 = write_sample(&dir, "S1.json", &paraphase_sample(0, true, 20.0));
    let s2 = write_sample(&dir, "S2.json", &paraphase_sample(1, false, 35.0));
    let rules = write_file(&dir, "rules.yaml", RULES_YAML);

    let options = ProcessingOptions::new()
        .with_skip_keys(skip_keys.iter().copied())
        .with_rules(load_rules(&rules).expect("规则加载失败"));

    merge_files(&[s1, s2], &["S1".to_string(), "S2".to_string()], &options).expect("处理失败")
}

#[test]
fn test_statuses_per_sample() {
    let merged = run(&["read_details"]);

    let status = |sample: &str, gene: &str| merged[sample][gene].get("status").cloned();

    assert_eq!(status("S1", "smn1"), Some(json!("pathological")));
    assert_eq!(status("S1", "F8"), Some(json!("pathological")));
    assert_eq!(status("S1", "CFH"), Some(json!("intermediate")));
    assert_eq!(status("S1", "HBA"), Some(json!("normal")));
    assert_eq!(status("S1", "ikbkg"), None);

    assert_eq!(status("S2", "smn1"), Some(json!("intermediate")));
    assert_eq!(status("S2", "F8"), Some(json!("normal")));
    assert_eq!(status("S2", "CFH"), Some(json!("normal")));
}

#[test]
fn test_match_trace() {
    let merged = run(&["read_details"]);

    assert_eq!(
        merged["S2"]["smn1"]["status_matches"],
        json!([{
            "status": "intermediate",
            "rule_index": 1,
            "reason": "SMA carrier",
            "rule": {
                "status": "intermediate",
                "when": {"all": [{"smn1_cn": 1}, {"smn2_cn": {"<=": 2}}]},
                "reason": "SMA carrier"
            }
        }])
    );
    assert_eq!(merged["S1"]["F8"]["status_matches"][0]["reason"], "F8: rules[0]");
}

#[test]
fn test_rules_see_processed_record() {
    // 默认丢弃 final_haplotypes 与 flanking_summary，规则看到的是处理后的记录
    let merged = run(DEFAULT_SKIP_KEYS);

    assert_eq!(merged["S1"]["F8"]["status"], "normal");
    assert_eq!(merged["S1"]["HBA"]["status"], "pathological");
    assert!(merged["S1"]["smn1"].get("highest_total_cn").is_none());
    assert!(merged["S1"]["ikbkg"].get("del_read_number").is_none());
}

#[test]
fn test_processed_fields() {
    let merged = run(&["read_details"]);
    let s1 = &merged["S1"];

    assert_eq!(s1["smn1"]["region_depth"], 44.0);
    assert_eq!(s1["smn1"]["smn1_haplotypes"], json!(["smn1_smn1hap1"]));
    assert_eq!(s1["F8"]["phase_region"], json!(["chrX:154835000-154900000"]));
    assert_eq!(
        s1["F8"]["flanking_summary"],
        json!(["f8_int22h1hap1:region1-region3", "f8_int22h2hap1:region2-region2"])
    );
    assert_eq!(
        s1["CFH"]["fusions_called"],
        json!({"CFH_hap1": {"type": "deletion", "breakpoint": [[196757557, 196760029]]}})
    );
    assert!(s1["HBA"].get("sv_called").is_none());
}

#[test]
fn test_configuration_error_aborts() {
    let dir = scratch_dir("bad-rules");
    let rules = write_file(
        &dir,
        "rules.yaml",
        "smn1:\n  rules:\n    - status: severe\n      when:\n        smn1_cn: 0\n",
    );

    let err = load_rules(&rules).unwrap_err();
    assert!(matches!(err, PipelineError::Rule(_)));
}

#[test]
fn test_bundled_example_rules_compile() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/rules.yaml");
    let book = load_rules(&path).expect("示例规则应能加载");

    assert_eq!(book.list_genes(), vec!["CFH", "F8", "smn1", "strc"]);
}
