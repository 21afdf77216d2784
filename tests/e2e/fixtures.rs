//! 测试数据

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// 多基因规则文件
pub const RULES_YAML: &str = r#"
smn1:
  default_status: normal
  status_order: [normal, intermediate, pathological]
  rules:
    - status: pathological
      when:
        smn1_cn: 0
      reason: SMN1 homozygous deletion
    - status: intermediate
      when:
        all:
          - smn1_cn: 1
          - smn2_cn: { "<=": 2 }
      reason: SMA carrier

F8:
  rules:
    - status: pathological
      when:
        any:
          - flanking_summary: { contains: "f8_int22h1hap1:region1-region3" }
          - sv_called: { not_empty: true }

CFH:
  rules:
    - status: intermediate
      when:
        fusions_called: { not_empty: true }
        region_depth: { "<": genome_depth }

HBA:
  rules:
    - status: pathological
      when:
        not:
          final_haplotypes: { contains: "hba2_hba1hap1" }
"#;

/// 一个样本的 Paraphase 输出
pub fn paraphase_sample(smn1_cn: i64, f8_inversion: bool, cfh_depth: f64) -> Value {
    json!({
        "smn1": {
            "smn1_cn": smn1_cn,
            "smn2_cn": 2,
            "region_depth": {"median": 44.0, "percentile80": 48.0},
            "smn1_haplotypes": {"x2222": "smn1_smn1hap1"},
            "read_details": {"read1": [1, 2, 3]},
            "highest_total_cn": 4
        },
        "F8": {
            "flanking_summary": {
                "f8_int22h1hap1": if f8_inversion { "region1-region3" } else { "region1-region1" },
                "f8_int22h2hap1": "region2-region2"
            },
            "sv_called": {},
            "phase_region": "38:chrX:154835000-154900000"
        },
        "CFH": {
            "region_depth": {"median": cfh_depth},
            "genome_depth": 30.0,
            "fusions_called": {
                "CFH_hap1": {"type": "deletion", "sequence": "11122", "breakpoint": [[196757557, 196760029]]}
            }
        },
        "HBA": {
            "final_haplotypes": {"x1111": "hba2_hba1hap1", "x2222": "hba2_hba1hap2"},
            "sv_called": null
        },
        "ikbkg": {"total_cn": 2, "del_read_number": 0}
    })
}

/// 每个测试独立的临时目录
pub fn scratch_dir(name: &str) -> PathBuf {
    let id = SCRATCH_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "paraphrase-e2e-{}-{}-{}",
        name,
        std::process::id(),
        id
    ));
    fs::create_dir_all(&dir).expect("创建临时目录失败");
    dir
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("写入测试文件失败");
    path
}

pub fn write_sample(dir: &Path, name: &str, sample: &Value) -> PathBuf {
    write_file(dir, name, &serde_json::to_string_pretty(sample).expect("序列化样本失败"))
}
