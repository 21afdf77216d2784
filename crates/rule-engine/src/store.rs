//! 规则集存储
//!
//! 使用 DashMap 提供线程安全的规则集缓存，按基因名查找时先精确匹配，
//! 再忽略大小写匹配。

use crate::compiler::RuleCompiler;
use crate::error::Result;
use crate::models::RuleSet;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 规则集存储
#[derive(Clone, Default)]
pub struct RuleBook {
    /// 基因名 → 编译后的规则集
    rule_sets: Arc<DashMap<String, Arc<RuleSet>>>,
    /// 小写基因名 → 首个加载的原始基因名
    aliases: Arc<DashMap<String, String>>,
}

impl RuleBook {
    /// 创建新的规则集存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取当前存储的基因数量
    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }

    /// 加载单个规则集，同名基因会被覆盖
    #[instrument(skip(self, rule_set), fields(gene = %rule_set.gene, rules = rule_set.rules.len()))]
    pub fn load(&self, rule_set: RuleSet) {
        let gene = rule_set.gene.clone();

        self.aliases
            .entry(gene.to_lowercase())
            .or_insert_with(|| gene.clone());

        if self.rule_sets.insert(gene.clone(), Arc::new(rule_set)).is_some() {
            warn!("规则集已被覆盖: {}", gene);
        }
    }

    /// 加载整份规则文档（基因 → 规则集）
    ///
    /// 任一规则集存在配置错误时整份文档都不会被加载。
    #[instrument(skip(self, document))]
    pub fn load_document(&self, document: &Value) -> Result<usize> {
        let rule_sets = RuleCompiler::new().compile_document(document)?;
        let count = rule_sets.len();

        for rule_set in rule_sets {
            self.load(rule_set);
        }

        info!("规则文档加载完成: {} 个基因", count);
        Ok(count)
    }

    /// 加载规则文档（从 JSON 字符串）
    pub fn load_from_json(&self, json: &str) -> Result<usize> {
        let document: Value = serde_json::from_str(json)?;
        self.load_document(&document)
    }

    /// 获取基因的规则集，精确匹配失败时忽略大小写再查一次
    pub fn get(&self, gene: &str) -> Option<Arc<RuleSet>> {
        if let Some(rule_set) = self.rule_sets.get(gene) {
            return Some(rule_set.value().clone());
        }

        let canonical = self.aliases.get(&gene.to_lowercase())?.value().clone();
        self.rule_sets.get(&canonical).map(|r| r.value().clone())
    }

    /// 检查基因是否配置了规则
    pub fn contains(&self, gene: &str) -> bool {
        self.get(gene).is_some()
    }

    /// 获取所有已配置的基因名（排序后）
    pub fn list_genes(&self) -> Vec<String> {
        let mut genes: Vec<String> = self.rule_sets.iter().map(|r| r.key().clone()).collect();
        genes.sort();
        genes
    }

    /// 清空所有规则集
    #[instrument(skip(self))]
    pub fn clear(&self) {
        let count = self.rule_sets.len();
        self.rule_sets.clear();
        self.aliases.clear();
        info!("已清空 {} 个规则集", count);
    }

    /// 获取存储统计信息
    pub fn stats(&self) -> RuleBookStats {
        let genes = self.rule_sets.len();
        let (rules, total_fields) = self.rule_sets.iter().fold((0, 0), |(rules, fields), r| {
            let rule_set = r.value();
            let set_fields: usize = rule_set.rules.iter().map(|rule| rule.when.fields().len()).sum();
            (rules + rule_set.rules.len(), fields + set_fields)
        });

        RuleBookStats {
            genes,
            rules,
            avg_fields_per_rule: if rules > 0 {
                total_fields as f64 / rules as f64
            } else {
                0.0
            },
        }
    }
}

impl std::fmt::Debug for RuleBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBook")
            .field("genes", &self.list_genes())
            .finish()
    }
}

/// 规则集存储统计信息
#[derive(Debug, Clone)]
pub struct RuleBookStats {
    /// 已配置基因数
    pub genes: usize,
    /// 规则总数（不含缺少 status 的规则）
    pub rules: usize,
    /// 平均每条规则引用的字段数
    pub avg_fields_per_rule: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, Rule};
    use crate::operators::Operator;
    use serde_json::json;

    fn sample_rule_set(gene: &str) -> RuleSet {
        RuleSet::new(
            gene,
            vec![Rule::new(
                0,
                "pathological",
                Condition::FieldMap(vec![
                    crate::models::Leaf::new("smn1_cn", Operator::Lt, 2),
                    crate::models::Leaf::new("smn2_cn", Operator::Gte, 4),
                ]),
            )],
        )
    }

    #[test]
    fn test_load_rule_set() {
        let book = RuleBook::new();
        book.load(sample_rule_set("smn1"));

        assert_eq!(book.len(), 1);
        assert!(book.contains("smn1"));
    }

    #[test]
    fn test_load_from_json() {
        let book = RuleBook::new();
        let count = book
            .load_from_json(r#"{"smn1": {"rules": [{"status": "pathological", "when": {"smn1_cn": 0}}]}, "cfh": {}}"#)
            .unwrap();

        assert_eq!(count, 1);
        assert!(book.contains("smn1"));
        assert!(!book.contains("cfh"));
    }

    #[test]
    fn test_load_document_is_atomic() {
        let book = RuleBook::new();
        let result = book.load_document(&json!({
            "smn1": {"rules": [{"status": "pathological"}]},
            "f8": {"rules": [{"status": "pathological", "when": {"x": {"~=": 1}}}]}
        }));

        assert!(result.is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_case_insensitive_get() {
        let book = RuleBook::new();
        book.load(sample_rule_set("F8"));

        assert_eq!(book.get("f8").unwrap().gene, "F8");
        assert_eq!(book.get("F8").unwrap().gene, "F8");
        assert!(book.get("f9").is_none());
    }

    #[test]
    fn test_exact_match_preferred() {
        let book = RuleBook::new();
        book.load(sample_rule_set("smn1"));
        book.load(sample_rule_set("SMN1").with_default_status("intermediate"));

        assert_eq!(book.get("SMN1").unwrap().default_status, "intermediate");
        assert_eq!(book.get("smn1").unwrap().default_status, "normal");
        // 两者都不精确匹配时，取最先加载的
        assert_eq!(book.get("Smn1").unwrap().gene, "smn1");
    }

    #[test]
    fn test_list_genes_sorted() {
        let book = RuleBook::new();
        book.load(sample_rule_set("smn1"));
        book.load(sample_rule_set("CFH"));
        book.load(sample_rule_set("f8"));

        assert_eq!(book.list_genes(), vec!["CFH", "f8", "smn1"]);
    }

    #[test]
    fn test_clear() {
        let book = RuleBook::new();
        book.load(sample_rule_set("smn1"));
        book.clear();

        assert!(book.is_empty());
        assert!(book.get("SMN1").is_none());
    }

    #[test]
    fn test_stats() {
        let book = RuleBook::new();
        book.load(sample_rule_set("smn1"));
        book.load(sample_rule_set("f8"));

        let stats = book.stats();

        assert_eq!(stats.genes, 2);
        assert_eq!(stats.rules, 2);
        assert_eq!(stats.avg_fields_per_rule, 2.0); // 每条规则引用 2 个字段
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let book = RuleBook::new();
        let book_clone = book.clone();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                book_clone.load(sample_rule_set(&format!("gene-{}", i)));
            }
        });

        for i in 100..200 {
            book.load(sample_rule_set(&format!("gene-{}", i)));
        }

        handle.join().unwrap();

        assert_eq!(book.len(), 200);
    }
}
