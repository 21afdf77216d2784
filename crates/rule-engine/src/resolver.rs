//! 规则裁决
//!
//! 对单个基因的记录依次评估所有规则，收集全部命中，再按 `status_order`
//! 选出最严重的状态。本模块只返回数据，不做日志输出。

use crate::error::Result;
use crate::executor::eval_when;
use crate::models::{Classification, Record, RuleMatch, RuleSet};
use crate::store::RuleBook;

/// 规则裁决器
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleResolver;

impl RuleResolver {
    pub fn new() -> Self {
        Self
    }

    /// 为指定基因的记录确定状态
    ///
    /// 基因名先精确查找，再忽略大小写查找；都找不到时返回未分类结果，
    /// 而不是错误。
    pub fn evaluate(&self, gene: &str, record: &Record, book: &RuleBook) -> Result<Classification> {
        match book.get(gene) {
            Some(rule_set) => self.evaluate_rule_set(&rule_set, record),
            None => Ok(Classification::unclassified()),
        }
    }

    /// 用给定规则集为记录确定状态
    ///
    /// 1. 依声明顺序评估每条规则，所有命中的规则都记录下来
    /// 2. 无命中时返回 `default_status`
    /// 3. 有命中时取 `status_order` 中排名最高者，排名相同取最先声明的规则
    pub fn evaluate_rule_set(&self, rule_set: &RuleSet, record: &Record) -> Result<Classification> {
        let matches: Vec<RuleMatch> = rule_set
            .rules
            .iter()
            .filter(|rule| !rule.status.is_empty() && eval_when(record, &rule.when))
            .map(|rule| RuleMatch {
                status: rule.status.clone(),
                rule_index: rule.index,
                reason: rule
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("{}: rules[{}]", rule_set.gene, rule.index)),
                rule: rule.source.clone(),
            })
            .collect();

        let mut selected: Option<(usize, &RuleMatch)> = None;
        for m in &matches {
            let rank = rule_set.rank(&m.status)?;
            // 严格大于才替换，保证同级时保留最先命中的规则
            if selected.is_none_or(|(best, _)| rank > best) {
                selected = Some((rank, m));
            }
        }

        let Some((_, best)) = selected else {
            return Ok(Classification {
                status: Some(rule_set.default_status.clone()),
                matches: Vec::new(),
            });
        };
        let status = best.status.clone();

        Ok(Classification {
            status: Some(status),
            matches,
        })
    }
}
