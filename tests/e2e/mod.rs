//! 端到端测试
//!
//! 从磁盘上的样本与规则文件出发，经命令执行器写出最终结果：
//! - 多基因规则判定
//! - JSON / TSV 输出
//! - 配置与命令行的合并
//! - 错误输入

mod fixtures;
mod suites;
