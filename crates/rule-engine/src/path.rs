//! 字段路径解析

use serde_json::Value;

use crate::models::Record;

/// 按点号分隔的路径（如 "fusions_called.CFH_hap1.type"）逐层查找字段
///
/// 中途遇到非对象值或缺失的键时返回 `None`。值为 `null` 的字段与缺失字段
/// 同样返回 `None`，下游操作符不区分两者。
pub fn resolve<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = record.get(first)?;

    for part in parts {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }

    if current.is_null() { None } else { Some(current) }
}

/// 只在记录顶层查找字段，不做路径拆分（用于字段引用）
pub fn resolve_direct<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}
