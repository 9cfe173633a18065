//! DNS 记录配置加载服务
//!
//! 两遍处理：先校验所有声明，全部通过后才转换。任何一条无效记录都会使
//! 整个加载失败，不会产生部分结果。

use std::path::Path;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::types::{DnsRecordDeclaration, DnsRecordType};

/// Default location of the records file.
pub const DEFAULT_RECORDS_FILE: &str = "configuration/dns-records.json";

const MISSING_TYPE: &str = "Invalid DNS record missing \"type\"";
const MISSING_NAME: &str = "Invalid DNS record missing \"name\"";
const INVALID_TYPE: &str = "Invalid \"type\" for DNS record";
const INVALID_VALUES: &str = "Invalid \"values\" for DNS record";

/// Records file loader
pub struct RecordLoader;

impl RecordLoader {
    /// 读取并校验记录文件
    pub fn load_file(path: &Path) -> CoreResult<Vec<DnsRecordDeclaration>> {
        log::debug!("Loading DNS records from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigRead {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;

        let records = Self::parse(&content)?;
        log::info!("Loaded {} DNS record(s) from {}", records.len(), path.display());
        Ok(records)
    }

    /// 解析 JSON 文本
    pub fn parse(content: &str) -> CoreResult<Vec<DnsRecordDeclaration>> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        Self::from_document(&document)
    }

    /// 从已解析的文档中提取记录
    pub fn from_document(document: &Value) -> CoreResult<Vec<DnsRecordDeclaration>> {
        let entries = document
            .get("records")
            .and_then(Value::as_array)
            .ok_or(CoreError::InvalidRecordsStructure)?;

        // 第一遍：校验
        for entry in entries {
            Self::validate(entry)?;
        }

        // 第二遍：转换
        entries.iter().map(Self::convert).collect()
    }

    /// 校验单条声明，失败时错误信息携带该声明的 JSON
    pub fn validate(entry: &Value) -> CoreResult<()> {
        let invalid = |reason: &str| CoreError::InvalidRecord {
            reason: reason.to_string(),
            record: entry.to_string(),
        };

        let record_type = entry.get("type").filter(|v| is_present(v));
        let Some(record_type) = record_type else {
            return Err(invalid(MISSING_TYPE));
        };

        let name = entry.get("name").filter(|v| is_present(v));
        if name.and_then(Value::as_str).is_none() {
            return Err(invalid(MISSING_NAME));
        }

        let known = record_type
            .as_str()
            .is_some_and(|t| DnsRecordType::from_str(t).is_ok());
        if !known {
            return Err(invalid(INVALID_TYPE));
        }

        // 非别名记录至少需要一个字符串值
        match entry.get("values") {
            Some(Value::Array(values))
                if !values.is_empty() && values.iter().all(Value::is_string) =>
            {
                Ok(())
            }
            _ => Err(invalid(INVALID_VALUES)),
        }
    }

    fn convert(entry: &Value) -> CoreResult<DnsRecordDeclaration> {
        serde_json::from_value(entry.clone()).map_err(|e| CoreError::InvalidRecord {
            reason: e.to_string(),
            record: entry.to_string(),
        })
    }
}

/// JSON 中的"空"值（缺失、null、false、0、空字符串）视为未提供
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_records_json, write_records_file};

    fn reason(result: CoreResult<Vec<DnsRecordDeclaration>>) -> Option<String> {
        match result {
            Err(CoreError::InvalidRecord { reason, .. }) => Some(reason),
            _ => None,
        }
    }

    #[test]
    fn loads_sample_document() {
        let records = RecordLoader::parse(&sample_records_json());
        assert!(records.is_ok(), "{records:?}");
        let Ok(records) = records else {
            return;
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type, DnsRecordType::Txt);
        assert_eq!(records[1].record_type, DnsRecordType::Mx);
    }

    #[test]
    fn missing_records_array_is_structural_error() {
        for doc in [r#"{}"#, r#"{"records": {}}"#, r#"{"records": null}"#, r#"[]"#] {
            assert!(
                matches!(RecordLoader::parse(doc), Err(CoreError::InvalidRecordsStructure)),
                "{doc}"
            );
        }
    }

    #[test]
    fn empty_records_array_is_valid() {
        let records = RecordLoader::parse(r#"{"records": []}"#);
        assert!(records.is_ok_and(|r| r.is_empty()));
    }

    #[test]
    fn missing_type_names_the_declaration() {
        let result = RecordLoader::parse(r#"{"records": [{"name": "example.com", "values": []}]}"#);
        assert!(
            matches!(
                &result,
                Err(CoreError::InvalidRecord { reason, record })
                    if reason == MISSING_TYPE && record.contains("example.com")
            ),
            "unexpected: {result:?}"
        );
    }

    #[test]
    fn empty_name_is_missing() {
        let result = RecordLoader::parse(r#"{"records": [{"type": "A", "name": ""}]}"#);
        assert_eq!(reason(result).as_deref(), Some(MISSING_NAME));
    }

    #[test]
    fn unknown_or_lowercase_type_is_invalid() {
        for t in ["ALIAS", "txt"] {
            let doc = format!(r#"{{"records": [{{"type": "{t}", "name": "x"}}]}}"#);
            assert_eq!(reason(RecordLoader::parse(&doc)).as_deref(), Some(INVALID_TYPE));
        }
    }

    #[test]
    fn one_invalid_record_rejects_the_whole_file() {
        let doc = r#"{"records": [
            {"type": "TXT", "name": "example.com", "values": ["ok"]},
            {"type": "BOGUS", "name": "example.com", "values": ["no"]}
        ]}"#;
        assert_eq!(reason(RecordLoader::parse(doc)).as_deref(), Some(INVALID_TYPE));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let doc = r#"{"records": [{"type": "A", "name": "x", "values": [1]}]}"#;
        assert_eq!(reason(RecordLoader::parse(doc)).as_deref(), Some(INVALID_VALUES));
    }

    #[test]
    fn missing_values_is_rejected() {
        for values in ["", r#", "values": null"#, r#", "values": []"#] {
            let doc = format!(r#"{{"records": [{{"type": "A", "name": "example.com"{values}}}]}}"#);
            assert_eq!(
                reason(RecordLoader::parse(&doc)).as_deref(),
                Some(INVALID_VALUES),
                "{doc}"
            );
        }
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        assert!(matches!(
            RecordLoader::parse("{not json"),
            Err(CoreError::SerializationError(_))
        ));
    }

    #[test]
    fn load_file_reports_missing_path() {
        let Ok(dir) = tempfile::tempdir() else {
            return;
        };
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            RecordLoader::load_file(&missing),
            Err(CoreError::ConfigRead { .. })
        ));

        let path = write_records_file(dir.path(), &sample_records_json());
        assert!(RecordLoader::load_file(&path).is_ok_and(|r| r.len() == 2));
    }
}
