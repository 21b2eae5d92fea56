// src/curated.rs
use std::path::Path;

use crate::error::{Error, Result};
use crate::pool::BannerRecord;

/// 검색으로 닿지 않는 초기 배너 기록
const EMBEDDED: &str = include_str!("../data/curated.json");

pub fn embedded() -> Result<Vec<BannerRecord>> {
    parse_curated("data/curated.json", EMBEDDED)
}

/// `path`가 있으면 그 파일, 없으면 내장 목록
pub fn load(path: Option<&Path>) -> Result<Vec<BannerRecord>> {
    let Some(path) = path else { return embedded() };
    let shown = path.display().to_string();
    let body = std::fs::read_to_string(path)
        .map_err(|source| Error::Io { path: shown.clone(), source })?;
    parse_curated(&shown, &body)
}

/// Structural checks only: JSON shape and parallel id/name arrays.
pub fn parse_curated(origin: &str, body: &str) -> Result<Vec<BannerRecord>> {
    let records: Vec<BannerRecord> = serde_json::from_str(body)
        .map_err(|source| Error::UnexpectedPayload { endpoint: origin.to_string(), source })?;

    for (index, rec) in records.iter().enumerate() {
        if let Some(reason) = rec.shape_problem() {
            return Err(Error::InvalidCuratedRecord { index, reason });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolType;

    #[test]
    fn embedded_list_has_launch_banners() {
        let recs = embedded().unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].name, "忌炎");
        assert_eq!(recs[0].pool_type, PoolType::Character);
        assert_eq!(recs[1].pool_type, PoolType::Weapon);
        assert!(recs.iter().all(|r| r.bbs.is_empty() && r.end_time == "2024-06-13 09:59:59"));
    }

    #[test]
    fn rejects_mismatched_arrays() {
        let body = r#"[{"bbs":"","name":"a","title":"","pic":"",
            "five_star_ids":["1"],"five_star_names":[],
            "four_star_ids":[],"four_star_names":[],
            "pool_type":"","start_time":"","end_time":""}]"#;
        let err = parse_curated("t.json", body).unwrap_err();
        assert!(matches!(err, Error::InvalidCuratedRecord { index: 0, .. }));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = parse_curated("t.json", r#"[{"name":"a"}]"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedPayload { .. }));
    }

    #[test]
    fn loads_override_file() {
        let mut p = std::env::temp_dir();
        p.push(format!("banner_timeline_curated_override_{}.json", std::process::id()));
        std::fs::write(&p, "[]").unwrap();
        assert!(load(Some(&p)).unwrap().is_empty());
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn missing_override_file_is_io_error() {
        let p = std::env::temp_dir().join(format!("banner_timeline_no_such_file_{}.json", std::process::id()));
        assert!(matches!(load(Some(&p)), Err(Error::Io { .. })));
    }
}
