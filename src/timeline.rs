// src/timeline.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::pool::{BannerRecord, PoolType};
use crate::timing::parse_timestamp;

pub const PRETTY_FILE: &str = "pool.json";
pub const COMPACT_FILE: &str = "pool.min.json";

#[derive(Debug)]
pub struct Timeline {
    pub records: Vec<BannerRecord>,
    /// 정렬에 실패했으면 그 이유. 이때 `records`는 합친 순서 그대로
    pub sort_error: Option<String>,
}

impl Timeline {
    pub fn is_sorted(&self) -> bool {
        self.sort_error.is_none()
    }
}

/// Curated records first, then discovered ones. A discovered record that repeats a
/// curated one is dropped; discovered records are never deduplicated among themselves.
/// Ordered by `end_time` ascending, stable on ties.
pub fn merge(curated: Vec<BannerRecord>, mut discovered: Vec<BannerRecord>) -> Timeline {
    // 이름 + 종류 + 종료 시각이 같으면 같은 배너
    let curated_keys: HashSet<(&str, PoolType, &str)> = curated
        .iter()
        .map(|r| (r.name.as_str(), r.pool_type, r.end_time.as_str()))
        .collect();
    discovered.retain(|r| {
        let dup = curated_keys.contains(&(r.name.as_str(), r.pool_type, r.end_time.as_str()));
        if dup {
            warn!(name = %r.name, end = %r.end_time, bbs = %r.bbs, "already curated, discovered copy dropped");
        }
        !dup
    });

    let mut all: Vec<BannerRecord> = Vec::with_capacity(curated.len() + discovered.len());
    all.extend(curated);
    all.extend(discovered);

    for r in &all {
        let missing = r.missing_fields();
        if !missing.is_empty() {
            warn!(name = %r.name, bbs = %r.bbs, ?missing, "incomplete banner record");
        }
    }

    match end_keys(&all) {
        Ok(keys) => {
            let mut keyed: Vec<(NaiveDateTime, BannerRecord)> = keys.into_iter().zip(all).collect();
            keyed.sort_by_key(|(k, _)| *k);
            Timeline { records: keyed.into_iter().map(|(_, r)| r).collect(), sort_error: None }
        }
        Err(reason) => {
            error!(%reason, "timeline left unsorted");
            Timeline { records: all, sort_error: Some(reason) }
        }
    }
}

fn end_keys(records: &[BannerRecord]) -> std::result::Result<Vec<NaiveDateTime>, String> {
    records
        .iter()
        .map(|r| {
            parse_timestamp(&r.end_time).ok_or_else(|| {
                format!("unparseable end_time {:?} on banner {:?} ({})", r.end_time, r.name, r.bbs)
            })
        })
        .collect()
}

/// 4칸 들여쓰기, 비ASCII 그대로
pub fn to_pretty_json(records: &[BannerRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut ser)
        .map_err(|source| Error::Serialize { target: PRETTY_FILE.into(), source })?;
    Ok(buf)
}

pub fn to_compact_json(records: &[BannerRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec(records)
        .map_err(|source| Error::Serialize { target: COMPACT_FILE.into(), source })
}

/// `out_dir`에 `pool.json`(사람용)과 `pool.min.json`(기계용)을 쓴다
pub fn write_artifacts(records: &[BannerRecord], out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let io_err = |p: &Path| {
        let path = p.display().to_string();
        move |source: std::io::Error| Error::Io { path, source }
    };

    fs::create_dir_all(out_dir).map_err(io_err(out_dir))?;

    let pretty = out_dir.join(PRETTY_FILE);
    fs::write(&pretty, to_pretty_json(records)?).map_err(io_err(&pretty))?;

    let compact = out_dir.join(COMPACT_FILE);
    fs::write(&compact, to_compact_json(records)?).map_err(io_err(&compact))?;

    info!(count = records.len(), pretty = %pretty.display(), compact = %compact.display(), "timeline written");
    Ok((pretty, compact))
}
