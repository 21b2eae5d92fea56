// src/pool.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ItemKind;
use crate::timing::TimeWindow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    #[serde(rename = "角色活动唤取")]
    Character,
    #[serde(rename = "武器活动唤取")]
    Weapon,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl PoolType {
    /// 검색 키워드 겸 `pool_type` 값
    pub fn keyword(self) -> &'static str {
        match self {
            PoolType::Character => "角色活动唤取",
            PoolType::Weapon    => "武器活动唤取",
            PoolType::Unknown   => "",
        }
    }

    /// 배너에 등장하는 항목의 카탈로그 구분
    pub fn item_kind(self) -> Option<ItemKind> {
        match self {
            PoolType::Character => Some(ItemKind::Character),
            PoolType::Weapon    => Some(ItemKind::Weapon),
            PoolType::Unknown   => None,
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolType::Unknown => f.write_str("unknown"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// One banner event as written to `pool.json`. Field names are the wire contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerRecord {
    /// 게시글 URL (수동 기록은 빈 문자열)
    pub bbs: String,
    pub name: String,
    pub title: String,
    pub pic: String,
    pub five_star_ids: Vec<String>,
    pub five_star_names: Vec<String>,
    pub four_star_ids: Vec<String>,
    pub four_star_names: Vec<String>,
    pub pool_type: PoolType,
    pub start_time: String, // YYYY-MM-DD HH:MM:SS 또는 版本更新时间
    pub end_time: String,   // YYYY-MM-DD HH:MM:SS
}

impl BannerRecord {
    pub fn set_window(&mut self, w: &TimeWindow) {
        self.start_time = w.start_string();
        self.end_time = w.end_string();
    }

    /// id/이름 배열 길이 불일치 설명. 정상이면 None
    pub fn shape_problem(&self) -> Option<String> {
        if self.five_star_ids.len() != self.five_star_names.len() {
            return Some(format!(
                "five_star_ids has {} entries but five_star_names has {}",
                self.five_star_ids.len(),
                self.five_star_names.len()
            ));
        }
        if self.four_star_ids.len() != self.four_star_names.len() {
            return Some(format!(
                "four_star_ids has {} entries but four_star_names has {}",
                self.four_star_ids.len(),
                self.four_star_names.len()
            ));
        }
        None
    }

    /// 비어 있는 필수 필드 목록
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.name.is_empty() { out.push("name"); }
        if self.pool_type == PoolType::Unknown { out.push("pool_type"); }
        if self.five_star_ids.is_empty() { out.push("five_star_ids"); }
        if self.end_time.is_empty() { out.push("end_time"); }
        out
    }
}

impl fmt::Display for BannerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} <{}> | {} ~ {} | 5★ {} | 4★ {}",
            self.pool_type,
            self.name,
            self.title,
            self.start_time,
            self.end_time,
            self.five_star_names.join("/"),
            self.four_star_names.join("/"),
        )?;
        if !self.bbs.is_empty() {
            write!(f, " | {}", self.bbs)?;
        }
        Ok(())
    }
}
