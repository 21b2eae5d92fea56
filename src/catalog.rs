// src/catalog.rs
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Character,
    Weapon,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Character, ItemKind::Weapon];

    /// 카탈로그 데이터 파일명
    pub fn dataset(self) -> &'static str {
        match self {
            ItemKind::Character => "character.json",
            ItemKind::Weapon    => "weapon.json",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Character => f.write_str("character"),
            ItemKind::Weapon    => f.write_str("weapon"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    pub kind: ItemKind,
    pub id: String,
    pub display_name: String,
    pub rarity: u8,
}

/// `fetch_catalog` 응답의 한 항목. 나머지 언어/필드는 무시
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "zh-Hans")]
    name: String,
    #[serde(default)]
    rank: u8,
}

/// `{ id: { "zh-Hans": name, "rank": n, ... } }` 형태의 카탈로그를 항목 목록으로 변환
pub fn parse_catalog(kind: ItemKind, body: &str) -> Result<Vec<InventoryItem>> {
    let raw: BTreeMap<String, RawEntry> =
        serde_json::from_str(body).map_err(|source| Error::UnexpectedPayload {
            endpoint: kind.dataset().to_string(),
            source,
        })?;

    Ok(raw
        .into_iter()
        .map(|(id, e)| InventoryItem { kind, id, display_name: e.name, rarity: e.rank })
        .collect())
}

/// Bidirectional name/id lookup over the character and weapon catalogs.
///
/// Built once per run and never mutated afterwards; callers hold it by
/// reference.
#[derive(Debug, Default)]
pub struct Catalog {
    ids_by_name: HashMap<ItemKind, HashMap<String, String>>,
    names_by_id: HashMap<String, String>,
    len: usize,
}

impl Catalog {
    pub fn build(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let mut cat = Catalog::default();
        for it in items {
            let by_name = cat.ids_by_name.entry(it.kind).or_default();
            if let Some(prev) = by_name.insert(it.display_name.clone(), it.id.clone()) {
                warn!(kind = %it.kind, name = %it.display_name, prev = %prev, id = %it.id,
                      "duplicate display name, keeping the later id");
            }
            cat.names_by_id.insert(it.id, it.display_name);
            cat.len += 1;
        }
        cat
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 카테고리 안에서 이름 → id
    pub fn id_in(&self, kind: ItemKind, name: &str) -> Result<&str> {
        self.ids_by_name
            .get(&kind)
            .and_then(|m| m.get(name))
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownName { kind, name: name.to_string() })
    }

    /// Merged namespace: characters first, then weapons.
    pub fn id_for(&self, name: &str) -> Result<&str> {
        self.id_in(ItemKind::Character, name)
            .or_else(|_| self.id_in(ItemKind::Weapon, name))
    }

    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.names_by_id.get(id).map(String::as_str)
    }

    /// 이름 목록을 순서대로 id로 변환. 하나라도 없으면 실패
    pub fn resolve_all(&self, kind: ItemKind, names: &[String]) -> Result<Vec<String>> {
        names
            .iter()
            .map(|n| self.id_in(kind, n).map(str::to_string))
            .collect()
    }
}
