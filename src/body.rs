// src/body.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::pool::{BannerRecord, PoolType};
use crate::timing::extract_window;

/// 본문 블록 중 일반 텍스트 타입
pub const TEXT_BLOCK: i64 = 1;

/// 4성 목록이 끝나는 지점
const DRAW_KEYWORD: &str = "唤取";

/// 기간이 적힌 블록 표식
const TIME_MARKERS: &[&str] = &["服务器时间", " ~ "];

/// One rich-text block of a post body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(default)]
    pub content_type: i64,
    #[serde(default)]
    pub content: String,
}

impl ContentBlock {
    pub fn text(content: impl Into<String>) -> Self {
        ContentBlock { content_type: TEXT_BLOCK, content: content.into() }
    }

    fn as_text(&self) -> Option<&str> {
        (self.content_type == TEXT_BLOCK).then_some(self.content.as_str())
    }
}

struct Markers {
    pool: PoolType,
    five: &'static str,
    four: &'static str,
    five_names: Regex,
}

impl Markers {
    fn new(pool: PoolType, five: &'static str, four: &'static str) -> Self {
        let five_names = Regex::new(&format!("{}「(.*?)」", regex::escape(five))).unwrap();
        Markers { pool, five, four, five_names }
    }

    fn matches(&self, text: &str) -> bool {
        text.contains(self.five) && text.contains(self.four)
    }

    /// `5星角色「A」` 형태로 마커 바로 뒤에 오는 이름들
    fn five_star_names(&self, text: &str) -> Vec<String> {
        self.five_names.captures_iter(text).map(|c| c[1].to_string()).collect()
    }

    /// 4성 마커부터 다음 `唤取`(없으면 블록 끝)까지의 「」 이름들
    fn four_star_names(&self, text: &str) -> Vec<String> {
        let Some(pos) = text.find(self.four) else { return Vec::new() };
        let rest = &text[pos + self.four.len()..];
        let span = rest.find(DRAW_KEYWORD).map_or(rest, |end| &rest[..end]);
        RE_QUOTED.captures_iter(span).map(|c| c[1].to_string()).collect()
    }
}

static RE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"「(.*?)」").unwrap());

static MARKERS: Lazy<[Markers; 2]> = Lazy::new(|| {
    [
        Markers::new(PoolType::Character, "5星角色", "4星角色"),
        Markers::new(PoolType::Weapon, "5星武器", "4星武器"),
    ]
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confidence {
    /// Exactly one category's markers were found.
    Certain,
    /// Markers of more than one category were found; the first one wins.
    Conflicting,
    /// No category markers at all.
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub pool_type: PoolType,
    pub confidence: Confidence,
}

/// 텍스트 블록에서 5성/4성 마커가 함께 나오는 카테고리로 배너 종류 판정
pub fn classify(blocks: &[ContentBlock]) -> Classification {
    let mut hits: Vec<PoolType> = Vec::new();
    for text in blocks.iter().filter_map(ContentBlock::as_text) {
        for m in MARKERS.iter() {
            if m.matches(text) && !hits.contains(&m.pool) {
                hits.push(m.pool);
            }
        }
    }

    match hits.as_slice() {
        []        => Classification { pool_type: PoolType::Unknown, confidence: Confidence::None },
        [only]    => Classification { pool_type: *only, confidence: Confidence::Certain },
        [first, ..] => Classification { pool_type: *first, confidence: Confidence::Conflicting },
    }
}

/// Parses one post body into a record with pool type, featured items and window set.
///
/// Link, name, subtitle and artwork are left for the caller. Any unresolved
/// name or missing window fails the whole post.
pub fn parse_body(blocks: &[ContentBlock], catalog: &Catalog) -> Result<BannerRecord> {
    let class = classify(blocks);
    match class.confidence {
        Confidence::Conflicting => warn!(chosen = %class.pool_type, "post mentions both banner categories"),
        Confidence::None        => debug!("no banner category markers in post"),
        Confidence::Certain     => {}
    }

    let mut rec = BannerRecord { pool_type: class.pool_type, ..Default::default() };

    if let (Some(kind), Some(m)) = (
        class.pool_type.item_kind(),
        MARKERS.iter().find(|m| m.pool == class.pool_type),
    ) {
        for text in blocks.iter().filter_map(ContentBlock::as_text).filter(|t| m.matches(t)) {
            let five = m.five_star_names(text);
            let four = m.four_star_names(text);
            rec.five_star_ids.extend(catalog.resolve_all(kind, &five)?);
            rec.four_star_ids.extend(catalog.resolve_all(kind, &four)?);
            rec.five_star_names.extend(five);
            rec.four_star_names.extend(four);
        }
    }

    let window_text = blocks
        .iter()
        .filter_map(ContentBlock::as_text)
        .find(|t| TIME_MARKERS.iter().any(|mk| t.contains(mk)));
    let window = match window_text {
        Some(text) => extract_window(text)?,
        None => {
            let all = blocks
                .iter()
                .filter_map(ContentBlock::as_text)
                .collect::<Vec<_>>()
                .join("\n");
            return Err(Error::NoTimeFound(all));
        }
    };
    rec.set_window(&window);

    Ok(rec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InventoryItem, ItemKind};
    use crate::timing::VERSION_RELEASE;

    fn catalog() -> Catalog {
        let c = |id: &str, name: &str| InventoryItem {
            kind: ItemKind::Character, id: id.into(), display_name: name.into(), rarity: 0,
        };
        let w = |id: &str, name: &str| InventoryItem {
            kind: ItemKind::Weapon, id: id.into(), display_name: name.into(), rarity: 0,
        };
        Catalog::build([
            c("1404", "忌炎"), c("1602", "丹瑾"), c("1202", "炽霞"), c("1204", "莫特斐"),
            w("21010016", "苍鳞千嶂"), w("21010044", "永夜长明"), w("21050024", "奇幻变奏"),
        ])
    }

    fn image() -> ContentBlock {
        ContentBlock { content_type: 2, content: String::new() }
    }

    #[test]
    fn parses_character_banner() {
        let blocks = vec![
            image(),
            ContentBlock::text("2025年3月6日10:00 ~ 2025年3月26日11:59（服务器时间）"),
            ContentBlock::text(
                "活动期间，限定5星角色「忌炎」唤取概率提升！4星角色「丹瑾」「炽霞」「莫特斐」唤取概率提升！",
            ),
        ];
        let rec = parse_body(&blocks, &catalog()).unwrap();
        assert_eq!(rec.pool_type, PoolType::Character);
        assert_eq!(rec.five_star_names, vec!["忌炎"]);
        assert_eq!(rec.five_star_ids, vec!["1404"]);
        assert_eq!(rec.four_star_names, vec!["丹瑾", "炽霞", "莫特斐"]);
        assert_eq!(rec.four_star_ids, vec!["1602", "1202", "1204"]);
        assert_eq!(rec.start_time, "2025-03-06 10:00:00");
        assert_eq!(rec.end_time, "2025-03-26 11:59:59");
    }

    #[test]
    fn parses_weapon_banner_with_release_start() {
        let blocks = vec![
            ContentBlock::text("1.4版本更新后 ~ 2024年12月12日09:59（服务器时间）"),
            ContentBlock::text("5星武器「苍鳞千嶂」唤取概率提升，4星武器「永夜长明」「奇幻变奏」"),
        ];
        let rec = parse_body(&blocks, &catalog()).unwrap();
        assert_eq!(rec.pool_type, PoolType::Weapon);
        assert_eq!(rec.five_star_ids, vec!["21010016"]);
        assert_eq!(rec.four_star_ids, vec!["21010044", "21050024"]);
        assert_eq!(rec.start_time, VERSION_RELEASE);
    }

    #[test]
    fn combined_banner_keeps_every_five_star_in_order() {
        let blocks = vec![
            ContentBlock::text(
                "5星角色「忌炎」、5星角色「莫特斐」唤取概率提升！4星角色「丹瑾」「炽霞」唤取概率提升！",
            ),
            ContentBlock::text("2024年6月6日10:00 ~ 2024年6月26日11:59（服务器时间）"),
        ];
        let rec = parse_body(&blocks, &catalog()).unwrap();
        assert_eq!(rec.five_star_names, vec!["忌炎", "莫特斐"]);
        assert_eq!(rec.five_star_ids, vec!["1404", "1204"]);
        assert_eq!(rec.four_star_ids, vec!["1602", "1202"]);
        assert_eq!(rec.five_star_ids.len(), rec.five_star_names.len());
        assert_eq!(rec.four_star_ids.len(), rec.four_star_names.len());
    }

    #[test]
    fn four_star_scan_stops_at_draw_keyword() {
        let blocks = vec![
            ContentBlock::text("5星角色「忌炎」4星角色「丹瑾」唤取概率提升。另见「炽霞」的故事"),
            ContentBlock::text("2024年6月6日10:00 ~ 2024年6月26日11:59"),
        ];
        let rec = parse_body(&blocks, &catalog()).unwrap();
        assert_eq!(rec.four_star_names, vec!["丹瑾"]);
    }

    #[test]
    fn only_text_blocks_are_inspected() {
        let blocks = vec![
            ContentBlock { content_type: 3, content: "5星角色「谁」4星角色「谁」".into() },
            ContentBlock::text("2024年6月6日10:00 ~ 2024年6月26日11:59"),
        ];
        let rec = parse_body(&blocks, &catalog()).unwrap();
        assert_eq!(rec.pool_type, PoolType::Unknown);
        assert!(rec.five_star_ids.is_empty());
    }

    #[test]
    fn classification_reports_conflicts_and_absence() {
        let none = classify(&[ContentBlock::text("公告")]);
        assert_eq!(none, Classification { pool_type: PoolType::Unknown, confidence: Confidence::None });

        let both = classify(&[
            ContentBlock::text("5星武器「a」4星武器「b」"),
            ContentBlock::text("5星角色「c」4星角色「d」"),
        ]);
        assert_eq!(both.pool_type, PoolType::Weapon);
        assert_eq!(both.confidence, Confidence::Conflicting);
    }

    #[test]
    fn unknown_name_fails_the_post() {
        let blocks = vec![
            ContentBlock::text("5星角色「忌炎」4星角色「无名氏」"),
            ContentBlock::text("2024年6月6日10:00 ~ 2024年6月26日11:59"),
        ];
        let err = parse_body(&blocks, &catalog()).unwrap_err();
        assert!(matches!(err, Error::UnknownName { kind: ItemKind::Character, ref name } if name == "无名氏"));
    }

    #[test]
    fn missing_window_fails_the_post() {
        let blocks = vec![ContentBlock::text("5星角色「忌炎」4星角色「丹瑾」")];
        assert!(matches!(parse_body(&blocks, &catalog()), Err(Error::NoTimeFound(_))));
    }

    #[test]
    fn deserializes_post_content() {
        let blocks: Vec<ContentBlock> = serde_json::from_str(
            r#"[{"contentType": 1, "content": "abc"}, {"contentType": 2, "url": "x.png"}]"#,
        )
        .unwrap();
        assert_eq!(blocks[0].as_text(), Some("abc"));
        assert_eq!(blocks[1].as_text(), None);
    }
}
