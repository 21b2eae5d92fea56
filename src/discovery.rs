// src/discovery.rs
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::body::{parse_body, ContentBlock};
use crate::catalog::{Catalog, InventoryItem, ItemKind};
use crate::error::Result;
use crate::pool::{BannerRecord, PoolType};
use crate::title::{extract_title_fields, strip_emphasis};

/// 공식 계정 id
pub const OFFICIAL_USER: &str = "10012001";
pub const POST_PAGE: &str = "https://www.kurobbs.com/mc/post/";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: String,
}

/// One search hit.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPost {
    pub post_id: String,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub img_content: Vec<Image>,
}

/// Reference-data endpoint for the item catalogs.
pub trait CatalogSource {
    fn fetch_catalog(&self, kind: ItemKind) -> Result<Vec<InventoryItem>>;
}

/// Forum search and post-detail endpoints.
pub trait BbsApi {
    fn search_posts(&self, keyword: &str, page_index: u32, page_size: u32) -> Result<Vec<SearchPost>>;
    fn fetch_post_body(&self, post_id: &str) -> Result<Vec<ContentBlock>>;
}

/// 매 실행마다 새로 받아서 구성 (캐시하지 않음)
pub fn load_catalog(source: &impl CatalogSource) -> Result<Catalog> {
    let mut items = Vec::new();
    for kind in ItemKind::ALL {
        let got = source.fetch_catalog(kind)?;
        info!(%kind, count = got.len(), "catalog loaded");
        items.extend(got);
    }
    Ok(Catalog::build(items))
}

#[derive(Clone, Debug)]
pub struct DiscoveryOptions {
    /// 카테고리당 최대 검색 페이지 수
    pub pages: u32,
    pub page_size: u32,
    pub official_user: String,
    pub post_page: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryOptions {
            pages: 5,
            page_size: 20,
            official_user: OFFICIAL_USER.to_string(),
            post_page: POST_PAGE.to_string(),
        }
    }
}

/// Scans search results for one banner category, page 1 through `opts.pages`,
/// and returns records in discovery order.
pub fn discover_pools(
    api: &impl BbsApi,
    catalog: &Catalog,
    pool_type: PoolType,
    opts: &DiscoveryOptions,
) -> Result<Vec<BannerRecord>> {
    let keyword = pool_type.keyword();
    let mut out = Vec::<BannerRecord>::new();

    for page in 1..=opts.pages {
        let posts = api.search_posts(keyword, page, opts.page_size)?;
        info!(keyword, page, hits = posts.len(), "search page");
        if posts.is_empty() {
            break;
        }

        for post in posts {
            if post.user_id != opts.official_user { continue; }

            let title = strip_emphasis(&post.post_title);
            if !title.contains(keyword) { continue; }

            let Some(pic) = post.img_content.first().map(|i| i.url.clone()) else {
                warn!(post_id = %post.post_id, title = %post.post_title, "no artwork, skipped");
                continue;
            };

            let fields = extract_title_fields(&title);

            let blocks = api.fetch_post_body(&post.post_id)?;
            let mut rec = parse_body(&blocks, catalog).map_err(|e| e.in_post(&post.post_id))?;

            rec.bbs = format!("{}{}", opts.post_page, post.post_id);
            rec.name = fields.feature_name;
            rec.title = fields.subtitle;
            rec.pic = pic;
            debug!(post_id = %post.post_id, "{rec}");
            out.push(rec);
        }
    }

    Ok(out)
}

/// 캐릭터 → 무기 순서로 하나씩 끝까지 수집
pub fn discover_all(
    api: &impl BbsApi,
    catalog: &Catalog,
    opts: &DiscoveryOptions,
) -> Result<Vec<BannerRecord>> {
    let mut out = Vec::new();
    for pool_type in [PoolType::Character, PoolType::Weapon] {
        let found = discover_pools(api, catalog, pool_type, opts)?;
        info!(%pool_type, count = found.len(), "banners discovered");
        out.extend(found);
    }
    Ok(out)
}
