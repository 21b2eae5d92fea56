// src/kurobbs.rs
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::body::ContentBlock;
use crate::catalog::{parse_catalog, InventoryItem, ItemKind};
use crate::discovery::{BbsApi, CatalogSource, SearchPost};
use crate::error::{Error, Result};

pub const BBS_API: &str = "https://api.kurobbs.com/";
pub const CATALOG_API: &str = "https://api.hakush.in/ww/data/";

const UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                  (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

/* ================= 응답 구조 ================= */

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    post: SearchPosts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPosts {
    #[serde(default)]
    post_list: Vec<SearchPost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailData {
    post_detail: PostDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDetail {
    #[serde(default)]
    post_content: Vec<ContentBlock>,
}

/* ================= HTTP ================= */

#[derive(Clone, Debug)]
pub struct Endpoints {
    pub bbs_api: String,
    pub catalog_api: String,
    pub game_id: u32,
    pub search_type: u32,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            bbs_api: BBS_API.to_string(),
            catalog_api: CATALOG_API.to_string(),
            game_id: 3,
            search_type: 3,
        }
    }
}

/// Blocking client for the forum and catalog endpoints. One request at a time, no retry.
pub struct KuroBbs {
    client: Client,
    search_url: Url,
    detail_url: Url,
    catalog_base: Url,
    game_id: u32,
    search_type: u32,
}

impl KuroBbs {
    pub fn new(endpoints: &Endpoints, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded;charset=UTF-8"),
        );
        headers.insert("source", HeaderValue::from_static("h5"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config("http client", e))?;

        let bbs = parse_base(&endpoints.bbs_api)?;
        Ok(KuroBbs {
            client,
            search_url: join(&bbs, "forum/search/v2/join")?,
            detail_url: join(&bbs, "forum/getPostDetail")?,
            catalog_base: parse_base(&endpoints.catalog_api)?,
            game_id: endpoints.game_id,
            search_type: endpoints.search_type,
        })
    }

    fn get_text(&self, url: Url) -> Result<String> {
        let endpoint = url.to_string();
        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| Error::upstream(endpoint, e))
    }

    fn post_form<T: DeserializeOwned>(&self, url: &Url, form: &[(&str, String)]) -> Result<T> {
        let endpoint = url.to_string();
        let body = self
            .client
            .post(url.clone())
            .form(form)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| Error::upstream(endpoint.as_str(), e))?;

        let env: Envelope<T> = serde_json::from_str(&body)
            .map_err(|source| Error::UnexpectedPayload { endpoint, source })?;
        Ok(env.data)
    }
}

/// 끝에 `/`가 없으면 join 시 마지막 경로가 잘리므로 보정
fn parse_base(raw: &str) -> Result<Url> {
    let fixed = if raw.ends_with('/') { raw.to_string() } else { format!("{raw}/") };
    Url::parse(&fixed).map_err(|e| Error::config(format!("endpoint base {raw}"), e))
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| Error::config(format!("endpoint {base}{path}"), e))
}

impl CatalogSource for KuroBbs {
    fn fetch_catalog(&self, kind: ItemKind) -> Result<Vec<InventoryItem>> {
        let url = join(&self.catalog_base, kind.dataset())?;
        debug!(%url, "fetching catalog");
        let body = self.get_text(url)?;
        parse_catalog(kind, &body)
    }
}

impl BbsApi for KuroBbs {
    fn search_posts(&self, keyword: &str, page_index: u32, page_size: u32) -> Result<Vec<SearchPost>> {
        let form = [
            ("gameId", self.game_id.to_string()),
            ("keyword", keyword.to_string()),
            ("pageIndex", page_index.to_string()),
            ("pageSize", page_size.to_string()),
            ("searchType", self.search_type.to_string()),
        ];
        let data: SearchData = self.post_form(&self.search_url, &form)?;
        Ok(data.post.post_list)
    }

    fn fetch_post_body(&self, post_id: &str) -> Result<Vec<ContentBlock>> {
        let form = [
            ("isOnlyPublisher", "1".to_string()),
            ("postId", post_id.to_string()),
            ("showOrderType", "2".to_string()),
        ];
        let data: DetailData = self.post_form(&self.detail_url, &form)?;
        Ok(data.post_detail.post_content)
    }
}
