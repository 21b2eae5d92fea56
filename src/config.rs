// src/config.rs
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::discovery::{DiscoveryOptions, OFFICIAL_USER, POST_PAGE};
use crate::kurobbs::{Endpoints, BBS_API, CATALOG_API};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "banner_timeline",
    about = "Kuro BBS banner scraper: official 唤取 announcements + curated history → pool.json"
)]
pub struct Args {
    /// 카테고리당 검색 페이지 수
    #[arg(long, env = "BANNER_PAGES", default_value_t = 5)]
    pub pages: u32,
    /// 페이지당 게시글 수
    #[arg(long, env = "BANNER_PAGE_SIZE", default_value_t = 20)]
    pub page_size: u32,

    /// 공지 작성 계정
    #[arg(long, env = "BANNER_OFFICIAL_USER", default_value = OFFICIAL_USER)]
    pub official_user: String,

    #[arg(long, default_value_t = 3)]
    pub game_id: u32,
    #[arg(long, default_value_t = 3)]
    pub search_type: u32,

    /// 요청별 타임아웃(초), 재시도 없음
    #[arg(long, env = "BANNER_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, env = "BANNER_OUT_DIR", default_value = "data")]
    pub out_dir: PathBuf,

    /// 내장 목록 대신 쓸 수동 기록 JSON
    #[arg(long)]
    pub curated: Option<PathBuf>,

    #[arg(long, default_value = BBS_API)]
    pub bbs_api: String,
    #[arg(long, default_value = CATALOG_API)]
    pub catalog_api: String,
    #[arg(long, default_value = POST_PAGE)]
    pub post_page: String,

    /// 콘솔 프리뷰 개수
    #[arg(long, env = "PREVIEW_N", default_value_t = 30)]
    pub preview: usize,
}

impl Args {
    pub fn discovery(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            pages: self.pages,
            page_size: self.page_size,
            official_user: self.official_user.clone(),
            post_page: self.post_page.clone(),
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            bbs_api: self.bbs_api.clone(),
            catalog_api: self.catalog_api.clone(),
            game_id: self.game_id,
            search_type: self.search_type,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
