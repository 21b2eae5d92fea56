// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use banner_timeline::config::Args;
use banner_timeline::kurobbs::KuroBbs;
use banner_timeline::{curated, discovery, timeline};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("banner_timeline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(pages = args.pages, page_size = args.page_size, "start");

    let api = KuroBbs::new(&args.endpoints(), args.timeout()).context("http client")?;

    // ── 1) 카탈로그: 매번 새로 받음
    let catalog = discovery::load_catalog(&api).context("catalog fetch")?;

    // ── 2) 검색 → 본문 파싱 (캐릭터 → 무기)
    let discovered = discovery::discover_all(&api, &catalog, &args.discovery())
        .context("banner discovery")?;

    // ── 3) 수동 기록과 합쳐 종료 시각 순 정렬
    let curated = curated::load(args.curated.as_deref()).context("curated records")?;
    let merged = timeline::merge(curated, discovered);
    if let Some(reason) = &merged.sort_error {
        error!(%reason, "writing unsorted timeline");
    }

    // ── 4) pool.json / pool.min.json
    let (pretty, compact) = timeline::write_artifacts(&merged.records, &args.out_dir)
        .context("write timeline")?;

    // ── 5) 콘솔 프리뷰
    println!("[Banners: {} items]\n", merged.records.len());
    for r in merged.records.iter().rev().take(args.preview) {
        println!("- {}", r);
    }

    info!(pretty = %pretty.display(), compact = %compact.display(), "done");
    Ok(())
}
