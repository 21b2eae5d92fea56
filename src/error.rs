// src/error.rs
use thiserror::Error;

use crate::catalog::ItemKind;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// 검색/본문/카탈로그 호출 실패. 재시도 없이 실행 중단
    #[error("upstream fetch failed: {endpoint}")]
    UpstreamFetch {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error("unexpected payload from {endpoint}")]
    UnexpectedPayload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: ItemKind, name: String },

    #[error("no time found: {0}")]
    NoTimeFound(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("window starts after it ends: {start} > {end}")]
    InvertedWindow { start: String, end: String },

    #[error("curated record #{index} is malformed: {reason}")]
    InvalidCuratedRecord { index: usize, reason: String },

    #[error("could not serialize {target}")]
    Serialize {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    /// 잘못된 엔드포인트 주소 등 실행 전 설정 오류
    #[error("invalid configuration: {what}")]
    Config {
        what: String,
        #[source]
        source: BoxError,
    },

    #[error("i/o failed on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("post {post_id} could not be parsed")]
    Post {
        post_id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn upstream(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::UpstreamFetch { endpoint: endpoint.into(), source: source.into() }
    }

    pub fn config(what: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Config { what: what.into(), source: source.into() }
    }

    pub fn in_post(self, post_id: &str) -> Self {
        Error::Post { post_id: post_id.to_string(), source: Box::new(self) }
    }
}
