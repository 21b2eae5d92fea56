// src/title.rs
use once_cell::sync::Lazy;
use regex::Regex;

static RE_GUILLEMET: Lazy<Regex> = Lazy::new(|| Regex::new(r"「(.*?)」").unwrap());

/// Which match of a pattern to keep.
#[derive(Clone, Copy, Debug)]
enum Pick {
    First,
    Last,
}

struct Pattern {
    re: &'static Lazy<Regex>,
    pick: Pick,
}

impl Pattern {
    fn apply(&self, text: &str) -> Option<String> {
        let mut caps = self.re.captures_iter(text).map(|c| c[1].to_string());
        match self.pick {
            Pick::First => caps.next(),
            Pick::Last  => caps.last(),
        }
    }
}

static RE_ESCAPED_ANGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&lt;(.*?)&gt;").unwrap());
static RE_SQUARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());
static RE_ANGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<(.*?)>").unwrap());

/// 배너 이름: 마지막 「」
static NAME: Pattern = Pattern { re: &RE_GUILLEMET, pick: Pick::Last };

/// 부제 후보. 앞에서부터 시도하고 처음 매치된 것을 사용
/// (시기/작성자마다 괄호 표기가 달라서 순서가 중요)
static SUBTITLE_CHAIN: &[Pattern] = &[
    Pattern { re: &RE_ESCAPED_ANGLE, pick: Pick::First },
    Pattern { re: &RE_SQUARE,        pick: Pick::First },
    Pattern { re: &RE_ANGLE,         pick: Pick::First },
    Pattern { re: &RE_GUILLEMET,     pick: Pick::First },
];

const EMPHASIS_TAGS: &[&str] = &["<em>", "</em>"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleFields {
    pub feature_name: String,
    pub subtitle: String,
}

/// 검색 하이라이트(<em>) 제거
pub fn strip_emphasis(title: &str) -> String {
    EMPHASIS_TAGS
        .iter()
        .fold(title.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// Expects a title with emphasis markup already stripped.
pub fn extract_title_fields(title: &str) -> TitleFields {
    let feature_name = NAME.apply(title).unwrap_or_default();
    let subtitle = SUBTITLE_CHAIN
        .iter()
        .find_map(|p| p.apply(title))
        .unwrap_or_default();
    TitleFields { feature_name, subtitle }
}
