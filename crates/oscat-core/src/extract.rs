//! Token extraction from listing pages and natural (numeric-aware) ordering.
//!
//! A listing is never parsed as HTML: a configured regex is run over the raw
//! text and each match contributes one primary token.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the capture group that, when present, holds the primary token.
pub const VALUE_GROUP: &str = "value";

/// One regex match: the primary token plus every named group that participated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    pub value: String,
    pub groups: BTreeMap<String, String>,
}

impl TokenMatch {
    fn from_captures(re: &Regex, caps: &regex::Captures<'_>) -> Self {
        let groups: BTreeMap<String, String> = re
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();

        let primary = match groups.get(VALUE_GROUP) {
            Some(v) => v.as_str(),
            None if re.captures_len() > 1 => caps
                .get(1)
                .or_else(|| caps.get(0))
                .map_or("", |m| m.as_str()),
            None => caps.get(0).map_or("", |m| m.as_str()),
        };

        Self {
            value: primary.trim_end_matches('/').to_string(),
            groups,
        }
    }
}

/// Runs `re` over `text` and returns one [`TokenMatch`] per match, in document order.
pub fn extract_matches(text: &str, re: &Regex) -> Vec<TokenMatch> {
    re.captures_iter(text)
        .map(|caps| TokenMatch::from_captures(re, &caps))
        .collect()
}

/// Sort direction for [`order_unique`]. Newest-first is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

/// Optional truncation length: only a positive count limits anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limit(Option<usize>);

impl Limit {
    /// Zero or negative values mean "no limit".
    pub fn from_config(value: Option<i64>) -> Self {
        match value {
            Some(n) if n > 0 => Limit(Some(usize::try_from(n).unwrap_or(usize::MAX))),
            _ => Limit(None),
        }
    }

    pub fn apply<T>(self, mut items: Vec<T>) -> Vec<T> {
        if let Some(n) = self.0 {
            items.truncate(n);
        }
        items
    }

    pub fn get(self) -> Option<usize> {
        self.0
    }
}

/// Deduplicates `tokens` and orders them by [`NaturalKey`].
pub fn order_unique<I>(tokens: I, order: Order) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = tokens.into_iter().collect();
    let mut keyed: Vec<(NaturalKey, String)> = unique
        .into_iter()
        .map(|t| (NaturalKey::new(&t), t))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    if order == Order::Descending {
        keyed.reverse();
    }
    keyed.into_iter().map(|(_, t)| t).collect()
}

/// One run of a natural key: digits compare numerically, anything else lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Decimal digits with leading zeros removed ("" for zero).
    Number(String),
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key splitting a token into alternating text and number runs.
///
/// The key always starts and ends with a (possibly empty) text run, so two
/// keys line up kind-for-kind at every position. Comparison is
/// element-by-element; a strict prefix sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    pub fn new(token: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = token.chars().peekable();
        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
                let mut digits = String::from(c);
                while let Some(&d) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                segments.push(Segment::Number(digits.trim_start_matches('0').to_string()));
            } else {
                text.push(c);
            }
        }
        segments.push(Segment::Text(text));
        NaturalKey(segments)
    }
}
