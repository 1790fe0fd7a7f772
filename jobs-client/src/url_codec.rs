//! Query-string form of the filter state, for shareable links and history
//! navigation.
//!
//! | key       | value                                  |
//! |-----------|----------------------------------------|
//! | `q`       | query text                             |
//! | `exp`     | experience levels, comma-joined        |
//! | `type`    | employment types, comma-joined         |
//! | `mode`    | work modes, comma-joined               |
//! | `prov`    | provinces, comma-joined                |
//! | `func`    | job functions, comma-joined            |
//! | `company` | company names, comma-joined            |
//! | `lang`    | language, only when not `english`      |
//! | `date`    | date preset, only when not `any`       |
//! | `p`       | page, only when not 1                  |
//!
//! Decoding is lenient: unknown keys, unknown values and bad pages are
//! skipped.

use url::form_urlencoded;

use crate::filters::{FilterState, MultiSelectKey, SingleSelectKey};

const QUERY: &str = "q";
const LANGUAGE: &str = "lang";
const DATE: &str = "date";
const PAGE: &str = "p";

const MULTI_KEYS: [(&str, MultiSelectKey); 6] = [
    ("exp", MultiSelectKey::ExperienceLevel),
    ("type", MultiSelectKey::EmploymentType),
    ("mode", MultiSelectKey::WorkMode),
    ("prov", MultiSelectKey::Province),
    ("func", MultiSelectKey::JobFunction),
    ("company", MultiSelectKey::Company),
];

/// Canonical query string (without the leading `?`) for `state` at `page`.
pub fn encode(state: &FilterState, page: u32) -> String {
    let state = state.normalized();
    let mut out = form_urlencoded::Serializer::new(String::new());

    if !state.query().is_empty() {
        out.append_pair(QUERY, state.query());
    }
    for (name, key) in MULTI_KEYS {
        let values = state.values(key);
        if !values.is_empty() {
            out.append_pair(name, &values.join(","));
        }
    }
    if state.active_count(SingleSelectKey::Language) > 0 {
        out.append_pair(LANGUAGE, state.language().as_ref());
    }
    if state.active_count(SingleSelectKey::Date) > 0 {
        out.append_pair(DATE, state.date().as_ref());
    }
    if page > 1 {
        out.append_pair(PAGE, &page.to_string());
    }

    out.finish()
}

/// Filter state and page described by `query_string`. A leading `?` is
/// accepted. Missing or invalid pages decode as 1.
pub fn decode(query_string: &str) -> (FilterState, u32) {
    let input = query_string.strip_prefix('?').unwrap_or(query_string);
    let mut state = FilterState::new();
    let mut page = 1;

    for (name, value) in form_urlencoded::parse(input.as_bytes()) {
        match &*name {
            QUERY => state.set_query(value.trim()),
            LANGUAGE => {
                let _ = state.set_single(SingleSelectKey::Language, &value);
            }
            DATE => {
                let _ = state.set_single(SingleSelectKey::Date, &value);
            }
            PAGE => {
                if let Some(p) = value.trim().parse::<u32>().ok().filter(|p| *p >= 1) {
                    page = p;
                }
            }
            other => {
                let Some((_, key)) = MULTI_KEYS.iter().find(|(n, _)| *n == other) else {
                    continue;
                };
                for item in value.split(',').map(str::trim).filter(|v| !v.is_empty()) {
                    // Repeated keys merge; a value listed twice stays selected.
                    if !state.is_selected(*key, item) {
                        let _ = state.toggle(*key, item);
                    }
                }
            }
        }
    }

    (state, page)
}
