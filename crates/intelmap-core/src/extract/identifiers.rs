//! Phone numbers, vehicle registrations, and PNC identifiers.
//!
//! | Text                          | Result                                   |
//! |-------------------------------|------------------------------------------|
//! | `07700 900123`, `07700900123` | phone `07700900123`                      |
//! | `0770 0900123`, `020 7946 0000`| not a UK mobile, ignored                |
//! | `VRM ab12 cde`                | vehicle `AB12CDE`                        |
//! | `VRM AB12CDE ... since 2019`  | vehicle `AB12CDE`, keeper since `2019`   |
//! | `PNCID 01/234` / `PNCID01234` | `01` / `01234` (word characters only)    |
//!
//! A `since <year>` anywhere in the entry is attached to every vehicle in
//! that entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Vehicle;

static RE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(07\d{3}\s?\d{6})\b").unwrap());
static RE_VRM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)VRM\s+([A-Z]{2}\d{2}\s?[A-Z]{3})").unwrap());
static RE_SINCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)since\s+(\d{4})").unwrap());
static RE_PNCID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)PNCID\s*(\w+)").unwrap());

/// UK mobile numbers with internal whitespace removed. Repeats are kept.
pub fn phones(text: &str) -> Vec<String> {
    RE_PHONE
        .captures_iter(text)
        .map(|c| strip_whitespace(&c[1]))
        .collect()
}

pub fn vehicles(text: &str) -> Vec<Vehicle> {
    let since = RE_SINCE.captures(text).map(|c| c[1].to_string());
    RE_VRM
        .captures_iter(text)
        .map(|c| Vehicle {
            vrm: strip_whitespace(&c[1]).to_ascii_uppercase(),
            since: since.clone(),
        })
        .collect()
}

pub fn pnc_ids(text: &str) -> Vec<String> {
    RE_PNCID
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
