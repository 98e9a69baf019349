//! `Firstname SURNAME` recognition.
//!
//! | Text                              | Result                                |
//! |-----------------------------------|---------------------------------------|
//! | `John SMITH`                      | John SMITH                            |
//! | `John SMITH ... John SMITH`       | one mention                           |
//! | `North YORKSHIRE`, `Over DRIVE`   | suppressed by the leading-word stoplist |
//! | `JOHN SMITH`, `John Smith`        | no match (needs Capitalised + ALL-CAPS) |
//! | `Jo A`                            | no match (surname needs 2+ letters)   |
//! | `SMITH (DOB 01/02/1980)`          | date of birth attached                |

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::PersonMention;

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-z]+)\s+([A-Z]{2,})\b").unwrap());

/// Leading words that pair with an all-caps word in place names, not people.
const NAME_STOPLIST: &[&str] = &[
    "Over", "Fort", "Great", "South", "North", "East", "West", "New",
];

pub fn persons(text: &str) -> Vec<PersonMention> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for caps in RE_NAME.captures_iter(text) {
        let (Some(first), Some(surname)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let first = first.as_str();
        if NAME_STOPLIST.contains(&first) {
            continue;
        }
        let full_name = format!("{first} {}", surname.as_str());
        if !seen.insert(full_name.clone()) {
            continue;
        }
        out.push(PersonMention {
            first_name: first.to_string(),
            surname: surname.as_str().to_string(),
            dob: date_of_birth(surname.as_str(), &text[surname.start()..]),
            full_name,
        });
    }
    out
}

/// First `SURNAME ... DOB dd/mm/yyyy` in `rest`, shortest span.
fn date_of_birth(surname: &str, rest: &str) -> Option<String> {
    let pattern = format!(
        r"(?is){}.*?DOB\s+(\d{{2}}/\d{{2}}/\d{{4}})",
        regex::escape(surname)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(rest).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        persons(text).into_iter().map(|p| p.full_name).collect()
    }

    #[test]
    fn simple_name() {
        let found = persons("Intel suggests John SMITH is active.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "John");
        assert_eq!(found[0].surname, "SMITH");
        assert_eq!(found[0].full_name, "John SMITH");
        assert_eq!(found[0].dob, None);
    }

    #[test]
    fn multiple_people_in_order() {
        assert_eq!(
            names("Sarah JONES met Paul O'BRIEN and Ahmed KHAN at the pub"),
            vec!["Sarah JONES", "Ahmed KHAN"]
        );
    }

    #[test]
    fn duplicates_within_entry_recognised_once() {
        assert_eq!(names("John SMITH called. Later John SMITH left."), vec!["John SMITH"]);
    }

    #[test]
    fn stoplist_suppresses_place_names() {
        assert!(names("Seen in North YORKSHIRE and at Over DRIVE, New YORK").is_empty());
        assert!(names("Fort WILLIAM, Great YARMOUTH, South SHIELDS").is_empty());
        assert!(names("East LONDON, West BROMWICH").is_empty());
    }

    #[test]
    fn requires_capitalised_then_all_caps() {
        assert!(names("JOHN SMITH and John Smith").is_empty());
        assert!(names("Jo A was there").is_empty());
    }

    #[test]
    fn date_of_birth_attached() {
        let found = persons("Mark TAYLOR (DOB 12/05/1985) lives locally.");
        assert_eq!(found[0].dob.as_deref(), Some("12/05/1985"));
    }

    #[test]
    fn date_of_birth_spans_text_after_surname() {
        let found = persons("Mark TAYLOR is known to police. TAYLOR, dob 01/01/1990, was arrested.");
        assert_eq!(found[0].dob.as_deref(), Some("01/01/1990"));
    }

    #[test]
    fn date_of_birth_requires_full_date() {
        let found = persons("Mark TAYLOR DOB 1985");
        assert_eq!(found[0].dob, None);
    }

    #[test]
    fn each_person_gets_nearest_following_dob() {
        let found = persons("Ann LEE DOB 01/01/1970 and Bob KAY DOB 02/02/1972");
        assert_eq!(found[0].dob.as_deref(), Some("01/01/1970"));
        assert_eq!(found[1].dob.as_deref(), Some("02/02/1972"));
    }
}
