use anyhow::anyhow;
use serde_json::{Value, json};

use sportmonk_etl::api::paginate_with;

const BASE_URL: &str = "https://api.test/football/fixtures?api_token=t&include=lineups";

fn page(names: &[&str], next_page: Option<&str>, remaining: i64) -> Value {
    json!({
        "data": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
        "pagination": {"next_page": next_page},
        "subscription": [{"plan": "standard"}],
        "rate_limit": {"remaining": remaining, "resets_in_seconds": 3600},
        "timezone": "America/Chicago",
    })
}

fn names(envelope: &Value) -> Vec<String> {
    envelope["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|v| v["name"].as_str().expect("name").to_string())
        .collect()
}

#[test]
fn pages_concatenate_in_server_order() {
    let mut requested = Vec::new();
    let result = paginate_with(BASE_URL, |url| {
        requested.push(url.to_string());
        Ok(match requested.len() {
            1 => page(&["A", "B"], Some("https://api.test/football/fixtures?page=2"), 5000),
            2 => page(&["C", "D"], Some("https://api.test/football/fixtures?page=3"), 4999),
            3 => page(&["E"], None, 4998),
            n => return Err(anyhow!("unexpected request {n}")),
        })
    })
    .unwrap();

    assert_eq!(result.pages, 3);
    assert!(!result.truncated);
    assert_eq!(names(&result.envelope), ["A", "B", "C", "D", "E"]);
    // Merged envelope carries the last page's meta.
    assert_eq!(result.envelope["timezone"], "America/Chicago");
    assert_eq!(result.envelope["rate_limit"]["remaining"], 4998);
}

#[test]
fn follow_up_requests_splice_the_page_fragment_onto_the_original_url() {
    let mut requested = Vec::new();
    paginate_with(BASE_URL, |url| {
        requested.push(url.to_string());
        Ok(match requested.len() {
            1 => page(
                &["A"],
                Some("https://api.test/football/fixtures?page=2&order=id"),
                5000,
            ),
            _ => page(&["B"], None, 4999),
        })
    })
    .unwrap();

    assert_eq!(requested.len(), 2);
    assert_eq!(requested[0], BASE_URL);
    // The original url (with its filters) plus only the page fragment of
    // the reported link.
    assert_eq!(requested[1], format!("{BASE_URL}&page=2&order=id"));
}

#[test]
fn rate_limit_floor_truncates_without_error() {
    let mut calls = 0usize;
    let result = paginate_with(BASE_URL, |_| {
        calls += 1;
        Ok(match calls {
            1 => page(&["A", "B"], Some("https://api.test/football/fixtures?page=2"), 5000),
            2 => page(&["C", "D"], Some("https://api.test/football/fixtures?page=3"), 2900),
            n => return Err(anyhow!("page {n} must not be fetched past the floor")),
        })
    })
    .unwrap();

    assert_eq!(calls, 2);
    assert!(result.truncated);
    assert_eq!(names(&result.envelope), ["A", "B", "C", "D"]);
}

#[test]
fn exhausted_last_page_is_not_truncation() {
    let result = paginate_with(BASE_URL, |_| Ok(page(&["A"], None, 100))).unwrap();
    assert!(!result.truncated);
    assert_eq!(result.pages, 1);
}

#[test]
fn single_page_envelope_is_returned_raw() {
    let envelope = json!({
        "data": {"id": 19051563, "name": "Celtic vs Rangers"},
        "subscription": [{"meta": {"trial_ends_at": null}}],
        "rate_limit": {"remaining": 2998},
        "timezone": "America/Chicago",
    });
    let raw = envelope.clone();
    let result = paginate_with(BASE_URL, move |_| Ok(envelope.clone())).unwrap();

    // No pagination block means one page; the body must come back
    // untouched, meta fields and all.
    assert_eq!(result.envelope, raw);
    assert_eq!(result.pages, 1);
    assert!(!result.truncated);
    assert_eq!(result.record().unwrap()["id"], 19051563);
}

#[test]
fn next_link_without_page_fragment_ends_pagination() {
    let mut calls = 0usize;
    let result = paginate_with(BASE_URL, |_| {
        calls += 1;
        Ok(page(&["A"], Some("https://api.test/football/fixtures"), 5000))
    })
    .unwrap();
    assert_eq!(calls, 1);
    assert_eq!(names(&result.envelope), ["A"]);
}

#[test]
fn page_fetch_errors_propagate() {
    let result = paginate_with(BASE_URL, |_| Err(anyhow!("boom")));
    assert!(result.is_err());
}
