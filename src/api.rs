use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::PipelineError;
use crate::http_client::http_client;

pub const PRODUCT_FOOTBALL: &str = "football/";
pub const PRODUCT_CORE: &str = "core/";

/// Remaining-quota floor below which pagination stops early. The fetch
/// still succeeds with whatever pages were accumulated; callers see the
/// truncation on `PageSet::truncated`.
const RATE_LIMIT_FLOOR: i64 = 2900;

/// Include set for a single fixture detail request.
pub const DETAIL_INCLUDES: &[&str] = &[
    "lineups",
    "events",
    "statistics",
    "timeline",
    "lineups.details",
];

/// Include set for date-range backfill requests.
pub const RANGE_INCLUDES: &[&str] = &[
    "lineups",
    "events",
    "statistics",
    "timeline",
    "lineups.details",
    "formations",
    "participants",
    "participants.players.player",
    "scores",
    "periods",
    "ballCoordinates",
    "xGFixture",
];

pub fn gen_url(config: &ApiConfig, product: &str, endpoint: &str, includes: &[&str]) -> String {
    let mut url = format!(
        "{}{}{}?api_token={}",
        config.base_url, product, endpoint, config.token
    );
    if !includes.is_empty() {
        url.push_str("&include=");
        url.push_str(&includes.join(";"));
    }
    url.push_str("&timezone=");
    url.push_str(&config.timezone);
    url
}

/// The merged outcome of one paginated fetch.
///
/// When exactly one page was fetched the envelope is that page's raw
/// body, untouched — single-resource responses and one-page lists keep
/// whatever meta fields they came with. A multi-page fetch synthesizes
/// an envelope holding the concatenated `data` arrays and the last
/// page's `subscription` / `rate_limit` / `timezone`.
#[derive(Debug, Clone)]
pub struct PageSet {
    pub envelope: Value,
    pub pages: usize,
    pub truncated: bool,
}

impl PageSet {
    /// The `data` array of a list response.
    pub fn data(&self) -> Result<&Vec<Value>> {
        self.envelope
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("response envelope has no data array"))
    }

    /// The `data` object of a single-resource response.
    pub fn record(&self) -> Result<&Value> {
        let data = self
            .envelope
            .get("data")
            .ok_or_else(|| anyhow!("response envelope has no data field"))?;
        if data.is_object() {
            Ok(data)
        } else {
            Err(anyhow!("response data is not a single record"))
        }
    }
}

/// Drive pagination through `get_page`, which maps a url to one parsed
/// response body. Pages are requested strictly in server-reported order;
/// each follow-up url is the *original* url plus the `page=` fragment of
/// the reported next-page link, so the original filters survive.
pub fn paginate_with<F>(url: &str, mut get_page: F) -> Result<PageSet>
where
    F: FnMut(&str) -> Result<Value>,
{
    let mut pages: Vec<Value> = Vec::new();
    let mut truncated = false;
    let mut next_url = url.to_string();

    loop {
        let page = get_page(&next_url)?;
        let next_link = page
            .pointer("/pagination/next_page")
            .and_then(Value::as_str)
            .map(str::to_string);
        let remaining = page.pointer("/rate_limit/remaining").and_then(Value::as_i64);
        pages.push(page);

        let Some(link) = next_link else {
            break;
        };
        if remaining.is_some_and(|rem| rem <= RATE_LIMIT_FLOOR) {
            log::warn!(
                "rate limit remaining {} at or below floor {RATE_LIMIT_FLOOR}, \
                 returning {} page(s) of a longer result",
                remaining.unwrap_or_default(),
                pages.len()
            );
            truncated = true;
            break;
        }
        let Some(fragment) = page_fragment(&link) else {
            break;
        };
        next_url = format!("{url}&{fragment}");
    }

    let envelope = if pages.len() == 1 {
        pages.pop().expect("one page present")
    } else {
        merge_pages(&pages)?
    };

    Ok(PageSet {
        envelope,
        pages: if pages.is_empty() { 1 } else { pages.len() },
        truncated,
    })
}

/// Fetch every page of `url` over the shared blocking client.
pub fn fetch_paginated(url: &str) -> Result<PageSet> {
    let client = http_client()?;
    paginate_with(url, |page_url| {
        let resp = client.get(page_url).send().context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status}: {body}"));
        }
        serde_json::from_str(&body).context("invalid response json")
    })
}

fn page_fragment(link: &str) -> Option<&str> {
    link.find("page=").map(|idx| &link[idx..])
}

fn merge_pages(pages: &[Value]) -> Result<Value> {
    let mut data = Vec::new();
    for (idx, page) in pages.iter().enumerate() {
        let page_data = page
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("page {} has no data array", idx + 1))?;
        data.extend(page_data.iter().cloned());
    }
    let last = pages.last().ok_or_else(|| anyhow!("no pages fetched"))?;
    Ok(serde_json::json!({
        "data": data,
        "subscription": last.get("subscription").cloned().unwrap_or(Value::Null),
        "rate_limit": last.get("rate_limit").cloned().unwrap_or(Value::Null),
        "timezone": last.get("timezone").cloned().unwrap_or(Value::Null),
    }))
}

/// A team referenced either directly or by a name that still needs a
/// search round-trip.
#[derive(Debug, Clone)]
pub enum TeamRef {
    Id(i64),
    Name(String),
}

/// Optional-parameter fixture request, mirroring the upstream request
/// shapes. Unsupported combinations fail with
/// `InvalidParameterCombination` before any request is issued.
#[derive(Debug, Clone, Default)]
pub struct FixtureQuery {
    pub fixture_id: Option<i64>,
    pub date: Option<String>,
    pub date_range_end: Option<String>,
    pub team: Option<TeamRef>,
    pub vs_team: Option<TeamRef>,
}

impl FixtureQuery {
    pub fn by_id(fixture_id: i64) -> Self {
        Self {
            fixture_id: Some(fixture_id),
            ..Self::default()
        }
    }

    pub fn between(date: &str, date_range_end: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            date_range_end: Some(date_range_end.to_string()),
            ..Self::default()
        }
    }

    /// Map the parameter combination to an endpoint path and its include
    /// set. `resolve_team` turns a `TeamRef` into an id (a network
    /// search for names); it is only invoked for combinations that need
    /// a team id.
    pub fn endpoint<F>(&self, mut resolve_team: F) -> Result<(String, &'static [&'static str])>
    where
        F: FnMut(&TeamRef) -> Result<i64>,
    {
        match (
            &self.fixture_id,
            &self.date,
            &self.date_range_end,
            &self.team,
            &self.vs_team,
        ) {
            (Some(id), None, None, None, None) => {
                Ok((format!("fixtures/{id}"), DETAIL_INCLUDES))
            }
            (None, None, None, None, None) => Ok(("fixtures".to_string(), &[])),
            (None, Some(date), None, None, None) => {
                Ok((format!("fixtures/date/{date}"), &[]))
            }
            (None, Some(date), Some(end), None, None) => {
                Ok((format!("fixtures/between/{date}/{end}"), RANGE_INCLUDES))
            }
            (None, Some(date), Some(end), Some(team), None) => {
                let team_id = resolve_team(team)?;
                Ok((
                    format!("fixtures/between/{date}/{end}/{team_id}"),
                    RANGE_INCLUDES,
                ))
            }
            (None, None, None, Some(team), Some(vs_team)) => {
                let team_id = resolve_team(team)?;
                let vs_id = resolve_team(vs_team)?;
                Ok((format!("fixtures/head-to-head/{team_id}/{vs_id}"), &[]))
            }
            _ => Err(PipelineError::InvalidParameterCombination.into()),
        }
    }
}

/// Fetch the fixture pages for `query` with the shared client.
pub fn fetch_fixtures(config: &ApiConfig, query: &FixtureQuery) -> Result<PageSet> {
    let (endpoint, includes) =
        query.endpoint(|team| resolve_team_id(config, team))?;
    let url = gen_url(config, PRODUCT_FOOTBALL, &endpoint, includes);
    fetch_paginated(&url)
}

pub fn resolve_team_id(config: &ApiConfig, team: &TeamRef) -> Result<i64> {
    match team {
        TeamRef::Id(id) => Ok(*id),
        TeamRef::Name(name) => search_team_id(config, name),
    }
}

/// Resolve a team name through the search endpoint, taking the first
/// candidate. An empty candidate list is a hard `SearchNoResult`.
pub fn search_team_id(config: &ApiConfig, name: &str) -> Result<i64> {
    let encoded = name.trim().replace(' ', "%20");
    let url = gen_url(
        config,
        PRODUCT_FOOTBALL,
        &format!("teams/search/{encoded}"),
        &[],
    );
    let pages = fetch_paginated(&url)?;
    first_search_hit(&pages, name)
}

fn first_search_hit(pages: &PageSet, query: &str) -> Result<i64> {
    let no_result = || PipelineError::SearchNoResult {
        query: query.to_string(),
    };
    let candidates = pages.data().map_err(|_| no_result())?;
    let first = candidates.first().ok_or_else(no_result)?;
    let id = first
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(no_result)?;
    if let Some(hit_name) = first.get("name").and_then(Value::as_str) {
        log::info!("search \"{query}\": using first result {hit_name} ({id})");
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig::with_token("TOKEN")
    }

    #[test]
    fn gen_url_carries_token_includes_and_timezone() {
        let url = gen_url(
            &config(),
            PRODUCT_FOOTBALL,
            "fixtures/1",
            &["lineups", "events"],
        );
        assert_eq!(
            url,
            "https://api.sportmonks.com/v3/football/fixtures/1?api_token=TOKEN\
             &include=lineups;events&timezone=America/Chicago"
        );
    }

    #[test]
    fn gen_url_without_includes_has_no_include_param() {
        let url = gen_url(&config(), PRODUCT_CORE, "types", &[]);
        assert!(!url.contains("include="));
        assert!(url.contains("core/types?api_token=TOKEN"));
    }

    fn no_team(_: &TeamRef) -> Result<i64> {
        panic!("combination should not need a team id");
    }

    #[test]
    fn endpoint_for_single_fixture() {
        let (endpoint, includes) = FixtureQuery::by_id(19051563).endpoint(no_team).unwrap();
        assert_eq!(endpoint, "fixtures/19051563");
        assert_eq!(includes, DETAIL_INCLUDES);
    }

    #[test]
    fn endpoint_for_date_range() {
        let (endpoint, includes) = FixtureQuery::between("2023-01-01", "2023-03-31")
            .endpoint(no_team)
            .unwrap();
        assert_eq!(endpoint, "fixtures/between/2023-01-01/2023-03-31");
        assert_eq!(includes, RANGE_INCLUDES);
    }

    #[test]
    fn endpoint_for_head_to_head_resolves_both_teams() {
        let query = FixtureQuery {
            team: Some(TeamRef::Id(62)),
            vs_team: Some(TeamRef::Id(53)),
            ..FixtureQuery::default()
        };
        let (endpoint, _) = query
            .endpoint(|team| match team {
                TeamRef::Id(id) => Ok(*id),
                TeamRef::Name(_) => unreachable!(),
            })
            .unwrap();
        assert_eq!(endpoint, "fixtures/head-to-head/62/53");
    }

    #[test]
    fn endpoint_rejects_invalid_combination() {
        // End date without a start date matches no request shape.
        let query = FixtureQuery {
            date_range_end: Some("2023-03-31".to_string()),
            ..FixtureQuery::default()
        };
        let err = query.endpoint(no_team).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidParameterCombination)
        ));
    }

    #[test]
    fn endpoint_rejects_fixture_id_mixed_with_dates() {
        let mut query = FixtureQuery::by_id(1);
        query.date = Some("2023-01-01".to_string());
        assert!(query.endpoint(no_team).is_err());
    }

    #[test]
    fn page_fragment_keeps_everything_from_page_marker() {
        assert_eq!(
            page_fragment("https://x/fixtures?api_token=t&page=2&order=id"),
            Some("page=2&order=id")
        );
        assert_eq!(page_fragment("https://x/fixtures?api_token=t"), None);
    }
}
