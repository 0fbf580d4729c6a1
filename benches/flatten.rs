use std::collections::HashMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use sportmonk_etl::enrich::enrich_fixture;
use sportmonk_etl::fixture::Fixture;
use sportmonk_etl::flatten::{
    event_tables, fixture_tables, player_performance_tables, players_tables,
};
use sportmonk_etl::lookup::LookupStore;

fn sample_fixture() -> Fixture {
    serde_json::from_str(FIXTURE_JSON).expect("valid fixture json")
}

fn sample_store() -> LookupStore {
    let types: HashMap<i64, String> = [
        (11, "Lineup"),
        (14, "Goal"),
        (24, "Goalkeeper"),
        (42, "Shots Total"),
        (118, "Rating"),
    ]
    .into_iter()
    .map(|(code, name)| (code, name.to_string()))
    .collect();
    let countries: HashMap<i64, String> = [(462i64, "England".to_string())].into_iter().collect();
    LookupStore::from_tables(types, countries)
}

fn bench_fixture_parse(c: &mut Criterion) {
    c.bench_function("fixture_parse", |b| {
        b.iter(|| {
            let fx: Fixture = serde_json::from_str(black_box(FIXTURE_JSON)).unwrap();
            black_box(fx.id);
        });
    });
}

fn bench_enrich_and_flatten(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("enrich_and_flatten", |b| {
        b.iter(|| {
            let mut fx = sample_fixture();
            enrich_fixture(&mut fx, &store).unwrap();
            let mut rows = 0usize;
            for (_, table) in fixture_tables(&fx).unwrap() {
                rows += table.len();
            }
            for (_, table) in event_tables(&fx) {
                rows += table.len();
            }
            for (_, table) in player_performance_tables(&fx) {
                rows += table.len();
            }
            for (_, table) in players_tables(&fx, &store).unwrap() {
                rows += table.len();
            }
            black_box(rows);
        });
    });
}

criterion_group!(benches, bench_fixture_parse, bench_enrich_and_flatten);
criterion_main!(benches);

const FIXTURE_JSON: &str = r#"{
  "id": 18535264,
  "name": "Arsenal vs Chelsea",
  "venue_id": 204,
  "starting_at": "2024-04-23 19:00:00",
  "result_info": "Arsenal won after full-time.",
  "participants": [
    {"id": 19, "location": "home", "players": [
      {"id": 5001, "player_id": 101, "team_id": 19, "position_id": 24,
       "detailed_position_id": 24, "jersey_number": 1,
       "player": {"name": "Keeper One", "nationality_id": 462, "height": 190,
                  "weight": 84, "date_of_birth": "1994-05-02", "image_path": null}}
    ]},
    {"id": 18, "location": "away", "players": [
      {"id": 5002, "player_id": 102, "team_id": 18, "position_id": 24,
       "detailed_position_id": 24, "jersey_number": 1,
       "player": {"name": "Keeper Two", "nationality_id": 462, "height": 188,
                  "weight": 82, "date_of_birth": "1996-09-14", "image_path": null}}
    ]}
  ],
  "scores": [
    {"description": "1ST_HALF", "participant": "home", "score": {"goals": 3}},
    {"description": "1ST_HALF", "participant": "away", "score": {"goals": 0}},
    {"description": "2ND_HALF", "participant": "home", "score": {"goals": 2}},
    {"description": "2ND_HALF", "participant": "away", "score": {"goals": 0}}
  ],
  "formations": [
    {"location": "home", "formation": "4-3-3"},
    {"location": "away", "formation": "3-4-3"}
  ],
  "xgfixture": [
    {"location": "home", "data": {"value": 3.12}},
    {"location": "away", "data": {"value": 0.44}}
  ],
  "periods": [
    {"id": 7001, "sort_order": 1},
    {"id": 7002, "sort_order": 2}
  ],
  "events": [
    {"fixture_id": 18535264, "id": 9001, "period_id": 7001, "minute": 4,
     "extra_minute": null, "player_id": 101, "player_name": "Keeper One",
     "participant_id": 19, "related_player_id": null, "related_player_name": null,
     "type_id": 14, "sub_type_id": null, "info": null, "injured": null},
    {"fixture_id": 18535264, "id": 9002, "period_id": 7002, "minute": 77,
     "extra_minute": null, "player_id": 102, "player_name": "Keeper Two",
     "participant_id": 18, "related_player_id": null, "related_player_name": null,
     "type_id": 14, "sub_type_id": null, "info": null, "injured": null}
  ],
  "lineups": [
    {"player_id": 101, "team_id": 19, "type_id": 11, "position_id": 24,
     "details": [{"type_id": 118, "data": {"value": 7.8}}]},
    {"player_id": 102, "team_id": 18, "type_id": 11, "position_id": 24,
     "details": [{"type_id": 118, "data": {"value": 5.9}}]}
  ],
  "statistics": [
    {"type_id": 42},
    {"type_id": 42}
  ]
}"#;
