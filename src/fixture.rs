use serde::Deserialize;

/// One fixture as the API delivers it with the full include set.
///
/// Every nested collection defaults to empty when the include was not
/// requested or the API returned nothing; scalar fields other than `id`
/// are optional. The `*_name` / `lineup_type` / `position` fields are
/// enrichment slots: absent in the payload, filled in place by
/// `enrich::enrich_fixture`, never replacing the numeric ids they are
/// derived from.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub id: i64,
    pub name: Option<String>,
    pub venue_id: Option<i64>,
    pub starting_at: Option<String>,
    pub result_info: Option<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
    #[serde(default)]
    pub formations: Vec<FormationEntry>,
    #[serde(default, rename = "xgfixture")]
    pub xg_fixture: Vec<XgEntry>,
    #[serde(default)]
    pub events: Vec<EventEntry>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub lineups: Vec<LineupEntry>,
    #[serde(default)]
    pub statistics: Vec<StatisticEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub location: Option<String>,
    #[serde(default)]
    pub players: Vec<SquadEntry>,
}

/// One squad slot under a participant; `id` is the lineup-player id,
/// `player` the nested bio record.
#[derive(Debug, Clone, Deserialize)]
pub struct SquadEntry {
    pub id: Option<i64>,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub position_id: Option<i64>,
    pub detailed_position_id: Option<i64>,
    pub jersey_number: Option<i64>,
    pub player: Option<PlayerBio>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerBio {
    pub name: Option<String>,
    pub nationality_id: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub date_of_birth: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreEntry {
    pub description: Option<String>,
    pub participant: Option<String>,
    pub score: Option<ScoreDetail>,
}

/// Absent `goals` means no goal count was reported, not zero.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreDetail {
    pub goals: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormationEntry {
    pub location: Option<String>,
    pub formation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgEntry {
    pub location: Option<String>,
    pub data: Option<XgData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XgData {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventEntry {
    pub fixture_id: Option<i64>,
    pub id: Option<i64>,
    pub period_id: Option<i64>,
    pub minute: Option<i64>,
    pub extra_minute: Option<i64>,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub participant_id: Option<i64>,
    pub related_player_id: Option<i64>,
    pub related_player_name: Option<String>,
    pub type_id: Option<i64>,
    pub sub_type_id: Option<i64>,
    pub info: Option<String>,
    pub injured: Option<bool>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub sub_type_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Period {
    pub id: i64,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupEntry {
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub type_id: Option<i64>,
    pub position_id: Option<i64>,
    #[serde(default)]
    pub details: Vec<LineupDetail>,
    #[serde(default)]
    pub lineup_type: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineupDetail {
    pub type_id: Option<i64>,
    pub data: Option<DetailData>,
    #[serde(default)]
    pub type_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailData {
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticEntry {
    pub type_id: Option<i64>,
    #[serde(default)]
    pub type_name: Option<String>,
}
