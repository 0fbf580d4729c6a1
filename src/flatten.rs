use std::fmt;

use crate::error::PipelineError;
use crate::fixture::{EventEntry, Fixture};
use crate::lookup::{LookupStore, Namespace};

/// One output cell. `Null` renders as an empty delimited field and is
/// how every independently-optional column (formation, half goals, xG,
/// period sort order, absent lookup codes) reaches the output.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

pub type Row = Vec<Cell>;

/// A named batch of rows destined for one table file.
pub type TableRows = (&'static str, Vec<Row>);

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
            Cell::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn opt_int(value: Option<i64>) -> Self {
        value.map_or(Cell::Null, Cell::Int)
    }

    pub fn opt_float(value: Option<f64>) -> Self {
        value.map_or(Cell::Null, Cell::Float)
    }

    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        value.map_or(Cell::Null, |v| Cell::Text(v.into()))
    }

    pub fn opt_bool(value: Option<bool>) -> Self {
        value.map_or(Cell::Null, Cell::Bool)
    }
}

/// Fixture-level tables: one `fixture` row and exactly two `performance`
/// rows (home then away), whatever the optional collections contain.
/// A fixture without both a home and an away participant cannot be
/// flattened and fails with `FieldMissing`.
pub fn fixture_tables(fx: &Fixture) -> Result<Vec<TableRows>, PipelineError> {
    let home = participant_id_by_location(fx, "home")?;
    let away = participant_id_by_location(fx, "away")?;

    let fixture_row = vec![
        Cell::Int(fx.id),
        Cell::opt_text(fx.name.as_deref()),
        Cell::opt_int(fx.venue_id),
        Cell::opt_text(fx.starting_at.as_deref()),
        Cell::opt_text(fx.result_info.as_deref()),
        Cell::Int(home),
        Cell::Int(away),
    ];

    let performance = vec![
        performance_row(fx, home, "home"),
        performance_row(fx, away, "away"),
    ];

    Ok(vec![
        ("fixture", vec![fixture_row]),
        ("performance", performance),
    ])
}

fn participant_id_by_location(fx: &Fixture, side: &'static str) -> Result<i64, PipelineError> {
    fx.participants
        .iter()
        .find(|p| p.location.as_deref() == Some(side))
        .map(|p| p.id)
        .ok_or_else(|| PipelineError::field_missing("participants", format!("location == {side}")))
}

fn performance_row(fx: &Fixture, team_id: i64, side: &'static str) -> Row {
    vec![
        Cell::Int(fx.id),
        Cell::Int(team_id),
        Cell::opt_text(formation(fx, side)),
        Cell::opt_int(half_goals(fx, side, "1ST_HALF")),
        Cell::opt_int(half_goals(fx, side, "2ND_HALF")),
        Cell::opt_float(xg_value(fx, side)),
        Cell::text(side),
    ]
}

fn formation(fx: &Fixture, side: &str) -> Option<String> {
    fx.formations
        .iter()
        .find(|f| f.location.as_deref() == Some(side))
        .and_then(|f| f.formation.clone())
}

/// First score entry matching the half description and side, in list
/// order; a missing entry or a missing goal count is null, never zero.
fn half_goals(fx: &Fixture, side: &str, half: &str) -> Option<i64> {
    fx.scores
        .iter()
        .find(|s| s.description.as_deref() == Some(half) && s.participant.as_deref() == Some(side))
        .and_then(|s| s.score.as_ref())
        .and_then(|score| score.goals)
}

fn xg_value(fx: &Fixture, side: &str) -> Option<f64> {
    fx.xg_fixture
        .iter()
        .find(|x| x.location.as_deref() == Some(side))
        .and_then(|x| x.data.as_ref())
        .and_then(|data| data.value)
}

/// One `events` row per event entry, 14 columns.
pub fn event_tables(fx: &Fixture) -> Vec<TableRows> {
    let rows = fx.events.iter().map(|event| event_row(fx, event)).collect();
    vec![("events", rows)]
}

fn event_row(fx: &Fixture, event: &EventEntry) -> Row {
    let sort_order = event
        .period_id
        .and_then(|pid| fx.periods.iter().find(|p| p.id == pid))
        .and_then(|p| p.sort_order);

    vec![
        Cell::opt_int(event.fixture_id),
        Cell::opt_int(event.id),
        Cell::opt_int(sort_order),
        Cell::opt_int(event.minute),
        Cell::opt_int(event.extra_minute),
        Cell::opt_int(event.player_id),
        Cell::opt_text(event.player_name.as_deref()),
        Cell::opt_int(event.participant_id),
        Cell::opt_int(event.related_player_id),
        Cell::opt_text(event.related_player_name.as_deref()),
        Cell::opt_text(event.type_name.as_deref()),
        Cell::opt_text(event.sub_type_name.as_deref()),
        Cell::opt_text(event.info.as_deref()),
        Cell::opt_bool(event.injured),
    ]
}

/// One `player_performance` row per lineup entry × detail entry.
pub fn player_performance_tables(fx: &Fixture) -> Vec<TableRows> {
    let mut rows = Vec::new();
    for lineup in &fx.lineups {
        for detail in &lineup.details {
            rows.push(vec![
                Cell::opt_int(lineup.player_id),
                Cell::Int(fx.id),
                Cell::opt_int(lineup.team_id),
                Cell::opt_text(detail.type_name.as_deref()),
                Cell::opt_float(detail.data.as_ref().and_then(|d| d.value)),
            ]);
        }
    }
    vec![("player_performance", rows)]
}

/// One `players` row per squad slot across the first two participants'
/// rosters, home roster first. Nationality and position codes resolve
/// softly: an absent code is a null column, not an error.
pub fn players_tables(
    fx: &Fixture,
    lookups: &LookupStore,
) -> Result<Vec<TableRows>, PipelineError> {
    let (Some(first), Some(second)) = (fx.participants.first(), fx.participants.get(1)) else {
        return Err(PipelineError::field_missing(
            "participants",
            "two rosters present",
        ));
    };

    let mut rows = Vec::new();
    for entry in first.players.iter().chain(second.players.iter()) {
        let bio = entry.player.as_ref();
        rows.push(vec![
            Cell::opt_int(entry.id),
            Cell::opt_int(entry.player_id),
            Cell::opt_int(entry.team_id),
            Cell::opt_text(bio.and_then(|p| p.name.as_deref())),
            Cell::opt_text(lookups.find(
                Namespace::Countries,
                bio.and_then(|p| p.nationality_id),
            )),
            Cell::opt_text(lookups.find(Namespace::Types, entry.position_id)),
            Cell::opt_text(lookups.find(Namespace::Types, entry.detailed_position_id)),
            Cell::opt_int(entry.jersey_number),
            Cell::opt_int(bio.and_then(|p| p.height)),
            Cell::opt_int(bio.and_then(|p| p.weight)),
            Cell::opt_text(bio.and_then(|p| p.date_of_birth.as_deref())),
            Cell::opt_text(bio.and_then(|p| p.image_path.as_deref())),
        ]);
    }
    Ok(vec![("players", rows)])
}
