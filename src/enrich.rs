use crate::error::PipelineError;
use crate::fixture::Fixture;
use crate::lookup::{LookupStore, Namespace};

/// Resolve every type code in the fixture's nested collections to its
/// display name, writing the names into the record's enrichment slots.
/// The numeric ids stay untouched next to them.
///
/// Null codes resolve to `"N/A"`; a non-null code with no lookup entry
/// aborts enrichment of this fixture with `LookupKeyMissing`.
pub fn enrich_fixture(fixture: &mut Fixture, lookups: &LookupStore) -> Result<(), PipelineError> {
    for stat in &mut fixture.statistics {
        stat.type_name = Some(lookups.resolve(Namespace::Types, stat.type_id)?);
    }

    for event in &mut fixture.events {
        event.type_name = Some(lookups.resolve(Namespace::Types, event.type_id)?);
        event.sub_type_name = Some(lookups.resolve(Namespace::Types, event.sub_type_id)?);
    }

    for lineup in &mut fixture.lineups {
        lineup.lineup_type = Some(lookups.resolve(Namespace::Types, lineup.type_id)?);
        lineup.position = Some(lookups.resolve(Namespace::Types, lineup.position_id)?);
        for detail in &mut lineup.details {
            detail.type_name = Some(lookups.resolve(Namespace::Types, detail.type_id)?);
        }
    }

    Ok(())
}
