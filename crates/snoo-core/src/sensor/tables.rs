// ── Level presentation tables ──
//
// Exhaustive matches, so every `SessionLevel` has an entry (possibly
// empty). Unknown wire strings already decode as `SessionLevel::None`.

use serde::Serialize;
use snoo_api::SessionLevel;
use strum::IntoEnumIterator;

use super::Icon;

/// Human-readable level name. `None` has no name.
pub fn level_name(level: SessionLevel) -> Option<&'static str> {
    match level {
        SessionLevel::Online => Some("Online"),
        SessionLevel::Baseline => Some("Baseline"),
        SessionLevel::WeaningBaseline => Some("Weaning Baseline"),
        SessionLevel::Level1 => Some("One"),
        SessionLevel::Level2 => Some("Two"),
        SessionLevel::Level3 => Some("Three"),
        SessionLevel::Level4 => Some("Four"),
        SessionLevel::PreTimeout => Some("Pre-Timeout"),
        SessionLevel::Timeout => Some("Timeout"),
        SessionLevel::None => None,
    }
}

/// Numeric level for graphing. Idle and timeout states have none.
pub fn level_number(level: SessionLevel) -> Option<f64> {
    match level {
        SessionLevel::Online | SessionLevel::None | SessionLevel::Timeout => None,
        SessionLevel::Baseline => Some(0.1),
        SessionLevel::WeaningBaseline => Some(0.0),
        SessionLevel::Level1 => Some(1.0),
        SessionLevel::Level2 => Some(2.0),
        SessionLevel::Level3 => Some(3.0),
        SessionLevel::Level4 => Some(4.0),
        SessionLevel::PreTimeout => Some(5.0),
    }
}

pub fn level_icon(level: SessionLevel) -> Icon {
    match level {
        SessionLevel::Online | SessionLevel::None => Icon::BedEmpty,
        SessionLevel::Baseline | SessionLevel::WeaningBaseline => Icon::Bed,
        SessionLevel::Level1 => Icon::Numeric1,
        SessionLevel::Level2 => Icon::Numeric2,
        SessionLevel::Level3 => Icon::Numeric3,
        SessionLevel::Level4 => Icon::Numeric4,
        SessionLevel::PreTimeout | SessionLevel::Timeout => Icon::AlertDecagram,
    }
}

/// One row of the full level table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelRow {
    pub level: SessionLevel,
    pub name: Option<&'static str>,
    pub number: Option<f64>,
    pub icon: Icon,
    pub active: bool,
}

/// Every level with its presentation, in declaration order.
pub fn level_table() -> Vec<LevelRow> {
    SessionLevel::iter()
        .map(|level| LevelRow {
            level,
            name: level_name(level),
            number: level_number(level),
            icon: level_icon(level),
            active: level.is_active_level(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_level() {
        let table = level_table();
        assert_eq!(table.len(), SessionLevel::iter().count());
        assert_eq!(table[0].level, SessionLevel::Online);
        assert_eq!(table.last().map(|row| row.level), Some(SessionLevel::None));
    }

    #[test]
    fn lookups_match_known_values() {
        assert_eq!(level_name(SessionLevel::None), None);
        assert_eq!(level_name(SessionLevel::PreTimeout), Some("Pre-Timeout"));
        assert_eq!(level_number(SessionLevel::Baseline), Some(0.1));
        assert_eq!(level_number(SessionLevel::WeaningBaseline), Some(0.0));
        assert_eq!(level_number(SessionLevel::Online), None);
        assert_eq!(level_number(SessionLevel::PreTimeout), Some(5.0));
        assert_eq!(level_icon(SessionLevel::Level3), Icon::Numeric3);
        assert_eq!(level_icon(SessionLevel::Timeout), Icon::AlertDecagram);
    }

    #[test]
    fn numbered_levels_have_names() {
        for row in level_table() {
            if row.number.is_some() {
                assert!(row.name.is_some(), "{:?} has a number but no name", row.level);
            }
        }
    }
}
