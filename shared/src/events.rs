use serde::{Deserialize, Serialize};

/// Named change notifications emitted by the view store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewEvent {
    YearChanged,
    CountriesChanged,
    MigrationChanged,
}

impl ViewEvent {
    pub const ALL: [ViewEvent; 3] = [
        ViewEvent::YearChanged,
        ViewEvent::CountriesChanged,
        ViewEvent::MigrationChanged,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewEvent::YearChanged => "yearChanged",
            ViewEvent::CountriesChanged => "countriesChanged",
            ViewEvent::MigrationChanged => "migrationChanged",
        }
    }
}
