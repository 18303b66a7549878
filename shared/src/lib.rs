pub mod color_scale;
pub mod colors;
pub mod country;
pub mod events;
pub mod format;
pub mod interaction;
pub mod metric;
pub mod painted;
pub mod projection;
pub mod renderer;
pub mod selection;
pub mod topology;
pub mod view_state;
pub mod zoom;

pub use color_scale::{ColorEncoder, ScaleError};
pub use colors::Rgb;
pub use country::{CountryId, should_select};
pub use events::ViewEvent;
pub use interaction::{Interaction, InteractionOutcome, interact};
pub use metric::*;
pub use painted::{PaintedMap, ShapePaint};
pub use renderer::MapRenderer;
pub use selection::{Selection, SelectionOverlay};
pub use topology::Topology;
pub use view_state::{KeyValueStore, MemoryStore, SubscriptionId, ViewState, ViewStore};
pub use zoom::ZoomTransform;

/// Dataset file names, relative to the data directory the server exposes
/// under `/data`.
pub const TOPOLOGY_FILE: &str = "topology.json";
pub const MIGRATION_FILE: &str = "migration.json";
pub const POPULATION_FILE: &str = "population.json";
pub const DATASET_FILES: [&str; 3] = [TOPOLOGY_FILE, MIGRATION_FILE, POPULATION_FILE];
