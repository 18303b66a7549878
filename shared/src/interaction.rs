use crate::country::CountryId;
use crate::view_state::ViewStore;

/// Pointer input on a country shape, already resolved to the shape it hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Primary click: add to the selection.
    Select(CountryId),
    /// Secondary (context-menu) click: remove from the selection.
    Deselect(CountryId),
    HoverEnter { id: CountryId, name: String },
    HoverLeave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Whether the selection actually changed.
    Selection(bool),
    ShowLabel(String),
    HideLabel,
}

/// Apply an interaction to the store. Selection changes notify subscribers
/// (and therefore repaint) before this returns.
pub fn interact(store: &mut ViewStore, interaction: &Interaction) -> InteractionOutcome {
    match interaction {
        Interaction::Select(id) => InteractionOutcome::Selection(store.add_country(id.as_str())),
        Interaction::Deselect(id) => {
            InteractionOutcome::Selection(store.remove_country(id.as_str()))
        }
        Interaction::HoverEnter { id, name } => {
            InteractionOutcome::ShowLabel(format!("{id}: {name}"))
        }
        Interaction::HoverLeave => InteractionOutcome::HideLabel,
    }
}
