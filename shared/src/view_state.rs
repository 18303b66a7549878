use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::country::{CountryId, should_select};
use crate::events::ViewEvent;
use crate::metric::Direction;
use crate::selection::Selection;

pub const DEFAULT_YEAR: i32 = 2010;

pub const KEY_SELECTED_COUNTRIES: &str = "selectedCountries";
pub const KEY_SELECTION_SLOTS: &str = "selectionSlots";
pub const KEY_YEAR: &str = "year";
pub const KEY_IS_EMIGRATION: &str = "isEmigration";

/// Get/set access to wherever the view state is persisted.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore(pub HashMap<String, Value>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

/// What the map is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    selected: Vec<Selection>,
    pub year: i32,
    pub direction: Direction,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            year: DEFAULT_YEAR,
            direction: Direction::Immigration,
        }
    }
}

impl ViewState {
    /// Selected countries in the order they were added.
    pub fn selected(&self) -> &[Selection] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s.id.as_str() == id)
    }

    /// Returns `false` for forbidden codes and countries already selected.
    fn add_country(&mut self, id: &str) -> bool {
        if !should_select(id) || self.is_selected(id) {
            return false;
        }
        let slot = self.next_slot();
        self.selected.push(Selection {
            id: CountryId::new(id),
            slot,
        });
        true
    }

    /// One past the highest slot in use. If that would overflow, the lowest
    /// free slot instead.
    fn next_slot(&self) -> usize {
        let Some(highest) = self.selected.iter().map(|s| s.slot).max() else {
            return 0;
        };
        highest.checked_add(1).unwrap_or_else(|| {
            (0..)
                .find(|n| self.selected.iter().all(|s| s.slot != *n))
                .unwrap_or(0)
        })
    }

    fn remove_country(&mut self, id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| s.id.as_str() != id);
        self.selected.len() != before
    }

    /// Read the state back, using defaults for anything missing or malformed.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let ids: Vec<String> = read(store, KEY_SELECTED_COUNTRIES).unwrap_or_default();
        // Slots that don't line up one-to-one with the ids are ignored.
        let slots: Option<Vec<usize>> = read(store, KEY_SELECTION_SLOTS).filter(|s: &Vec<usize>| {
            s.len() == ids.len() && s.iter().collect::<HashSet<_>>().len() == s.len()
        });
        let year = read::<i32>(store, KEY_YEAR)
            .filter(|y| *y != 0)
            .unwrap_or(DEFAULT_YEAR);
        let is_emigration = read::<bool>(store, KEY_IS_EMIGRATION).unwrap_or(false);

        let mut state = Self {
            year,
            direction: Direction::from_emigration(is_emigration),
            ..Self::default()
        };
        for (position, id) in ids.iter().enumerate() {
            if !should_select(id) || state.is_selected(id) {
                continue;
            }
            let slot = slots.as_ref().map_or(position, |s| s[position]);
            state.selected.push(Selection {
                id: CountryId::new(id.as_str()),
                slot,
            });
        }
        state
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        let ids: Vec<&str> = self.selected.iter().map(|s| s.id.as_str()).collect();
        let slots: Vec<usize> = self.selected.iter().map(|s| s.slot).collect();
        store.set(KEY_SELECTED_COUNTRIES, Value::from(ids));
        store.set(KEY_SELECTION_SLOTS, Value::from(slots));
        store.set(KEY_YEAR, Value::from(self.year));
        store.set(KEY_IS_EMIGRATION, Value::from(self.direction.is_emigration()));
    }
}

fn read<T: serde::de::DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    store
        .get(key)
        .and_then(|value| serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(ViewEvent, &ViewState)>;

/// Owns the view state and tells subscribers about every effective change.
///
/// Listeners run synchronously, in registration order, after the mutation
/// has been applied. They only get a shared reference, so they cannot mutate
/// the store while it is notifying.
#[derive(Default)]
pub struct ViewStore {
    state: ViewState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ViewStore {
    pub fn new(state: ViewState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(ViewEvent, &ViewState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Primary-click handler. Forbidden or already selected ids are a silent
    /// no-op.
    pub fn add_country(&mut self, id: &str) -> bool {
        let changed = self.state.add_country(id);
        if changed {
            self.notify(ViewEvent::CountriesChanged);
        }
        changed
    }

    /// Secondary-click handler.
    pub fn remove_country(&mut self, id: &str) -> bool {
        let changed = self.state.remove_country(id);
        if changed {
            self.notify(ViewEvent::CountriesChanged);
        }
        changed
    }

    pub fn set_year(&mut self, year: i32) -> bool {
        if self.state.year == year {
            return false;
        }
        self.state.year = year;
        self.notify(ViewEvent::YearChanged);
        true
    }

    pub fn set_emigration(&mut self, is_emigration: bool) -> bool {
        let direction = Direction::from_emigration(is_emigration);
        if self.state.direction == direction {
            return false;
        }
        self.state.direction = direction;
        self.notify(ViewEvent::MigrationChanged);
        true
    }

    fn notify(&mut self, event: ViewEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn slots(state: &ViewState) -> Vec<(&str, usize)> {
        state
            .selected()
            .iter()
            .map(|s| (s.id.as_str(), s.slot))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_stored() {
        let state = ViewState::load(&MemoryStore::default());
        assert_eq!(state, ViewState::default());
        assert_eq!(state.year, 2010);
        assert_eq!(state.direction, Direction::Immigration);
        assert!(state.selected().is_empty());
    }

    #[test]
    fn removal_keeps_original_slots() {
        let mut store = ViewStore::default();
        store.add_country("AAA");
        store.add_country("BBB");
        store.add_country("CCC");
        store.remove_country("BBB");
        assert_eq!(slots(store.state()), vec![("AAA", 0), ("CCC", 2)]);

        store.add_country("DDD");
        assert_eq!(slots(store.state()), vec![("AAA", 0), ("CCC", 2), ("DDD", 3)]);
    }

    #[test]
    fn slots_restart_after_clearing() {
        let mut store = ViewStore::default();
        store.add_country("AAA");
        store.add_country("BBB");
        store.remove_country("AAA");
        store.remove_country("BBB");
        store.add_country("CCC");
        assert_eq!(slots(store.state()), vec![("CCC", 0)]);
    }

    #[test]
    fn forbidden_and_duplicate_adds_are_ignored() {
        let mut store = ViewStore::default();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _| sink.borrow_mut().push(event));

        store.add_country("USA");
        let before = store.state().clone();
        for code in ["ATA", "UNK", "TWN", "USA"] {
            assert!(!store.add_country(code));
        }
        assert_eq!(store.state(), &before);
        assert_eq!(*events.borrow(), vec![ViewEvent::CountriesChanged]);
    }

    #[test]
    fn removing_an_unselected_country_is_silent() {
        let mut store = ViewStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);
        assert!(!store.remove_country("FRA"));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn every_effective_change_notifies_with_the_new_state() {
        let mut store = ViewStore::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |event, state| {
            sink.borrow_mut()
                .push((event, state.year, state.direction, state.selected().len()));
        });

        assert!(store.set_year(2015));
        assert!(!store.set_year(2015));
        assert!(store.set_emigration(true));
        assert!(!store.set_emigration(true));
        assert!(store.add_country("IND"));

        assert_eq!(
            *seen.borrow(),
            vec![
                (ViewEvent::YearChanged, 2015, Direction::Immigration, 0),
                (ViewEvent::MigrationChanged, 2015, Direction::Emigration, 0),
                (ViewEvent::CountriesChanged, 2015, Direction::Emigration, 1),
            ]
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let mut store = ViewStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);
        store.set_year(2000);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_year(2001);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn save_then_load_restores_slots_and_settings() {
        let mut store = ViewStore::default();
        store.add_country("AAA");
        store.add_country("BBB");
        store.add_country("CCC");
        store.remove_country("AAA");
        store.set_year(1995);
        store.set_emigration(true);

        let mut kv = MemoryStore::default();
        store.state().save(&mut kv);
        assert_eq!(
            kv.get(KEY_SELECTED_COUNTRIES),
            Some(serde_json::json!(["BBB", "CCC"]))
        );

        let restored = ViewState::load(&kv);
        assert_eq!(&restored, store.state());
    }

    #[test]
    fn load_tolerates_foreign_or_partial_values() {
        let mut kv = MemoryStore::default();
        kv.set(KEY_SELECTED_COUNTRIES, serde_json::json!(["FRA", "ATA", "FRA", "DEU"]));
        kv.set(KEY_SELECTION_SLOTS, serde_json::json!([4]));
        kv.set(KEY_YEAR, serde_json::json!("not a year"));
        kv.set(KEY_IS_EMIGRATION, serde_json::json!(true));

        let state = ViewState::load(&kv);
        assert_eq!(slots(&state), vec![("FRA", 0), ("DEU", 3)]);
        assert_eq!(state.year, DEFAULT_YEAR);
        assert_eq!(state.direction, Direction::Emigration);
    }

    #[test]
    fn duplicate_stored_slots_fall_back_to_positions() {
        let mut kv = MemoryStore::default();
        kv.set(KEY_SELECTED_COUNTRIES, serde_json::json!(["FRA", "DEU"]));
        kv.set(KEY_SELECTION_SLOTS, serde_json::json!([0, 0]));

        let state = ViewState::load(&kv);
        assert_eq!(slots(&state), vec![("FRA", 0), ("DEU", 1)]);

        let colors: Vec<_> = crate::selection::SelectionOverlay::default()
            .highlights_for(state.selected())
            .into_iter()
            .map(|(_, color)| color)
            .collect();
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn adding_after_the_highest_possible_slot_does_not_overflow() {
        let mut kv = MemoryStore::default();
        kv.set(KEY_SELECTED_COUNTRIES, serde_json::json!(["FRA"]));
        kv.set(KEY_SELECTION_SLOTS, serde_json::json!([usize::MAX]));

        let mut store = ViewStore::new(ViewState::load(&kv));
        assert_eq!(slots(store.state()), vec![("FRA", usize::MAX)]);

        assert!(store.add_country("DEU"));
        assert_eq!(slots(store.state()), vec![("FRA", usize::MAX), ("DEU", 0)]);
        assert!(store.add_country("ITA"));
        assert_eq!(
            slots(store.state()),
            vec![("FRA", usize::MAX), ("DEU", 0), ("ITA", 1)]
        );
    }
}
