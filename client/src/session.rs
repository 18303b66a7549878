use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use migration_map_shared::{
    ColorEncoder, DataIndex, Interaction, InteractionOutcome, MapRenderer, PaintedMap, ViewState,
    ViewStore, ZoomTransform, interact,
};

use crate::data::{Datasets, PageOptions};
use crate::storage::BrowserStore;

/// Reactive mirrors of the map state. Views only ever read these; all
/// writes go through [`MapSession`].
#[derive(Clone, Copy)]
pub struct MapSignals {
    pub painted: RwSignal<PaintedMap>,
    pub view: RwSignal<ViewState>,
    pub zoom: RwSignal<ZoomTransform>,
    pub years: RwSignal<Vec<i32>>,
    pub encoder: RwSignal<Option<ColorEncoder>>,
}

impl MapSignals {
    pub fn new(initial: ViewState) -> Self {
        Self {
            painted: RwSignal::new(PaintedMap::default()),
            view: RwSignal::new(initial),
            zoom: RwSignal::new(ZoomTransform::default()),
            years: RwSignal::new(Vec::new()),
            encoder: RwSignal::new(None),
        }
    }
}

/// Set once the datasets have loaded.
pub type SessionHandle = StoredValue<Option<MapSession>, LocalStorage>;

/// The store and renderer for one loaded map.
#[derive(Clone)]
pub struct MapSession {
    store: Rc<RefCell<ViewStore>>,
    renderer: Rc<RefCell<MapRenderer>>,
    signals: MapSignals,
}

impl MapSession {
    pub fn start(
        datasets: Datasets,
        options: &PageOptions,
        signals: MapSignals,
        (width, height): (f64, f64),
    ) -> Self {
        let index = DataIndex::new(datasets.migration, datasets.population, options.map);
        signals.years.set(index.years());

        let mut store = ViewStore::new(signals.view.get_untracked());
        store.subscribe(move |event, state| {
            log::debug!("{}", event.name());
            state.save(&mut BrowserStore);
            signals.view.set(state.clone());
        });

        let mut renderer = MapRenderer::draw(width, height, &datasets.topology, index, store.state());
        renderer.on_repaint(move |painted| signals.painted.set(painted.clone()));
        signals.painted.set(renderer.painted().clone());
        signals.encoder.set(Some(renderer.encoder().clone()));
        log::info!(
            "map ready: {} countries, {} years, {:?} mode",
            renderer.painted().len(),
            signals.years.get_untracked().len(),
            options.map.mode
        );

        let renderer = Rc::new(RefCell::new(renderer));
        MapRenderer::connect(&renderer, &mut store);

        Self {
            store: Rc::new(RefCell::new(store)),
            renderer,
            signals,
        }
    }

    pub fn interact(&self, interaction: &Interaction) -> InteractionOutcome {
        match self.store.try_borrow_mut() {
            Ok(mut store) => interact(&mut store, interaction),
            Err(_) => {
                log::warn!("dropped {interaction:?}: store is busy");
                InteractionOutcome::Selection(false)
            }
        }
    }

    pub fn set_year(&self, year: i32) {
        if let Ok(mut store) = self.store.try_borrow_mut() {
            store.set_year(year);
        }
    }

    pub fn set_emigration(&self, is_emigration: bool) {
        if let Ok(mut store) = self.store.try_borrow_mut() {
            store.set_emigration(is_emigration);
        }
    }

    pub fn zoom_at(&self, delta: f64, screen_x: f64, screen_y: f64) {
        self.update_zoom(|zoom| zoom.zoom_at(delta, screen_x, screen_y));
    }

    pub fn pan(&self, dx: f64, dy: f64) {
        self.update_zoom(|zoom| zoom.pan(dx, dy));
    }

    fn update_zoom(&self, f: impl FnOnce(&mut ZoomTransform)) {
        let Ok(mut renderer) = self.renderer.try_borrow_mut() else {
            return;
        };
        f(renderer.zoom_mut());
        self.signals.zoom.set(renderer.zoom());
    }
}
