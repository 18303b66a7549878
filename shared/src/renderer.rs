use std::cell::RefCell;
use std::rc::Rc;

use crate::color_scale::ColorEncoder;
use crate::format::tooltip_text;
use crate::metric::DataIndex;
use crate::painted::PaintedMap;
use crate::projection::{Equirectangular, PathGenerator};
use crate::selection::SelectionOverlay;
use crate::topology::Topology;
use crate::view_state::{SubscriptionId, ViewState, ViewStore};
use crate::zoom::ZoomTransform;

type RepaintListener = Box<dyn FnMut(&PaintedMap)>;

/// Owns the bound country shapes and repaints them from the view state.
///
/// `update` always recomputes every shape from scratch: fills and tooltips
/// first, then all highlights are cleared and reapplied for the current
/// selection. Nothing is diffed, so a shape can never keep a stale mark.
pub struct MapRenderer {
    index: DataIndex,
    encoder: ColorEncoder,
    overlay: SelectionOverlay,
    zoom: ZoomTransform,
    painted: PaintedMap,
    repaint_listeners: Vec<RepaintListener>,
}

impl MapRenderer {
    /// One-time setup for a `width` x `height` target: project every drawable
    /// feature, bind it by country id and paint the initial state.
    pub fn draw(
        width: f64,
        height: f64,
        topology: &Topology,
        index: DataIndex,
        state: &ViewState,
    ) -> Self {
        let paths = PathGenerator::new(Equirectangular::fit(width, height));
        let mut painted = PaintedMap::default();
        for country in topology.countries() {
            let path = paths.path_data(&country.shape);
            let id = country.id.clone();
            if !painted.bind(country.id, country.name, path) {
                log::debug!("skipping duplicate feature id {id}");
            }
        }
        log::debug!("bound {} country shapes", painted.len());

        let mut renderer = Self {
            encoder: ColorEncoder::for_mode(index.mode()),
            overlay: SelectionOverlay::default(),
            index,
            zoom: ZoomTransform::default(),
            painted,
            repaint_listeners: Vec::new(),
        };
        renderer.update(state);
        renderer
    }

    pub fn update(&mut self, state: &ViewState) {
        log::debug!(
            "updating map: year={} direction={:?} selected={}",
            state.year,
            state.direction,
            state.selected().len()
        );

        let mode = self.index.mode();
        for shape in self.painted.shapes_mut() {
            let metric = self
                .index
                .metric_for(shape.id.as_str(), state.year, state.direction);
            shape.fill = self.encoder.color_for(metric);
            shape.tooltip = tooltip_text(&shape.name, metric, mode);
        }

        self.painted.clear_highlights();
        for (id, color) in self.overlay.highlights_for(state.selected()) {
            self.painted.set_highlight(&id, color);
        }

        for listener in self.repaint_listeners.iter_mut() {
            listener(&self.painted);
        }
    }

    /// Called after every repaint; this is how sibling views learn that the
    /// map changed.
    pub fn on_repaint(&mut self, listener: impl FnMut(&PaintedMap) + 'static) {
        self.repaint_listeners.push(Box::new(listener));
    }

    /// Repaint on every store notification.
    pub fn connect(renderer: &Rc<RefCell<MapRenderer>>, store: &mut ViewStore) -> SubscriptionId {
        let renderer = Rc::clone(renderer);
        store.subscribe(move |event, state| match renderer.try_borrow_mut() {
            Ok(mut renderer) => renderer.update(state),
            Err(_) => log::warn!("{} ignored: renderer is busy", event.name()),
        })
    }

    pub fn painted(&self) -> &PaintedMap {
        &self.painted
    }

    pub fn index(&self) -> &DataIndex {
        &self.index
    }

    pub fn encoder(&self) -> &ColorEncoder {
        &self.encoder
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    /// Pan/zoom is shared by every shape; the surface applies it as one
    /// transform on the shape group.
    pub fn zoom_mut(&mut self) -> &mut ZoomTransform {
        &mut self.zoom
    }
}
