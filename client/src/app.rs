use leptos::html::Div;
use leptos::prelude::*;
use migration_map_shared::ViewState;
use wasm_bindgen_futures::spawn_local;

use crate::controls::Controls;
use crate::data::{PageOptions, fetch_datasets};
use crate::map_view::MapView;
use crate::session::{MapSession, MapSignals, SessionHandle};
use crate::storage::BrowserStore;

/// Room left under the map for the controls row.
const CONTROLS_HEIGHT: f64 = 96.0;
const MIN_MAP_HEIGHT: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Pixel size of the map container, if it has been laid out.
fn measured_size(client_width: i32, client_height: i32) -> Option<(f64, f64)> {
    (client_width > 0 && client_height > 0).then(|| (client_width as f64, client_height as f64))
}

/// Used until the container is measured, and when it can't be.
fn window_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (960.0, 500.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(960.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (w, (h - CONTROLS_HEIGHT).max(MIN_MAP_HEIGHT))
}

#[component]
pub fn App() -> impl IntoView {
    let options = PageOptions::from_location();
    let mode = options.map.mode;
    let frame: NodeRef<Div> = NodeRef::new();
    let size = RwSignal::new(window_size());

    let signals = MapSignals::new(ViewState::load(&BrowserStore));
    let session: SessionHandle = StoredValue::new_local(None);
    let status: RwSignal<LoadStatus> = RwSignal::new(LoadStatus::Loading);

    spawn_local(async move {
        match fetch_datasets(&options).await {
            Ok(datasets) => {
                let dims = frame
                    .get_untracked()
                    .and_then(|el| measured_size(el.client_width(), el.client_height()))
                    .unwrap_or_else(window_size);
                size.set(dims);
                let map = MapSession::start(datasets, &options, signals, dims);
                session.set_value(Some(map));
                status.set(LoadStatus::Ready);
            }
            Err(e) => {
                log::warn!("failed to load datasets: {e}");
                status.set(LoadStatus::Failed(e));
            }
        }
    });

    view! {
        <div class="migration-map" style="font-family: system-ui, sans-serif;">
            <MapView session=session signals=signals frame=frame size=size />
            <Controls session=session signals=signals mode=mode />
            {move || match status.get() {
                LoadStatus::Loading => {
                    view! { <div class="map-status">"Loading datasets…"</div> }.into_any()
                }
                LoadStatus::Failed(e) => {
                    view! {
                        <div class="map-status" style="color: #b2182b;">
                            {format!("Could not load the map data: {e}")}
                        </div>
                    }
                        .into_any()
                }
                LoadStatus::Ready => ().into_any(),
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlaid_out_container_is_not_a_size() {
        assert_eq!(measured_size(0, 0), None);
        assert_eq!(measured_size(800, 0), None);
        assert_eq!(measured_size(1280, 640), Some((1280.0, 640.0)));
    }
}
