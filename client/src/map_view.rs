use std::cell::Cell;
use std::rc::Rc;

use leptos::ev::{MouseEvent, WheelEvent};
use leptos::html::Div;
use leptos::prelude::*;
use migration_map_shared::{CountryId, Interaction, InteractionOutcome};
use wasm_bindgen::JsCast;

use crate::session::{MapSession, MapSignals, SessionHandle};

/// Pointer travel below this is a click, not a drag.
const CLICK_SLOP_PX: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
struct HoverInfo {
    id: String,
    label: String,
    x: f64,
    y: f64,
}

/// Country id of the shape under the event, if any.
fn shape_id(e: &MouseEvent) -> Option<String> {
    e.target()?
        .dyn_into::<web_sys::Element>()
        .ok()?
        .get_attribute("data-id")
}

/// Event position relative to the element the handler is attached to.
fn local_point(e: &MouseEvent) -> (f64, f64) {
    e.current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            (
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
            )
        })
        .unwrap_or((e.offset_x() as f64, e.offset_y() as f64))
}

#[component]
pub fn MapView(
    session: SessionHandle,
    signals: MapSignals,
    /// The `.map-frame` container, measured once when the map is drawn.
    frame: NodeRef<Div>,
    size: RwSignal<(f64, f64)>,
) -> impl IntoView {
    let hover: RwSignal<Option<HoverInfo>> = RwSignal::new(None);
    let dragging = Rc::new(Cell::new(false));
    let drag_start = Rc::new(Cell::new((0.0, 0.0)));
    let last = Rc::new(Cell::new((0.0, 0.0)));

    let with_session = move |f: &dyn Fn(&MapSession)| {
        if let Some(session) = session.get_value() {
            f(&session);
        }
    };

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let (x, y) = local_point(&e);
        let delta = e.delta_y();
        with_session(&|s| s.zoom_at(delta, x, y));
    };

    let on_mouse_down = {
        let dragging = dragging.clone();
        let drag_start = drag_start.clone();
        let last = last.clone();
        move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            let at = (e.client_x() as f64, e.client_y() as f64);
            dragging.set(true);
            drag_start.set(at);
            last.set(at);
        }
    };

    let on_mouse_move = {
        let dragging = dragging.clone();
        let last = last.clone();
        move |e: MouseEvent| {
            let at = (e.client_x() as f64, e.client_y() as f64);
            if dragging.get() {
                let (lx, ly) = last.get();
                last.set(at);
                with_session(&|s| s.pan(at.0 - lx, at.1 - ly));
                return;
            }

            let hit = shape_id(&e);
            let current = hover.with_untracked(|h| h.as_ref().map(|h| h.id.clone()));
            if hit == current {
                if hit.is_some() {
                    hover.update(|h| {
                        if let Some(h) = h {
                            (h.x, h.y) = at;
                        }
                    });
                }
                return;
            }

            let interaction = match hit.as_deref() {
                Some(id) => {
                    let name = signals
                        .painted
                        .with_untracked(|p| p.get(id).map(|shape| shape.name.clone()))
                        .unwrap_or_default();
                    Interaction::HoverEnter {
                        id: CountryId::from(id),
                        name,
                    }
                }
                None => Interaction::HoverLeave,
            };
            let Some(session) = session.get_value() else {
                return;
            };
            match session.interact(&interaction) {
                InteractionOutcome::ShowLabel(label) => hover.set(Some(HoverInfo {
                    id: hit.unwrap_or_default(),
                    label,
                    x: at.0,
                    y: at.1,
                })),
                _ => hover.set(None),
            }
        }
    };

    let on_mouse_up = {
        let dragging = dragging.clone();
        move |_: MouseEvent| dragging.set(false)
    };

    let on_mouse_leave = {
        let dragging = dragging.clone();
        move |_: MouseEvent| {
            dragging.set(false);
            with_session(&|s| {
                s.interact(&Interaction::HoverLeave);
            });
            hover.set(None);
        }
    };

    let on_click = {
        let drag_start = drag_start.clone();
        move |e: MouseEvent| {
            let (sx, sy) = drag_start.get();
            let dx = (e.client_x() as f64 - sx).abs();
            let dy = (e.client_y() as f64 - sy).abs();
            if dx >= CLICK_SLOP_PX || dy >= CLICK_SLOP_PX {
                return;
            }
            if let Some(id) = shape_id(&e) {
                with_session(&|s| {
                    s.interact(&Interaction::Select(CountryId::from(id.as_str())));
                });
            }
        }
    };

    let on_context_menu = move |e: MouseEvent| {
        e.prevent_default();
        if let Some(id) = shape_id(&e) {
            with_session(&|s| {
                s.interact(&Interaction::Deselect(CountryId::from(id.as_str())));
            });
        }
    };

    let stroke_width = move || format!("{:.3}", 0.5 / signals.zoom.get().k);
    let outline_width = move || format!("{:.3}", 1.5 / signals.zoom.get().k);

    view! {
        <div
            class="map-frame"
            node_ref=frame
            style="position: relative; width: 100%; height: calc(100vh - 96px); min-height: 200px; overflow: hidden;"
        >
            <svg
                class="map"
                width=move || size.get().0.to_string()
                height=move || size.get().1.to_string()
                style="display: block; background: #eef2f5; cursor: grab; user-select: none;"
                on:wheel=on_wheel
                on:mousedown=on_mouse_down
                on:mousemove=on_mouse_move
                on:mouseup=on_mouse_up
                on:mouseleave=on_mouse_leave
                on:click=on_click
                on:contextmenu=on_context_menu
            >
                <g transform=move || signals.zoom.get().to_svg()>
                    <g class="countries" stroke="#ffffff" stroke-width=stroke_width>
                        {move || {
                            signals.painted.with(|painted| {
                                painted
                                    .shapes()
                                    .iter()
                                    .map(|shape| {
                                        view! {
                                            <path
                                                data-id=shape.id.to_string()
                                                d=shape.path.clone()
                                                fill=shape.visible_fill().to_hex()
                                            />
                                        }
                                    })
                                    .collect_view()
                            })
                        }}
                    </g>
                    // Selected shapes again, on top, so their outlines are never hidden.
                    <g
                        class="selection"
                        fill="none"
                        stroke="#1b1b1b"
                        stroke-width=outline_width
                        pointer-events="none"
                    >
                        {move || {
                            signals.painted.with(|painted| {
                                painted
                                    .highlighted()
                                    .map(|shape| view! { <path d=shape.path.clone() /> })
                                    .collect_view()
                            })
                        }}
                    </g>
                </g>
            </svg>
            <Show when=move || hover.with(Option::is_some)>
                <div
                    class="map-tooltip"
                    style="position: fixed; pointer-events: none; background: rgba(20, 22, 30, 0.92); color: #f1efe8; padding: 6px 9px; border-radius: 4px; font-size: 0.75rem; line-height: 1.4;"
                    style:left=move || hover.with(|h| h.as_ref().map(|h| format!("{}px", h.x + 12.0)).unwrap_or_default())
                    style:top=move || hover.with(|h| h.as_ref().map(|h| format!("{}px", h.y + 12.0)).unwrap_or_default())
                >
                    <div style="font-weight: 700;">
                        {move || hover.with(|h| h.as_ref().map(|h| h.label.clone()).unwrap_or_default())}
                    </div>
                    <div>
                        {move || {
                            let id = hover.with(|h| h.as_ref().map(|h| h.id.clone()));
                            id.and_then(|id| {
                                    signals.painted.with(|p| p.get(&id).map(|s| s.tooltip.clone()))
                                })
                                .unwrap_or_default()
                        }}
                    </div>
                </div>
            </Show>
        </div>
    }
}
