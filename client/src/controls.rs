use leptos::prelude::*;
use migration_map_shared::format::{abbreviate_count, format_rate};
use migration_map_shared::{Interaction, MetricMode};
use wasm_bindgen::JsCast;

use crate::session::{MapSignals, SessionHandle};

/// Human-readable range for one legend bucket.
pub fn legend_label(lower: f64, upper: f64, mode: MetricMode) -> String {
    let fmt = |v: f64| match mode {
        MetricMode::Rate => format_rate(v),
        MetricMode::Flow => abbreviate_count(v),
    };
    match (lower.is_finite(), upper.is_finite()) {
        (false, true) => format!("< {}", fmt(upper)),
        (true, false) => format!("≥ {}", fmt(lower)),
        (true, true) => format!("{} to {}", fmt(lower), fmt(upper)),
        (false, false) => "all".to_string(),
    }
}

fn input_from(e: &web_sys::Event) -> Option<web_sys::HtmlInputElement> {
    e.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()
}

#[component]
pub fn Controls(session: SessionHandle, signals: MapSignals, mode: MetricMode) -> impl IntoView {
    let year = move || signals.view.with(|v| v.year);
    let is_emigration = move || signals.view.with(|v| v.direction.is_emigration());
    let year_bounds = move || {
        signals.years.with(|years| {
            (
                years.first().copied().unwrap_or_default(),
                years.last().copied().unwrap_or_default(),
            )
        })
    };

    let on_year_input = move |e: web_sys::Event| {
        let Some(input) = input_from(&e) else {
            return;
        };
        let Ok(value) = input.value().parse::<i32>() else {
            return;
        };
        // Snap to a year the dataset actually has.
        let snapped = signals.years.with_untracked(|years| {
            years
                .iter()
                .copied()
                .min_by_key(|y| (y - value).abs())
                .unwrap_or(value)
        });
        if let Some(session) = session.get_value() {
            session.set_year(snapped);
        }
    };

    let on_direction_change = move |e: web_sys::Event| {
        let Some(input) = input_from(&e) else {
            return;
        };
        if let Some(session) = session.get_value() {
            session.set_emigration(input.checked());
        }
    };

    let unit = match mode {
        MetricMode::Rate => "net migrants per 1000 population",
        MetricMode::Flow => "migrants",
    };

    view! {
        <div
            class="map-controls"
            style="display: flex; flex-wrap: wrap; align-items: center; gap: 16px; padding: 10px 14px; font-size: 0.8rem; color: #2b2d33;"
        >
            <label style="display: flex; align-items: center; gap: 8px;">
                <span>"Year"</span>
                <input
                    type="range"
                    class="year-slider"
                    min=move || year_bounds().0.to_string()
                    max=move || year_bounds().1.to_string()
                    step="1"
                    prop:value=move || year().to_string()
                    disabled=move || signals.years.with(Vec::is_empty)
                    on:input=on_year_input
                />
                <span style="min-width: 3em; font-weight: 700;">{move || year().to_string()}</span>
            </label>

            <label style="display: flex; align-items: center; gap: 6px;">
                <input
                    type="checkbox"
                    prop:checked=is_emigration
                    on:change=on_direction_change
                />
                <span>{move || if is_emigration() { "Emigration" } else { "Immigration" }}</span>
            </label>

            <div class="legend" style="display: flex; align-items: center; gap: 2px;">
                <span style="margin-right: 6px;">{unit}</span>
                {move || {
                    signals
                        .encoder
                        .with(|encoder| {
                            encoder
                                .as_ref()
                                .map(|encoder| encoder.legend())
                                .unwrap_or_default()
                        })
                        .into_iter()
                        .map(|(lower, upper, color)| {
                            view! {
                                <span
                                    title=legend_label(lower, upper, mode)
                                    style:background=color.to_hex()
                                    style="display: inline-block; width: 22px; height: 12px;"
                                />
                            }
                        })
                        .collect_view()
                }}
            </div>

            <SelectedList session=session signals=signals />
        </div>
    }
}

/// Chips for the current selection, in selection order. Clicking one
/// deselects it, same as a right-click on the map.
#[component]
fn SelectedList(session: SessionHandle, signals: MapSignals) -> impl IntoView {
    view! {
        <div class="selected-countries" style="display: flex; flex-wrap: wrap; gap: 6px;">
            {move || {
                signals.painted.with(|painted| {
                    painted
                        .highlighted()
                        .map(|shape| {
                            let id = shape.id.clone();
                            let color = shape.highlight.unwrap_or(shape.fill);
                            view! {
                                <button
                                    class="selected-chip"
                                    title="Remove from selection"
                                    style="border: none; border-radius: 10px; padding: 2px 9px; color: #ffffff; cursor: pointer; font-size: 0.75rem;"
                                    style:background=color.to_hex()
                                    on:click=move |_| {
                                        if let Some(session) = session.get_value() {
                                            session.interact(&Interaction::Deselect(id.clone()));
                                        }
                                    }
                                >
                                    {shape.name.clone()}
                                </button>
                            }
                        })
                        .collect_view()
                })
            }}
        </div>
    }
}
