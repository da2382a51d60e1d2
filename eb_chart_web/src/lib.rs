use leptos::*;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_COMMIT: &str = env!("GIT_COMMIT_HASH");

/// Source table fetched once on mount, relative to the page.
const DATA_URL: &str = "energy_breakdown.csv";
const CHART_DIV: &str = "breakdown_chart";

#[cfg(feature = "chart_plotly")]
use wasm_bindgen::{JsCast, JsValue};

#[cfg(feature = "chart_plotly")]
use wasm_bindgen_futures::JsFuture;

#[cfg(feature = "chart_plotly")]
use serde::Serialize;

#[cfg(feature = "chart_plotly")]
use web_sys::{HtmlInputElement, Response};

#[cfg(feature = "chart_plotly")]
use eb_chart::{
    chart_spec_for, classify, filter_columns, parse_table, ChartConfig, ChartSpec, Selection,
    Table, MAX_SELECTED,
};

#[cfg(feature = "chart_plotly")]
async fn fetch_table_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|err| format!("fetch failed: {err:?}"))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "fetch returned a non-Response".to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {} fetching {url}", resp.status()));
    }
    let text_promise = resp.text().map_err(|err| format!("{err:?}"))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|err| format!("{err:?}"))?;
    Ok(text.as_string().unwrap_or_default())
}

/// Hand one full chart spec to Plotly. `react` replaces the previous spec
/// wholesale; nothing is patched incrementally.
#[cfg(feature = "chart_plotly")]
fn plot_chart(div_id: &str, spec: &ChartSpec) {
    // Plotly wants plain objects, not ES maps.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let traces = match spec.traces.serialize(&serializer) {
        Ok(value) => value,
        Err(_) => return,
    };
    let layout = match spec.layout.serialize(&serializer) {
        Ok(value) => value,
        Err(_) => return,
    };
    let plotly = match js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("Plotly")) {
        Ok(value) if !value.is_undefined() => value,
        _ => {
            web_sys::console::warn_1(&JsValue::from_str("Plotly is not loaded"));
            return;
        }
    };
    let func = js_sys::Reflect::get(&plotly, &JsValue::from_str("react"))
        .ok()
        .filter(|f| !f.is_undefined())
        .or_else(|| {
            js_sys::Reflect::get(&plotly, &JsValue::from_str("newPlot"))
                .ok()
                .filter(|f| !f.is_undefined())
        });
    if let Some(func) = func {
        if let Ok(func) = func.dyn_into::<js_sys::Function>() {
            let div = JsValue::from_str(div_id);
            let _ = func.call3(&JsValue::NULL, &div, &traces, &layout);
        }
    }
}

#[cfg(feature = "chart_plotly")]
#[component]
pub fn App() -> impl IntoView {
    let (table, set_table) = create_signal(Table::default());
    let (selection, set_selection) = create_signal(Selection::default());
    let (query, set_query) = create_signal(String::new());
    let (status, set_status) = create_signal(String::from("Loading data…"));
    let (extras, set_extras) = create_signal(Vec::<String>::new());

    // One-time fetch; navigating away simply abandons it. A load failure is
    // logged and leaves the app running against an empty dataset.
    spawn_local(async move {
        match fetch_table_text(DATA_URL).await {
            Ok(text) => match parse_table(text.as_bytes()) {
                Ok(parsed) => {
                    let config = ChartConfig::default();
                    let classified = classify(&parsed, &config);
                    for extra in &classified.extras {
                        web_sys::console::warn_1(&JsValue::from_str(&format!(
                            "unrecognized row label '{extra}'; stacked after canonical components"
                        )));
                    }
                    set_extras.set(classified.extras.clone());
                    set_status.set(format!(
                        "{} component rows, {} configurations.",
                        classified.component_rows.len(),
                        parsed.columns.len()
                    ));
                    set_selection.set(Selection::all_of(&parsed.columns));
                    set_table.set(parsed);
                }
                Err(err) => {
                    web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
                    set_status.set(format!("Failed to parse data: {err}. Chart is empty."));
                }
            },
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&err));
                set_status.set(format!("Failed to load data: {err}. Chart is empty."));
            }
        }
    });

    // Recompute the whole spec and replace the chart on every state change.
    create_effect(move |_| {
        let table_now = table.get();
        let selection_now = selection.get();
        let config = ChartConfig::default();
        let spec = chart_spec_for(&table_now, selection_now.columns(), &config);
        plot_chart(CHART_DIV, &spec);
    });

    let on_search = move |ev: leptos::ev::Event| {
        if let Some(target) = ev.target() {
            if let Ok(input) = target.dyn_into::<HtmlInputElement>() {
                set_query.set(input.value());
            }
        }
    };

    let on_select_all = move |_ev: leptos::ev::MouseEvent| {
        let columns = table.get_untracked().columns;
        set_selection.update(|sel| sel.select_all(&columns));
    };

    let on_clear = move |_ev: leptos::ev::MouseEvent| {
        set_selection.update(|sel| sel.clear());
    };

    // The search box narrows what is offered, never what is selected.
    let column_list = move || {
        let table_now = table.get();
        let query_now = query.get();
        let selection_now = selection.get();
        filter_columns(&table_now.columns, &query_now)
            .into_iter()
            .map(|name| {
                let checked = selection_now.contains(&name);
                let toggle_name = name.clone();
                view! {
                    <label class="column">
                        <input
                            type="checkbox"
                            prop:checked=checked
                            on:change=move |_| {
                                set_selection.update(|sel| sel.toggle(&toggle_name));
                            }
                        />
                        {format!(" {name}")}
                    </label>
                }
            })
            .collect_view()
    };

    let selection_note = move || {
        let sel = selection.get();
        if sel.len() == MAX_SELECTED {
            format!("{} selected (limit reached)", sel.len())
        } else {
            format!("{} selected", sel.len())
        }
    };

    let extras_note = move || {
        let extras_now = extras.get();
        if extras_now.is_empty() {
            String::new()
        } else {
            format!("Unrecognized rows stacked last: {}", extras_now.join(", "))
        }
    };

    view! {
        <main class="tufte">
            <header>
                <h1>"Energy Breakdown"</h1>
                <p class="subtitle">
                    "Specific energy demand per configuration, with clinker emissions on the right axis."
                </p>
                <p class="note">{"Web version "}{APP_VERSION}{" ("}{APP_COMMIT}{")"}</p>
            </header>
            <section class="controls">
                <div class="control-row">
                    <label class="note">"Filter configurations:"</label>
                    <input
                        type="search"
                        placeholder="type to filter"
                        prop:value=move || query.get()
                        on:input=on_search
                    />
                </div>
                <div class="control-row">
                    <button class="btn" on:click=on_select_all>"Select all"</button>
                    <button class="btn" on:click=on_clear>"Clear"</button>
                    <span class="note">{selection_note}</span>
                </div>
                <div class="column-list">{column_list}</div>
                <span class="note">{move || status.get()}</span>
            </section>
            <section class="plots">
                <div id=CHART_DIV class="plot"></div>
            </section>
            <section class="notes">
                <p class="note">{extras_note}</p>
                <p class="note">
                    "Energy bars stack on the left axis (GJ per tonne clinker); emissions render as points on the right axis (tCO\u{2082} per tonne clinker). Up to 32 configurations plot at once."
                </p>
            </section>
        </main>
    }
}

#[cfg(not(feature = "chart_plotly"))]
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main>
            <p>"Chart support was disabled at build time."</p>
        </main>
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "chart_plotly")]
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| view! { <App/> });
}
