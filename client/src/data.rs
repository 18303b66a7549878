use migration_map_shared::{
    MIGRATION_FILE, MapOptions, MetricMode, MigrationTable, POPULATION_FILE, PopulationTable,
    TOPOLOGY_FILE, Topology,
};
use serde::de::DeserializeOwned;

pub const DEFAULT_DATA_BASE: &str = "/data";

/// Settings read from the page URL.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub data_base: String,
    pub map: MapOptions,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            data_base: DEFAULT_DATA_BASE.to_string(),
            map: MapOptions::default(),
        }
    }
}

impl PageOptions {
    /// `?data=<base>` and `?mode=rate|flow`. Unknown modes fall back to rate.
    pub fn from_params(data: Option<String>, mode: Option<String>) -> Self {
        let data_base = data
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_BASE.to_string());
        let mode = match mode.as_deref().map(str::parse::<MetricMode>) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                log::warn!("{e}; using rate mode");
                MetricMode::default()
            }
            None => MetricMode::default(),
        };
        Self {
            data_base,
            map: MapOptions {
                mode,
                ..MapOptions::default()
            },
        }
    }

    pub fn from_location() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let Ok(params) = web_sys::UrlSearchParams::new_with_str(&search) else {
            return Self::default();
        };
        Self::from_params(params.get("data"), params.get("mode"))
    }

    pub fn dataset_url(&self, file: &str) -> String {
        format!("{}/{file}", self.data_base)
    }
}

pub struct Datasets {
    pub topology: Topology,
    pub migration: MigrationTable,
    pub population: PopulationTable,
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error ({url}): {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {} ({url})", resp.status()));
    }
    resp.json::<T>()
        .await
        .map_err(|e| format!("parse error ({url}): {e}"))
}

/// All three datasets are needed before anything can be drawn.
pub async fn fetch_datasets(options: &PageOptions) -> Result<Datasets, String> {
    let topology = fetch_json(&options.dataset_url(TOPOLOGY_FILE)).await?;
    let migration = fetch_json(&options.dataset_url(MIGRATION_FILE)).await?;
    let population = fetch_json(&options.dataset_url(POPULATION_FILE)).await?;
    Ok(Datasets {
        topology,
        migration,
        population,
    })
}
