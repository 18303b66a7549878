use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Column holding a country's aggregate (net or inbound) figure.
pub const TOTAL_KEY: &str = "Total";
/// Row holding outbound figures from every country to the rest of the world.
pub const WORLD_KEY: &str = "WORLD";

/// Which formula turns the datasets into a per-country number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricMode {
    /// Net migrants per 1000 population.
    #[default]
    Rate,
    /// Absolute directional count.
    Flow,
}

impl FromStr for MetricMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rate" => Ok(Self::Rate),
            "flow" => Ok(Self::Flow),
            other => Err(format!("unknown metric mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Immigration,
    Emigration,
}

impl Direction {
    pub fn from_emigration(is_emigration: bool) -> Self {
        if is_emigration {
            Self::Emigration
        } else {
            Self::Immigration
        }
    }

    pub fn is_emigration(self) -> bool {
        self == Self::Emigration
    }
}

/// Unit the population dataset is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopulationUnit {
    Count,
    #[default]
    Thousands,
}

impl PopulationUnit {
    pub fn factor(self) -> f64 {
        match self {
            Self::Count => 1.0,
            Self::Thousands => 1_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub mode: MetricMode,
    pub population_unit: PopulationUnit,
}

/// `year -> row code -> column code -> migrants`.
///
/// Rows are country codes plus [`WORLD_KEY`]; columns are country codes plus
/// [`TOTAL_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationTable(pub BTreeMap<i32, HashMap<String, HashMap<String, f64>>>);

impl MigrationTable {
    pub fn row(&self, year: i32, code: &str) -> Option<&HashMap<String, f64>> {
        self.0.get(&year)?.get(code)
    }

    pub fn value(&self, year: i32, row: &str, column: &str) -> Option<f64> {
        self.row(year, row)?.get(column).copied()
    }

    pub fn insert(&mut self, year: i32, row: &str, column: &str, migrants: f64) {
        self.0
            .entry(year)
            .or_default()
            .entry(row.to_string())
            .or_default()
            .insert(column.to_string(), migrants);
    }
}

/// `country -> year -> population`, in the dataset's own unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopulationTable(pub HashMap<String, BTreeMap<i32, f64>>);

impl PopulationTable {
    pub fn value(&self, code: &str, year: i32) -> Option<f64> {
        self.0.get(code)?.get(&year).copied()
    }

    pub fn insert(&mut self, code: &str, year: i32, population: f64) {
        self.0
            .entry(code.to_string())
            .or_default()
            .insert(year, population);
    }
}

/// Read-only lookups over both datasets. Every query answers with a number:
/// missing rows, zero populations and non-finite results all become 0.
#[derive(Debug, Clone, Default)]
pub struct DataIndex {
    migration: MigrationTable,
    population: PopulationTable,
    options: MapOptions,
}

impl DataIndex {
    pub fn new(migration: MigrationTable, population: PopulationTable, options: MapOptions) -> Self {
        Self {
            migration,
            population,
            options,
        }
    }

    pub fn mode(&self) -> MetricMode {
        self.options.mode
    }

    /// Years present in the migration dataset, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.migration.0.keys().copied().collect()
    }

    /// Population as a head count, after unit normalisation.
    pub fn population(&self, code: &str, year: i32) -> Option<f64> {
        self.population
            .value(code, year)
            .map(|p| p * self.options.population_unit.factor())
    }

    /// Whether the dataset has a row for this country at all. A `false` here
    /// and a genuine zero both render as 0.
    pub fn has_entry(&self, code: &str, year: i32, direction: Direction) -> bool {
        match (self.options.mode, direction) {
            (MetricMode::Flow, Direction::Emigration) => {
                self.migration.value(year, WORLD_KEY, code).is_some()
            }
            _ => self.migration.row(year, code).is_some(),
        }
    }

    pub fn metric_for(&self, code: &str, year: i32, direction: Direction) -> f64 {
        let metric = match self.options.mode {
            MetricMode::Rate => self.net_rate(code, year),
            MetricMode::Flow => self.flow(code, year, direction),
        };
        if metric.is_finite() { metric } else { 0.0 }
    }

    fn net_rate(&self, code: &str, year: i32) -> f64 {
        let Some(row) = self.migration.row(year, code) else {
            return 0.0;
        };
        let migrants = row.get(TOTAL_KEY).copied().unwrap_or(0.0);
        match self.population(code, year) {
            Some(people) if people != 0.0 => migrants * 1_000.0 / people,
            _ => 0.0,
        }
    }

    fn flow(&self, code: &str, year: i32, direction: Direction) -> f64 {
        let value = match direction {
            Direction::Immigration => self.migration.value(year, code, TOTAL_KEY),
            Direction::Emigration => self.migration.value(year, WORLD_KEY, code),
        };
        value.unwrap_or(0.0)
    }
}
