//! Simulator setpoints with their allowed ranges and owning steps

use serde::Serialize;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A named setpoint belonging to one process step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub range: ParamRange,
    pub step: u8,
}

const fn param(key: &'static str, label: &'static str, min: f64, max: f64, step: u8) -> ParameterDefinition {
    ParameterDefinition {
        key,
        label,
        range: ParamRange::new(min, max),
        step,
    }
}

/// Parameter table in display order
pub const PARAMETERS: [ParameterDefinition; 15] = [
    param("FeedSize", "Feed Size", 0.0, 100.0, 1),
    param("ProductSize", "Product Size", 5.0, 95.0, 1),
    param("MillPowerConsumption1", "Mill Power Consumption", 10.0, 90.0, 1),
    param("MillInletTemperature", "Mill Inlet Temperature", 20.0, 80.0, 1),
    param("BlendingEfficiency", "Blending Efficiency", 25.0, 75.0, 2),
    param("C5Temperature", "C5 Temperature", 30.0, 70.0, 2),
    param("HeatRecoveryEfficiency", "Heat Recovery Efficiency", 35.0, 65.0, 2),
    param("FuelFlowRate", "Fuel Flow Rate", 40.0, 60.0, 3),
    param("PrimaryFuelFlow", "Primary Fuel Flow", 45.0, 55.0, 3),
    param("SecondaryAirTemp", "Secondary Air Temperature", 50.0, 50.0, 3),
    param("KilnDrivePower", "Kiln Drive Power", 0.0, 200.0, 4),
    param("ClinkerInletTemp", "Clinker Inlet Temperature", 1.0, 150.0, 4),
    param("CoolingAirFlow", "Cooling Air Flow", 2.5, 75.0, 5),
    param("MillPowerConsumption2", "Mill Power Consumption", 5.0, 125.0, 6),
    param("PackingRate", "Packing Rate", 10.0, 300.0, 6),
];

/// Lookup over a parameter table, [`PARAMETERS`] by default
#[derive(Debug, Clone, Copy)]
pub struct ParameterTable {
    definitions: &'static [ParameterDefinition],
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self {
            definitions: &PARAMETERS,
        }
    }
}

impl ParameterTable {
    pub fn new(definitions: &'static [ParameterDefinition]) -> Self {
        Self { definitions }
    }

    pub fn get(&self, key: &str) -> Option<&'static ParameterDefinition> {
        self.definitions.iter().find(|def| def.key == key)
    }

    pub fn definitions(&self) -> &'static [ParameterDefinition] {
        self.definitions
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ParameterDefinition> {
        self.definitions.iter()
    }

    /// Parameters owned by `step`
    pub fn for_step(&self, step: u8) -> impl Iterator<Item = &'static ParameterDefinition> {
        self.definitions.iter().filter(move |def| def.step == step)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let table = ParameterTable::default();
        for def in table.iter() {
            assert!(def.range.contains(def.range.min), "{} min", def.key);
            assert!(def.range.contains(def.range.max), "{} max", def.key);
            assert!(!def.range.contains(def.range.min - 0.01), "{} below", def.key);
            assert!(!def.range.contains(def.range.max + 0.01), "{} above", def.key);
        }
    }

    #[test]
    fn test_lookup() {
        let table = ParameterTable::default();
        let feed = table.get("FeedSize").unwrap();
        assert_eq!(feed.step, 1);
        assert_eq!(feed.range, ParamRange::new(0.0, 100.0));
        assert!(table.get("Unknown").is_none());
        assert_eq!(table.for_step(1).count(), 4);
        assert_eq!(table.for_step(5).count(), 1);
        assert_eq!(table.len(), 15);
    }

    #[test]
    fn test_degenerate_range() {
        let table = ParameterTable::default();
        let air = table.get("SecondaryAirTemp").unwrap();
        assert!(air.range.contains(50.0));
        assert!(!air.range.contains(50.5));
    }
}
