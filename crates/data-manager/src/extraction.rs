//! Picking the charted reading out of a measurement node

use clinker_shared::{numeric_value, MeasurementNode, NumericField};

/// First non-`Time` field, in insertion order, whose value is numeric.
///
/// Charting and status derivation both go through here so they always
/// agree on the field.
pub fn first_numeric_field(node: &MeasurementNode) -> Option<NumericField> {
    node.measurements().find_map(|(key, value)| {
        numeric_value(value).map(|value| NumericField {
            key: key.to_string(),
            value,
        })
    })
}
