// File: crates/riso-core/src/init.rs
// Summary: Declarative setup: build a chart for every element carrying a JSON config attribute.

use tracing::{error, info};

use crate::chart::{create, ChartInstance};
use crate::config::ChartConfig;
use crate::container::Document;

/// Attribute holding a chart config as JSON text.
pub const CONFIG_ATTRIBUTE: &str = "data-chart";

/// Create a chart for each element in `document` with a `data-chart`
/// attribute. Malformed configs and failed constructions are logged and
/// skipped; the rest of the scan continues.
pub fn scan(document: &Document) -> Vec<ChartInstance> {
    let mut charts = Vec::new();
    for el in document.with_attribute(CONFIG_ATTRIBUTE) {
        let (id, parsed) = {
            let e = el.borrow();
            (e.id.clone(), ChartConfig::from_json(e.attribute(CONFIG_ATTRIBUTE).unwrap_or("{}")))
        };
        let config = match parsed {
            Ok(config) => config,
            Err(err) => {
                error!(element = %id, error = %err, "invalid chart config");
                continue;
            }
        };
        match create(&el, config) {
            Ok(Some(chart)) => charts.push(chart),
            Ok(None) => {}
            Err(err) => error!(element = %id, error = %err, "chart construction failed"),
        }
    }
    info!(charts = charts.len(), "declarative scan finished");
    charts
}
