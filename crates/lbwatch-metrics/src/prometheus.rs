//! Prometheus text exposition format.
//!
//! Renders registry families into the Prometheus text exposition format
//! for scraping by a Prometheus server or compatible agent.

use crate::registry::GaugeFamily;

/// Content type of the rendered output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render gauge families into Prometheus text format.
///
/// Families without any series are omitted.
pub fn render_prometheus(families: &[GaugeFamily]) -> String {
    let mut out = String::new();

    for family in families.iter().filter(|f| !f.series.is_empty()) {
        let name = family.desc.name;
        out.push_str(&format!("# HELP {name} {}\n", escape_help(family.desc.help)));
        out.push_str(&format!("# TYPE {name} gauge\n"));

        for series in &family.series {
            out.push_str(name);
            if !series.labels.is_empty() {
                let labels: Vec<String> = series
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
                    .collect();
                out.push('{');
                out.push_str(&labels.join(","));
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(series.value));
            out.push('\n');
        }
    }

    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        // `Display` prints integral floats without a fractional part.
        value.to_string()
    }
}
