//! Date and time dimensions
//!
//! Date dimensions come from the platform's built-in template. Time-of-day dimensions have no
//! template, so they are created with MAQL and populated from a packaged data set: one row per
//! second of the day plus the manifest mapping those columns to the dimension's labels.

use crate::archive::SliManifest;
use crate::error::{GdcError, Result};
use crate::template::{render, render_json, to_identifier};
use std::fmt::Write;

/// Platform template backing every date dimension
pub const DATE_TEMPLATE_URN: &str = "URN:GOODDATA:DATE";

const TIME_DIMENSION_MAQL: &str = include_str!("../resources/time_dimension/time_dimension.maql");
const TIME_DIMENSION_MANIFEST: &str =
    include_str!("../resources/time_dimension/upload_info.json");

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// MAQL that creates a date dimension, optionally followed by a time dimension.
///
/// Without a name the template is included as-is; a time dimension needs a name.
pub fn date_maql(name: Option<&str>, include_time: bool) -> String {
    let Some(name) = name else {
        return format!("INCLUDE TEMPLATE \"{}\";", DATE_TEMPLATE_URN);
    };

    let identifier = to_identifier(name);
    let title = escape_maql(name);
    let mut maql = format!(
        "INCLUDE TEMPLATE \"{}\" MODIFY (IDENTIFIER \"{}\", TITLE \"{}\");\n\n",
        DATE_TEMPLATE_URN, identifier, title
    );

    if include_time {
        maql.push_str(&render(
            TIME_DIMENSION_MAQL,
            &[("id", identifier.as_str()), ("name", title.as_str())],
        ));
    }

    maql
}

/// Model identifier for a dimension name; names without ASCII letters or digits are rejected
pub fn dimension_identifier(name: &str) -> Result<String> {
    let identifier = to_identifier(name);
    if identifier.is_empty() {
        return Err(GdcError::config(format!(
            "dimension name '{}' has no ASCII letters or digits to build an identifier from",
            name
        )));
    }
    Ok(identifier)
}

fn escape_maql(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Packaged time-of-day data with its manifest resolved for one dimension name
#[derive(Debug, Clone)]
pub struct TimeDimension {
    pub data: String,
    pub manifest: SliManifest,
}

impl TimeDimension {
    pub fn resolve(name: &str) -> Result<Self> {
        let template: serde_json::Value = serde_json::from_str(TIME_DIMENSION_MANIFEST)?;
        let identifier = dimension_identifier(name)?;
        let manifest = render_json(&template, &[("id", identifier.as_str()), ("name", name)]);

        Ok(Self {
            data: time_of_day_rows(),
            manifest: SliManifest::new(manifest),
        })
    }
}

/// CSV with one row per second: `second_of_day,time,minute_of_day,hour_of_day`
pub fn time_of_day_rows() -> String {
    // "86399,23:59:59,23:59,23\n" is 24 bytes
    let mut csv = String::with_capacity(SECONDS_PER_DAY as usize * 24 + 64);
    csv.push_str("second_of_day,time,minute_of_day,hour_of_day\n");

    for second in 0..SECONDS_PER_DAY {
        let (h, m, s) = (second / 3600, (second / 60) % 60, second % 60);
        // writing into a String cannot fail
        let _ = writeln!(csv, "{},{:02}:{:02}:{:02},{:02}:{:02},{}", second, h, m, s, h, m, h);
    }

    csv
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_date_maql_without_name() {
        assert_eq!(date_maql(None, true), "INCLUDE TEMPLATE \"URN:GOODDATA:DATE\";");
    }

    #[test]
    fn test_date_maql_with_name() {
        let maql = date_maql(Some("Order Date"), false);
        assert_eq!(
            maql,
            "INCLUDE TEMPLATE \"URN:GOODDATA:DATE\" MODIFY (IDENTIFIER \"order_date\", TITLE \"Order Date\");\n\n"
        );
    }

    #[test]
    fn test_date_maql_with_time() {
        let maql = date_maql(Some("Created"), true);
        assert!(maql.contains("{dataset.time.created}"));
        assert!(maql.contains("VISUAL(TITLE \"Time (Created)\")"));
        assert!(!maql.contains('%'));
    }

    #[test]
    fn test_time_dimension_manifest_resolved() {
        let dim = TimeDimension::resolve("Created").unwrap();
        let manifest = dim.manifest.as_value();
        assert_eq!(
            manifest["dataSetSLIManifest"]["dataSet"],
            "dataset.time.created"
        );
        assert_eq!(manifest["dataSetSLIManifest"]["file"], "data.csv");
        assert!(!dim.manifest.to_json_string().unwrap().contains("%id%"));
    }

    #[test]
    fn test_dimension_identifier_rejects_unusable_names() {
        assert_eq!(dimension_identifier("Order Date").unwrap(), "order_date");
        assert!(matches!(dimension_identifier("日付"), Err(GdcError::Config(_))));
        assert!(matches!(dimension_identifier(" - "), Err(GdcError::Config(_))));
        assert!(TimeDimension::resolve("日付").is_err());
    }

    #[test]
    fn test_time_of_day_rows() {
        let csv = time_of_day_rows();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 86_401);
        assert_eq!(lines[0], "second_of_day,time,minute_of_day,hour_of_day");
        assert_eq!(lines[1], "0,00:00:00,00:00,0");
        assert_eq!(lines[3_662], "3661,01:01:01,01:01,1");
        assert_eq!(lines[86_400], "86399,23:59:59,23:59,23");
    }
}
