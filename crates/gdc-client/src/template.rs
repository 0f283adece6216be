//! Placeholder substitution for packaged resources
//!
//! Templates use `%key%` placeholders. JSON templates are substituted value-by-value after
//! parsing, so replacement text never needs escaping.

use serde_json::Value;

/// Turn a display name into a model identifier: lowercase ASCII, digits and underscores.
///
/// `"Order Date (UTC)"` becomes `"order_date_utc"`.
pub fn to_identifier(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Replace every `%key%` in `template` with its value
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    substitutions
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("%{}%", key), value)
        })
}

/// Apply [`render`] to every string (keys included) inside a JSON document
pub fn render_json(template: &Value, substitutions: &[(&str, &str)]) -> Value {
    match template {
        Value::String(s) => Value::String(render(s, substitutions)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_json(item, substitutions))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (render(k, substitutions), render_json(v, substitutions)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("Order Date"), "order_date");
        assert_eq!(to_identifier("Order Date (UTC)"), "order_date_utc");
        assert_eq!(to_identifier("created"), "created");
        assert_eq!(to_identifier("  Spaced--out  "), "spaced_out");
    }

    #[test]
    fn test_render() {
        let out = render(
            "{dataset.time.%id%} VISUAL(TITLE \"Time (%name%)\")",
            &[("id", "created"), ("name", "Created")],
        );
        assert_eq!(out, "{dataset.time.created} VISUAL(TITLE \"Time (Created)\")");
    }

    #[test]
    fn test_render_json_does_not_need_escaping() {
        let template = json!({"title": "%name%", "parts": [{"populates": ["label.%id%"]}], "n": 1});
        let out = render_json(&template, &[("id", "q"), ("name", "say \"hi\"")]);
        assert_eq!(
            out,
            json!({"title": "say \"hi\"", "parts": [{"populates": ["label.q"]}], "n": 1})
        );
    }
}
