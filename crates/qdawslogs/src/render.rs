use std::str::FromStr;

use qdawslogs_protocol::ResultRow;

/// How result rows are written to stdout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `field=value, ` pairs, one row per paragraph
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format '{}', expected text or json", s)),
        }
    }
}

impl OutputFormat {
    pub fn render(self, row: &ResultRow) -> String {
        match self {
            OutputFormat::Text => render_text(row),
            OutputFormat::Json => render_json(row),
        }
    }
}

pub fn render_text(row: &ResultRow) -> String {
    let mut buf = String::new();
    for (field, value) in row.iter() {
        buf.push_str(field);
        buf.push('=');
        buf.push_str(value);
        buf.push_str(", ");
    }
    buf
}

pub fn render_json(row: &ResultRow) -> String {
    // A map of strings cannot fail to serialize
    serde_json::to_string(row).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ResultRow {
        [
            ("@timestamp", "2019-06-12 06:47:12.000"),
            ("@message", "task 19062412_5Xi2eYcEc6 done"),
            ("@ptr", "CmAKJwoj"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn text_rendering() {
        assert_eq!(
            render_text(&row()),
            "@timestamp=2019-06-12 06:47:12.000, @message=task 19062412_5Xi2eYcEc6 done, "
        );
    }

    #[test]
    fn json_rendering() {
        let value: serde_json::Value = serde_json::from_str(&render_json(&row())).unwrap();
        assert_eq!(value["@message"], "task 19062412_5Xi2eYcEc6 done");
        assert!(value.get("@ptr").is_none());
    }

    #[test]
    fn format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
