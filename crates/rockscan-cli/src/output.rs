//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::view::{FossilVerdict, ReportView, StatusView, Summary};
use chrono::{DateTime, Utc};
use colored::*;
use rockscan_domain::{AccessTier, AnalysisResult, Basin, BasinId, FieldLogEntry};
use rockscan_session::{ScanSettings, SessionState};
use serde_json::{json, Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis result as seen at `tier`.
    pub fn format_report(&self, result: &AnalysisResult, tier: AccessTier) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&result_json(result, tier))?),
            OutputFormat::Table => Ok(self.format_report_text(&ReportView::new(result, tier))),
            OutputFormat::Quiet => Ok(result.identification.clone()),
        }
    }

    fn format_report_text(&self, view: &ReportView) -> String {
        let mut out = Vec::new();

        out.push(self.colorize(&view.identification.to_uppercase(), "bold"));
        out.push(format!(
            "{}  {}",
            self.colorize(&view.confidence, "cyan"),
            view.subtitle
        ));
        out.push(String::new());

        out.push(self.heading("PHYSICAL MATRIX"));
        out.push(key_value_table(&view.physical));
        out.push(String::new());

        out.push(self.heading("MINERAL COMPOSITION"));
        for (idx, mineral) in view.minerals.iter().enumerate() {
            out.push(format!("  {}. {}", idx + 1, mineral));
        }
        out.push(format!("  Texture: {}", view.texture));
        out.push(String::new());

        if let Some(rows) = &view.provenance {
            out.push(self.heading("PROVENANCE"));
            out.push(key_value_table(rows));
            out.push(String::new());
        }

        match &view.fossil {
            Some(FossilVerdict::Authenticated { percent }) => {
                out.push(self.success(&format!("AUTHENTICATED FOSSIL ({:.1}%)", percent)));
                out.push(String::new());
            }
            Some(FossilVerdict::Unverified) => {
                out.push(self.warning("Potential artifact or pseudofossil"));
                out.push(String::new());
            }
            None => {}
        }

        out.push(self.heading("INTERPRETIVE SUMMARY"));
        match &view.summary {
            Summary::Educational { note } => {
                out.push(format!(
                    "  {}",
                    note.as_deref().unwrap_or("No educational note supplied.")
                ));
            }
            Summary::Professional {
                insight,
                stratigraphy,
            } => {
                out.push(format!(
                    "  {}",
                    insight.as_deref().unwrap_or("No professional insight supplied.")
                ));
                if let Some(stratigraphy) = stratigraphy {
                    out.push(String::new());
                    out.push(format!("  {}", self.colorize("STRATIGRAPHIC CORRELATION:", "magenta")));
                    out.push(format!("  {}", stratigraphy));
                }
            }
        }

        out.join("\n")
    }

    /// Format the status overlay for a session state.
    pub fn format_status(&self, state: &SessionState) -> String {
        let status = StatusView::new(state);
        let line = format!("[{}] {}", status.headline, status.detail);

        if status.retryable {
            format!(
                "{}\n{}",
                self.error(&line),
                self.info("Type 'retry' to try again")
            )
        } else {
            self.info(&line)
        }
    }

    /// Format the active scan settings.
    pub fn format_settings(&self, settings: &ScanSettings) -> String {
        let basin = settings.basin.basin();
        self.info(&format!(
            "{} | {} | {}",
            settings.mode.label(),
            settings.tier.label(),
            basin.name
        ))
    }

    /// Format the basin catalog, marking `selected`.
    pub fn format_basins(&self, basins: &[Basin], selected: Option<BasinId>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<Value> = basins
                    .iter()
                    .map(|b| {
                        json!({
                            "id": b.id.as_str(),
                            "name": b.name,
                            "description": b.description,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&items)?)
            }
            OutputFormat::Quiet => Ok(basins
                .iter()
                .map(|b| b.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Name", "Description"]);
                for basin in basins {
                    let marker = if Some(basin.id) == selected { "*" } else { "" };
                    builder.push_record([marker, basin.id.as_str(), basin.name, basin.description]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the field log.
    pub fn format_log(&self, entries: &[FieldLogEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<Value> = entries
                    .iter()
                    .map(|e| {
                        json!({
                            "id": e.id.to_string(),
                            "timestamp": e.timestamp,
                            "unit": e.unit,
                            "thickness": e.thickness,
                            "lithology": e.lithology,
                            "notes": e.notes,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&items)?)
            }
            OutputFormat::Quiet => Ok(entries
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if entries.is_empty() {
                    return Ok(self.colorize("No records detected in local cache", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Unit", "Time", "Lithology", "Thickness", "Notes"]);
                for entry in entries {
                    builder.push_record([
                        entry.id.short(),
                        entry.unit.clone(),
                        format_timestamp(entry.timestamp),
                        entry.lithology.clone(),
                        entry.thickness.clone(),
                        entry.notes.clone(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\n{}",
                    self.heading(&format!("{} ENTRIES", entries.len())),
                    table
                ))
            }
        }
    }

    /// Format a JSON document (e.g. the response schema).
    pub fn format_json(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn heading(&self, text: &str) -> String {
        self.colorize(text, "bold")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            "bold" => text.bold().to_string(),
            _ => text.to_string(),
        }
    }
}

/// The decoded result in its wire shape (camelCase, absent optionals omitted),
/// limited to the fields `tier` may see.
pub fn result_json(result: &AnalysisResult, tier: AccessTier) -> Value {
    let mut obj = Map::new();
    obj.insert("identification".into(), json!(result.identification));
    obj.insert("confidence".into(), json!(result.confidence.value()));
    obj.insert("rockType".into(), json!(result.rock_type));
    obj.insert("mineralogy".into(), json!(result.mineralogy));
    obj.insert("texture".into(), json!(result.texture));
    obj.insert(
        "physicalProperties".into(),
        json!({
            "hardness": result.physical_properties.hardness,
            "specificGravity": result.physical_properties.specific_gravity,
            "grainSize": result.physical_properties.grain_size,
        }),
    );
    obj.insert("geologicalAge".into(), json!(result.geological_age));
    obj.insert("isFossil".into(), json!(result.is_fossil));

    let narratives = match tier {
        AccessTier::Student => {
            vec![("educationalNote", &result.educational_note)]
        }
        AccessTier::Researcher => {
            if let Some(p) = &result.provenance {
                obj.insert(
                    "provenance".into(),
                    json!({
                        "rounding": p.rounding,
                        "transportDistance": p.transport_distance,
                        "basinSource": p.basin_source,
                    }),
                );
            }
            vec![
                ("stratigraphicContext", &result.stratigraphic_context),
                ("professionalInsight", &result.professional_insight),
            ]
        }
    };
    for (key, value) in narratives {
        if let Some(text) = value {
            obj.insert(key.into(), json!(text));
        }
    }
    if let Some(score) = result.fossil_authenticity() {
        obj.insert("fossilAuthenticity".into(), json!(score.value()));
    }

    Value::Object(obj)
}

fn key_value_table(rows: &[(&'static str, String)]) -> String {
    let mut builder = Builder::default();
    for (label, value) in rows {
        builder.push_record([*label, value.as_str()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Unix seconds as "YYYY-MM-DD HH:MM UTC".
fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockscan_analyzer::parse_analysis_response;
    use rockscan_domain::{EntryId, BASINS};

    const BASALT: &str = r#"{
        "identification": "Vesicular Basalt",
        "confidence": 0.9,
        "rockType": "Igneous",
        "mineralogy": ["Plagioclase", "Pyroxene", "Olivine"],
        "texture": "Vesicular",
        "physicalProperties": {"hardness": "5.0-6.0", "specificGravity": "2.9", "grainSize": "Fine"},
        "geologicalAge": "Cretaceous",
        "isFossil": false,
        "provenance": {"rounding": "Angular", "transportDistance": "Local", "basinSource": "Kohistan Arc"},
        "stratigraphicContext": "Chilas Complex",
        "educationalNote": "Gas bubbles left the holes.",
        "professionalInsight": "Arc tholeiite."
    }"#;

    fn basalt() -> AnalysisResult {
        parse_analysis_response(BASALT).unwrap()
    }

    fn entry(unit: &str) -> FieldLogEntry {
        FieldLogEntry::new(
            EntryId::new(),
            1_700_000_000,
            unit.to_string(),
            "1.5m".to_string(),
            "Basalt".to_string(),
            "Columnar".to_string(),
        )
    }

    #[test]
    fn test_student_report() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&basalt(), AccessTier::Student).unwrap();

        assert!(output.contains("VESICULAR BASALT"));
        assert!(output.contains("CONF: 90.0%"));
        assert!(output.contains("Igneous | Cretaceous"));
        assert!(output.contains("5.0-6.0"));
        assert!(output.contains("1. Plagioclase"));
        assert!(output.contains("Gas bubbles left the holes."));
        assert!(!output.contains("PROVENANCE"));
        assert!(!output.contains("Arc tholeiite."));
        assert!(!output.contains("STRATIGRAPHIC CORRELATION"));
    }

    #[test]
    fn test_researcher_report() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&basalt(), AccessTier::Researcher).unwrap();

        assert!(output.contains("PROVENANCE"));
        assert!(output.contains("Kohistan Arc"));
        assert!(output.contains("Arc tholeiite."));
        assert!(output.contains("STRATIGRAPHIC CORRELATION:"));
        assert!(!output.contains("Gas bubbles left the holes."));
    }

    #[test]
    fn test_fossil_banners() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut result = basalt();
        result.is_fossil = true;

        result.fossil_authenticity = Some(rockscan_domain::UnitScore::new(0.92).unwrap());
        let output = formatter.format_report(&result, AccessTier::Student).unwrap();
        assert!(output.contains("✓ AUTHENTICATED FOSSIL (92.0%)"));

        result.fossil_authenticity = Some(rockscan_domain::UnitScore::new(0.4).unwrap());
        let output = formatter.format_report(&result, AccessTier::Student).unwrap();
        assert!(output.contains("Potential artifact or pseudofossil"));
    }

    #[test]
    fn test_student_json_report() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_report(&basalt(), AccessTier::Student).unwrap();

        let reparsed = parse_analysis_response(&output).unwrap();
        assert_eq!(reparsed.identification, "Vesicular Basalt");
        assert_eq!(reparsed.mineralogy.len(), 3);
        assert_eq!(
            reparsed.educational_note.as_deref(),
            Some("Gas bubbles left the holes.")
        );
        assert!(!output.contains("provenance"));
        assert!(!output.contains("professionalInsight"));
        assert!(!output.contains("stratigraphicContext"));
        assert!(!output.contains("fossilAuthenticity"));
    }

    #[test]
    fn test_researcher_json_report() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_report(&basalt(), AccessTier::Researcher)
            .unwrap();

        let mut expected = basalt();
        expected.educational_note = None;
        assert_eq!(parse_analysis_response(&output).unwrap(), expected);
        assert!(!output.contains("educationalNote"));
    }

    #[test]
    fn test_quiet_report() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_report(&basalt(), AccessTier::Student).unwrap();
        assert_eq!(output, "Vesicular Basalt");
    }

    #[test]
    fn test_basins_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_basins(&BASINS, Some(BasinId::Soan)).unwrap();
        assert!(output.contains("Soan River"));
        assert!(output.contains("Ophiolitic sequences"));
        assert!(output.contains("*"));
    }

    #[test]
    fn test_empty_log() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_log(&[]).unwrap();
        assert_eq!(output, "No records detected in local cache");
    }

    #[test]
    fn test_log_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_log(&[entry("IGNEOUS"), entry("UNIT B")])
            .unwrap();
        assert!(output.starts_with("2 ENTRIES"));
        assert!(output.contains("UNIT B"));
        assert!(output.contains("2023-11-14 22:13 UTC"));
    }

    #[test]
    fn test_status_lines() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(
            formatter.format_status(&SessionState::Analyzing),
            "ℹ [TARGET LOCKED] Quantizing Matrix..."
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
