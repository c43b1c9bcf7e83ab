//! Alarm list export

use chrono::NaiveDate;
use reveille_api::Alarm;
use std::path::{Path, PathBuf};

/// MIME type of an exported list
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// A rendered export, ready to hand to the user or write to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

impl ExportDocument {
    /// Pretty-printed JSON array of the full list, named for `date`
    pub fn render(alarms: &[Alarm], date: NaiveDate) -> serde_json::Result<Self> {
        Ok(Self {
            file_name: export_file_name(date),
            content_type: EXPORT_CONTENT_TYPE,
            body: serde_json::to_string_pretty(alarms)?,
        })
    }

    /// Write into `dir` (created if needed); returns the file path
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.body)?;
        Ok(path)
    }
}

/// `alarms-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("alarms-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveille_api::AlarmDraft;
    use reveille_util::AlarmId;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn file_name_is_zero_padded() {
        assert_eq!(export_file_name(date()), "alarms-2024-03-07.json");
    }

    #[test]
    fn render_and_write() {
        let mut draft = AlarmDraft::new("06:30");
        draft.label = Some("Run".into());
        let alarms = vec![Alarm::new(AlarmId::new("x"), draft.validate().unwrap())];

        let doc = ExportDocument::render(&alarms, date()).unwrap();
        assert_eq!(doc.content_type, "application/json");
        assert!(doc.body.contains('\n'));

        let dir = tempfile::tempdir().unwrap();
        let path = doc.write_to(&dir.path().join("exports")).unwrap();
        assert_eq!(path.file_name().unwrap(), "alarms-2024-03-07.json");

        let written: Vec<Alarm> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, alarms);
    }

    #[test]
    fn empty_list_exports_empty_array() {
        let doc = ExportDocument::render(&[], date()).unwrap();
        assert_eq!(doc.body, "[]");
    }
}
