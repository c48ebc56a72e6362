#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use fastline::libs::export::{ExportData, ExportFormat, Exporter};
    use fastline::libs::fast::CompletedFast;
    use fastline::libs::weight::{WeightEntry, WeightSource, WeightUnit};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        fasts: Vec<CompletedFast>,
        weights: Vec<WeightEntry>,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let start = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
            let fasts = vec![CompletedFast {
                id: "fast-1".to_string(),
                start_time: start,
                end_time: start + Duration::hours(17),
                planned_duration: Duration::hours(16),
                plan: Some("16:8".to_string()),
                paused_total: Duration::minutes(30),
            }];
            let weights = vec![WeightEntry {
                id: "weight-1".to_string(),
                weight: 72.5,
                unit: WeightUnit::Kg,
                date: start,
                note: Some("after run".to_string()),
                source: WeightSource::Manual,
            }];
            ExportTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
                fasts,
                weights,
            }
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_fasts_csv(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("fasts.csv");
        let exporter = Exporter::new(ExportFormat::Csv, Some(output_path.clone()));

        let written = exporter.export(ExportData::Fasts, &ctx.fasts, &ctx.weights).unwrap();
        assert_eq!(written, vec![output_path.clone()]);

        let content = std::fs::read_to_string(&output_path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("id,plan,start,end,duration_minutes"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("fast-1,16:8,2023-11-14T22:13:20Z"));
        assert!(row.contains(",990,960,30,true"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_weights_json(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("weights.json");
        let exporter = Exporter::new(ExportFormat::Json, Some(output_path.clone()));
        exporter.export(ExportData::Weights, &ctx.fasts, &ctx.weights).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["weight"], 72.5);
        assert_eq!(entries[0]["unit"], "kg");
        assert_eq!(entries[0]["note"], "after run");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_all_csv_splits_files(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("backup.csv");
        let exporter = Exporter::new(ExportFormat::Csv, Some(output_path.clone()));

        let written = exporter.export(ExportData::All, &ctx.fasts, &ctx.weights).unwrap();
        assert_eq!(
            written,
            vec![
                ctx.temp_dir.path().join("backup_fasts.csv"),
                ctx.temp_dir.path().join("backup_weights.csv")
            ]
        );
        assert!(written.iter().all(|path| path.exists()));
        assert!(!output_path.exists());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_all_json(ctx: &mut ExportTestContext) {
        let output_path = ctx.temp_dir.path().join("backup.json");
        let exporter = Exporter::new(ExportFormat::Json, Some(output_path.clone()));
        exporter.export(ExportData::All, &ctx.fasts, &ctx.weights).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
        assert!(json["export_date"].is_string());
        assert_eq!(json["fasts"][0]["id"], "fast-1");
        assert_eq!(json["fasts"][0]["reached_target"], true);
        assert_eq!(json["weights"][0]["id"], "weight-1");
    }

    #[test]
    fn test_default_file_name() {
        let exporter = Exporter::new(ExportFormat::Json, None);
        let name = exporter.output_path().to_string_lossy().into_owned();
        assert!(name.starts_with("fastline_export_"));
        assert!(name.ends_with(".json"));
    }
}
