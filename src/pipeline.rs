// The two report pipelines and the preparation step they share.
//
// prepare() is the only place the CSV is read; both renderers take the
// resulting `Prepared` value so the dashboard and the workbook can never
// disagree on labels or aggregates.
use crate::charts::render_charts;
use crate::config::ReportConfig;
use crate::dashboard::write_dashboard;
use crate::error::ReportError;
use crate::kpi_card::{render_kpi_card, resolve_fonts, static_cards, FontTier};
use crate::loader::{load_and_prepare, LoadReport};
use crate::output::write_json;
use crate::reports::{compute_snapshot, sleep_by_occupation, sleep_by_work_mode};
use crate::types::{AggregateSnapshot, Dataset, SummaryFile};
use crate::workbook::{assemble_workbook, plan_workbook};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Prepared {
    pub dataset: Dataset,
    pub snapshot: AggregateSnapshot,
    pub load_report: LoadReport,
}

impl Prepared {
    pub fn from_dataset(dataset: Dataset, load_report: LoadReport) -> Self {
        let snapshot = compute_snapshot(&dataset);
        Self {
            dataset,
            snapshot,
            load_report,
        }
    }
}

pub fn prepare(config: &ReportConfig) -> Result<Prepared, ReportError> {
    let (dataset, load_report) = load_and_prepare(&config.data_path)?;
    Ok(Prepared::from_dataset(dataset, load_report))
}

pub fn run_interactive(prepared: &Prepared, config: &ReportConfig) -> Result<PathBuf, ReportError> {
    write_dashboard(&config.dashboard_path, &prepared.dataset, &prepared.snapshot)?;
    Ok(config.dashboard_path.clone())
}

#[derive(Debug, Clone)]
pub struct StaticOutputs {
    pub font_tier: FontTier,
    pub kpi_images: Vec<PathBuf>,
    pub chart_images: Vec<PathBuf>,
    pub workbook: PathBuf,
}

pub fn run_static(prepared: &Prepared, config: &ReportConfig) -> Result<StaticOutputs, ReportError> {
    fs::create_dir_all(&config.chart_dir).map_err(|e| ReportError::io(&config.chart_dir, e))?;

    let fonts = resolve_fonts(&config.fonts);
    let mut kpi_images = Vec::new();
    for card in static_cards(&prepared.snapshot) {
        let path = config.chart_path(card.file_name);
        render_kpi_card(&card, &fonts, &path)?;
        kpi_images.push(path);
    }

    let chart_images = render_charts(&prepared.dataset, &config.chart_dir)?;

    let layout = plan_workbook(&kpi_images, &chart_images);
    assemble_workbook(&layout, &config.workbook_path)?;

    info!("Static report assembled in {}", config.workbook_path.display());
    Ok(StaticOutputs {
        font_tier: fonts.tier,
        kpi_images,
        chart_images,
        workbook: config.workbook_path.clone(),
    })
}

pub fn write_summary(prepared: &Prepared, config: &ReportConfig) -> Result<(), ReportError> {
    let by_occupation = sleep_by_occupation(&prepared.dataset);
    let by_work_mode = sleep_by_work_mode(&prepared.dataset);
    let summary = SummaryFile {
        generated_at: chrono::Local::now(),
        respondents: prepared.dataset.len(),
        undefined_labels: prepared.load_report.undefined_labels,
        aggregates: &prepared.snapshot,
        sleep_by_occupation: &by_occupation,
        sleep_by_work_mode: &by_work_mode,
    };
    write_json(&config.summary_path, &summary)?;
    info!("Summary written to {}", config.summary_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::loader::prepare_from_reader;

    const CSV: &str = "gender,occupation,work_mode,sleep_quality_1_5,screen_time_hours,sleep_hours,stress_level_0_10,work_screen_hours,leisure_screen_hours\n\
        1,1,1,3,6.5,7.2,4,3,3.5\n\
        2,2,2,2,9.1,6.4,7,4,5.1\n\
        1,5,3,4,3.2,8.1,2,1,2.2\n\
        2,4,1,1,11.4,5.9,9,5,6.4\n";

    fn prepared() -> Prepared {
        let (data, report) = prepare_from_reader(CSV.as_bytes()).unwrap();
        Prepared::from_dataset(data, report)
    }

    #[test]
    fn shared_preparation_feeds_the_snapshot() {
        let p = prepared();
        assert_eq!(p.dataset.len(), 4);
        assert_eq!(p.load_report.undefined_labels, 0);
        // (6.5 + 9.1 + 3.2 + 11.4) / 4 = 7.55
        assert_eq!(p.snapshot.avg_total_screen, 7.55);
        assert_eq!(p.snapshot.avg_stress, 5.5);
    }

    #[test]
    fn interactive_pipeline_writes_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_output_dir(dir.path());
        let path = run_interactive(&prepared(), &config).unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("7.55 hrs"));
    }

    #[test]
    fn summary_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_output_dir(dir.path());
        write_summary(&prepared(), &config).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config.summary_path).unwrap()).unwrap();
        assert_eq!(json["respondents"], 4);
        assert_eq!(json["aggregates"]["avg_stress"], 5.5);
        assert_eq!(json["sleep_by_work_mode"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn static_pipeline_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig {
            fonts: FontConfig::builtin_only(),
            ..ReportConfig::with_output_dir(dir.path())
        };

        let first = run_static(&prepared(), &config).unwrap();
        assert_eq!(first.font_tier, FontTier::Fallback);
        assert_eq!(first.kpi_images.len(), 5);
        assert_eq!(first.chart_images.len(), 4);
        for path in first.kpi_images.iter().chain(&first.chart_images) {
            assert!(path.is_file(), "missing {}", path.display());
        }
        assert!(first.workbook.is_file());

        let chart = config.chart_path("chart2.png");
        let card = config.chart_path("kpi3.png");
        let (chart_bytes, card_bytes) = (fs::read(&chart).unwrap(), fs::read(&card).unwrap());

        let second = run_static(&prepared(), &config).unwrap();
        assert_eq!(second.chart_images, first.chart_images);
        assert_eq!(fs::read(&chart).unwrap(), chart_bytes);
        assert_eq!(fs::read(&card).unwrap(), card_bytes);
    }

    #[test]
    fn unwritable_chart_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let config = ReportConfig {
            chart_dir: blocker.join("charts"),
            fonts: FontConfig::builtin_only(),
            ..ReportConfig::with_output_dir(dir.path())
        };
        let err = run_static(&prepared(), &config).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
