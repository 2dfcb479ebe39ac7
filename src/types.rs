use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Display text for a categorical code that has no label.
pub const UNDEFINED_LABEL: &str = "Undefined";

pub const GENDER_LABELS: &[(i64, &str)] = &[(1, "Female"), (2, "Male")];
pub const OCCUPATION_LABELS: &[(i64, &str)] = &[
    (1, "Employed"),
    (2, "Student"),
    (3, "Self-employed"),
    (4, "Unemployed"),
    (5, "Retired"),
];
pub const WORK_MODE_LABELS: &[(i64, &str)] = &[(1, "Remote"), (2, "Hybrid"), (3, "In-person")];
// The code doubles as the ordinal score used for the sleep-quality mean.
pub const SLEEP_QUALITY_LABELS: &[(i64, &str)] =
    &[(1, "Very Poor"), (2, "Poor"), (3, "Good"), (4, "Excellent")];

/// One CSV row exactly as it appears on disk. Columns not listed here are
/// ignored by the deserializer.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub work_mode: Option<String>,
    pub sleep_quality_1_5: Option<String>,
    pub screen_time_hours: Option<String>,
    pub sleep_hours: Option<String>,
    pub stress_level_0_10: Option<String>,
    pub work_screen_hours: Option<String>,
    pub leisure_screen_hours: Option<String>,
}

/// A prepared respondent: labels instead of codes, numbers rounded to 2 dp.
///
/// `None` in a categorical field marks a code outside its label table; in a
/// numeric field it marks a blank cell, which every mean and chart skips.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub gender: Option<&'static str>,
    pub occupation: Option<&'static str>,
    pub work_mode: Option<&'static str>,
    pub sleep_quality: Option<&'static str>,
    pub screen_time_hours: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<f64>,
    pub work_screen_hours: Option<f64>,
    pub leisure_screen_hours: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// The five headline statistics, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub avg_work_screen: f64,
    pub avg_leisure_screen: f64,
    /// Mean of the 1–4 sleep-quality score over records with a defined label.
    pub sleep_quality_score: f64,
    /// Most frequent sleep-quality label.
    pub sleep_quality_mode: Option<String>,
    pub avg_stress: f64,
    pub avg_total_screen: f64,
}

impl AggregateSnapshot {
    pub fn sleep_quality_mode_label(&self) -> &str {
        self.sleep_quality_mode.as_deref().unwrap_or("N/A")
    }

    /// Console preview rows, in KPI tile order.
    pub fn preview_rows(&self) -> Vec<KpiRow> {
        vec![
            KpiRow::new("Avg Work Screen Time", format!("{:.2} hrs", self.avg_work_screen)),
            KpiRow::new("Avg Leisure Screen Time", format!("{:.2} hrs", self.avg_leisure_screen)),
            KpiRow::new("Avg Sleep Quality (1–4)", format!("{:.2}", self.sleep_quality_score)),
            KpiRow::new("Most Common Sleep Quality", self.sleep_quality_mode_label().to_string()),
            KpiRow::new("Avg Stress Level", format!("{:.2}/10", self.avg_stress)),
            KpiRow::new("Avg Total Screen Time", format!("{:.2} hrs", self.avg_total_screen)),
        ]
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct KpiRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KpiRow {
    fn new(metric: &str, value: String) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

/// Mean sleep hours for one category label.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct GroupMean {
    #[tabled(rename = "Group")]
    pub label: String,
    #[tabled(rename = "AvgSleepHours", display_with = "display_2dp")]
    pub mean: f64,
    #[tabled(rename = "Respondents")]
    pub count: usize,
}

fn display_2dp(v: &f64) -> String {
    format!("{:.2}", v)
}

/// Every screen-time value observed for one sleep-quality label.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySamples {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryFile<'a> {
    pub generated_at: chrono::DateTime<chrono::Local>,
    pub respondents: usize,
    pub undefined_labels: usize,
    pub aggregates: &'a AggregateSnapshot,
    pub sleep_by_occupation: &'a [GroupMean],
    pub sleep_by_work_mode: &'a [GroupMean],
}
