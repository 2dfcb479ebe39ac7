use crate::types::{
    AggregateSnapshot, CategorySamples, Dataset, GroupMean, Record, SLEEP_QUALITY_LABELS,
    UNDEFINED_LABEL,
};
use crate::util::{average, code_of, mode, round2};
use std::collections::BTreeMap;

pub fn compute_snapshot(data: &Dataset) -> AggregateSnapshot {
    // Blank cells are skipped, not counted as zero.
    let column = |f: fn(&Record) -> Option<f64>| -> f64 {
        let values: Vec<f64> = data.records().iter().filter_map(f).collect();
        round2(average(&values))
    };

    let scores: Vec<f64> = data
        .records()
        .iter()
        .filter_map(|r| r.sleep_quality)
        .filter_map(|label| code_of(SLEEP_QUALITY_LABELS, label))
        .map(|code| code as f64)
        .collect();
    let sleep_quality_mode = mode(data.records().iter().filter_map(|r| r.sleep_quality));

    AggregateSnapshot {
        avg_work_screen: column(|r| r.work_screen_hours),
        avg_leisure_screen: column(|r| r.leisure_screen_hours),
        sleep_quality_score: round2(average(&scores)),
        sleep_quality_mode: sleep_quality_mode.map(str::to_string),
        avg_stress: column(|r| r.stress_level),
        avg_total_screen: column(|r| r.screen_time_hours),
    }
}

/// Mean sleep hours per category label, in ascending label order.
/// Records without a label are grouped under `Undefined`; records without
/// sleep hours are left out.
pub fn mean_sleep_by(data: &Dataset, key: fn(&Record) -> Option<&'static str>) -> Vec<GroupMean> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in data.records() {
        let Some(hours) = r.sleep_hours else {
            continue;
        };
        groups
            .entry(key(r).unwrap_or(UNDEFINED_LABEL))
            .or_default()
            .push(hours);
    }
    groups
        .into_iter()
        .map(|(label, hours)| GroupMean {
            label: label.to_string(),
            mean: average(&hours),
            count: hours.len(),
        })
        .collect()
}

pub fn sleep_by_occupation(data: &Dataset) -> Vec<GroupMean> {
    mean_sleep_by(data, |r| r.occupation)
}

pub fn sleep_by_work_mode(data: &Dataset) -> Vec<GroupMean> {
    mean_sleep_by(data, |r| r.work_mode)
}

/// Screen-time observations per sleep-quality label, in ascending label order.
pub fn screen_time_by_sleep_quality(data: &Dataset) -> Vec<CategorySamples> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in data.records() {
        let Some(screen) = r.screen_time_hours else {
            continue;
        };
        groups
            .entry(r.sleep_quality.unwrap_or(UNDEFINED_LABEL))
            .or_default()
            .push(screen);
    }
    groups
        .into_iter()
        .map(|(label, values)| CategorySamples {
            label: label.to_string(),
            values,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(occupation: Option<&'static str>, quality: Option<&'static str>, sleep: f64) -> Record {
        Record {
            gender: Some("Female"),
            occupation,
            work_mode: Some("Remote"),
            sleep_quality: quality,
            screen_time_hours: Some(sleep + 1.0),
            sleep_hours: Some(sleep),
            stress_level: Some(4.0),
            work_screen_hours: Some(2.5),
            leisure_screen_hours: Some(3.25),
        }
    }

    #[test]
    fn snapshot_is_rounded_means_and_mode() {
        let data = Dataset::new(vec![
            record(Some("Employed"), Some("Good"), 7.0),
            record(Some("Student"), Some("Good"), 6.0),
            record(Some("Retired"), Some("Excellent"), 8.01),
        ]);
        let snap = compute_snapshot(&data);
        assert_eq!(snap.avg_work_screen, 2.5);
        assert_eq!(snap.avg_leisure_screen, 3.25);
        assert_eq!(snap.avg_stress, 4.0);
        // (8.0 + 7.0 + 9.01) / 3 = 8.0033...
        assert_eq!(snap.avg_total_screen, 8.0);
        // (3 + 3 + 4) / 3 = 3.333...
        assert_eq!(snap.sleep_quality_score, 3.33);
        assert_eq!(snap.sleep_quality_mode.as_deref(), Some("Good"));
    }

    #[test]
    fn undefined_sleep_quality_is_skipped_by_score_and_mode() {
        let data = Dataset::new(vec![
            record(None, None, 7.0),
            record(None, None, 7.0),
            record(None, Some("Poor"), 7.0),
        ]);
        let snap = compute_snapshot(&data);
        assert_eq!(snap.sleep_quality_score, 2.0);
        assert_eq!(snap.sleep_quality_mode.as_deref(), Some("Poor"));
    }

    #[test]
    fn empty_dataset_yields_zeroes() {
        let snap = compute_snapshot(&Dataset::default());
        assert_eq!(snap.avg_total_screen, 0.0);
        assert_eq!(snap.sleep_quality_mode, None);
        assert_eq!(snap.sleep_quality_mode_label(), "N/A");
    }

    #[test]
    fn groups_are_sorted_and_undefined_is_visible() {
        let data = Dataset::new(vec![
            record(Some("Student"), Some("Good"), 6.0),
            record(Some("Employed"), Some("Good"), 7.0),
            record(Some("Student"), Some("Good"), 8.0),
            record(None, Some("Good"), 5.0),
        ]);
        let groups = sleep_by_occupation(&data);
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Employed", "Student", "Undefined"]);
        assert_eq!(groups[1].mean, 7.0);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn blank_values_are_left_out_of_means() {
        let mut blank = record(Some("Student"), Some("Good"), 9.0);
        blank.sleep_hours = None;
        blank.stress_level = None;
        let data = Dataset::new(vec![
            record(Some("Student"), Some("Good"), 6.0),
            record(Some("Student"), Some("Good"), 8.0),
            blank,
        ]);
        let snap = compute_snapshot(&data);
        assert_eq!(snap.avg_stress, 4.0);
        // (7 + 9 + 10) / 3
        assert_eq!(snap.avg_total_screen, 8.67);

        let groups = sleep_by_occupation(&data);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mean, 7.0);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn screen_time_is_grouped_by_quality_label() {
        let data = Dataset::new(vec![
            record(None, Some("Poor"), 6.0),
            record(None, Some("Excellent"), 8.0),
            record(None, Some("Poor"), 5.0),
        ]);
        let groups = screen_time_by_sleep_quality(&data);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Excellent");
        assert_eq!(groups[1].values, vec![7.0, 6.0]);
    }
}
