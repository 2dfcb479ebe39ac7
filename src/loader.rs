use crate::error::ReportError;
use crate::types::{
    Dataset, RawRow, Record, GENDER_LABELS, OCCUPATION_LABELS, SLEEP_QUALITY_LABELS,
    WORK_MODE_LABELS,
};
use crate::util::{map_code, parse_code, parse_f64_safe, round2};
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "gender",
    "occupation",
    "work_mode",
    "sleep_quality_1_5",
    "screen_time_hours",
    "sleep_hours",
    "stress_level_0_10",
    "work_screen_hours",
    "leisure_screen_hours",
];

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Categorical cells whose code had no label.
    pub undefined_labels: usize,
    /// Numeric cells left blank.
    pub blank_numbers: usize,
}

pub fn load_and_prepare(path: &Path) -> Result<(Dataset, LoadReport), ReportError> {
    let file = File::open(path).map_err(|source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let (data, report) = prepare_from_reader(file)?;
    info!(
        "Loaded {} respondents from {}",
        report.total_rows,
        path.display()
    );
    Ok((data, report))
}

pub fn prepare_from_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport), ReportError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn(column.to_string()));
        }
    }

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = result?;
        report.total_rows += 1;

        let gender = label(GENDER_LABELS, row.gender.as_deref(), &mut report);
        let occupation = label(OCCUPATION_LABELS, row.occupation.as_deref(), &mut report);
        let work_mode = label(WORK_MODE_LABELS, row.work_mode.as_deref(), &mut report);
        let sleep_quality = label(
            SLEEP_QUALITY_LABELS,
            row.sleep_quality_1_5.as_deref(),
            &mut report,
        );

        let mut num = |column: &'static str, raw: Option<String>| {
            number(line, column, raw, &mut report)
        };
        records.push(Record {
            gender,
            occupation,
            work_mode,
            sleep_quality,
            screen_time_hours: num("screen_time_hours", row.screen_time_hours)?,
            sleep_hours: num("sleep_hours", row.sleep_hours)?,
            stress_level: num("stress_level_0_10", row.stress_level_0_10)?,
            work_screen_hours: num("work_screen_hours", row.work_screen_hours)?,
            leisure_screen_hours: num("leisure_screen_hours", row.leisure_screen_hours)?,
        });
    }

    if report.undefined_labels > 0 {
        warn!(
            "{} categorical values had no label and are shown as undefined",
            report.undefined_labels
        );
    }
    if report.blank_numbers > 0 {
        warn!(
            "{} numeric values were blank and are left out of averages",
            report.blank_numbers
        );
    }

    Ok((Dataset::new(records), report))
}

fn label(
    table: &[(i64, &'static str)],
    raw: Option<&str>,
    report: &mut LoadReport,
) -> Option<&'static str> {
    let mapped = map_code(table, parse_code(raw));
    if mapped.is_none() {
        report.undefined_labels += 1;
    }
    mapped
}

/// Blank cells are `None`. Text that is not a number is fatal.
fn number(
    line: usize,
    column: &'static str,
    raw: Option<String>,
    report: &mut LoadReport,
) -> Result<Option<f64>, ReportError> {
    let Some(text) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        report.blank_numbers += 1;
        return Ok(None);
    };
    match parse_f64_safe(Some(text)) {
        Some(v) => Ok(Some(round2(v))),
        None => Err(ReportError::InvalidValue {
            line,
            column,
            value: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GENDER_LABELS, OCCUPATION_LABELS};

    const HEADER: &str = "user_id,gender,occupation,work_mode,sleep_quality_1_5,screen_time_hours,sleep_hours,stress_level_0_10,work_screen_hours,leisure_screen_hours";

    fn prepare(body: &str) -> Result<(Dataset, LoadReport), ReportError> {
        let csv = format!("{}\n{}", HEADER, body);
        prepare_from_reader(csv.as_bytes())
    }

    #[test]
    fn maps_codes_and_rounds_numbers() {
        let (data, report) = prepare(
            "1,1,2,3,4,8.456,7.123,5.005,3.3333,5.1249\n\
             2,2,5,1,1,10,6,9,4,6\n",
        )
        .unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.undefined_labels, 0);

        let first = &data.records()[0];
        assert_eq!(first.gender, Some("Female"));
        assert_eq!(first.occupation, Some("Student"));
        assert_eq!(first.work_mode, Some("In-person"));
        assert_eq!(first.sleep_quality, Some("Excellent"));
        assert_eq!(first.screen_time_hours, Some(8.46));
        assert_eq!(first.sleep_hours, Some(7.12));
        assert_eq!(first.work_screen_hours, Some(3.33));
        assert_eq!(first.leisure_screen_hours, Some(5.12));

        let second = &data.records()[1];
        assert_eq!(second.gender, Some("Male"));
        assert_eq!(second.occupation, Some("Retired"));
        assert_eq!(second.work_mode, Some("Remote"));
        assert_eq!(second.sleep_quality, Some("Very Poor"));
    }

    #[test]
    fn labels_stay_within_their_tables() {
        let (data, _) = prepare(
            "1,1,1,1,1,1,1,1,1,1\n\
             2,2,3,2,2,1,1,1,1,1\n\
             3,1,4,3,3,1,1,1,1,1\n",
        )
        .unwrap();
        for r in data.records() {
            let gender = r.gender.unwrap();
            assert!(GENDER_LABELS.iter().any(|(_, l)| *l == gender));
            let occupation = r.occupation.unwrap();
            assert!(OCCUPATION_LABELS.iter().any(|(_, l)| *l == occupation));
        }
    }

    #[test]
    fn out_of_domain_codes_become_undefined() {
        let (data, report) = prepare("1,3,9,,5,1,1,1,1,1\n").unwrap();
        let r = &data.records()[0];
        assert_eq!(r.gender, None);
        assert_eq!(r.occupation, None);
        assert_eq!(r.work_mode, None);
        assert_eq!(r.sleep_quality, None);
        assert_eq!(report.undefined_labels, 4);
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "gender,occupation\n1,1\n";
        let err = prepare_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn(ref c) if c == "work_mode"));
    }

    #[test]
    fn bad_number_reports_line_and_column() {
        let err = prepare("1,1,1,1,1,1,1,1,1,1\n2,1,1,1,1,abc,1,1,1,1\n").unwrap_err();
        match err {
            ReportError::InvalidValue { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "screen_time_hours");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scientific_notation_is_a_number() {
        let (data, report) = prepare("1,1,1,1,1,7.5E+00,7,5,3,1e-05\n").unwrap();
        let r = &data.records()[0];
        assert_eq!(r.screen_time_hours, Some(7.5));
        assert_eq!(r.leisure_screen_hours, Some(0.0));
        assert_eq!(report.blank_numbers, 0);
    }

    #[test]
    fn thousands_separator_is_not_a_number() {
        let err = prepare("1,1,1,1,1,\"1,204.5\",7,5,3,4\n").unwrap_err();
        assert!(matches!(err, ReportError::InvalidValue { ref value, .. } if value == "1,204.5"));
    }

    #[test]
    fn blank_numbers_are_kept_as_missing() {
        let (data, report) = prepare(
            "1,1,1,1,1,6,,5,3,4\n\
             2,2,1,1,1,8, 7 ,3,, \n",
        )
        .unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.blank_numbers, 3);
        assert_eq!(data.records()[0].sleep_hours, None);
        assert_eq!(data.records()[1].sleep_hours, Some(7.0));
        assert_eq!(data.records()[1].work_screen_hours, None);
        assert_eq!(data.records()[1].leisure_screen_hours, None);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_and_prepare(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ReportError::Open { .. }));
    }
}
