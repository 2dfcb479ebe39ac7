// Interactive dashboard page.
//
// The page is a single self-contained HTML document: the chart figures are
// serialized as Plotly JSON and drawn in the browser by Plotly.js loaded
// from its CDN. Opening the written file is the interactive session.
use crate::error::ReportError;
use crate::output::write_text;
use crate::reports::{screen_time_by_sleep_quality, sleep_by_occupation, sleep_by_work_mode};
use crate::types::{AggregateSnapshot, Dataset, GroupMean, UNDEFINED_LABEL};
use chrono::{DateTime, Local};
use log::info;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const PAGE_TITLE: &str = "Lifestyle & Screen Time Dashboard";
/// Largest scatter marker diameter in px, as with Plotly Express.
const MAX_MARKER_SIZE: f64 = 20.0;

pub struct ChartPanel {
    pub id: &'static str,
    pub figure: Value,
    pub insight: &'static str,
}

/// KPI tiles as `(label, value)` pairs, in display order.
pub fn kpi_tiles(snapshot: &AggregateSnapshot) -> Vec<(&'static str, String)> {
    vec![
        ("Avg Work Screen Time", format!("{:.2} hrs", snapshot.avg_work_screen)),
        ("Avg Leisure Screen Time", format!("{:.2} hrs", snapshot.avg_leisure_screen)),
        ("Avg Sleep Quality (1–4)", format!("{:.2}", snapshot.sleep_quality_score)),
        ("Avg Stress Level", format!("{:.2}", snapshot.avg_stress)),
        ("Avg Total Screen Time", format!("{:.2} hrs", snapshot.avg_total_screen)),
    ]
}

fn bar_figure(title: &str, x_field: &str, groups: &[GroupMean]) -> Value {
    // One trace per category so each bar gets its own colour and legend entry.
    let traces: Vec<Value> = groups
        .iter()
        .map(|g| {
            json!({
                "type": "bar",
                "name": g.label,
                "x": [g.label],
                "y": [g.mean],
                "text": [format!("{:.2}", g.mean)],
                "textposition": "auto",
                "hovertemplate": format!("{x_field}=%{{x}}<br>sleep_hours=%{{y:.2f}}<extra></extra>"),
            })
        })
        .collect();
    json!({
        "data": traces,
        "layout": {
            "title": {"text": title},
            "xaxis": {"title": {"text": x_field}},
            "yaxis": {"title": {"text": "sleep_hours"}},
            "legend": {"title": {"text": x_field}},
        }
    })
}

fn box_figure(data: &Dataset) -> Value {
    let traces: Vec<Value> = screen_time_by_sleep_quality(data)
        .into_iter()
        .map(|g| {
            json!({
                "type": "box",
                "name": g.label,
                "x": vec![g.label.as_str(); g.values.len()],
                "y": g.values,
                "hovertemplate": "Sleep Quality: %{x}<br>Screen Time: %{y:.2f} hrs<extra></extra>",
            })
        })
        .collect();
    json!({
        "data": traces,
        "layout": {
            "title": {"text": "Screen Time Distribution by Sleep Quality"},
            "xaxis": {"title": {"text": "sleep_quality_1_5"}},
            "yaxis": {"title": {"text": "screen_time_hours"}},
        }
    })
}

fn scatter_figure(data: &Dataset) -> Value {
    #[derive(Default)]
    struct Series {
        x: Vec<f64>,
        y: Vec<f64>,
        size: Vec<f64>,
    }

    // A point needs all three values.
    let mut by_quality: BTreeMap<&str, Series> = BTreeMap::new();
    let mut max_size: f64 = 0.0;
    for r in data.records() {
        let (Some(x), Some(y), Some(size)) = (r.screen_time_hours, r.stress_level, r.sleep_hours)
        else {
            continue;
        };
        let s = by_quality
            .entry(r.sleep_quality.unwrap_or(UNDEFINED_LABEL))
            .or_default();
        s.x.push(x);
        s.y.push(y);
        s.size.push(size);
        max_size = max_size.max(size);
    }
    let sizeref = if max_size > 0.0 {
        2.0 * max_size / (MAX_MARKER_SIZE * MAX_MARKER_SIZE)
    } else {
        1.0
    };

    let traces: Vec<Value> = by_quality
        .into_iter()
        .map(|(label, s)| {
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": label,
                "x": s.x,
                "y": s.y,
                "marker": {
                    "size": s.size,
                    "sizemode": "area",
                    "sizeref": sizeref,
                    "sizemin": 0,
                },
                "hovertemplate": "Screen Time: %{x:.2f} hrs<br>Stress Level: %{y:.2f}<br>Sleep Hours: %{marker.size:.2f}<extra></extra>",
            })
        })
        .collect();
    json!({
        "data": traces,
        "layout": {
            "title": {"text": "Screen Time vs Stress Level"},
            "xaxis": {"title": {"text": "screen_time_hours"}},
            "yaxis": {"title": {"text": "stress_level_0_10"}},
            "legend": {"title": {"text": "sleep_quality_1_5"}},
        }
    })
}

/// The four chart panels in page order: box, scatter, then the two bars.
pub fn chart_panels(data: &Dataset) -> Vec<ChartPanel> {
    vec![
        ChartPanel {
            id: "chart-sleep-quality-box",
            figure: box_figure(data),
            insight: "People with <strong>better sleep quality</strong> spend <strong>less time on screens</strong>.<br>\
                      Heavy screen users often report <strong>poor sleep</strong>.",
        },
        ChartPanel {
            id: "chart-screen-stress-scatter",
            figure: scatter_figure(data),
            insight: "Higher <strong>screen time</strong> is clearly linked to <strong>higher stress levels</strong>.<br>\
                      Users with <strong>excellent sleep</strong> tend to report <strong>lower stress</strong>.",
        },
        ChartPanel {
            id: "chart-sleep-by-occupation",
            figure: bar_figure(
                "Average Sleeping Hours by Occupation",
                "occupation",
                &sleep_by_occupation(data),
            ),
            insight: "People across all occupations sleep roughly <strong>7 hours on average</strong>.<br>\
                      <strong>Unemployed and retired</strong> individuals tend to sleep slightly more than others.",
        },
        ChartPanel {
            id: "chart-sleep-by-work-mode",
            figure: bar_figure(
                "Average Sleeping Hours by Work Mode",
                "work_mode",
                &sleep_by_work_mode(data),
            ),
            insight: "Sleep time is almost the same for all work modes.<br>\
                      <strong>In-person workers</strong> sleep a little more, while <strong>remote workers</strong> sleep slightly less.",
        },
    ]
}

fn inline_css() -> &'static str {
    r#"
        * { box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; margin: 0; background: #f7f9fc; color: #1f2937; }
        .container { max-width: 1400px; margin: 0 auto; padding: 2rem; }
        h1 { margin-bottom: 0.25rem; }
        hr { border: none; border-top: 1px solid #d8dee9; margin: 1.5rem 0; }
        .kpis { display: grid; grid-template-columns: repeat(5, 1fr); gap: 1rem; }
        .kpi { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
        .kpi-label { font-size: 0.85rem; color: #6b7280; }
        .kpi-value { font-size: 1.8rem; font-weight: 600; margin-top: 0.25rem; }
        .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
        .panel { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
        .chart { width: 100%; height: 420px; }
        .insight { margin-top: 0.5rem; line-height: 1.5; }
        footer { color: #6b7280; font-size: 0.8rem; margin-top: 2rem; }
        @media (max-width: 900px) { .kpis, .charts { grid-template-columns: 1fr; } }
    "#
}

fn render_kpis(snapshot: &AggregateSnapshot) -> String {
    let tiles: String = kpi_tiles(snapshot)
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="kpi"><div class="kpi-label">{label}</div><div class="kpi-value">{value}</div></div>"#
            )
        })
        .collect();
    format!(r#"<section class="kpis">{tiles}</section>"#)
}

fn render_panels(panels: &[ChartPanel]) -> String {
    let cells: String = panels
        .iter()
        .map(|p| {
            format!(
                r#"<div class="panel"><div id="{id}" class="chart"></div><p class="insight"><strong>Insight:</strong><br>{insight}</p></div>"#,
                id = p.id,
                insight = p.insight,
            )
        })
        .collect();
    format!(r#"<section class="charts">{cells}</section>"#)
}

fn render_scripts(panels: &[ChartPanel]) -> String {
    panels
        .iter()
        .map(|p| {
            format!(
                "(function() {{ var fig = {fig}; Plotly.newPlot('{id}', fig.data, fig.layout, {{responsive: true}}); }})();\n",
                fig = p.figure,
                id = p.id,
            )
        })
        .collect()
}

fn render_summary() -> &'static str {
    r#"<section class="summary">
        <h2>📊 Overall Report Summary</h2>
        <h3>Key Observations:</h3>
        <ul>
            <li>Most people get around <strong>7 hours of sleep</strong>, which is healthy.</li>
            <li><strong>Job type</strong> and <strong>work mode</strong> only make a small difference in sleep time.</li>
            <li>There's a <strong>negative link</strong> between <strong>screen time and sleep quality</strong>: more screen time usually means poorer sleep.</li>
            <li><strong>Stress levels</strong> go up when <strong>screen time</strong> increases. Good sleep and balanced screen use can help reduce stress.</li>
        </ul>
        <h3>Lifestyle Tips:</h3>
        <ul>
            <li>Try to use screens less, especially before sleeping, to sleep better.</li>
            <li>Take small breaks from screens to reduce stress and eye tiredness.</li>
            <li>Remote or hybrid workers should keep a regular sleep routine.</li>
            <li>Add offline activities or exercise to keep life balanced.</li>
        </ul>
        <hr>
        <p><strong>Final Note:</strong><br>
        A good balance between <strong>screen time, sleep, and stress control</strong> helps improve your overall health and daily life.</p>
    </section>"#
}

pub fn render_dashboard(
    data: &Dataset,
    snapshot: &AggregateSnapshot,
    generated_at: DateTime<Local>,
) -> String {
    let panels = chart_panels(data);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{plotly}"></script>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <p>Analyze how <strong>screen time</strong>, <strong>sleep</strong>, and <strong>stress</strong> are connected in daily life.</p>
        <hr>
        {kpis}
        <hr>
        {panels}
        <hr>
        {summary}
        <footer>{respondents} respondents. Generated {generated}.</footer>
    </div>
    <script>
{scripts}    </script>
</body>
</html>"#,
        title = PAGE_TITLE,
        plotly = PLOTLY_CDN,
        css = inline_css(),
        kpis = render_kpis(snapshot),
        panels = render_panels(&panels),
        summary = render_summary(),
        respondents = data.len(),
        generated = generated_at.format("%Y-%m-%d %H:%M"),
        scripts = render_scripts(&panels),
    )
}

pub fn write_dashboard(
    path: &Path,
    data: &Dataset,
    snapshot: &AggregateSnapshot,
) -> Result<(), ReportError> {
    let html = render_dashboard(data, snapshot, Local::now());
    write_text(path, &html)?;
    info!("Dashboard written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::compute_snapshot;
    use crate::types::Record;

    fn sample() -> Dataset {
        let mk = |occupation, work_mode, quality, screen: f64, sleep: f64, stress: f64| Record {
            gender: Some("Male"),
            occupation,
            work_mode,
            sleep_quality: quality,
            screen_time_hours: Some(screen),
            sleep_hours: Some(sleep),
            stress_level: Some(stress),
            work_screen_hours: Some(screen / 2.0),
            leisure_screen_hours: Some(screen / 2.0),
        };
        Dataset::new(vec![
            mk(Some("Employed"), Some("Remote"), Some("Good"), 6.0, 7.0, 4.0),
            mk(Some("Student"), Some("Hybrid"), Some("Poor"), 9.5, 6.25, 7.5),
            mk(Some("Retired"), Some("In-person"), Some("Excellent"), 3.0, 8.0, 2.0),
            mk(None, Some("Remote"), None, 5.0, 7.5, 5.0),
        ])
    }

    #[test]
    fn page_has_title_kpis_charts_and_summary() {
        let data = sample();
        let snapshot = compute_snapshot(&data);
        let html = render_dashboard(&data, &snapshot, Local::now());

        assert!(html.contains("<h1>Lifestyle & Screen Time Dashboard</h1>"));
        for (label, value) in kpi_tiles(&snapshot) {
            assert!(html.contains(label), "missing KPI {label}");
            assert!(html.contains(&value), "missing KPI value {value}");
        }
        for id in [
            "chart-sleep-quality-box",
            "chart-screen-stress-scatter",
            "chart-sleep-by-occupation",
            "chart-sleep-by-work-mode",
        ] {
            assert!(html.contains(&format!(r#"<div id="{id}""#)));
            assert!(html.contains(&format!("Plotly.newPlot('{id}'")));
        }
        assert!(html.contains("Overall Report Summary"));
        assert!(html.contains("Final Note:"));
        assert_eq!(html.matches("<strong>Insight:</strong>").count(), 4);
    }

    #[test]
    fn kpi_values_use_two_decimals() {
        let data = sample();
        let snapshot = compute_snapshot(&data);
        let tiles = kpi_tiles(&snapshot);
        // (6 + 9.5 + 3 + 5) / 4 = 5.875, ties to even at 2 dp.
        assert_eq!(tiles[4].1, "5.88 hrs");
        // (3 + 2 + 4) / 3
        assert_eq!(tiles[2].1, "3.00");
        assert_eq!(tiles[3].1, "4.62");
    }

    #[test]
    fn bar_traces_carry_formatted_text() {
        let data = sample();
        let panels = chart_panels(&data);
        let work_mode = &panels[3].figure["data"];
        let names: Vec<&str> = work_mode
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Hybrid", "In-person", "Remote"]);
        assert_eq!(work_mode[2]["text"][0], "7.25");
        assert!(work_mode[0]["hovertemplate"]
            .as_str()
            .unwrap()
            .contains("%{y:.2f}"));
    }

    #[test]
    fn undefined_labels_show_up_as_their_own_series() {
        let data = sample();
        let panels = chart_panels(&data);
        let occupations: Vec<&str> = panels[2].figure["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(occupations.contains(&"Undefined"));

        let scatter = panels[1].figure["data"].as_array().unwrap();
        assert_eq!(scatter.len(), 4);
        let sizeref = scatter[0]["marker"]["sizeref"].as_f64().unwrap();
        assert_eq!(sizeref, 2.0 * 8.0 / 400.0);
    }
}
