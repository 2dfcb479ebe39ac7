// Entry point and menu flow.
//
// - Option [1] loads data.csv, maps the coded columns to labels and computes
//   the headline aggregates.
// - Option [2] writes the interactive dashboard page.
// - Option [3] renders the KPI cards and charts and assembles the workbook.
// After a report is generated the user can go back to the menu or exit.
mod charts;
mod config;
mod dashboard;
mod error;
mod kpi_card;
mod loader;
mod output;
mod pipeline;
mod reports;
mod types;
mod util;
mod workbook;

use config::ReportConfig;
use error::ReportError;
use kpi_card::FontTier;
use log::error;
use pipeline::Prepared;
use std::io::{self, Write};

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// Returns `None` once stdin is closed.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        // EOF counts as "no" so piped input cannot spin forever.
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: load and prepare the dataset, then preview the aggregates.
fn handle_load(config: &ReportConfig) -> Result<Prepared, ReportError> {
    let prepared = pipeline::prepare(config)?;
    println!(
        "Processing dataset... ({} respondents loaded)",
        util::format_int(prepared.load_report.total_rows)
    );
    if prepared.load_report.undefined_labels > 0 {
        println!(
            "Note: {} coded values had no label and are shown as \"{}\".",
            util::format_int(prepared.load_report.undefined_labels),
            types::UNDEFINED_LABEL
        );
    }
    if prepared.load_report.blank_numbers > 0 {
        println!(
            "Note: {} numeric values were blank and are left out of the averages.",
            util::format_int(prepared.load_report.blank_numbers)
        );
    }
    println!();
    output::preview_table_rows(&prepared.snapshot.preview_rows(), 6);
    Ok(prepared)
}

/// Option [2]: the interactive dashboard page.
fn handle_interactive(prepared: &Prepared, config: &ReportConfig) -> Result<(), ReportError> {
    println!("Generating interactive dashboard...\n");
    let path = pipeline::run_interactive(prepared, config)?;

    println!("Average Sleeping Hours by Occupation\n");
    output::preview_table_rows(&reports::sleep_by_occupation(&prepared.dataset), 10);
    println!("Average Sleeping Hours by Work Mode\n");
    output::preview_table_rows(&reports::sleep_by_work_mode(&prepared.dataset), 10);
    println!("(Open {} in a browser to explore the charts)\n", path.display());
    Ok(())
}

/// Option [3]: KPI cards, charts and the workbook, plus summary.json.
fn handle_static(prepared: &Prepared, config: &ReportConfig) -> Result<(), ReportError> {
    println!("Generating static report...\n");
    let outputs = pipeline::run_static(prepared, config)?;
    if outputs.font_tier == FontTier::Fallback {
        println!("Note: preferred fonts not found, KPI cards use the built-in font.");
    }
    println!(
        "{} KPI cards and {} charts saved to {}",
        outputs.kpi_images.len(),
        outputs.chart_images.len(),
        config.chart_dir.display()
    );
    println!("Workbook saved as {}\n", outputs.workbook.display());

    pipeline::write_summary(prepared, config)?;
    println!("Summary Stats ({}):", config.summary_path.display());
    println!(
        "{{\"avg_total_screen\": {:.2}, \"avg_stress\": {:.2}}}\n",
        prepared.snapshot.avg_total_screen, prepared.snapshot.avg_stress
    );
    Ok(())
}

fn run(config: &ReportConfig) -> Result<(), ReportError> {
    let mut prepared: Option<Prepared> = None;
    loop {
        println!("Lifestyle & Screen Time Report");
        println!("[1] Load the file");
        println!("[2] Generate Interactive Dashboard");
        println!("[3] Generate Static Report\n");
        let Some(choice) = read_choice() else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                prepared = Some(handle_load(config)?);
            }
            "2" | "3" => {
                println!();
                let Some(data) = prepared.as_ref() else {
                    println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                    continue;
                };
                if choice == "2" {
                    handle_interactive(data, config)?;
                } else {
                    handle_static(data, config)?;
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    return Ok(());
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = ReportConfig::default();
    if let Err(e) = run(&config) {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}
