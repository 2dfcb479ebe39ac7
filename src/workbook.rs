// Spreadsheet assembly for the static report.
//
// Placement is computed first as a plain `WorkbookLayout` so the fixed
// anchors can be checked without touching the filesystem; `assemble_workbook`
// then writes it out with `rust_xlsxwriter`.
use crate::error::ReportError;
use log::{debug, info};
use rust_xlsxwriter::utility::row_col_to_cell;
use rust_xlsxwriter::{Format, FormatAlign, Image, Workbook};
use std::path::{Path, PathBuf};

pub const SHEET_NAME: &str = "Lifestyle Dashboard";
pub const TITLE: &str = "Lifestyle & Screen Time Premium Dashboard";
pub const INSIGHTS_HEADING: &str = "📊 Key Insights:";
pub const INSIGHTS_TEXT: &str = "- Most people sleep ~7 hours/day.\n\
- Higher screen time leads to lower sleep quality.\n\
- Stress increases with screen exposure.\n\
- Work mode & job type have limited effect on sleep.\n\
- Healthy digital habits improve lifestyle balance.";

const BRAND_COLOR: u32 = 0x1F4E79;

/// Zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
}

impl Cell {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// A1-style name, e.g. `F60`.
    pub fn a1(&self) -> String {
        row_col_to_cell(self.row, self.col)
    }
}

/// A1:J2
pub const TITLE_RANGE: (Cell, Cell) = (Cell::new(0, 0), Cell::new(1, 9));
/// KPI cards go down column A starting at A3, ten rows apart.
pub const KPI_FIRST_ROW: u32 = 2;
pub const KPI_ROW_STEP: u32 = 10;
/// A60, F60, A95, F95
pub const CHART_ANCHORS: [Cell; 4] = [
    Cell::new(59, 0),
    Cell::new(59, 5),
    Cell::new(94, 0),
    Cell::new(94, 5),
];
/// A130
pub const INSIGHTS_HEADING_CELL: Cell = Cell::new(129, 0);
/// A131
pub const INSIGHTS_TEXT_CELL: Cell = Cell::new(130, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub anchor: Cell,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookLayout {
    pub sheet_name: &'static str,
    pub title: &'static str,
    pub title_range: (Cell, Cell),
    pub images: Vec<ImagePlacement>,
    pub insights_heading: Cell,
    pub insights_text: Cell,
}

pub fn plan_workbook(kpi_paths: &[PathBuf], chart_paths: &[PathBuf]) -> WorkbookLayout {
    let kpis = kpi_paths.iter().enumerate().map(|(i, path)| ImagePlacement {
        anchor: Cell::new(KPI_FIRST_ROW + i as u32 * KPI_ROW_STEP, 0),
        path: path.clone(),
    });
    // Extra charts beyond the four fixed anchors are dropped.
    let charts = CHART_ANCHORS
        .iter()
        .zip(chart_paths)
        .map(|(anchor, path)| ImagePlacement {
            anchor: *anchor,
            path: path.clone(),
        });

    WorkbookLayout {
        sheet_name: SHEET_NAME,
        title: TITLE,
        title_range: TITLE_RANGE,
        images: kpis.chain(charts).collect(),
        insights_heading: INSIGHTS_HEADING_CELL,
        insights_text: INSIGHTS_TEXT_CELL,
    }
}

pub fn assemble_workbook(layout: &WorkbookLayout, out_path: &Path) -> Result<(), ReportError> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(22)
        .set_font_color(BRAND_COLOR)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let heading_format = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(BRAND_COLOR);
    let wrap_format = Format::new().set_text_wrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(layout.sheet_name)?;

    let (first, last) = layout.title_range;
    sheet.merge_range(
        first.row,
        first.col,
        last.row,
        last.col,
        layout.title,
        &title_format,
    )?;

    for placement in &layout.images {
        let image = Image::new(&placement.path)?;
        sheet.insert_image(placement.anchor.row, placement.anchor.col, &image)?;
        debug!(
            "Placed {} at {}",
            placement.path.display(),
            placement.anchor.a1()
        );
    }

    sheet.write_string_with_format(
        layout.insights_heading.row,
        layout.insights_heading.col,
        INSIGHTS_HEADING,
        &heading_format,
    )?;
    sheet.write_string_with_format(
        layout.insights_text.row,
        layout.insights_text.col,
        INSIGHTS_TEXT,
        &wrap_format,
    )?;

    workbook.save(out_path)?;
    info!(
        "Workbook with {} images written to {}",
        layout.images.len(),
        out_path.display()
    );
    Ok(())
}
