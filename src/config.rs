#[cfg(test)]
use std::path::Path;
use std::path::PathBuf;

/// Where TrueType faces for the KPI cards are looked up, in order.
#[derive(Debug, Clone)]
pub struct FontConfig {
    pub regular: Vec<PathBuf>,
    pub bold: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: vec![
                PathBuf::from("arial.ttf"),
                PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"),
                PathBuf::from("/Library/Fonts/Arial.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/msttcorefonts/Arial.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            ],
            bold: vec![
                PathBuf::from("arialbd.ttf"),
                PathBuf::from("C:\\Windows\\Fonts\\arialbd.ttf"),
                PathBuf::from("/Library/Fonts/Arial Bold.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/msttcorefonts/Arial_Bold.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            ],
        }
    }
}

#[cfg(test)]
impl FontConfig {
    /// No TrueType candidates: always renders with the built-in bitmap font.
    pub fn builtin_only() -> Self {
        Self {
            regular: Vec::new(),
            bold: Vec::new(),
        }
    }
}

/// Fixed input and output locations for one run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_path: PathBuf,
    pub chart_dir: PathBuf,
    pub workbook_path: PathBuf,
    pub dashboard_path: PathBuf,
    pub summary_path: PathBuf,
    pub fonts: FontConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            chart_dir: PathBuf::from("tmp_charts"),
            workbook_path: PathBuf::from("new_Dashboard.xlsx"),
            dashboard_path: PathBuf::from("dashboard.html"),
            summary_path: PathBuf::from("summary.json"),
            fonts: FontConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Put every output under `dir`, keeping the default file names.
    #[cfg(test)]
    pub fn with_output_dir(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            chart_dir: dir.join(&defaults.chart_dir),
            workbook_path: dir.join(&defaults.workbook_path),
            dashboard_path: dir.join(&defaults.dashboard_path),
            summary_path: dir.join(&defaults.summary_path),
            ..defaults
        }
    }

    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.chart_dir.join(file_name)
    }
}
