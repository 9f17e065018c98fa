//! SVG chart report adapter implementing ReportPort.

pub mod chart_svg;

use crate::domain::error::CrossError;
use crate::ports::report_port::{ReportContext, ReportPort};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct SvgChartAdapter {
    output_path: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    /// `<SYMBOL>_golden_cross.svg` in the working directory.
    pub fn default_path(symbol: &str) -> PathBuf {
        PathBuf::from(format!("{}_golden_cross.svg", symbol))
    }
}

impl ReportPort for SvgChartAdapter {
    fn write(&self, ctx: &ReportContext<'_>) -> Result<(), CrossError> {
        let svg = chart_svg::render_chart(ctx);

        let path = self.output_path.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CrossError::Report {
                reason: format!("failed to create {}: {}", parent.display(), e),
            })?;
        }
        fs::write(path, svg).map_err(|e| CrossError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;

        info!(path = %path.display(), "chart written");
        Ok(())
    }
}
