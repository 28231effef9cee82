//! Pagination of a report, independent of rendering.

use crate::config::ReportConfig;

/// Where one measure goes in the chart section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotSlot {
    /// Index into the report's measure list.
    pub measure: usize,
    pub row: usize,
    pub col: usize,
}

/// One chart page: the plots it holds, in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPagePlan {
    pub slots: Vec<PlotSlot>,
}

/// One description page: the indices of the input files it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionPagePlan {
    pub files: Vec<usize>,
}

/// Page layout of a whole report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub chart_pages: Vec<ChartPagePlan>,
    pub description_pages: Vec<DescriptionPagePlan>,
}

impl ReportPlan {
    pub fn new(config: &ReportConfig, measures: usize, files: usize) -> Self {
        let cols = config.cols_per_page;
        let plots_per_page = config.plots_per_page();

        // No files means nothing to draw for any measure.
        let plotted = if files == 0 { 0 } else { measures };
        let chart_pages = (0..plotted)
            .collect::<Vec<_>>()
            .chunks(plots_per_page)
            .map(|chunk| ChartPagePlan {
                slots: chunk
                    .iter()
                    .map(|&measure| {
                        let position = measure % plots_per_page;
                        PlotSlot {
                            measure,
                            row: position / cols,
                            col: position % cols,
                        }
                    })
                    .collect(),
            })
            .collect();

        let description_pages = (0..files)
            .collect::<Vec<_>>()
            .chunks(config.descriptions_per_page)
            .map(|chunk| DescriptionPagePlan {
                files: chunk.to_vec(),
            })
            .collect();

        ReportPlan {
            chart_pages,
            description_pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.chart_pages.len() + self.description_pages.len()
    }
}
