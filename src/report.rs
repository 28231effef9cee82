//! Report building: validate the inputs, lay out the pages, render them into
//! a [`PageSink`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::color::SeriesColors;
use crate::config::{ParamPolicy, ReportConfig};
use crate::data::loader::load_table;
use crate::data::model::{strip_role_prefix, Table, XAxis};
use crate::document::{HtmlDocument, PageSink};
use crate::error::{ReportError, Result};
use crate::layout::ReportPlan;
use crate::naming::{display_name, output_path, report_title};
use crate::render::{
    render_chart_page, render_description_page, ChartPage, ChartPanel, ChartSeries,
    DescriptionTable, LegendEntry,
};
use crate::style::StyleCycle;

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Written document, `None` when rendering into a caller's sink.
    pub output: Option<PathBuf>,
    pub files: usize,
    pub measures: usize,
    pub chart_pages: usize,
    pub description_pages: usize,
}

/// Configuration captured once for a report build.
#[derive(Debug, Clone)]
pub struct ReportContext {
    config: ReportConfig,
    styles: StyleCycle,
}

impl ReportContext {
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        let styles = StyleCycle::parse(&config.line_styles, config.style_overflow)?;
        Ok(Self { config, styles })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Load every input in order. The first failure aborts.
    pub fn load_inputs<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Table>> {
        paths
            .iter()
            .map(|p| load_table(p.as_ref(), self.config.delimiter_byte()))
            .collect()
    }

    /// Check that the tables can share one report: identical measure sets,
    /// enough styles under the overflow policy, constant parameters under
    /// the parameter policy.
    pub fn validate(&self, tables: &[Table]) -> Result<()> {
        let Some(first) = tables.first() else {
            return Ok(());
        };
        let expected: BTreeSet<&str> = first.measure_columns().into_iter().collect();
        for table in &tables[1..] {
            let found: BTreeSet<&str> = table.measure_columns().into_iter().collect();
            if found != expected {
                return Err(ReportError::HeterogeneousMeasureSet {
                    path: table.source.clone(),
                    expected: to_strings(first.measure_columns()),
                    found: to_strings(table.measure_columns()),
                });
            }
        }

        self.styles.check(tables.len())?;

        for table in tables {
            for column in table.described_params().filter(|c| !c.is_constant()) {
                match self.config.param_policy {
                    ParamPolicy::FirstRow => warn!(
                        "{}: parameter '{}' varies, describing it by its first value",
                        table.source.display(),
                        column.name
                    ),
                    ParamPolicy::RequireConstant => {
                        return Err(ReportError::VaryingParameter {
                            path: table.source.clone(),
                            column: column.name.clone(),
                        })
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate `tables` and render the report named `name` into `sink`.
    /// Nothing reaches the sink if validation fails.
    pub fn compose<S: PageSink>(
        &self,
        name: &str,
        tables: &[Table],
        sink: &mut S,
    ) -> Result<ReportSummary> {
        self.validate(tables)?;
        self.emit(name, tables, sink)
    }

    /// Load `paths`, validate them, and write
    /// `<output_dir>/OVERVIEW_<name>.<ext>`.
    pub fn write_report<P: AsRef<Path>>(
        &self,
        paths: &[P],
        output_dir: &Path,
        name: &str,
    ) -> Result<ReportSummary> {
        info!("building report '{}' from {} files", name, paths.len());
        let tables = self.load_inputs(paths)?;
        self.validate(&tables)?;

        fs::create_dir_all(output_dir)?;
        let path = output_path(output_dir, name, &self.config.output_extension);
        let mut document = HtmlDocument::create(&path, &report_title(name))?;
        let mut summary = self.emit(name, &tables, &mut document)?;
        summary.output = Some(path);
        info!(
            "wrote {} ({} chart pages, {} description pages)",
            document.path().display(),
            summary.chart_pages,
            summary.description_pages
        );
        Ok(summary)
    }

    fn emit<S: PageSink>(&self, name: &str, tables: &[Table], sink: &mut S) -> Result<ReportSummary> {
        let measures: Vec<&str> = tables
            .first()
            .map(|t| t.measure_columns())
            .unwrap_or_default();
        let plan = ReportPlan::new(&self.config, measures.len(), tables.len());
        let title = report_title(name);
        let names: Vec<String> = tables.iter().map(|t| display_name(t.source())).collect();
        let colors = SeriesColors::new(tables.len(), self.config.gray_scale);

        let legend: Vec<LegendEntry<'_>> = names
            .iter()
            .enumerate()
            .map(|(i, label)| LegendEntry {
                label,
                style: self.styles.style_for(i),
                color: colors.color_for(i),
            })
            .collect();
        let x_label = tables.first().map_or("", |t| t.independent().label());
        let x_axis = XAxis::for_tables(tables);
        if let Some(categories) = x_axis.categories() {
            debug!("x axis is categorical with {} values", categories.len());
        }

        for (page_no, page_plan) in plan.chart_pages.iter().enumerate() {
            let panels = page_plan
                .slots
                .iter()
                .map(|slot| {
                    let measure = measures[slot.measure];
                    ChartPanel {
                        row: slot.row,
                        col: slot.col,
                        x_label,
                        y_label: strip_role_prefix(measure),
                        x_categories: x_axis.categories(),
                        series: tables
                            .iter()
                            .enumerate()
                            .map(|(i, table)| ChartSeries {
                                points: table.series(measure, &x_axis),
                                style: self.styles.style_for(i),
                                color: colors.color_for(i),
                            })
                            .collect(),
                    }
                })
                .collect();
            let page = ChartPage {
                title: &title,
                panels,
                legend: legend.clone(),
            };
            sink.push_page(render_chart_page(&page, &self.config)?)?;
            debug!(
                "chart page {} with {} plots",
                page_no + 1,
                page_plan.slots.len()
            );
        }

        for (page_no, page_plan) in plan.description_pages.iter().enumerate() {
            let descriptions: Vec<DescriptionTable> = page_plan
                .files
                .iter()
                .map(|&i| describe(&names[i], &tables[i]))
                .collect();
            sink.push_page(render_description_page(&descriptions, &self.config)?)?;
            debug!(
                "description page {} with {} tables",
                page_no + 1,
                descriptions.len()
            );
        }

        sink.finish()?;
        Ok(ReportSummary {
            output: None,
            files: tables.len(),
            measures: measures.len(),
            chart_pages: plan.chart_pages.len(),
            description_pages: plan.description_pages.len(),
        })
    }
}

/// Description table of one file. Each parameter is represented by its
/// first data row.
pub fn describe(name: &str, table: &Table) -> DescriptionTable {
    let entries = table
        .described_params()
        .filter_map(|column| {
            let value = column.cells.first()?;
            Some(format!("{}={}", column.label(), value))
        })
        .collect();
    DescriptionTable {
        name: name.to_string(),
        entries,
    }
}

fn to_strings(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_table;
    use crate::document::{MemorySink, PageKind};
    use crate::style::StyleOverflow;

    fn table(name: &str, text: &str) -> Table {
        read_table(text.as_bytes(), Path::new(name), b',').unwrap()
    }

    #[test]
    fn test_describe_uses_first_row() {
        let t = table(
            "runs/forest.csv",
            "PARAM:numTrees,PARAM:depth,PARAM:criterion,MEASURE:acc\n1,3,gini,0.5\n2,4,gini,0.6\n",
        );
        let d = describe("forest", &t);
        assert_eq!(d.name, "forest");
        assert_eq!(d.entries, vec!["depth=3", "criterion=gini"]);
    }

    #[test]
    fn test_heterogeneous_measures_emit_nothing() {
        let ctx = ReportContext::new(ReportConfig::default()).unwrap();
        let tables = vec![
            table("a.csv", "x,MEASURE:acc,MEASURE:time\n1,0.5,3\n"),
            table("b.csv", "x,MEASURE:acc\n1,0.5\n"),
        ];
        let mut sink = MemorySink::new();
        let err = ctx.compose("t", &tables, &mut sink).unwrap_err();
        match err {
            ReportError::HeterogeneousMeasureSet { path, found, .. } => {
                assert_eq!(path, PathBuf::from("b.csv"));
                assert_eq!(found, vec!["MEASURE:acc"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(sink.pages.is_empty());
        assert!(!sink.finished);
    }

    #[test]
    fn test_measure_order_may_differ() {
        let ctx = ReportContext::new(ReportConfig::default()).unwrap();
        let tables = vec![
            table("a.csv", "x,MEASURE:acc,MEASURE:time\n1,0.5,3\n"),
            table("b.csv", "x,MEASURE:time,MEASURE:acc\n1,3,0.5\n"),
        ];
        assert!(ctx.validate(&tables).is_ok());
    }

    #[test]
    fn test_style_overflow_policies() {
        let tables: Vec<Table> = (0..3)
            .map(|i| table(&format!("{i}.csv"), "x,MEASURE:acc\n1,0.5\n"))
            .collect();
        let base = ReportConfig {
            line_styles: vec!["-s".into(), "-o".into()],
            ..ReportConfig::default()
        };

        let wrap = ReportContext::new(base.clone()).unwrap();
        let mut sink = MemorySink::new();
        assert!(wrap.compose("t", &tables, &mut sink).is_ok());

        let strict = ReportContext::new(ReportConfig {
            style_overflow: StyleOverflow::Error,
            ..base
        })
        .unwrap();
        let mut sink = MemorySink::new();
        assert!(matches!(
            strict.compose("t", &tables, &mut sink),
            Err(ReportError::InsufficientStyles { files: 3, styles: 2 })
        ));
        assert!(sink.pages.is_empty());
    }

    #[test]
    fn test_param_policies() {
        let tables = vec![table("a.csv", "x,PARAM:depth,MEASURE:acc\n1,3,0.5\n2,4,0.6\n")];

        let lenient = ReportContext::new(ReportConfig::default()).unwrap();
        assert!(lenient.validate(&tables).is_ok());

        let strict = ReportContext::new(ReportConfig {
            param_policy: ParamPolicy::RequireConstant,
            ..ReportConfig::default()
        })
        .unwrap();
        match strict.validate(&tables) {
            Err(ReportError::VaryingParameter { column, .. }) => assert_eq!(column, "PARAM:depth"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_all_nan_param_is_constant_under_strict_policy() {
        let tables = vec![table("n.csv", "x,PARAM:seed,MEASURE:acc\n1,nan,0.5\n2,nan,0.6\n")];
        let strict = ReportContext::new(ReportConfig {
            param_policy: ParamPolicy::RequireConstant,
            ..ReportConfig::default()
        })
        .unwrap();
        assert!(strict.validate(&tables).is_ok());
        assert_eq!(describe("n", &tables[0]).entries, vec!["seed=nan"]);
    }

    #[test]
    fn test_describe_writes_capitalized_booleans() {
        let t = table("b.csv", "x,PARAM:bootstrap,MEASURE:acc\n1,true,0.5\n");
        assert_eq!(describe("b", &t).entries, vec!["bootstrap=True"]);
    }

    #[test]
    fn test_independent_param_may_vary_under_strict_policy() {
        let tables = vec![table(
            "a.csv",
            "PARAM:numTrees,PARAM:depth,MEASURE:acc\n1,3,0.5\n2,3,0.6\n",
        )];
        let strict = ReportContext::new(ReportConfig {
            param_policy: ParamPolicy::RequireConstant,
            ..ReportConfig::default()
        })
        .unwrap();
        assert!(strict.validate(&tables).is_ok());
    }

    #[test]
    fn test_zero_files_emits_empty_document() {
        let ctx = ReportContext::new(ReportConfig::default()).unwrap();
        let mut sink = MemorySink::new();
        let summary = ctx.compose("t", &[], &mut sink).unwrap();
        assert_eq!(summary.chart_pages, 0);
        assert_eq!(summary.description_pages, 0);
        assert!(sink.pages.is_empty());
        assert!(sink.finished);
    }

    #[test]
    fn test_single_file_single_measure() {
        let ctx = ReportContext::new(ReportConfig::default()).unwrap();
        let tables = vec![table("only.csv", "x,PARAM:depth,MEASURE:acc\n1,3,0.5\n2,3,0.7\n")];
        let mut sink = MemorySink::new();
        let summary = ctx.compose("t", &tables, &mut sink).unwrap();
        assert_eq!(summary.chart_pages, 1);
        assert_eq!(summary.description_pages, 1);
        assert_eq!(sink.count(PageKind::Chart), 1);
        assert_eq!(sink.count(PageKind::Description), 1);
        assert_eq!(sink.pages[0].kind, PageKind::Chart);
        assert!(sink.pages[1].svg.contains("depth=3"));
    }
}
