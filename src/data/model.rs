use std::fmt;
use std::path::{Path, PathBuf};

/// Header prefix of a constant-per-file metadata column.
pub const PARAM_PREFIX: &str = "PARAM:";
/// Header prefix of a plottable dependent variable.
pub const MEASURE_PREFIX: &str = "MEASURE:";

// ---------------------------------------------------------------------------
// Cell – a single value of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, guessed from the text of the source file.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq: floats compare by total order, so `nan` equals `nan` --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.total_cmp(b).is_eq(),
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Null, Cell::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            // Whole floats keep their decimal point so `10.0` does not read as an integer.
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Null => write!(f, "nan"),
        }
    }
}

impl Cell {
    /// Guess the type of a raw field.
    pub fn parse(s: &str) -> Cell {
        if s.is_empty() {
            return Cell::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Cell::Float(f);
        }
        match s {
            "true" | "True" => Cell::Bool(true),
            "false" | "False" => Cell::Bool(false),
            _ => Cell::Text(s.to_string()),
        }
    }

    /// Numeric view of the cell, used for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Empty or not-a-number; never plotted.
    pub fn is_gap(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(v) => !v.is_finite(),
            _ => false,
        }
    }

    /// Whether the cell may appear in a plotted column.
    pub fn is_plottable(&self) -> bool {
        matches!(self, Cell::Float(_) | Cell::Integer(_) | Cell::Null)
    }
}

// ---------------------------------------------------------------------------
// XAxis – how independent values map to x positions
// ---------------------------------------------------------------------------

/// Mapping from independent-column cells to x coordinates, shared by every
/// table of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// Every independent cell is numeric or empty; values are plotted as is.
    Numeric,
    /// At least one independent cell is text. Each distinct value gets the
    /// position of its first appearance across the tables: `0, 1, 2, ...`.
    Categorical(Vec<String>),
}

impl XAxis {
    pub fn for_tables(tables: &[Table]) -> XAxis {
        let numeric = tables
            .iter()
            .all(|t| t.independent().cells.iter().all(Cell::is_plottable));
        if numeric {
            return XAxis::Numeric;
        }

        let mut categories: Vec<String> = Vec::new();
        for cell in tables.iter().flat_map(|t| &t.independent().cells) {
            if cell.is_gap() {
                continue;
            }
            let label = cell.to_string();
            if !categories.contains(&label) {
                categories.push(label);
            }
        }
        XAxis::Categorical(categories)
    }

    /// x coordinate of a cell, `None` for gaps.
    pub fn position(&self, cell: &Cell) -> Option<f64> {
        match self {
            XAxis::Numeric => cell.as_f64(),
            XAxis::Categorical(_) if cell.is_gap() => None,
            XAxis::Categorical(categories) => {
                let label = cell.to_string();
                categories
                    .iter()
                    .position(|c| *c == label)
                    .map(|i| i as f64)
            }
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            XAxis::Numeric => None,
            XAxis::Categorical(categories) => Some(categories),
        }
    }
}

// ---------------------------------------------------------------------------
// Column roles and header prefixes
// ---------------------------------------------------------------------------

/// Role of a column, derived from its position and header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// The first column; always the x-axis.
    Independent,
    Parameter,
    Measure,
    /// Any later column without a known prefix. Ignored by the report.
    Unclassified,
}

impl ColumnRole {
    /// Classify a header that is not in the first position.
    pub fn of_header(name: &str) -> ColumnRole {
        if name.starts_with(PARAM_PREFIX) {
            ColumnRole::Parameter
        } else if name.starts_with(MEASURE_PREFIX) {
            ColumnRole::Measure
        } else {
            ColumnRole::Unclassified
        }
    }

    pub fn prefix(self) -> Option<&'static str> {
        match self {
            ColumnRole::Parameter => Some(PARAM_PREFIX),
            ColumnRole::Measure => Some(MEASURE_PREFIX),
            ColumnRole::Independent | ColumnRole::Unclassified => None,
        }
    }
}

/// Header text without its `PARAM:` / `MEASURE:` prefix, for display.
pub fn strip_role_prefix(name: &str) -> &str {
    name.strip_prefix(PARAM_PREFIX)
        .or_else(|| name.strip_prefix(MEASURE_PREFIX))
        .unwrap_or(name)
}

/// Inverse of [`strip_role_prefix`] for a known role.
pub fn with_role_prefix(role: ColumnRole, label: &str) -> String {
    match role.prefix() {
        Some(prefix) => format!("{prefix}{label}"),
        None => label.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named column of a table.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    /// Display label (prefix stripped).
    pub fn label(&self) -> &str {
        strip_role_prefix(&self.name)
    }

    /// Whether every cell equals the first one.
    pub fn is_constant(&self) -> bool {
        match self.cells.split_first() {
            Some((first, rest)) => rest.iter().all(|c| c == first),
            None => true,
        }
    }
}

/// A table parsed from one source file, columns in file order.
///
/// The loader guarantees at least two columns, at least one measure column
/// and at least one data row, with every column the same length.
#[derive(Debug, Clone)]
pub struct Table {
    pub source: PathBuf,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn role_of(&self, index: usize) -> ColumnRole {
        if index == 0 {
            ColumnRole::Independent
        } else {
            ColumnRole::of_header(&self.columns[index].name)
        }
    }

    /// The x-axis column.
    pub fn independent(&self) -> &Column {
        &self.columns[0]
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all `MEASURE:` columns in file order.
    pub fn measure_columns(&self) -> Vec<&str> {
        self.names_with_prefix(MEASURE_PREFIX)
    }

    /// Names of all `PARAM:` columns in file order, including the first
    /// column when it carries the prefix.
    pub fn param_columns(&self) -> Vec<&str> {
        self.names_with_prefix(PARAM_PREFIX)
    }

    fn names_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| name.starts_with(prefix))
            .collect()
    }

    /// Parameter columns shown in the description table: every `PARAM:`
    /// column except the independent one.
    pub fn described_params(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != 0 && c.name.starts_with(PARAM_PREFIX))
            .map(|(_, c)| c)
    }

    /// `(x, y)` pairs of a measure column, x placed by `axis`. Rows where
    /// either side is empty or not finite are skipped.
    pub fn series(&self, measure: &str, axis: &XAxis) -> Vec<(f64, f64)> {
        let Some(column) = self.column(measure) else {
            return Vec::new();
        };
        self.independent()
            .cells
            .iter()
            .zip(&column.cells)
            .filter_map(|(x, y)| Some((axis.position(x)?, y.as_f64()?)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }
}
