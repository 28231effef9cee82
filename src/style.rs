use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Line style strings
// ---------------------------------------------------------------------------

/// How the segments between data points are stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    /// Markers only.
    None,
}

impl LineKind {
    /// Dash length and gap in pixels, `None` for solid or absent lines.
    pub fn dash_pattern(self) -> Option<(u32, u32)> {
        match self {
            LineKind::Dashed => Some((6, 4)),
            LineKind::DashDot => Some((8, 3)),
            LineKind::Dotted => Some((1, 3)),
            LineKind::Solid | LineKind::None => None,
        }
    }
}

/// Point marker glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Point,
    Circle,
    Square,
    Star,
    Pentagon,
    Octagon,
    Hexagon,
    Diamond,
    TriangleUp,
    TriangleDown,
    /// Three spokes pointing down (`1`).
    TriDown,
    Plus,
    Cross,
}

impl Marker {
    fn from_char(c: char) -> Option<Marker> {
        Some(match c {
            '.' => Marker::Point,
            'o' => Marker::Circle,
            's' => Marker::Square,
            '*' => Marker::Star,
            'p' => Marker::Pentagon,
            '8' => Marker::Octagon,
            'h' => Marker::Hexagon,
            'd' => Marker::Diamond,
            '^' => Marker::TriangleUp,
            'v' => Marker::TriangleDown,
            '1' => Marker::TriDown,
            '+' => Marker::Plus,
            'x' => Marker::Cross,
            _ => return None,
        })
    }
}

/// A parsed series style such as `-s` (solid line, square markers) or `:`
/// (dotted line, no markers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStyle {
    pub spec: String,
    pub line: LineKind,
    pub marker: Option<Marker>,
}

impl FromStr for LineStyle {
    type Err = ReportError;

    fn from_str(spec: &str) -> Result<Self> {
        let (line, rest) = if let Some(rest) = spec.strip_prefix("--") {
            (LineKind::Dashed, rest)
        } else if let Some(rest) = spec.strip_prefix("-.") {
            (LineKind::DashDot, rest)
        } else if let Some(rest) = spec.strip_prefix('-') {
            (LineKind::Solid, rest)
        } else if let Some(rest) = spec.strip_prefix(':') {
            (LineKind::Dotted, rest)
        } else {
            (LineKind::None, spec)
        };

        let mut chars = rest.chars();
        let marker = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) => {
                Some(Marker::from_char(c).ok_or_else(|| ReportError::InvalidLineStyle(spec.into()))?)
            }
            _ => return Err(ReportError::InvalidLineStyle(spec.into())),
        };

        if line == LineKind::None && marker.is_none() {
            return Err(ReportError::InvalidLineStyle(spec.into()));
        }

        Ok(LineStyle {
            spec: spec.to_string(),
            line,
            marker,
        })
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// Default style cycle.
pub fn default_line_styles() -> Vec<String> {
    [
        "-s", "-o", "-*", "-p", "-.", ":", "-1", "-8", "-s", "-x", "-h", "-+", "-d", "-v", "-*",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ---------------------------------------------------------------------------
// Style assignment
// ---------------------------------------------------------------------------

/// What to do when a report has more files than configured styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleOverflow {
    /// Reuse styles by `file_index % styles`; logs a warning.
    #[default]
    Wrap,
    /// Refuse to build the report.
    Error,
}

/// Assigns a style to each input file by position.
#[derive(Debug, Clone)]
pub struct StyleCycle {
    styles: Vec<LineStyle>,
    overflow: StyleOverflow,
}

impl StyleCycle {
    pub fn parse(specs: &[String], overflow: StyleOverflow) -> Result<Self> {
        if specs.is_empty() {
            return Err(ReportError::InvalidConfig("line_styles is empty".into()));
        }
        let styles = specs
            .iter()
            .map(|s| s.parse::<LineStyle>())
            .collect::<Result<Vec<LineStyle>>>()?;
        Ok(StyleCycle { styles, overflow })
    }

    /// Check the policy against the number of files in a report.
    pub fn check(&self, files: usize) -> Result<()> {
        if files <= self.styles.len() {
            return Ok(());
        }
        match self.overflow {
            StyleOverflow::Wrap => {
                warn!(
                    "{files} input files but only {} line styles; styles will repeat",
                    self.styles.len()
                );
                Ok(())
            }
            StyleOverflow::Error => Err(ReportError::InsufficientStyles {
                files,
                styles: self.styles.len(),
            }),
        }
    }

    /// Style of the file at `index`.
    pub fn style_for(&self, index: usize) -> &LineStyle {
        &self.styles[index % self.styles.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(s: &str) -> LineStyle {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_reference_styles() {
        assert_eq!(style("-s").line, LineKind::Solid);
        assert_eq!(style("-s").marker, Some(Marker::Square));
        assert_eq!(style("-.").line, LineKind::DashDot);
        assert_eq!(style("-.").marker, None);
        assert_eq!(style(":").line, LineKind::Dotted);
        assert_eq!(style("-1").marker, Some(Marker::TriDown));
        assert_eq!(style("--o").line, LineKind::Dashed);
        assert_eq!(style("o").line, LineKind::None);
        for spec in default_line_styles() {
            assert!(spec.parse::<LineStyle>().is_ok(), "{spec}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for spec in ["", "-q", "-so", "zz"] {
            assert!(matches!(
                spec.parse::<LineStyle>(),
                Err(ReportError::InvalidLineStyle(_))
            ));
        }
    }

    #[test]
    fn test_wrap_uses_modulo() {
        let cycle = StyleCycle::parse(&["-s".into(), "-o".into()], StyleOverflow::Wrap).unwrap();
        assert!(cycle.check(3).is_ok());
        assert_eq!(cycle.style_for(0).spec, "-s");
        assert_eq!(cycle.style_for(2).spec, "-s");
        assert_eq!(cycle.style_for(3).spec, "-o");
    }

    #[test]
    fn test_error_policy_rejects_overflow() {
        let cycle = StyleCycle::parse(&["-s".into()], StyleOverflow::Error).unwrap();
        assert!(cycle.check(1).is_ok());
        assert!(matches!(
            cycle.check(2),
            Err(ReportError::InsufficientStyles { files: 2, styles: 1 })
        ));
    }

    #[test]
    fn test_empty_style_list() {
        assert!(StyleCycle::parse(&[], StyleOverflow::Wrap).is_err());
    }
}
