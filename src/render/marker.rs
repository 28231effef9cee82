use std::f64::consts::PI;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::style::Marker;

type BackendCoord = (i32, i32);

/// Marker outline in pixel offsets around the data point.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    Filled(Vec<BackendCoord>),
    Stroked(Vec<Vec<BackendCoord>>),
}

fn regular_polygon(sides: usize, radius: f64, inner: Option<f64>) -> Vec<BackendCoord> {
    let points = if inner.is_some() { sides * 2 } else { sides };
    (0..points)
        .map(|k| {
            let r = match inner {
                Some(inner) if k % 2 == 1 => inner,
                _ => radius,
            };
            // Start at the top, clockwise in screen coordinates.
            let theta = -PI / 2.0 + 2.0 * PI * k as f64 / points as f64;
            (
                (r * theta.cos()).round() as i32,
                (r * theta.sin()).round() as i32,
            )
        })
        .collect()
}

pub fn marker_shape(marker: Marker, radius: i32) -> MarkerShape {
    let r = radius.max(1);
    let rf = r as f64;
    match marker {
        Marker::Point => MarkerShape::Filled(regular_polygon(8, rf / 2.0, None)),
        Marker::Circle => MarkerShape::Filled(regular_polygon(16, rf, None)),
        Marker::Square => MarkerShape::Filled(vec![(-r, -r), (r, -r), (r, r), (-r, r)]),
        Marker::Star => MarkerShape::Filled(regular_polygon(5, rf * 1.2, Some(rf * 0.5))),
        Marker::Pentagon => MarkerShape::Filled(regular_polygon(5, rf, None)),
        Marker::Hexagon => MarkerShape::Filled(regular_polygon(6, rf, None)),
        Marker::Octagon => MarkerShape::Filled(regular_polygon(8, rf, None)),
        Marker::Diamond => {
            let w = (rf * 0.6).round() as i32;
            MarkerShape::Filled(vec![(0, -r), (w, 0), (0, r), (-w, 0)])
        }
        Marker::TriangleUp => MarkerShape::Filled(vec![(0, -r), (r, r), (-r, r)]),
        Marker::TriangleDown => MarkerShape::Filled(vec![(0, r), (r, -r), (-r, -r)]),
        Marker::TriDown => {
            let dx = (rf * 0.87).round() as i32;
            let dy = r / 2;
            MarkerShape::Stroked(vec![
                vec![(0, 0), (0, r)],
                vec![(0, 0), (-dx, -dy)],
                vec![(0, 0), (dx, -dy)],
            ])
        }
        Marker::Plus => MarkerShape::Stroked(vec![vec![(-r, 0), (r, 0)], vec![(0, -r), (0, r)]]),
        Marker::Cross => {
            MarkerShape::Stroked(vec![vec![(-r, -r), (r, r)], vec![(-r, r), (r, -r)]])
        }
    }
}

/// Draw `marker` at every data point of a chart.
pub fn draw_markers<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: &[(f64, f64)],
    marker: Marker,
    radius: i32,
    color: RGBColor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    match marker_shape(marker, radius) {
        MarkerShape::Filled(vertices) => {
            chart.draw_series(points.iter().map(|&p| {
                EmptyElement::at(p) + Polygon::new(vertices.clone(), color.filled())
            }))?;
        }
        MarkerShape::Stroked(strokes) => {
            for stroke in &strokes {
                chart.draw_series(points.iter().map(|&p| {
                    EmptyElement::at(p) + PathElement::new(stroke.clone(), color.stroke_width(1))
                }))?;
            }
        }
    }
    Ok(())
}

/// Draw a single marker at a pixel position of a plain drawing area.
pub fn draw_marker_at<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    at: BackendCoord,
    marker: Marker,
    radius: i32,
    color: RGBColor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    match marker_shape(marker, radius) {
        MarkerShape::Filled(vertices) => {
            area.draw(&(EmptyElement::at(at) + Polygon::new(vertices, color.filled())))?;
        }
        MarkerShape::Stroked(strokes) => {
            for stroke in strokes {
                area.draw(&(EmptyElement::at(at) + PathElement::new(stroke, color.stroke_width(1))))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_vertex_counts() {
        let count = |m| match marker_shape(m, 4) {
            MarkerShape::Filled(v) => v.len(),
            MarkerShape::Stroked(s) => s.len(),
        };
        assert_eq!(count(Marker::Square), 4);
        assert_eq!(count(Marker::Pentagon), 5);
        assert_eq!(count(Marker::Hexagon), 6);
        assert_eq!(count(Marker::Octagon), 8);
        assert_eq!(count(Marker::Star), 10);
        assert_eq!(count(Marker::TriDown), 3);
        assert_eq!(count(Marker::Cross), 2);
    }

    #[test]
    fn test_polygons_start_at_top() {
        let MarkerShape::Filled(v) = marker_shape(Marker::Pentagon, 10) else {
            panic!("pentagon should be filled");
        };
        assert_eq!(v[0], (0, -10));
    }

    #[test]
    fn test_radius_is_at_least_one() {
        assert_eq!(
            marker_shape(Marker::Square, 0),
            MarkerShape::Filled(vec![(-1, -1), (1, -1), (1, 1), (-1, 1)])
        );
    }
}
