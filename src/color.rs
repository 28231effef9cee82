use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_rgb(Hsl::new(hue, 0.75, 0.45))
        })
        .collect()
}

/// Generates `n` shades of gray from black towards light gray.
pub fn generate_grayscale(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Stop at 0.65 so the lightest series is still visible on white.
            let lightness = if n == 1 { 0.0 } else { 0.65 * i as f32 / (n - 1) as f32 };
            to_rgb(Hsl::new(0.0, 0.0, lightness))
        })
        .collect()
}

fn to_rgb(hsl: Hsl) -> RGBColor {
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours for one report
// ---------------------------------------------------------------------------

/// One colour per input file, fixed for the whole report so a file keeps
/// its colour on every page.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    colors: Vec<RGBColor>,
}

impl SeriesColors {
    pub fn new(files: usize, gray_scale: bool) -> Self {
        let colors = if gray_scale {
            generate_grayscale(files)
        } else {
            generate_palette(files)
        };
        SeriesColors { colors }
    }

    pub fn color_for(&self, index: usize) -> RGBColor {
        self.colors.get(index).copied().unwrap_or(RGBColor(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
        assert_eq!(generate_grayscale(3).len(), 3);
    }

    #[test]
    fn test_grayscale_is_monochrome() {
        for RGBColor(r, g, b) in generate_grayscale(6) {
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
        assert_eq!(generate_grayscale(1)[0], RGBColor(0, 0, 0));
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        let colors = generate_palette(4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
