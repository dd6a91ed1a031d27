use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::ConfigError;
use crate::image_data::Image;
use crate::view::{Rect, ViewTransform};

/// What a render draws: the intensity image, contour lines, or both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum PlotType {
    Image,
    Contours,
    #[default]
    ImageContours,
}

impl PlotType {
    pub const ALL: [PlotType; 3] = [PlotType::Image, PlotType::Contours, PlotType::ImageContours];

    pub fn name(self) -> &'static str {
        match self {
            PlotType::Image => "image",
            PlotType::Contours => "contours",
            PlotType::ImageContours => "image-contours",
        }
    }

    pub fn shows_image(self) -> bool {
        self != PlotType::Contours
    }

    pub fn shows_contours(self) -> bool {
        self != PlotType::Image
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotType::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPlotType(s.to_string()))
    }
}

/// One straight piece of an iso-line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub level: f64,
}

/// Contour lines of one render, in output (screen) pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourOverlay {
    pub segments: Vec<Segment>,
    pub color: [u8; 4],
}

impl ContourOverlay {
    /// Map image-space segments onto the output through `transform`.
    pub fn project(segments: Vec<Segment>, transform: &ViewTransform, color: [u8; 4]) -> Self {
        let segments = segments
            .into_iter()
            .map(|s| Segment {
                start: transform.image_to_screen(s.start.0, s.start.1),
                end: transform.image_to_screen(s.end.0, s.end.1),
                level: s.level,
            })
            .collect();
        Self { segments, color }
    }
}

/// `count` evenly spaced levels from `vmin` to `vmax`, both ends included.
pub fn default_levels(vmin: f64, vmax: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![vmin],
        _ => {
            let step = (vmax - vmin) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { vmax } else { vmin + step * i as f64 })
                .collect()
        }
    }
}

/// Marching-squares iso-lines of `image` at each of `levels`, restricted to
/// the cells that touch `region`.
///
/// Sample `(i, j)` sits at the pixel centre `(i + 0.5, j + 0.5)`, so the
/// returned segments are in the same continuous image coordinates as
/// [`Rect`]. Cells with a non-finite corner produce no segments. Output is
/// ordered by level, then row, then column.
pub fn extract(image: &Image, levels: &[f64], region: &Rect) -> Vec<Segment> {
    let (w, h) = (image.width(), image.height());
    if w < 2 || h < 2 {
        return Vec::new();
    }
    let (cols, rows) = region.pixel_span(w, h);
    if cols.is_empty() || rows.is_empty() {
        return Vec::new();
    }
    // Cell (i, j) joins the centres of pixels i..=i+1 and j..=j+1.
    let cells_x = cols.start.saturating_sub(1)..cols.end.min(w - 1);
    let cells_y = rows.start.saturating_sub(1)..rows.end.min(h - 1);

    let trace = |&level: &f64| -> Vec<Segment> {
        let mut out = Vec::new();
        for j in cells_y.clone() {
            for i in cells_x.clone() {
                march_cell(image, i, j, level, &mut out);
            }
        }
        out
    };

    let cells = cells_x.len() * cells_y.len();
    if cells * levels.len() >= PARALLEL_PIXEL_THRESHOLD {
        levels.par_iter().flat_map_iter(trace).collect()
    } else {
        levels.iter().flat_map(trace).collect()
    }
}

fn march_cell(image: &Image, i: usize, j: usize, level: f64, out: &mut Vec<Segment>) {
    let data = image.data();
    let corner = |x: usize, y: usize| f64::from(data[[y, x]]);
    // Counter-clockwise from the low-x, low-y corner.
    let v = [
        corner(i, j),
        corner(i + 1, j),
        corner(i + 1, j + 1),
        corner(i, j + 1),
    ];
    if v.iter().any(|c| !c.is_finite()) {
        return;
    }

    let x = i as f64 + 0.5;
    let y = j as f64 + 0.5;
    let pos = [(x, y), (x + 1.0, y), (x + 1.0, y + 1.0), (x, y + 1.0)];

    let above = v.map(|c| c >= level);
    let case = above
        .iter()
        .enumerate()
        .fold(0u8, |acc, (k, &a)| acc | ((a as u8) << k));
    if case == 0 || case == 0b1111 {
        return;
    }

    // Edge k runs from corner k to corner k+1.
    let crossing = |k: usize| -> (f64, f64) {
        let (a, b) = (v[k], v[(k + 1) % 4]);
        let (pa, pb) = (pos[k], pos[(k + 1) % 4]);
        let t = (level - a) / (b - a);
        (pa.0 + t * (pb.0 - pa.0), pa.1 + t * (pb.1 - pa.1))
    };
    let mut push = |e0: usize, e1: usize| {
        out.push(Segment {
            start: crossing(e0),
            end: crossing(e1),
            level,
        });
    };

    match case {
        // Saddles: the cell centre decides which opposite corners connect.
        0b0101 | 0b1010 => {
            let centre_above = v.iter().sum::<f64>() / 4.0 >= level;
            // Corners 1 and 3 cut off on their own, or corners 0 and 2.
            let isolate_odd = (case == 0b0101) == centre_above;
            if isolate_odd {
                push(0, 1);
                push(2, 3);
            } else {
                push(3, 0);
                push(1, 2);
            }
        }
        _ => {
            let edges: Vec<usize> = (0..4).filter(|&k| above[k] != above[(k + 1) % 4]).collect();
            if let [e0, e1] = edges[..] {
                push(e0, e1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_type_parses_names() {
        assert_eq!("image-contours".parse::<PlotType>().unwrap(), PlotType::ImageContours);
        assert_eq!("Contours".parse::<PlotType>().unwrap(), PlotType::Contours);
        assert!("lines".parse::<PlotType>().is_err());
        assert!(PlotType::ImageContours.shows_image());
        assert!(!PlotType::Contours.shows_image());
        assert!(!PlotType::Image.shows_contours());
    }

    #[test]
    fn default_levels_edge_counts() {
        assert!(default_levels(0.0, 1.0, 0).is_empty());
        assert_eq!(default_levels(3.0, 7.0, 1), vec![3.0]);
        assert_eq!(default_levels(-1.0, 1.0, 3), vec![-1.0, 0.0, 1.0]);
    }
}
