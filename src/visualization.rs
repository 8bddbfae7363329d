//! Map rendering for solved routes.
//!
//! Draws the route on an equirectangular lat/lon canvas as SVG, with edges
//! colored by transport mode, directional arrows and a legend. Coordinate
//! lookup comes from circuit metadata; routes over labels without
//! coordinates cannot be drawn.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::evaluation::Leg;
use crate::transport::Mode;

#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;
#[cfg(feature = "resvg")]
use resvg::FitTo;

fn mode_color(mode: Option<Mode>) -> &'static str {
    match mode {
        Some(Mode::Truck) => "#27ae60",
        Some(Mode::Ship) => "#2980b9",
        Some(Mode::Plane) => "#e74c3c",
        None => "#34495e",
    }
}

/// SVG map generator.
pub struct MapRenderer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for MapRenderer {
    fn default() -> Self {
        MapRenderer {
            width: 1000.0,
            height: 600.0,
            margin: 60.0,
            node_radius: 6.0,
        }
    }
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the annotated legs of a route onto a lat/lon canvas.
    pub fn render_route(&self, circuits: &[Circuit], legs: &[Leg], title: &str) -> Result<String> {
        let coords: HashMap<&str, (f64, f64)> = circuits
            .iter()
            .map(|c| (c.name.as_str(), (c.lon, c.lat)))
            .collect();

        let lookup = |label: &str| -> Result<(f64, f64)> {
            coords
                .get(label)
                .copied()
                .ok_or_else(|| Error::UnknownLabel(label.to_string()))
        };

        // Visited labels in drawing order, start first
        let mut stops: Vec<&str> = Vec::new();
        for leg in legs {
            if stops.is_empty() {
                stops.push(&leg.from);
            }
            if !stops.contains(&leg.to.as_str()) {
                stops.push(&leg.to);
            }
        }

        let (min_x, max_x, min_y, max_y) = self.bounds(&stops, &lookup)?;
        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        // Latitude grows north, the canvas grows down
        let transform = |lon: f64, lat: f64| -> (f64, f64) {
            let tx = self.margin + (lon - min_x) * scale;
            let ty = self.height - self.margin - (lat - min_y) * scale;
            (tx, ty)
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .start {{ fill: #f1c40f; stroke: #b7950b; stroke-width: 2; }}
    .edge {{ stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">{}</text>
"##,
            self.margin, title
        ));

        svg.push_str(
            r##"<defs>
<marker id="arrow" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto" markerUnits="strokeWidth">
<path d="M0,0 L0,6 L9,3 z" fill="#7f8c8d"/>
</marker>
</defs>
"##,
        );

        for leg in legs {
            let (x1, y1) = {
                let (lon, lat) = lookup(&leg.from)?;
                transform(lon, lat)
            };
            let (x2, y2) = {
                let (lon, lat) = lookup(&leg.to)?;
                transform(lon, lat)
            };
            svg.push_str(&format!(
                r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="edge" stroke="{}" marker-end="url(#arrow)"/>
"##,
                x1,
                y1,
                x2,
                y2,
                mode_color(leg.mode)
            ));
        }

        for (i, stop) in stops.iter().enumerate() {
            let (lon, lat) = lookup(stop)?;
            let (x, y) = transform(lon, lat);
            let class = if i == 0 { "start" } else { "node" };
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));
            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x,
                y - self.node_radius - 3.0,
                stop
            ));
        }

        // Legend for the modes that actually appear
        let mut modes_used: Vec<Option<Mode>> = Vec::new();
        for leg in legs {
            if !modes_used.contains(&leg.mode) {
                modes_used.push(leg.mode);
            }
        }
        let legend_y = self.height - 25.0;
        for (i, mode) in modes_used.iter().enumerate() {
            let x = self.margin + i as f64 * 110.0;
            let name = mode.map(|m| m.label()).unwrap_or("DISTANCE");
            svg.push_str(&format!(
                r##"<rect x="{}" y="{}" width="15" height="15" fill="{}"/>
<text x="{}" y="{}" class="label">{}</text>
"##,
                x,
                legend_y,
                mode_color(*mode),
                x + 20.0,
                legend_y + 12.0,
                name
            ));
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    fn bounds<F>(&self, stops: &[&str], lookup: &F) -> Result<(f64, f64, f64, f64)>
    where
        F: Fn(&str) -> Result<(f64, f64)>,
    {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for stop in stops {
            let (lon, lat) = lookup(stop)?;
            min_x = min_x.min(lon);
            max_x = max_x.max(lon);
            min_y = min_y.min(lat);
            max_y = max_y.max(lat);
        }

        Ok((min_x, max_x, min_y, max_y))
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Save SVG as PNG. Uses the native renderer when the `resvg` feature is
    /// enabled, otherwise tries `rsvg-convert`, `magick convert`, `inkscape`.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let path = path.as_ref();

        #[cfg(feature = "resvg")]
        {
            let opt = usvg::Options::default();
            let rtree = usvg::Tree::from_str(svg, &opt).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, format!("usvg parse error: {}", e))
            })?;
            let mut pixmap = Pixmap::new(self.width as u32, self.height as u32).ok_or_else(
                || std::io::Error::new(std::io::ErrorKind::Other, "Failed to create pixmap"),
            )?;
            render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut()).ok_or_else(
                || std::io::Error::new(std::io::ErrorKind::Other, "resvg render failed"),
            )?;
            pixmap.save_png(path).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, format!("save_png failed: {}", e))
            })?;
            return Ok(());
        }

        // Fallback: write a temporary svg and try external converters
        let tmp_svg = path.with_extension("svg.tmp");
        {
            let mut f = File::create(&tmp_svg)?;
            f.write_all(svg.as_bytes())?;
        }

        let converters: [(&str, Vec<String>); 3] = [
            (
                "rsvg-convert",
                vec![
                    "-o".to_string(),
                    path.to_string_lossy().into_owned(),
                    tmp_svg.to_string_lossy().into_owned(),
                ],
            ),
            (
                "magick",
                vec![
                    "convert".to_string(),
                    tmp_svg.to_string_lossy().into_owned(),
                    path.to_string_lossy().into_owned(),
                ],
            ),
            (
                "inkscape",
                vec![
                    tmp_svg.to_string_lossy().into_owned(),
                    "--export-type=png".to_string(),
                    "--export-filename".to_string(),
                    path.to_string_lossy().into_owned(),
                ],
            ),
        ];

        for (cmd, args) in &converters {
            if let Ok(status) = Command::new(cmd).args(args).status() {
                if status.success() {
                    let _ = std::fs::remove_file(&tmp_svg);
                    return Ok(());
                }
            }
        }

        let _ = std::fs::remove_file(&tmp_svg);
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "No SVG->PNG converter succeeded (tried resvg, rsvg-convert, magick, inkscape)",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuits() -> Vec<Circuit> {
        vec![
            Circuit::new("Monaco", "Europe", true, 43.7347, 7.4206),
            Circuit::new("Zandvoort", "Europe", true, 52.3889, 4.5409),
            Circuit::new("Shanghai", "Asia", true, 31.3389, 121.2197),
        ]
    }

    fn legs() -> Vec<Leg> {
        vec![
            Leg {
                from: "Monaco".into(),
                to: "Zandvoort".into(),
                distance: 1000.0,
                cost: 1000.0,
                mode: Some(Mode::Truck),
            },
            Leg {
                from: "Zandvoort".into(),
                to: "Shanghai".into(),
                distance: 8900.0,
                cost: 5340.0,
                mode: Some(Mode::Ship),
            },
        ]
    }

    #[test]
    fn test_render_route_contains_stops_and_colors() {
        let svg = MapRenderer::new()
            .render_route(&circuits(), &legs(), "Test route")
            .unwrap();
        assert!(svg.contains("Monaco"));
        assert!(svg.contains("Shanghai"));
        assert!(svg.contains("#27ae60"));
        assert!(svg.contains("#2980b9"));
        assert!(svg.contains("Test route"));
    }

    #[test]
    fn test_render_route_unknown_stop_fails() {
        let mut broken = legs();
        broken[0].from = "Atlantis".into();
        assert!(MapRenderer::new()
            .render_route(&circuits(), &broken, "broken")
            .is_err());
    }
}
