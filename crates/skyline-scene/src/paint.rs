//! Rasterizes primitives into terminal cells.
//!
//! The scene works in pixels; the painter divides that space into cells of
//! [`CellMetrics`] and samples each primitive at cell centres. Later
//! primitives overwrite earlier ones, so paint order is projection order.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use skyline_core::{Theme, Viewport};

use crate::chars::{
    BIRD_BODY_CHARS, CLOUD_CHARS, DISTANT_BIRD_CHARS, MOON_CHARS, RAY_CHARS, STAR_CHARS, SUN_CHAR,
    WING_CHARS,
};
use crate::clouds::CloudSize;
use crate::color::{Rgb, blend, hsl_to_rgb, lerp};
use crate::projector::{FlockTier, Point, Primitive, WingPose, float_offset, pulse_opacity};

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width_px: u16,
    pub height_px: u16,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8,
            height_px: 16,
        }
    }
}

impl CellMetrics {
    pub fn new(width_px: u16, height_px: u16) -> Self {
        Self {
            width_px: width_px.max(1),
            height_px: height_px.max(1),
        }
    }

    /// Scene viewport covered by a terminal of this many cells.
    pub fn viewport(&self, columns: u16, rows: u16) -> Viewport {
        Viewport::from_cells(columns, rows, self.width_px, self.height_px)
    }
}

/// Moon craters as `(x, y, radius)` in the moon's 80 px box.
const MOON_CRATERS: &[(f64, f64, f64)] = &[
    (30.0, 30.0, 6.0),
    (55.0, 25.0, 5.0),
    (25.0, 55.0, 5.0),
    (60.0, 50.0, 6.0),
];

/// Darker seas, same coordinates as the craters.
const MOON_MARIA: &[(f64, f64, f64)] = &[(32.0, 36.0, 12.0), (60.0, 26.0, 9.0), (24.0, 62.0, 8.0)];

const MOON_GLOW: Rgb = (203, 213, 225);
const MOON_LIGHT: Rgb = (232, 232, 232);
const MOON_SHADOW: Rgb = (122, 122, 122);
const MOON_MARE: Rgb = (150, 150, 150);
const MOON_CRATER: Rgb = (136, 136, 136);

const STARLIGHT: Rgb = (255, 255, 255);
const RAY_YELLOW: Rgb = (250, 204, 21);
const CLOUD_LIT: Rgb = (239, 246, 255);
const CLOUD_SHADE: Rgb = (219, 234, 254);
const CLOUD_OPACITY: f64 = 0.7;

struct Canvas {
    columns: u16,
    rows: u16,
    metrics: CellMetrics,
    sky: Color,
    cells: Vec<Option<(char, Style)>>,
}

impl Canvas {
    fn new(columns: u16, rows: u16, metrics: CellMetrics, sky: Color) -> Self {
        Self {
            columns,
            rows,
            metrics,
            sky,
            cells: vec![None; usize::from(columns) * usize::from(rows)],
        }
    }

    fn cell_width(&self) -> f64 {
        f64::from(self.metrics.width_px)
    }

    fn cell_height(&self) -> f64 {
        f64::from(self.metrics.height_px)
    }

    fn cell_center(&self, col: i64, row: i64) -> Point {
        Point::new(
            (col as f64 + 0.5) * self.cell_width(),
            (row as f64 + 0.5) * self.cell_height(),
        )
    }

    fn cell_at(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.cell_width()).floor() as i64,
            (p.y / self.cell_height()).floor() as i64,
        )
    }

    /// Cells whose area intersects the given pixel box, clipped to the canvas.
    fn cells_in(&self, min: Point, max: Point) -> impl Iterator<Item = (i64, i64)> + use<> {
        let (c0, r0) = self.cell_at(min);
        let (c1, r1) = self.cell_at(max);
        let (c0, r0) = (c0.max(0), r0.max(0));
        let c1 = c1.min(i64::from(self.columns) - 1);
        let r1 = r1.min(i64::from(self.rows) - 1);
        (r0..=r1).flat_map(move |row| (c0..=c1).map(move |col| (col, row)))
    }

    fn index(&self, col: i64, row: i64) -> Option<usize> {
        let in_bounds = (0..i64::from(self.columns)).contains(&col)
            && (0..i64::from(self.rows)).contains(&row);
        in_bounds.then(|| row as usize * usize::from(self.columns) + col as usize)
    }

    fn glyph(&self, col: i64, row: i64) -> Option<char> {
        self.index(col, row)
            .and_then(|i| self.cells[i])
            .map(|(ch, _)| ch)
    }

    fn set(&mut self, col: i64, row: i64, ch: char, style: Style) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Some((ch, style));
        }
    }

    fn plot(&mut self, p: Point, ch: char, style: Style) {
        let (col, row) = self.cell_at(p);
        self.set(col, row, ch, style);
    }

    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, ch: char, style: Style) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let cells: Vec<_> = self
            .cells_in(center.offset(-rx, -ry), center.offset(rx, ry))
            .collect();
        for (col, row) in cells {
            let p = self.cell_center(col, row);
            let nx = (p.x - center.x) / rx;
            let ny = (p.y - center.y) / ry;
            if nx * nx + ny * ny <= 1.0 {
                self.set(col, row, ch, style);
            }
        }
    }

    fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .chunks(usize::from(self.columns).max(1))
            .take(usize::from(self.rows))
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        Some((ch, style)) => Span::styled(ch.to_string(), *style),
                        None => Span::raw(" "),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn draw(&mut self, primitive: &Primitive, now_ms: u64) {
        match *primitive {
            Primitive::Moon {
                center,
                radius,
                glow_radius,
            } => self.draw_moon(center, radius, glow_radius),
            Primitive::Star {
                center,
                diameter,
                opacity,
                glow_opacity,
                ..
            } => self.draw_star(center, diameter, opacity, glow_opacity),
            Primitive::Sun {
                center,
                radius,
                pulse_delay_s,
            } => self.draw_sun(center, radius, pulse_opacity(now_ms, pulse_delay_s)),
            Primitive::SunRay {
                center,
                angle_deg,
                inner_radius,
                length,
                pulse_delay_s,
            } => self.draw_ray(
                center,
                angle_deg,
                inner_radius,
                length,
                pulse_opacity(now_ms, pulse_delay_s),
            ),
            Primitive::Bird {
                tier,
                position,
                scale,
                wing,
            } => self.draw_bird(tier, position, scale, wing),
            Primitive::Cloud {
                origin,
                size,
                float_delay_s,
            } => self.draw_cloud(origin.offset(0.0, float_offset(now_ms, float_delay_s)), size),
        }
    }

    fn draw_moon(&mut self, center: Point, radius: f64, glow_radius: f64) {
        let glow_radius = glow_radius.max(radius);
        let cells: Vec<_> = self
            .cells_in(
                center.offset(-glow_radius, -glow_radius),
                center.offset(glow_radius, glow_radius),
            )
            .collect();
        // Lit from the upper left
        let light = center.offset(-radius * 0.3, -radius * 0.3);

        for (col, row) in cells {
            let p = self.cell_center(col, row);
            let distance = (p.x - center.x).hypot(p.y - center.y);
            if distance > glow_radius {
                continue;
            }
            if distance > radius {
                let style = Style::new().fg(blend(MOON_GLOW, self.sky, 0.3));
                self.set(col, row, MOON_CHARS[3], style);
                continue;
            }

            let u = p.x - center.x + 40.0;
            let v = p.y - center.y + 40.0;
            let inside = |&(cx, cy, r): &(f64, f64, f64)| (u - cx).hypot(v - cy) <= r;
            let shade = lerp(
                MOON_LIGHT,
                MOON_SHADOW,
                (p.x - light.x).hypot(p.y - light.y) / (radius * 1.3),
            );

            let (ch, rgb) = if MOON_CRATERS.iter().any(inside) {
                (MOON_CHARS[2], MOON_CRATER)
            } else if MOON_MARIA.iter().any(inside) {
                (MOON_CHARS[1], lerp(shade, MOON_MARE, 0.6))
            } else {
                (MOON_CHARS[0], shade)
            };
            self.set(col, row, ch, Style::new().fg(blend(rgb, self.sky, 1.0)));
        }
    }

    fn draw_star(&mut self, center: Point, diameter: f64, opacity: f64, glow_opacity: f64) {
        let tier = ((diameter - 1.0) / 2.0 * STAR_CHARS.len() as f64).floor();
        let ch = STAR_CHARS[(tier.max(0.0) as usize).min(STAR_CHARS.len() - 1)];

        let mut style = Style::new().fg(blend(STARLIGHT, self.sky, opacity));
        if glow_opacity >= 0.4 {
            style = style.add_modifier(Modifier::BOLD);
        }
        self.plot(center, ch, style);
    }

    fn draw_sun(&mut self, center: Point, radius: f64, pulse: f64) {
        let cells: Vec<_> = self
            .cells_in(center.offset(-radius, -radius), center.offset(radius, radius))
            .collect();
        for (col, row) in cells {
            let p = self.cell_center(col, row);
            if (p.x - center.x).hypot(p.y - center.y) > radius {
                continue;
            }
            // Yellow in the upper left, orange in the lower right
            let t = ((p.x - center.x) + (p.y - center.y)) / (4.0 * radius) + 0.5;
            let rgb = hsl_to_rgb(50.0 - 22.0 * t, 0.95, 0.6);
            self.set(col, row, SUN_CHAR, Style::new().fg(blend(rgb, self.sky, pulse)));
        }
    }

    fn draw_ray(&mut self, center: Point, angle_deg: f64, inner: f64, length: f64, pulse: f64) {
        let radians = angle_deg.to_radians();
        let (dx, dy) = (radians.sin(), -radians.cos());
        let octant = ((angle_deg.rem_euclid(180.0) + 22.5) / 45.0) as usize;
        let ch = RAY_CHARS[octant % RAY_CHARS.len()];

        let steps = (length / 2.0).ceil().max(1.0) as usize;
        // Outer samples first so the brighter base wins shared cells
        for i in (0..=steps).rev() {
            let along = i as f64 / steps as f64;
            let r = inner + length * along;
            let p = center.offset(dx * r, dy * r);
            let (col, row) = self.cell_at(p);
            if self.glyph(col, row) == Some(SUN_CHAR) {
                continue;
            }
            let style = Style::new().fg(blend(RAY_YELLOW, self.sky, pulse * (1.0 - along)));
            self.set(col, row, ch, style);
        }
    }

    fn draw_bird(&mut self, tier: FlockTier, position: Point, scale: f64, wing: WingPose) {
        let (width, height) = tier.sprite_size();
        let (col, row) = self.cell_at(position.offset(width / 2.0, height / 2.0));

        let (rgb, opacity) = match tier {
            FlockTier::Primary => ((75, 85, 99), 0.9),
            FlockTier::Seagull => ((107, 114, 128), 0.85),
            FlockTier::Distant => ((156, 163, 175), 0.6),
        };
        let style = Style::new().fg(blend(rgb, self.sky, opacity));

        match wing {
            WingPose::Rotation { degrees } => {
                let stroke = if degrees > 5.0 {
                    0
                } else if degrees < -5.0 {
                    2
                } else {
                    1
                };
                let body = match tier {
                    FlockTier::Primary => BIRD_BODY_CHARS[0],
                    _ => BIRD_BODY_CHARS[1],
                };
                if width * scale >= 1.5 * self.cell_width() {
                    let (left, right) = WING_CHARS[stroke];
                    self.set(col - 1, row, left, style);
                    self.set(col, row, body, style);
                    self.set(col + 1, row, right, style);
                } else {
                    self.set(col, row, DISTANT_BIRD_CHARS[2 - stroke], style);
                }
            }
            WingPose::Flex { scale_y } => {
                let ch = if scale_y < 0.7 {
                    DISTANT_BIRD_CHARS[0]
                } else if scale_y < 0.95 {
                    DISTANT_BIRD_CHARS[1]
                } else {
                    DISTANT_BIRD_CHARS[2]
                };
                self.set(col, row, ch, style);
            }
        }
    }

    fn draw_cloud(&mut self, origin: Point, size: CloudSize) {
        let (width, height) = size.dimensions();
        let lit = Style::new().fg(blend(CLOUD_LIT, self.sky, CLOUD_OPACITY));
        let shaded = Style::new().fg(blend(CLOUD_SHADE, self.sky, CLOUD_OPACITY));

        self.fill_ellipse(
            origin.offset(width / 2.0, height / 2.0),
            width / 2.0,
            height / 2.0,
            CLOUD_CHARS[0],
            lit,
        );

        let [front, back] = size.puffs();
        for ((left, top, w, h), ch, style) in [
            (front, CLOUD_CHARS[0], lit),
            (back, CLOUD_CHARS[1], shaded),
        ] {
            self.fill_ellipse(
                origin.offset(left + w / 2.0, top + h / 2.0),
                w / 2.0,
                h / 2.0,
                ch,
                style,
            );
        }
    }
}

/// Rasterize primitives into one styled line per terminal row.
pub fn rasterize(
    columns: u16,
    rows: u16,
    theme: Theme,
    primitives: &[Primitive],
    metrics: CellMetrics,
    now_ms: u64,
) -> Vec<Line<'static>> {
    let mut canvas = Canvas::new(columns, rows, metrics, theme.sky_color());
    for primitive in primitives {
        canvas.draw(primitive, now_ms);
    }
    canvas.into_lines()
}

/// Paint primitives over the theme's sky colour.
pub fn paint(
    frame: &mut Frame,
    area: Rect,
    theme: Theme,
    primitives: &[Primitive],
    metrics: CellMetrics,
    now_ms: u64,
) {
    let lines = rasterize(area.width, area.height, theme, primitives, metrics, now_ms);
    let sky = Style::new().bg(theme.sky_color());
    frame.render_widget(Paragraph::new(lines).style(sky), area);
}
