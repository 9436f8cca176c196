//! Renderer — a raster drawing surface over a grid of terminal cells.
//!
//! `GridSurface` implements the whole surface vocabulary with one surface
//! unit per cell. Geometry is sampled at cell centres, so the renderer is
//! deterministic: the same instructions always produce the same grid.

mod color;
mod path;

use std::collections::HashMap;

use glam::{DAffine2, DVec2};

pub use color::parse_color;
use path::{Bounds, Path, arc_points, arc_sweep, dash_pieces};

use crate::error::PlayError;
use crate::player::{ImagePlacement, Surface};
use crate::types::{
    Cell, CellChange, Color, ImageHandle, LineCap, LineJoin, NamedColor, Style, TextAlign,
};

/// A bitmap of cells that `drawImage` can copy onto the grid. Blank cells
/// are transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Sprite {
    /// One row per line of `art`; spaces stay transparent.
    pub fn from_text(art: &str, style: Style) -> Self {
        let rows: Vec<Vec<char>> = art.lines().map(|l| l.chars().collect()).collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = vec![Cell::default(); width * rows.len()];
        for (y, row) in rows.iter().enumerate() {
            for (x, &ch) in row.iter().enumerate() {
                if ch != ' ' {
                    cells[y * width + x] = Cell { ch, style };
                }
            }
        }
        Sprite {
            width,
            height: rows.len(),
            cells,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn get(&self, x: i64, y: i64) -> Option<&Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width + x as usize)
    }
}

/// Everything `save` captures.
#[derive(Debug, Clone)]
struct DrawState {
    transform: DAffine2,
    fill: Color,
    stroke: Color,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    text_align: TextAlign,
    font: String,
    dash: Vec<f64>,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            transform: DAffine2::IDENTITY,
            fill: Color::Named(NamedColor::Black),
            stroke: Color::Named(NamedColor::Black),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            text_align: TextAlign::Left,
            font: String::from("10px sans-serif"),
            dash: Vec::new(),
        }
    }
}

pub struct GridSurface {
    width: u16,
    height: u16,
    cells: Vec<Vec<Cell>>,
    state: DrawState,
    stack: Vec<DrawState>,
    path: Path,
    images: HashMap<ImageHandle, Sprite>,
}

impl GridSurface {
    pub fn new(width: u16, height: u16) -> Self {
        GridSurface {
            width,
            height,
            cells: vec![vec![Cell::default(); width as usize]; height as usize],
            state: DrawState::default(),
            stack: Vec::new(),
            path: Path::default(),
            images: HashMap::new(),
        }
    }

    /// Resize the grid. Like resizing a canvas, this clears it and resets
    /// the drawing state; registered images are kept.
    pub fn resize(&mut self, width: u16, height: u16) {
        let images = std::mem::take(&mut self.images);
        *self = GridSurface::new(width, height);
        self.images = images;
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Drop saved states, the current path and any transform, keeping the
    /// cells. Used after a frame failed halfway.
    pub fn reset_state(&mut self) {
        self.state = DrawState::default();
        self.stack.clear();
        self.path.clear();
    }

    pub fn register_image(&mut self, handle: ImageHandle, sprite: Sprite) {
        self.images.insert(handle, sprite);
    }

    fn point(&self, x: f64, y: f64) -> DVec2 {
        self.state.transform.transform_point2(DVec2::new(x, y))
    }

    /// Length scale of the current transform.
    fn device_scale(&self) -> f64 {
        self.state.transform.matrix2.determinant().abs().sqrt()
    }

    fn plot(&mut self, x: i64, y: i64, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.cells[y as usize][x as usize] = cell;
    }

    fn cell_at(&self, x: i64, y: i64) -> Option<&Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cells.get(y as usize)?.get(x as usize)
    }

    /// Nonzero-winding scanline fill, sampled at cell centres.
    fn fill_rings<'r>(&mut self, rings: impl IntoIterator<Item = &'r [DVec2]>, cell: Cell) {
        let edges: Vec<(DVec2, DVec2)> = rings
            .into_iter()
            .flat_map(|ring| {
                ring.iter()
                    .zip(ring.iter().cycle().skip(1))
                    .map(|(a, b)| (*a, *b))
            })
            .filter(|(a, b)| a.y != b.y)
            .collect();
        if edges.is_empty() {
            return;
        }

        let min_y = edges.iter().map(|(a, b)| a.y.min(b.y)).fold(f64::INFINITY, f64::min);
        let max_y = edges.iter().map(|(a, b)| a.y.max(b.y)).fold(f64::NEG_INFINITY, f64::max);
        let first_row = (min_y - 0.5).ceil().max(0.0) as i64;
        let last_row = (max_y - 0.5).floor().min(self.height as f64 - 1.0) as i64;

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for row in first_row..=last_row {
            let cy = row as f64 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                let (lo, hi, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
                if cy < lo.y || cy >= hi.y {
                    continue;
                }
                let x = lo.x + (cy - lo.y) * (hi.x - lo.x) / (hi.y - lo.y);
                crossings.push((x, dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let from = (pair[0].0 - 0.5).ceil().max(0.0) as i64;
                let to = (pair[1].0 - 0.5).ceil().min(self.width as f64) as i64;
                for col in from..to {
                    self.plot(col, row, cell);
                }
            }
        }
    }

    fn fill_disc(&mut self, center: DVec2, radius: f64, cell: Cell) {
        if !center.is_finite() || !radius.is_finite() || self.width == 0 || self.height == 0 {
            return;
        }
        let last = DVec2::new(self.width as f64 - 1.0, self.height as f64 - 1.0);
        let min = (center - radius).floor().clamp(DVec2::ZERO, last);
        let max = (center + radius).ceil().clamp(DVec2::ZERO, last);
        for y in min.y as i64..=max.y as i64 {
            for x in min.x as i64..=max.x as i64 {
                let c = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if c.distance(center) <= radius {
                    self.plot(x, y, cell);
                }
            }
        }
    }

    /// Stroke device-space polylines with the current dash, width and caps.
    ///
    /// Lines one cell wide or thinner are walked cell by cell; wider lines
    /// are filled as quads. Joins are approximated by the caps. Segments are
    /// clipped to the grid grown by half the line width.
    fn stroke_polylines(&mut self, polylines: Vec<Vec<DVec2>>, cell: Cell) {
        let scale = self.device_scale();
        let width = self.state.line_width * scale;
        let margin = width.max(1.0) / 2.0 + 1.0;
        let bounds = Bounds {
            min: DVec2::splat(-margin),
            max: DVec2::new(self.width as f64, self.height as f64) + margin,
        };
        let pattern: Vec<f64> = self.state.dash.iter().map(|d| d * scale).collect();
        let round = self.state.line_cap == LineCap::Round || self.state.line_join == LineJoin::Round;
        let square = self.state.line_cap == LineCap::Square;

        for points in polylines {
            for (a, b) in dash_pieces(&points, &pattern, bounds) {
                if width <= 1.0 {
                    self.walk_segment(a, b, cell);
                    continue;
                }
                let half = width / 2.0;
                let dir = (b - a).normalize_or_zero();
                let (a, b) = if square {
                    (a - dir * half, b + dir * half)
                } else {
                    (a, b)
                };
                let normal = dir.perp() * half;
                let quad = [a + normal, b + normal, b - normal, a - normal];
                self.fill_rings([quad.as_slice()], cell);
                if round {
                    self.fill_disc(a, half, cell);
                    self.fill_disc(b, half, cell);
                }
            }
        }
    }

    fn walk_segment(&mut self, a: DVec2, b: DVec2, cell: Cell) {
        let steps = ((a.distance(b) * 2.0).ceil() as usize).max(1);
        for i in 0..steps {
            let p = a.lerp(b, (i as f64 + 0.5) / steps as f64);
            self.plot(p.x.floor() as i64, p.y.floor() as i64, cell);
        }
    }

    fn rect_corners(&self, x: f64, y: f64, w: f64, h: f64) -> [DVec2; 4] {
        [
            self.point(x, y),
            self.point(x + w, y),
            self.point(x + w, y + h),
            self.point(x, y + h),
        ]
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
        color: Color,
        stroked: bool,
    ) {
        let mut chars: Vec<char> = text.chars().collect();
        if let Some(max) = max_width {
            let max = max * self.device_scale();
            if max.is_nan() || max <= 0.0 {
                return;
            }
            chars.truncate(max.floor() as usize);
        }

        let anchor = self.point(x, y);
        let shift = match self.state.text_align {
            TextAlign::Left => 0.0,
            TextAlign::Center => chars.len() as f64 / 2.0,
            TextAlign::Right => chars.len() as f64,
        };
        let start = (anchor.x - shift).floor() as i64;
        let row = anchor.y.floor() as i64;
        let bold = stroked || self.state.font.split_whitespace().any(|w| w == "bold");

        for (i, ch) in chars.into_iter().enumerate() {
            let col = start + i as i64;
            let bg = self.cell_at(col, row).and_then(|c| c.style.bg);
            let style = Style {
                fg: Some(color),
                bg,
                bold,
            };
            self.plot(col, row, Cell { ch, style });
        }
    }

    fn set_color(slot: &mut Color, name: &'static str, style: &str) {
        match parse_color(style) {
            Some(color) => *slot = color,
            None => tracing::warn!(property = name, style, "ignoring unparsable colour"),
        }
    }
}

impl Surface for GridSurface {
    fn size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), PlayError> {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
        Ok(())
    }

    fn set_fill_style(&mut self, style: &str) -> Result<(), PlayError> {
        Self::set_color(&mut self.state.fill, "fillStyle", style);
        Ok(())
    }

    fn set_stroke_style(&mut self, style: &str) -> Result<(), PlayError> {
        Self::set_color(&mut self.state.stroke, "strokeStyle", style);
        Ok(())
    }

    fn set_text_align(&mut self, align: TextAlign) -> Result<(), PlayError> {
        self.state.text_align = align;
        Ok(())
    }

    fn set_font(&mut self, font: &str) -> Result<(), PlayError> {
        self.state.font = font.to_owned();
        Ok(())
    }

    fn set_line_cap(&mut self, cap: LineCap) -> Result<(), PlayError> {
        self.state.line_cap = cap;
        Ok(())
    }

    fn set_line_join(&mut self, join: LineJoin) -> Result<(), PlayError> {
        self.state.line_join = join;
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        let corners = self.rect_corners(x, y, w, h);
        self.fill_rings([corners.as_slice()], Cell::painted(self.state.fill));
        Ok(())
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        let [a, b, c, d] = self.rect_corners(x, y, w, h);
        self.stroke_polylines(vec![vec![a, b, c, d, a]], Cell::painted(self.state.stroke));
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        let corners = self.rect_corners(x, y, w, h);
        self.fill_rings([corners.as_slice()], Cell::default());
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        self.draw_text(text, x, y, max_width, self.state.fill, false);
        Ok(())
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        self.draw_text(text, x, y, max_width, self.state.stroke, true);
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        let p = self.point(x, y);
        self.path.move_to(p);
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        let p = self.point(x, y);
        self.path.line_to(p);
        Ok(())
    }

    fn begin_path(&mut self) -> Result<(), PlayError> {
        self.path.clear();
        Ok(())
    }

    fn close_path(&mut self) -> Result<(), PlayError> {
        self.path.close();
        Ok(())
    }

    fn stroke(&mut self) -> Result<(), PlayError> {
        let polylines: Vec<_> = self.path.polylines().collect();
        self.stroke_polylines(polylines, Cell::painted(self.state.stroke));
        Ok(())
    }

    fn fill(&mut self) -> Result<(), PlayError> {
        let path = std::mem::take(&mut self.path);
        self.fill_rings(path.rings(), Cell::painted(self.state.fill));
        self.path = path;
        Ok(())
    }

    /// Lists with a negative or non-finite entry are ignored; odd lists are
    /// repeated to make them even.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), PlayError> {
        if segments.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Ok(());
        }
        let mut dash = segments.to_vec();
        if dash.len() % 2 == 1 {
            dash.extend_from_slice(segments);
        }
        self.state.dash = dash;
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageHandle,
        placement: ImagePlacement,
    ) -> Result<(), PlayError> {
        let sprite = self
            .images
            .get(image)
            .cloned()
            .ok_or_else(|| PlayError::UnknownImage(image.as_str().to_owned()))?;
        let (w, h) = (sprite.width as f64, sprite.height as f64);
        let ([sx, sy, sw, sh], [dx, dy, dw, dh]) = match placement {
            ImagePlacement::At { dx, dy } => ([0.0, 0.0, w, h], [dx, dy, w, h]),
            ImagePlacement::Scaled { dx, dy, dw, dh } => ([0.0, 0.0, w, h], [dx, dy, dw, dh]),
            ImagePlacement::Sliced {
                sx,
                sy,
                sw,
                sh,
                dx,
                dy,
                dw,
                dh,
            } => ([sx, sy, sw, sh], [dx, dy, dw, dh]),
        };
        if dw == 0.0 || dh == 0.0 || self.state.transform.matrix2.determinant() == 0.0 {
            return Ok(());
        }

        let inverse = self.state.transform.inverse();
        let corners = self.rect_corners(dx, dy, dw, dh);
        let min = corners.iter().fold(DVec2::INFINITY, |m, c| m.min(*c)).floor();
        let max = corners.iter().fold(DVec2::NEG_INFINITY, |m, c| m.max(*c)).ceil();
        let (left, right) = (dx.min(dx + dw), dx.max(dx + dw));
        let (top, bottom) = (dy.min(dy + dh), dy.max(dy + dh));

        for row in (min.y.max(0.0) as i64)..(max.y.min(self.height as f64) as i64) {
            for col in (min.x.max(0.0) as i64)..(max.x.min(self.width as f64) as i64) {
                let user = inverse.transform_point2(DVec2::new(col as f64 + 0.5, row as f64 + 0.5));
                if user.x < left || user.x >= right || user.y < top || user.y >= bottom {
                    continue;
                }
                let ix = (sx + (user.x - dx) / dw * sw).floor() as i64;
                let iy = (sy + (user.y - dy) / dh * sh).floor() as i64;
                if let Some(cell) = sprite.get(ix, iy).filter(|c| !c.is_blank()) {
                    self.plot(col, row, *cell);
                }
            }
        }
        Ok(())
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), PlayError> {
        if radius < 0.0 {
            return Err(PlayError::InvalidArguments {
                operation: "arc",
                reason: format!("negative radius {radius}"),
            });
        }
        if ![x, y, radius, start_angle, end_angle].iter().all(|v| v.is_finite()) {
            return Ok(());
        }
        let sweep = arc_sweep(start_angle, end_angle, anticlockwise);
        let points = arc_points(DVec2::new(x, y), radius, start_angle, sweep, self.device_scale());
        for p in points {
            let p = self.state.transform.transform_point2(p);
            self.path.line_to(p);
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), PlayError> {
        self.stack.push(self.state.clone());
        Ok(())
    }

    fn restore(&mut self) -> Result<(), PlayError> {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        if x.is_finite() && y.is_finite() {
            self.state.transform = self.state.transform * DAffine2::from_translation(DVec2::new(x, y));
        }
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), PlayError> {
        if radians.is_finite() {
            self.state.transform = self.state.transform * DAffine2::from_angle(radians);
        }
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        if x.is_finite() && y.is_finite() {
            self.state.transform = self.state.transform * DAffine2::from_scale(DVec2::new(x, y));
        }
        Ok(())
    }
}

/// Compute a cell-level diff between two grids.
pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
        for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
            if prev_cell != next_cell {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *next_cell,
                });
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;
    use crate::builders::{LineOptions, RectOptions, TextOptions, line, rect, text};
    use crate::compiler::source::{Element, LineStyle, Point};
    use crate::player::Player;

    fn red() -> Color {
        Color::Named(NamedColor::Red)
    }

    fn painted(surface: &GridSurface) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (y, row) in surface.cells().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if !cell.is_blank() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn row_text(surface: &GridSurface, y: usize) -> String {
        surface.cells()[y].iter().map(|c| c.ch).collect()
    }

    #[test]
    fn fill_rect_covers_cell_centres() {
        let mut s = GridSurface::new(6, 4);
        s.set_fill_style("red").unwrap();
        s.fill_rect(1.0, 1.0, 3.0, 2.0).unwrap();

        assert_eq!(painted(&s), vec![(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(s.cells()[1][1], Cell::painted(red()));
    }

    #[test]
    fn clear_rect_resets_cells() {
        let mut s = GridSurface::new(4, 4);
        s.fill_rect(0.0, 0.0, 4.0, 4.0).unwrap();
        s.clear_rect(1.0, 1.0, 2.0, 2.0).unwrap();

        assert!(s.cells()[1][1].is_blank());
        assert!(s.cells()[2][2].is_blank());
        assert!(!s.cells()[0][0].is_blank());
        assert_eq!(painted(&s).len(), 12);
    }

    #[test]
    fn restore_brings_back_the_transform() {
        let mut s = GridSurface::new(4, 1);
        s.save().unwrap();
        s.translate(2.0, 0.0).unwrap();
        s.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        s.restore().unwrap();
        s.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        // Unbalanced restore is a no-op.
        s.restore().unwrap();

        assert_eq!(painted(&s), vec![(0, 0), (2, 0)]);
    }

    #[test]
    fn stroke_rect_draws_only_the_outline() {
        let mut s = GridSurface::new(8, 6);
        s.stroke_rect(1.0, 1.0, 4.0, 3.0).unwrap();

        assert!(!s.cells()[1][1].is_blank());
        assert!(!s.cells()[2][5].is_blank());
        assert!(!s.cells()[4][3].is_blank());
        assert!(s.cells()[2][3].is_blank());
        assert!(s.cells()[0][0].is_blank());
    }

    #[test]
    fn dashed_line_skips_gaps() {
        let mut s = GridSurface::new(12, 1);
        s.set_line_dash(&[2.0, 2.0]).unwrap();
        s.begin_path().unwrap();
        s.move_to(0.0, 0.0).unwrap();
        s.line_to(10.0, 0.0).unwrap();
        s.stroke().unwrap();

        let xs: Vec<usize> = painted(&s).into_iter().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![0, 1, 4, 5, 8, 9]);
    }

    fn far_line(style: LineStyle, y: f64) -> Element {
        rect(RectOptions::default()).with_children([line(LineOptions {
            points: vec![Point::new(0.0, y), Point::new(1e11, y)],
            style,
            ..LineOptions::default()
        })])
    }

    #[test]
    fn far_endpoints_are_clipped_to_the_grid() {
        let mut s = GridSurface::new(80, 24);
        Player::render(Some(&far_line(LineStyle::default(), 5.0)), &mut s).unwrap();

        assert!(s.cells()[5].iter().all(|c| !c.is_blank()));
        assert_eq!(painted(&s).len(), 80);
    }

    #[test]
    fn huge_round_capped_width_fills_the_grid() {
        let style = LineStyle {
            line_width: 1e9,
            line_cap: LineCap::Round,
            ..LineStyle::default()
        };
        let mut s = GridSurface::new(80, 24);
        Player::render(Some(&far_line(style, 0.0)), &mut s).unwrap();

        assert_eq!(painted(&s).len(), 80 * 24);
    }

    #[test]
    fn far_dashed_line_keeps_its_pattern() {
        let style = LineStyle {
            line_dash: vec![2.0, 2.0],
            ..LineStyle::default()
        };
        let mut s = GridSurface::new(12, 1);
        Player::render(Some(&far_line(style, 0.5)), &mut s).unwrap();

        let xs: Vec<usize> = painted(&s).into_iter().map(|(x, _)| x).collect();
        assert_eq!(xs, vec![0, 1, 4, 5, 8, 9]);
    }

    #[test]
    fn non_finite_arc_is_ignored() {
        let mut s = GridSurface::new(4, 4);
        s.begin_path().unwrap();
        s.arc(2.0, 2.0, f64::INFINITY, 0.0, TAU, false).unwrap();
        s.arc(2.0, 2.0, 1.0, 0.0, f64::NAN, false).unwrap();
        s.fill().unwrap();
        s.stroke().unwrap();

        assert!(painted(&s).is_empty());
    }

    #[test]
    fn odd_dash_lists_repeat() {
        let mut s = GridSurface::new(1, 1);
        s.set_line_dash(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.state.dash, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
        s.set_line_dash(&[1.0, -1.0]).unwrap();
        assert_eq!(s.state.dash.len(), 6);
    }

    #[test]
    fn path_fill_matches_fill_rect() {
        let mut by_path = GridSurface::new(6, 6);
        by_path.begin_path().unwrap();
        by_path.move_to(1.0, 1.0).unwrap();
        by_path.line_to(4.0, 1.0).unwrap();
        by_path.line_to(4.0, 5.0).unwrap();
        by_path.line_to(1.0, 5.0).unwrap();
        by_path.close_path().unwrap();
        by_path.fill().unwrap();

        let mut by_rect = GridSurface::new(6, 6);
        by_rect.fill_rect(1.0, 1.0, 3.0, 4.0).unwrap();

        assert_eq!(by_path.cells(), by_rect.cells());
    }

    #[test]
    fn full_circle_fills_around_its_centre() {
        let mut s = GridSurface::new(10, 10);
        s.begin_path().unwrap();
        s.arc(5.0, 5.0, 3.0, 0.0, TAU, false).unwrap();
        s.fill().unwrap();

        assert!(!s.cells()[4][4].is_blank());
        assert!(!s.cells()[5][7].is_blank());
        assert!(s.cells()[0][0].is_blank());
        assert!(s.cells()[9][9].is_blank());
        assert!(matches!(
            s.arc(0.0, 0.0, -1.0, 0.0, 1.0, false),
            Err(PlayError::InvalidArguments { operation: "arc", .. })
        ));
    }

    #[test]
    fn text_alignment() {
        let mut s = GridSurface::new(10, 2);
        s.fill_text("abc", 5.0, 0.0, None).unwrap();
        s.set_text_align(TextAlign::Right).unwrap();
        s.fill_text("xyz", 5.0, 1.0, None).unwrap();

        assert_eq!(row_text(&s, 0), "     abc  ");
        assert_eq!(row_text(&s, 1), "  xyz     ");
    }

    #[test]
    fn text_is_cut_to_max_width_and_keeps_background() {
        let mut s = GridSurface::new(8, 1);
        s.set_fill_style("blue").unwrap();
        s.fill_rect(0.0, 0.0, 8.0, 1.0).unwrap();
        s.set_fill_style("white").unwrap();
        s.fill_text("hello", 0.0, 0.0, Some(3.0)).unwrap();

        assert_eq!(row_text(&s, 0), "hel     ");
        let style = s.cells()[0][0].style;
        assert_eq!(style.fg, Some(Color::Named(NamedColor::White)));
        assert_eq!(style.bg, Some(Color::Named(NamedColor::Blue)));
    }

    #[test]
    fn invalid_colours_are_ignored() {
        let mut s = GridSurface::new(1, 1);
        s.set_fill_style("red").unwrap();
        s.set_fill_style("notacolor").unwrap();
        s.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();

        assert_eq!(s.cells()[0][0], Cell::painted(red()));
    }

    #[test]
    fn images_are_sliced_and_scaled() {
        let mut s = GridSurface::new(8, 2);
        s.register_image(ImageHandle::new("ab"), Sprite::from_text("ab", Style::default()));

        s.draw_image(&ImageHandle::new("ab"), ImagePlacement::At { dx: 3.0, dy: 1.0 })
            .unwrap();
        assert_eq!(row_text(&s, 1), "   ab   ");

        s.draw_image(
            &ImageHandle::new("ab"),
            ImagePlacement::Scaled {
                dx: 0.0,
                dy: 0.0,
                dw: 4.0,
                dh: 1.0,
            },
        )
        .unwrap();
        assert_eq!(row_text(&s, 0), "aabb    ");

        s.draw_image(
            &ImageHandle::new("ab"),
            ImagePlacement::Sliced {
                sx: 1.0,
                sy: 0.0,
                sw: 1.0,
                sh: 1.0,
                dx: 6.0,
                dy: 0.0,
                dw: 2.0,
                dh: 1.0,
            },
        )
        .unwrap();
        assert_eq!(row_text(&s, 0), "aabb  bb");
    }

    #[test]
    fn unknown_images_fail() {
        let mut s = GridSurface::new(2, 2);
        let err = s
            .draw_image(&ImageHandle::new("ghost"), ImagePlacement::At { dx: 0.0, dy: 0.0 })
            .unwrap_err();
        assert!(matches!(err, PlayError::UnknownImage(name) if name == "ghost"));
    }

    #[test]
    fn resize_clears_the_grid() {
        let mut s = GridSurface::new(2, 2);
        s.fill_rect(0.0, 0.0, 2.0, 2.0).unwrap();
        s.resize(3, 1);

        assert_eq!(s.size(), (3.0, 1.0));
        assert!(painted(&s).is_empty());
    }

    #[test]
    fn diff_lists_changed_cells() {
        let mut s = GridSurface::new(3, 2);
        let before = s.cells().to_vec();
        s.fill_rect(2.0, 1.0, 1.0, 1.0).unwrap();

        let changes = diff(&before, s.cells());
        assert_eq!(
            changes,
            vec![CellChange {
                x: 2,
                y: 1,
                cell: Cell::painted(Color::Named(NamedColor::Black)),
            }]
        );
    }

    #[test]
    fn renders_a_compiled_frame() {
        let root = rect(RectOptions {
            draw: vec![crate::compiler::source::Paint::fill("blue")],
            ..RectOptions::default()
        })
        .with_children([text(TextOptions {
            value: "Hi".into(),
            x: 1.0,
            ..TextOptions::default()
        })]);
        let mut s = GridSurface::new(4, 2);
        Player::render(Some(&root), &mut s).unwrap();

        assert_eq!(row_text(&s, 0), " Hi ");
        assert_eq!(s.cells()[1][3], Cell::painted(Color::Named(NamedColor::Blue)));
        assert_eq!(s.cells()[0][1].style.fg, Some(Color::Named(NamedColor::Black)));
    }
}
