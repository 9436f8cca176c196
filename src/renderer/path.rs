//! Path geometry in device space: subpaths, arc sweeps and dash splitting.

use std::f64::consts::TAU;

use glam::DVec2;

#[derive(Debug, Clone, Default)]
pub(crate) struct Subpath {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

/// The current path. Points are stored already transformed, so a transform
/// change after `lineTo` does not move earlier points.
#[derive(Debug, Clone, Default)]
pub(crate) struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    pub fn clear(&mut self) {
        self.subpaths.clear();
    }

    pub fn move_to(&mut self, p: DVec2) {
        self.subpaths.push(Subpath {
            points: vec![p],
            closed: false,
        });
    }

    /// Without a current point this behaves like `move_to`.
    pub fn line_to(&mut self, p: DVec2) {
        match self.subpaths.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(p),
            _ => self.move_to(p),
        }
    }

    /// Close the current subpath and start a new one at its first point.
    pub fn close(&mut self) {
        let Some(sub) = self.subpaths.last_mut() else {
            return;
        };
        if sub.closed {
            return;
        }
        sub.closed = true;
        let first = sub.points[0];
        self.move_to(first);
    }

    /// Rings for filling; every subpath is implicitly closed.
    pub fn rings(&self) -> impl Iterator<Item = &[DVec2]> {
        self.subpaths
            .iter()
            .filter(|s| s.points.len() > 1)
            .map(|s| s.points.as_slice())
    }

    /// Polylines for stroking, closing points appended.
    pub fn polylines(&self) -> impl Iterator<Item = Vec<DVec2>> + '_ {
        self.subpaths
            .iter()
            .filter(|s| s.points.len() > 1)
            .map(|s| {
                let mut points = s.points.clone();
                if s.closed {
                    points.push(s.points[0]);
                }
                points
            })
    }
}

/// Signed sweep of a canvas arc. Positive is clockwise on screen.
///
/// A sweep that covers a whole turn or more in the drawing direction is
/// clamped to one full circle; otherwise the angle difference is wrapped into
/// a single turn.
pub(crate) fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise {
        if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        }
    } else if start - end >= TAU {
        -TAU
    } else {
        -(start - end).rem_euclid(TAU)
    }
}

/// Points along an arc in user space, endpoints included.
pub(crate) fn arc_points(
    center: DVec2,
    radius: f64,
    start: f64,
    sweep: f64,
    device_scale: f64,
) -> Vec<DVec2> {
    let device_length = sweep.abs() * radius * device_scale;
    let steps = (device_length.ceil() as usize).clamp(8, 512);
    (0..=steps)
        .map(|i| {
            let angle = start + sweep * i as f64 / steps as f64;
            center + radius * DVec2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Dash periods shorter than this many cells cannot be told apart from a
/// solid line and are drawn solid.
const MIN_DASH_PERIOD: f64 = 0.5;

/// Axis-aligned region strokes are clipped to, in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

/// Clip `a`-`b` to `bounds` (Liang-Barsky). Returns the visible parameter
/// range along the segment, or `None` if nothing of it is inside.
pub(crate) fn clip_segment(a: DVec2, b: DVec2, bounds: Bounds) -> Option<(f64, f64)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-d.x, a.x - bounds.min.x),
        (d.x, bounds.max.x - a.x),
        (-d.y, a.y - bounds.min.y),
        (d.y, bounds.max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((t0, t1))
}

/// Position inside a dash pattern.
struct DashCursor<'p> {
    pattern: &'p [f64],
    index: usize,
    remaining: f64,
    on: bool,
}

impl<'p> DashCursor<'p> {
    fn new(pattern: &'p [f64]) -> Self {
        DashCursor {
            pattern,
            index: 0,
            remaining: pattern[0],
            on: true,
        }
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.pattern.len();
        self.remaining = self.pattern[self.index];
        self.on = !self.on;
    }

    /// Move the phase along `distance` without drawing. Whole periods are
    /// dropped first, so the cost does not grow with the distance.
    fn skip(&mut self, distance: f64, period: f64) {
        if !distance.is_finite() {
            return;
        }
        let mut left = distance % period;
        while left > 0.0 {
            if left < self.remaining {
                self.remaining -= left;
                return;
            }
            left -= self.remaining;
            self.advance();
        }
    }

    fn walk(&mut self, start: DVec2, end: DVec2, out: &mut Vec<(DVec2, DVec2)>) {
        let length = start.distance(end);
        if !(length > 0.0) {
            return;
        }
        let dir = (end - start) / length;
        let mut pos = 0.0;
        while pos < length {
            let step = self.remaining.min(length - pos);
            if self.on && step > 0.0 {
                out.push((start + dir * pos, start + dir * (pos + step)));
            }
            pos += step;
            self.remaining -= step;
            if self.remaining <= 1e-9 {
                self.advance();
            }
        }
    }
}

/// Split a polyline into the visible pieces inside `bounds`.
///
/// An empty pattern, or one whose period is under half a cell, draws every
/// segment solid. The pattern continues across the corners of one polyline
/// and across the parts clipped away.
pub(crate) fn dash_pieces(
    points: &[DVec2],
    pattern: &[f64],
    bounds: Bounds,
) -> Vec<(DVec2, DVec2)> {
    let mut pattern = pattern.to_vec();
    if pattern.len() % 2 == 1 {
        pattern.extend_from_within(..);
    }
    let period: f64 = pattern.iter().sum();
    let solid = pattern.is_empty() || !(period >= MIN_DASH_PERIOD);

    let mut pieces = Vec::new();
    let mut dash = (!solid).then(|| DashCursor::new(&pattern));
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let length = a.distance(b);
        if !(length > 0.0) {
            continue;
        }
        let Some((t0, t1)) = clip_segment(a, b, bounds) else {
            if let Some(dash) = dash.as_mut() {
                dash.skip(length, period);
            }
            continue;
        };
        let (start, end) = (a.lerp(b, t0), a.lerp(b, t1));
        match dash.as_mut() {
            None => pieces.push((start, end)),
            Some(dash) => {
                dash.skip(length * t0, period);
                dash.walk(start, end, &mut pieces);
                dash.skip(length * (1.0 - t1), period);
            }
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn sweep_follows_direction() {
        assert!((arc_sweep(0.0, FRAC_PI_2, false) - FRAC_PI_2).abs() < 1e-12);
        assert!((arc_sweep(0.0, FRAC_PI_2, true) + 3.0 * FRAC_PI_2).abs() < 1e-12);
        assert!((arc_sweep(PI, 0.0, false) - PI).abs() < 1e-12);
    }

    #[test]
    fn sweep_is_clamped_to_one_turn() {
        assert_eq!(arc_sweep(0.0, 7.0, false), TAU);
        assert_eq!(arc_sweep(7.0, 0.0, true), -TAU);
        // Wrong direction for a big difference wraps instead of clamping.
        assert!(arc_sweep(0.0, 7.0, true) < 0.0);
        assert!(arc_sweep(0.0, 7.0, true) > -TAU);
    }

    #[test]
    fn arc_points_hit_both_ends() {
        let pts = arc_points(DVec2::new(5.0, 5.0), 2.0, 0.0, PI, 1.0);
        assert!(pts[0].distance(DVec2::new(7.0, 5.0)) < 1e-9);
        assert!(pts[pts.len() - 1].distance(DVec2::new(3.0, 5.0)) < 1e-9);
    }

    const WIDE: Bounds = Bounds {
        min: DVec2::splat(-100.0),
        max: DVec2::splat(100.0),
    };

    #[test]
    fn dashes_continue_around_corners() {
        let points = [DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0), DVec2::new(3.0, 3.0)];
        let pieces = dash_pieces(&points, &[2.0, 2.0], WIDE);

        assert_eq!(
            pieces,
            vec![
                (DVec2::new(0.0, 0.0), DVec2::new(2.0, 0.0)),
                (DVec2::new(3.0, 1.0), DVec2::new(3.0, 3.0)),
            ]
        );
    }

    #[test]
    fn zero_pattern_is_solid() {
        let points = [DVec2::ZERO, DVec2::new(4.0, 0.0)];
        assert_eq!(dash_pieces(&points, &[0.0, 0.0], WIDE).len(), 1);
        assert_eq!(dash_pieces(&points, &[], WIDE).len(), 1);
    }

    #[test]
    fn clipped_prefix_keeps_the_dash_phase() {
        let points = [DVec2::new(-10.0, 0.0), DVec2::new(10.0, 0.0)];
        let bounds = Bounds {
            min: DVec2::new(0.0, -1.0),
            max: DVec2::new(100.0, 1.0),
        };

        assert_eq!(
            dash_pieces(&points, &[2.0, 2.0], bounds),
            vec![
                (DVec2::new(2.0, 0.0), DVec2::new(4.0, 0.0)),
                (DVec2::new(6.0, 0.0), DVec2::new(8.0, 0.0)),
            ]
        );
    }

    #[test]
    fn far_segments_are_cut_to_the_bounds() {
        let bounds = Bounds {
            min: DVec2::new(-1.0, -1.0),
            max: DVec2::new(10.0, 10.0),
        };
        let (t0, t1) = clip_segment(DVec2::new(0.0, 5.0), DVec2::new(1e11, 5.0), bounds).unwrap();
        assert_eq!(t0, 0.0);
        assert!(t1 * 1e11 <= 10.0 + 1e-6);

        assert_eq!(
            clip_segment(DVec2::new(0.0, 50.0), DVec2::new(1e11, 50.0), bounds),
            None
        );
        assert_eq!(
            clip_segment(DVec2::new(f64::NAN, 0.0), DVec2::new(1.0, 0.0), bounds),
            None
        );

        let pieces = dash_pieces(
            &[DVec2::new(-1e11, 5.0), DVec2::new(1e11, 5.0)],
            &[1.0, 1.0],
            bounds,
        );
        assert!(!pieces.is_empty());
        assert!(pieces.len() <= 7);
        for (a, b) in pieces {
            assert!(a.x >= -1.001 && b.x <= 10.001);
        }
    }

    #[test]
    fn sub_cell_dashes_draw_solid() {
        let points = [DVec2::ZERO, DVec2::new(4.0, 0.0)];
        assert_eq!(dash_pieces(&points, &[0.1, 0.1], WIDE), vec![(points[0], points[1])]);
    }

    #[test]
    fn closing_starts_a_new_subpath_at_the_first_point() {
        let mut path = Path::default();
        path.move_to(DVec2::new(1.0, 1.0));
        path.line_to(DVec2::new(4.0, 1.0));
        path.close();
        path.line_to(DVec2::new(1.0, 4.0));

        let lines: Vec<_> = path.polylines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].last(), Some(&DVec2::new(1.0, 1.0)));
        assert_eq!(lines[1], vec![DVec2::new(1.0, 1.0), DVec2::new(1.0, 4.0)]);
    }
}
