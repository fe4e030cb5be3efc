//! Polygon rasterization
//!
//! Converts an ordered point sequence into a binary occupancy grid using a
//! scan-line fill followed by an inclusive outline. The polygon is implicitly
//! closed back to its first point.

/// A row-major binary occupancy grid of `height` rows by `width` columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    height: usize,
    width: usize,
    data: Vec<bool>,
}

impl Mask {
    /// Create an all-zero mask
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![false; height * width],
        }
    }

    /// Set a pixel given signed coordinates, ignoring anything off the canvas
    fn set(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 {
            return;
        }
        let (col, row) = (x as usize, y as usize);
        if row < self.height && col < self.width {
            self.data[row * self.width + col] = true;
        }
    }

    /// Set every pixel of row `y` between `x0` and `x1` inclusive
    fn fill_span(&mut self, y: i64, x0: i64, x1: i64) {
        if y < 0 || y as usize >= self.height || self.width == 0 {
            return;
        }
        let max_x = self.width as i64 - 1;
        let (from, to) = (x0.max(0), x1.min(max_x));
        if from > to {
            return;
        }
        let offset = y as usize * self.width;
        for slot in &mut self.data[offset + from as usize..=offset + to as usize] {
            *slot = true;
        }
    }

    /// Iterate over `(row, col)` of every set pixel in row-major order
    pub fn set_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| (i / width, i % width))
    }
}

/// Rasterize a closed polygon onto a `height` x `width` canvas.
///
/// Pixels inside the polygon and on its outline are set. One or two points
/// produce a dot or a line; points entirely off the canvas produce an empty mask.
/// Vertices may lie anywhere; only the part of the shape on the canvas is drawn.
pub fn polygon_to_mask(height: usize, width: usize, points: &[(f64, f64)]) -> Mask {
    let mut mask = Mask::new(height, width);
    if points.is_empty() || height == 0 || width == 0 {
        return mask;
    }

    let vertices: Vec<(f64, f64)> = points
        .iter()
        .map(|&(x, y)| (x.round(), y.round()))
        .collect();
    let edges: Vec<Edge> = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect();

    fill_interior(&mut mask, &edges);
    let bounds = ((width - 1) as f64, (height - 1) as f64);
    for &(a, b) in &edges {
        if let Some((a, b)) = clip_segment(a, b, bounds) {
            draw_line(
                &mut mask,
                (a.0.round() as i64, a.1.round() as i64),
                (b.0.round() as i64, b.1.round() as i64),
            );
        }
    }
    mask
}

type Edge = ((f64, f64), (f64, f64));

fn fill_interior(mask: &mut Mask, edges: &[Edge]) {
    let y_min = edges
        .iter()
        .fold(f64::INFINITY, |acc, &((_, y0), (_, y1))| acc.min(y0).min(y1));
    let y_max = edges
        .iter()
        .fold(f64::NEG_INFINITY, |acc, &((_, y0), (_, y1))| acc.max(y0).max(y1));
    let (y_min, y_max) = (y_min.max(0.0), y_max.min((mask.height - 1) as f64));
    if !(y_min <= y_max) {
        return;
    }

    let mut crossings: Vec<f64> = Vec::with_capacity(edges.len());
    for y in y_min as i64..=y_max as i64 {
        let yf = y as f64;
        crossings.clear();
        for &((x0, y0), (x1, y1)) in edges {
            let (lo, hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
            // Half-open so a shared vertex is counted once; also skips horizontal and NaN edges
            if !(lo <= yf && yf < hi) {
                continue;
            }
            let t = (yf - y0) / (y1 - y0);
            let x = x0 + t * (x1 - x0);
            if !x.is_nan() {
                crossings.push(x);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            // `as` saturates, and fill_span clamps to the canvas
            mask.fill_span(y, pair[0].ceil() as i64, pair[1].floor() as i64);
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` to `[0, max_x] x [0, max_y]`.
///
/// Clipped endpoints are placed on the boundary they were cut at, so a far-off
/// vertex does not lose the precision of the visible part.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (max_x, max_y): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    if ![a.0, a.1, dx, dy].iter().all(|v| v.is_finite()) {
        return None;
    }

    let boundaries = [
        (-dx, a.0, Boundary::X(0.0)),
        (dx, max_x - a.0, Boundary::X(max_x)),
        (-dy, a.1, Boundary::Y(0.0)),
        (dy, max_y - a.1, Boundary::Y(max_y)),
    ];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let (mut enter, mut leave) = (None, None);
    for (p, q, boundary) in boundaries {
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
            if r > t0 {
                t0 = r;
                enter = Some(boundary);
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                leave = Some(boundary);
            }
        }
    }

    let cut = |boundary: Option<Boundary>, end: (f64, f64)| {
        let (x, y) = match boundary {
            None => end,
            Some(Boundary::X(x)) => {
                let base = if (x - a.0).abs() < (x - b.0).abs() { a } else { b };
                (x, base.1 + (x - base.0) * (dy / dx))
            }
            Some(Boundary::Y(y)) => {
                let base = if (y - a.1).abs() < (y - b.1).abs() { a } else { b };
                (base.0 + (y - base.1) * (dx / dy), y)
            }
        };
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    };
    Some((cut(enter, a), cut(leave, b)))
}

#[derive(Clone, Copy)]
enum Boundary {
    X(f64),
    Y(f64),
}

/// Bresenham line, inclusive of both endpoints
fn draw_line(mask: &mut Mask, (x0, y0): (i64, i64), (x1, y1): (i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        mask.set(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
