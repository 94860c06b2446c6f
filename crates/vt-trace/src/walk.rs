use vt_core::{ImageView, Point2f, Polyline2f, Rgba, gray_of};

const CARDINAL_FIRST: [(isize, isize); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];
const CLOCKWISE: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Pixel classifier the tracer walks over. Out-of-bounds is background.
pub trait Foreground {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn is_foreground(&self, x: isize, y: isize) -> bool;
}

/// Foreground = edge map value above `threshold` (128 by default).
#[derive(Debug, Clone, Copy)]
pub struct EdgeForeground<'a> {
    edges: ImageView<'a, u8>,
    threshold: u8,
}

impl<'a> EdgeForeground<'a> {
    pub fn new(edges: ImageView<'a, u8>) -> Self {
        Self {
            edges,
            threshold: 128,
        }
    }

    pub fn with_threshold(edges: ImageView<'a, u8>, threshold: u8) -> Self {
        Self { edges, threshold }
    }
}

impl Foreground for EdgeForeground<'_> {
    fn width(&self) -> usize {
        self.edges.width()
    }

    fn height(&self) -> usize {
        self.edges.height()
    }

    fn is_foreground(&self, x: isize, y: isize) -> bool {
        self.edges
            .get_signed(x, y)
            .is_some_and(|&v| v > self.threshold)
    }
}

/// Foreground = mean RGB strictly below `threshold` (50 by default).
#[derive(Debug, Clone, Copy)]
pub struct DarkForeground<'a> {
    img: ImageView<'a, Rgba>,
    threshold: f64,
}

impl<'a> DarkForeground<'a> {
    pub fn new(img: ImageView<'a, Rgba>) -> Self {
        Self {
            img,
            threshold: 50.0,
        }
    }

    pub fn with_threshold(img: ImageView<'a, Rgba>, threshold: f64) -> Self {
        Self { img, threshold }
    }
}

impl Foreground for DarkForeground<'_> {
    fn width(&self) -> usize {
        self.img.width()
    }

    fn height(&self) -> usize {
        self.img.height()
    }

    fn is_foreground(&self, x: isize, y: isize) -> bool {
        self.img
            .get_signed(x, y)
            .is_some_and(|px| gray_of(px) < self.threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborOrder {
    /// Up, right, down, left, then the diagonals.
    CardinalFirst,
    /// All eight neighbors clockwise starting at up.
    Clockwise,
}

impl NeighborOrder {
    fn offsets(self) -> &'static [(isize, isize); 8] {
        match self {
            Self::CardinalFirst => &CARDINAL_FIRST,
            Self::Clockwise => &CLOCKWISE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    pub order: NeighborOrder,
    pub scan_stride: usize,
    /// Walks shorter than this are dropped.
    pub min_path_len: usize,
}

impl WalkConfig {
    /// Full-resolution scan, cardinal neighbors first.
    pub fn greedy() -> Self {
        Self {
            order: NeighborOrder::CardinalFirst,
            scan_stride: 1,
            min_path_len: 11,
        }
    }

    /// Seeds every third pixel on both axes, clockwise neighbors.
    pub fn polyline() -> Self {
        Self {
            order: NeighborOrder::Clockwise,
            scan_stride: 3,
            min_path_len: 11,
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::greedy()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Walking { x: usize, y: usize },
    Terminated,
}

/// Greedy, non-backtracking path walker.
///
/// One visited mask is shared by every walk of a single [`PathTracer::trace`]
/// call, so each foreground pixel lands in at most one path. Junctions are
/// not resolved: the walk follows the first free neighbor and leaves the
/// other branches to later seeds.
#[derive(Debug, Clone, Default)]
pub struct PathTracer {
    visited: Vec<u8>,
    width: usize,
    height: usize,
}

impl PathTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace<F: Foreground>(&mut self, fg: &F, cfg: &WalkConfig) -> Vec<Polyline2f> {
        self.reset(fg.width(), fg.height());

        let mut paths = Vec::new();
        if self.width == 0 || self.height == 0 {
            return paths;
        }

        let stride = cfg.scan_stride.max(1);
        let offsets = cfg.order.offsets();
        let mut discarded = 0usize;

        for y in (0..self.height).step_by(stride) {
            for x in (0..self.width).step_by(stride) {
                if self.is_visited(x, y) || !fg.is_foreground(x as isize, y as isize) {
                    continue;
                }

                let path = self.walk(fg, x, y, offsets);
                if path.len() >= cfg.min_path_len {
                    paths.push(path);
                } else {
                    discarded += 1;
                }
            }
        }

        tracing::debug!(
            paths = paths.len(),
            discarded,
            width = self.width,
            height = self.height,
            "walked foreground paths"
        );

        paths
    }

    fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let n = width.saturating_mul(height);
        self.visited.clear();
        self.visited.resize(n, 0);
    }

    fn walk<F: Foreground>(
        &mut self,
        fg: &F,
        start_x: usize,
        start_y: usize,
        offsets: &[(isize, isize); 8],
    ) -> Polyline2f {
        let mut points = Vec::new();
        let mut state = WalkState::Walking {
            x: start_x,
            y: start_y,
        };

        while let WalkState::Walking { x, y } = state {
            self.visited[y * self.width + x] = 1;
            points.push(Point2f::from_pixel(x, y));
            state = self.step(fg, x, y, offsets);
        }

        Polyline2f { points }
    }

    fn step<F: Foreground>(
        &self,
        fg: &F,
        x: usize,
        y: usize,
        offsets: &[(isize, isize); 8],
    ) -> WalkState {
        for &(dx, dy) in offsets {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            let Some((ux, uy)) = self.in_bounds(nx, ny) else {
                continue;
            };
            if !self.is_visited(ux, uy) && fg.is_foreground(nx, ny) {
                return WalkState::Walking { x: ux, y: uy };
            }
        }

        WalkState::Terminated
    }

    #[inline]
    fn in_bounds(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }

        let (xu, yu) = (x as usize, y as usize);
        if xu >= self.width || yu >= self.height {
            return None;
        }

        Some((xu, yu))
    }

    #[inline]
    fn is_visited(&self, x: usize, y: usize) -> bool {
        self.visited[y * self.width + x] != 0
    }
}

/// One-shot trace with a fresh visited mask.
pub fn trace_paths<F: Foreground>(fg: &F, cfg: &WalkConfig) -> Vec<Polyline2f> {
    PathTracer::new().trace(fg, cfg)
}
