/// Relative tolerance under which two movement distances count as tied.
pub(crate) const DISTANCE_REL_TOLERANCE: f64 = 1e-2;

pub(crate) fn in_bounds(position: (i32, i32), width: u32, height: u32) -> bool {
    let (x, y) = position;
    x >= 0 && y >= 0 && (x as i64) < i64::from(width) && (y as i64) < i64::from(height)
}

pub(crate) fn cell_index(position: (i32, i32), width: u32, height: u32) -> Option<usize> {
    if !in_bounds(position, width, height) {
        return None;
    }
    let (x, y) = position;
    Some(y as usize * width as usize + x as usize)
}

pub(crate) fn position_of(index: usize, width: u32) -> (i32, i32) {
    let width = width as usize;
    ((index % width) as i32, (index / width) as i32)
}

/// Cells within Manhattan distance `radius` of `center`, center included,
/// clipped to the grid. Ordered row by row, then left to right.
pub(crate) fn von_neumann_neighborhood(
    center: (i32, i32),
    radius: u32,
    width: u32,
    height: u32,
) -> Vec<(i32, i32)> {
    let (cx, cy) = center;
    let radius = i64::from(radius);
    let mut cells = Vec::new();
    for dy in -radius..=radius {
        let reach = radius - dy.abs();
        for dx in -reach..=reach {
            let (x, y) = (i64::from(cx) + dx, i64::from(cy) + dy);
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                continue;
            }
            cells.push((x as i32, y as i32));
        }
    }
    cells
}

pub(crate) fn euclidean_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    (dx * dx + dy * dy).sqrt()
}

pub(crate) fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}
