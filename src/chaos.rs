use math::Vec2;

/// Triangle corners of a `width` by `height` canvas: top middle, bottom
/// right, bottom left.
pub fn triangle(width: f64, height: f64) -> [Vec2; 3] {
    [
        Vec2::new(width / 2.0, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ]
}

/// Chaos game: starting from a random point, repeatedly jumps halfway to a
/// random corner. A corner is skipped when its index equals
/// `(previous + 2) % 4`.
pub fn points(rng: &mut fastrand::Rng, corners: &[Vec2], count: usize) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(count);
    if corners.is_empty() {
        return out;
    }

    let mut point = Vec2::new(rng.u32(0..=500) as f64, rng.u32(0..=500) as f64);
    let mut previous: Option<usize> = None;
    while out.len() < count {
        let current = rng.usize(0..corners.len());
        if previous.is_some_and(|p| (p + 2) % 4 == current) {
            continue;
        }
        previous = Some(current);
        point = Vec2::lerp(point, corners[current], 0.5);
        out.push(point);
    }
    out
}
