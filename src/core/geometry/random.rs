use rand::Rng;

/// Uniform draw in `[-amount, amount]`; 0 when `amount` is not positive.
#[inline]
pub fn symmetric<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 && amount.is_finite() {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}

/// Uniform draw between two bounds given in any order. Degenerate ranges return `a`.
#[inline]
pub fn between<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi - lo > f32::EPSILON {
        rng.gen_range(lo..=hi)
    } else {
        a
    }
}
