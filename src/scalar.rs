use core::cmp::Ordering;
use core::fmt::Debug;
use num_complex::Complex;
use num_traits::Num;
use rand::Rng;




mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for num_complex::Complex<f64> {}
}




/**
 * Element types supported by the patch data operations: `f32`, `f64`, `i32`,
 * `i64` and `Complex<f64>`. Beyond arithmetic, an element type supplies the
 * total order used by min and max reductions and a way to draw a uniformly
 * distributed value.
 */
pub trait Scalar: Num + Copy + Send + Sync + Debug + 'static + sealed::Sealed {

    /// Strict "less than" in the order used by min and max reductions.
    fn precedes(&self, other: &Self) -> bool;

    /// Return `low + width * u`, with `u` drawn uniformly from `[0, 1)`.
    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self;
}




// ============================================================================
/**
 * Floats use the IEEE total order, so a reduction gives the same answer in
 * any order: a positive NaN is greater than every number (max returns it,
 * min skips it) and `-0.0` precedes `0.0`.
 */
impl Scalar for f64 {
    fn precedes(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Less
    }

    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self {
        low + width * rng.random::<f64>()
    }
}

impl Scalar for f32 {
    fn precedes(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Less
    }

    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self {
        low + width * rng.random::<f32>()
    }
}

impl Scalar for i64 {
    fn precedes(&self, other: &Self) -> bool {
        self < other
    }

    /// The scaled offset is truncated toward zero.
    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self {
        low + (width as f64 * rng.random::<f64>()) as i64
    }
}

impl Scalar for i32 {
    fn precedes(&self, other: &Self) -> bool {
        self < other
    }

    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self {
        low + (width as f64 * rng.random::<f64>()) as i32
    }
}




/**
 * Complex values are ordered by magnitude. Values of equal magnitude are
 * ordered by real part, then by imaginary part, so min returns the candidate
 * with the smaller real part and max the one with the larger.
 */
impl Scalar for Complex<f64> {
    fn precedes(&self, other: &Self) -> bool {
        self.norm_sqr().total_cmp(&other.norm_sqr())
            .then(self.re.total_cmp(&other.re))
            .then(self.im.total_cmp(&other.im)) == Ordering::Less
    }

    /// Real and imaginary parts are drawn independently.
    fn random_value<R: Rng>(low: Self, width: Self, rng: &mut R) -> Self {
        Complex::new(
            low.re + width.re * rng.random::<f64>(),
            low.im + width.im * rng.random::<f64>())
    }
}
