use core::ops::{Add, Sub, Mul, Div};
use crate::index_space::IntVector;




/**
 * A statically-sized numeric vector, used for mesh spacing and physical
 * coordinates. Arithmetic between two vectors acts component by component.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector<T, const DIM: usize> {
    data: [T; DIM]
}




// ============================================================================
impl<T: Copy, const DIM: usize> Vector<T, DIM> {

    pub fn new(data: [T; DIM]) -> Self {
        Self { data }
    }

    pub fn as_array(&self) -> &[T; DIM] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }

    fn zip_with<F: Fn(T, T) -> T>(self, other: Self, f: F) -> Self {
        let mut data = self.data;

        for (x, y) in data.iter_mut().zip(other.data) {
            *x = f(*x, y)
        }
        Self { data }
    }
}

impl<const DIM: usize> Vector<f64, DIM> {

    /**
     * Convert an integer vector, such as a cell count or index offset, to
     * floating point.
     */
    pub fn from_ints(ints: IntVector<DIM>) -> Self {
        Self { data: ints.map(|i| i as f64) }
    }

    /**
     * Divide each component by the corresponding integer ratio.
     */
    pub fn div_ratio(&self, ratio: IntVector<DIM>) -> Self {
        *self / Self::from_ints(ratio)
    }

    /**
     * Multiply each component by the corresponding integer ratio.
     */
    pub fn mul_ratio(&self, ratio: IntVector<DIM>) -> Self {
        *self * Self::from_ints(ratio)
    }
}




// ============================================================================
impl<T: Copy + Add<Output = T>, const DIM: usize> Add for Vector<T, DIM> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl<T: Copy + Sub<Output = T>, const DIM: usize> Sub for Vector<T, DIM> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl<T: Copy + Mul<Output = T>, const DIM: usize> Mul for Vector<T, DIM> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }
}

impl<T: Copy + Div<Output = T>, const DIM: usize> Div for Vector<T, DIM> {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a / b)
    }
}
