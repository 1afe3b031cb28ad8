use core::marker::PhantomData;
use rand::Rng;
use crate::array_data::ArrayData;
use crate::index_space::IndexBox;
use crate::scalar::Scalar;
use crate::side_data::SideData;




/**
 * Elementwise arithmetic, reductions and random fills on `ArrayData`. Every
 * operation takes a box, and acts only on the intersection of that box with
 * the valid boxes of all the arrays involved; values outside the
 * intersection are left untouched.
 *
 * The engine holds no state, so one instance may be shared between threads
 * operating on different arrays. Division and reciprocal do not guard
 * against zero divisors: floating point types produce infinities or NaN and
 * integer types panic, as the underlying arithmetic does.
 *
 * A destination cannot be borrowed as a source at the same time. Where the
 * destination is also an operand, as in `y = a * x + y`, use the `_in_place`
 * form of the operation.
 *
 * Reductions use the total order of `Scalar::precedes`, so min and max do
 * not depend on the order values are visited, even with NaN present.
 */
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayDataBasicOps<T> {
    element: PhantomData<T>,
}




// ============================================================================
impl<T: Scalar> ArrayDataBasicOps<T> {

    pub fn new() -> Self {
        Self { element: PhantomData }
    }

    /// dst = alpha * src
    pub fn scale<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map1(dst, src, region, |x| alpha * x)
    }

    /// dst = src + alpha
    pub fn add_scalar<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        map1(dst, src, region, |x| x + alpha)
    }

    /// dst = src1 + src2
    pub fn add<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| x + y)
    }

    /// dst = src1 - src2
    pub fn subtract<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| x - y)
    }

    /// dst = src1 * src2
    pub fn multiply<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| x * y)
    }

    /// dst = src1 / src2
    pub fn divide<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| x / y)
    }

    /// dst = 1 / src
    pub fn reciprocal<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map1(dst, src, region, |x| T::one() / x)
    }

    /// dst = alpha * src1 + beta * src2
    pub fn linear_sum<const DIM: usize>(
        &self,
        dst: &mut ArrayData<T, DIM>,
        alpha: T,
        src1: &ArrayData<T, DIM>,
        beta: T,
        src2: &ArrayData<T, DIM>,
        region: &IndexBox<DIM>)
    {
        map2(dst, src1, src2, region, |x, y| alpha * x + beta * y)
    }

    /// dst = alpha * src1 + src2
    pub fn axpy<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| alpha * x + y)
    }

    /// dst = alpha * src1 - src2
    pub fn axmy<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src1: &ArrayData<T, DIM>, src2: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        map2(dst, src1, src2, region, |x, y| alpha * x - y)
    }

    /// dst = alpha * dst
    pub fn scale_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        update0(dst, region, |x| alpha * x)
    }

    /// dst = dst + alpha
    pub fn add_scalar_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        update0(dst, region, |x| x + alpha)
    }

    /// dst = 1 / dst
    pub fn reciprocal_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update0(dst, region, |x| T::one() / x)
    }

    /// dst = dst + src
    pub fn add_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| d + s)
    }

    /// dst = dst - src
    pub fn subtract_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| d - s)
    }

    /// dst = dst * src
    pub fn multiply_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| d * s)
    }

    /// dst = dst / src
    pub fn divide_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| d / s)
    }

    /// dst = alpha * src + beta * dst
    pub fn linear_sum_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src: &ArrayData<T, DIM>, beta: T, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| alpha * s + beta * d)
    }

    /// dst = alpha * src + dst
    pub fn axpy_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| alpha * s + d)
    }

    /// dst = alpha * src - dst
    pub fn axmy_in_place<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, alpha: T, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>) {
        update1(dst, src, region, |d, s| alpha * s - d)
    }

    /**
     * Return the smallest value, over all components, in the region. Returns
     * `None` if the region does not overlap the valid box.
     */
    pub fn min<const DIM: usize>(&self, data: &ArrayData<T, DIM>, region: &IndexBox<DIM>) -> Option<T> {
        reduce(data, region, |acc, x| if x.precedes(&acc) { x } else { acc })
    }

    /**
     * Return the largest value, over all components, in the region. Returns
     * `None` if the region does not overlap the valid box.
     */
    pub fn max<const DIM: usize>(&self, data: &ArrayData<T, DIM>, region: &IndexBox<DIM>) -> Option<T> {
        reduce(data, region, |acc, x| if acc.precedes(&x) { x } else { acc })
    }

    /**
     * Set each value in the region to `low + width * u`, with `u` drawn
     * independently from a uniform distribution over `[0, 1)`, using the
     * thread-local generator.
     */
    pub fn set_random_values<const DIM: usize>(&self, dst: &mut ArrayData<T, DIM>, width: T, low: T, region: &IndexBox<DIM>) {
        self.set_random_values_with_rng(dst, width, low, region, &mut rand::rng())
    }

    pub fn set_random_values_with_rng<R: Rng, const DIM: usize>(
        &self,
        dst: &mut ArrayData<T, DIM>,
        width: T,
        low: T,
        region: &IndexBox<DIM>,
        rng: &mut R)
    {
        for index in &region.intersect(dst.valid_box()) {
            for x in dst.get_slice_mut(index) {
                *x = T::random_value(low, width, rng)
            }
        }
    }
}




/**
 * The operations of `ArrayDataBasicOps` applied to side-centered data. The
 * box argument is a box of cells; for each axis it is converted to the
 * corresponding side box before the operation is applied to that axis'
 * array. Reductions range over the arrays of all axes.
 */
#[derive(Clone, Copy, Debug, Default)]
pub struct PatchSideDataBasicOps<T> {
    array_ops: ArrayDataBasicOps<T>,
}




// ============================================================================
impl<T: Scalar> PatchSideDataBasicOps<T> {

    pub fn new() -> Self {
        Self { array_ops: ArrayDataBasicOps::new() }
    }

    pub fn scale<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.scale(dst.array_mut(axis), alpha, src.array(axis), &region.side_box(axis))
        }
    }

    pub fn add_scalar<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.add_scalar(dst.array_mut(axis), src.array(axis), alpha, &region.side_box(axis))
        }
    }

    pub fn add<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.add(dst.array_mut(axis), src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn subtract<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.subtract(dst.array_mut(axis), src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn multiply<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.multiply(dst.array_mut(axis), src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn divide<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.divide(dst.array_mut(axis), src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn reciprocal<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.reciprocal(dst.array_mut(axis), src.array(axis), &region.side_box(axis))
        }
    }

    pub fn linear_sum<const DIM: usize>(
        &self,
        dst: &mut SideData<T, DIM>,
        alpha: T,
        src1: &SideData<T, DIM>,
        beta: T,
        src2: &SideData<T, DIM>,
        region: &IndexBox<DIM>)
    {
        for axis in 0..DIM {
            self.array_ops.linear_sum(dst.array_mut(axis), alpha, src1.array(axis), beta, src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn axpy<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.axpy(dst.array_mut(axis), alpha, src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn axmy<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src1: &SideData<T, DIM>, src2: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.axmy(dst.array_mut(axis), alpha, src1.array(axis), src2.array(axis), &region.side_box(axis))
        }
    }

    pub fn scale_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.scale_in_place(dst.array_mut(axis), alpha, &region.side_box(axis))
        }
    }

    pub fn add_scalar_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.add_scalar_in_place(dst.array_mut(axis), alpha, &region.side_box(axis))
        }
    }

    pub fn reciprocal_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.reciprocal_in_place(dst.array_mut(axis), &region.side_box(axis))
        }
    }

    pub fn add_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.add_in_place(dst.array_mut(axis), src.array(axis), &region.side_box(axis))
        }
    }

    pub fn subtract_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.subtract_in_place(dst.array_mut(axis), src.array(axis), &region.side_box(axis))
        }
    }

    pub fn multiply_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.multiply_in_place(dst.array_mut(axis), src.array(axis), &region.side_box(axis))
        }
    }

    pub fn divide_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.divide_in_place(dst.array_mut(axis), src.array(axis), &region.side_box(axis))
        }
    }

    pub fn linear_sum_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src: &SideData<T, DIM>, beta: T, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.linear_sum_in_place(dst.array_mut(axis), alpha, src.array(axis), beta, &region.side_box(axis))
        }
    }

    pub fn axpy_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.axpy_in_place(dst.array_mut(axis), alpha, src.array(axis), &region.side_box(axis))
        }
    }

    pub fn axmy_in_place<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, alpha: T, src: &SideData<T, DIM>, region: &IndexBox<DIM>) {
        for axis in 0..DIM {
            self.array_ops.axmy_in_place(dst.array_mut(axis), alpha, src.array(axis), &region.side_box(axis))
        }
    }

    pub fn min<const DIM: usize>(&self, data: &SideData<T, DIM>, region: &IndexBox<DIM>) -> Option<T> {
        (0..DIM)
            .filter_map(|axis| self.array_ops.min(data.array(axis), &region.side_box(axis)))
            .reduce(|acc, x| if x.precedes(&acc) { x } else { acc })
    }

    pub fn max<const DIM: usize>(&self, data: &SideData<T, DIM>, region: &IndexBox<DIM>) -> Option<T> {
        (0..DIM)
            .filter_map(|axis| self.array_ops.max(data.array(axis), &region.side_box(axis)))
            .reduce(|acc, x| if acc.precedes(&x) { x } else { acc })
    }

    pub fn set_random_values<const DIM: usize>(&self, dst: &mut SideData<T, DIM>, width: T, low: T, region: &IndexBox<DIM>) {
        self.set_random_values_with_rng(dst, width, low, region, &mut rand::rng())
    }

    pub fn set_random_values_with_rng<R: Rng, const DIM: usize>(
        &self,
        dst: &mut SideData<T, DIM>,
        width: T,
        low: T,
        region: &IndexBox<DIM>,
        rng: &mut R)
    {
        for axis in 0..DIM {
            self.array_ops.set_random_values_with_rng(dst.array_mut(axis), width, low, &region.side_box(axis), rng)
        }
    }
}




// ============================================================================
fn map1<T, F, const DIM: usize>(dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>, f: F)
where
    T: Scalar,
    F: Fn(T) -> T
{
    assert_eq!(dst.depth(), src.depth(), "operand depths differ");

    let region = region.intersect(dst.valid_box()).intersect(src.valid_box());

    for index in &region {
        let a = src.get_slice(index);
        for (x, &y) in dst.get_slice_mut(index).iter_mut().zip(a) {
            *x = f(y)
        }
    }
}

fn update0<T, F, const DIM: usize>(dst: &mut ArrayData<T, DIM>, region: &IndexBox<DIM>, f: F)
where
    T: Scalar,
    F: Fn(T) -> T
{
    for index in &region.intersect(dst.valid_box()) {
        for x in dst.get_slice_mut(index) {
            *x = f(*x)
        }
    }
}

fn update1<T, F, const DIM: usize>(dst: &mut ArrayData<T, DIM>, src: &ArrayData<T, DIM>, region: &IndexBox<DIM>, f: F)
where
    T: Scalar,
    F: Fn(T, T) -> T
{
    assert_eq!(dst.depth(), src.depth(), "operand depths differ");

    let region = region.intersect(dst.valid_box()).intersect(src.valid_box());

    for index in &region {
        let a = src.get_slice(index);
        for (x, &y) in dst.get_slice_mut(index).iter_mut().zip(a) {
            *x = f(*x, y)
        }
    }
}

fn map2<T, F, const DIM: usize>(
    dst: &mut ArrayData<T, DIM>,
    src1: &ArrayData<T, DIM>,
    src2: &ArrayData<T, DIM>,
    region: &IndexBox<DIM>,
    f: F)
where
    T: Scalar,
    F: Fn(T, T) -> T
{
    assert!(dst.depth() == src1.depth() && dst.depth() == src2.depth(), "operand depths differ");

    let region = region
        .intersect(dst.valid_box())
        .intersect(src1.valid_box())
        .intersect(src2.valid_box());

    for index in &region {
        let a = src1.get_slice(index);
        let b = src2.get_slice(index);
        for (x, (&y, &z)) in dst.get_slice_mut(index).iter_mut().zip(a.iter().zip(b)) {
            *x = f(y, z)
        }
    }
}

fn reduce<T, F, const DIM: usize>(data: &ArrayData<T, DIM>, region: &IndexBox<DIM>, f: F) -> Option<T>
where
    T: Scalar,
    F: Fn(T, T) -> T
{
    region
        .intersect(data.valid_box())
        .iter()
        .flat_map(|index| data.get_slice(index).iter().copied())
        .reduce(f)
}
