/**
 * Integer vector used for refinement ratios, offsets and shifts
 */
pub type IntVector<const DIM: usize> = [i64; DIM];




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]


/**
 * Represents a rectangular region in a discrete DIM-dimensional index space.
 * Both corners are inclusive, so a box with `lower == upper` holds one cell.
 * A box with `upper[d] < lower[d]` on any axis is empty; empty boxes are
 * ordinary values and every operation below accepts them.
 */
pub struct IndexBox<const DIM: usize> {
    lower: [i64; DIM],
    upper: [i64; DIM],
}




/**
 * Describes a rectangular index space. The index type is signed 64-bit integer.
 */
impl<const DIM: usize> IndexBox<DIM> {


    pub fn new(lower: [i64; DIM], upper: [i64; DIM]) -> Self {
        Self { lower, upper }
    }


    /**
     * Return the canonical empty box.
     */
    pub fn empty() -> Self {
        Self { lower: [0; DIM], upper: [-1; DIM] }
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn lower(&self) -> [i64; DIM] {
        self.lower
    }


    /**
     * Return the maximum index (inclusive).
     */
    pub fn upper(&self) -> [i64; DIM] {
        self.upper
    }


    pub fn is_empty(&self) -> bool {
        (0..DIM).any(|d| self.upper[d] < self.lower[d])
    }


    /**
     * Return the number of cells along the given axis, zero if the box is
     * empty.
     */
    pub fn num_cells(&self, axis: usize) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.upper[axis] - self.lower[axis] + 1
        }
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn dim(&self) -> [usize; DIM] {
        let mut dim = [0; DIM];

        for (d, n) in dim.iter_mut().enumerate() {
            *n = self.num_cells(d) as usize
        }
        dim
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        self.dim().iter().product()
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: [i64; DIM]) -> bool {
        (0..DIM).all(|d| self.lower[d] <= index[d] && index[d] <= self.upper[d])
    }


    /**
     * Determine whether another index space is a subset of this one. The
     * empty box is a subset of every box.
     */
    pub fn contains_box(&self, other: &Self) -> bool {
        other.is_empty() || (!self.is_empty() && (0..DIM).all(|d| {
            other.lower[d] >= self.lower[d] && other.upper[d] <= self.upper[d]
        }))
    }


    /**
     * Return the overlap of two boxes, which may be empty.
     */
    pub fn intersect(&self, other: &Self) -> Self {
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] = self.lower[d].max(other.lower[d]);
            result.upper[d] = self.upper[d].min(other.upper[d]);
        }
        if result.is_empty() {
            Self::empty()
        } else {
            result
        }
    }


    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }


    /**
     * Return the smallest box containing both boxes. Empty boxes are ignored.
     */
    pub fn bounding_box(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other
        }
        if other.is_empty() {
            return *self
        }
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] = self.lower[d].min(other.lower[d]);
            result.upper[d] = self.upper[d].max(other.upper[d]);
        }
        result
    }


    /**
     * Map every cell of this box onto the `ratio[d]` fine cells it covers on
     * each axis. Ratios must be positive.
     */
    pub fn refine(&self, ratio: IntVector<DIM>) -> Self {
        assert!(ratio.iter().all(|&r| r > 0), "refinement ratio must be positive");

        if self.is_empty() {
            return *self
        }
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] = self.lower[d] * ratio[d];
            result.upper[d] = self.upper[d] * ratio[d] + ratio[d] - 1;
        }
        result
    }


    /**
     * Return the coarse box containing every coarse cell which covers a cell
     * of this box. Both corners round toward negative infinity, so refining
     * the result always contains the original box. Ratios must be positive.
     */
    pub fn coarsen(&self, ratio: IntVector<DIM>) -> Self {
        assert!(ratio.iter().all(|&r| r > 0), "coarsening ratio must be positive");

        if self.is_empty() {
            return *self
        }
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] = self.lower[d].div_euclid(ratio[d]);
            result.upper[d] = self.upper[d].div_euclid(ratio[d]);
        }
        result
    }


    /**
     * Determine whether this box is exactly the refinement of a coarse box,
     * i.e. both faces lie on multiples of the ratio on every axis.
     */
    pub fn is_divisible_by(&self, ratio: IntVector<DIM>) -> bool {
        (0..DIM).all(|d| {
            ratio[d] > 0 &&
            self.lower[d].rem_euclid(ratio[d]) == 0 &&
            (self.upper[d] + 1).rem_euclid(ratio[d]) == 0
        })
    }


    /**
     * Expand this index space by the given number of elements on each axis.
     */
    pub fn grow(&self, width: IntVector<DIM>) -> Self {
        if self.is_empty() {
            return *self
        }
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] -= width[d];
            result.upper[d] += width[d];
        }
        result
    }


    pub fn grow_all(&self, delta: i64) -> Self {
        self.grow([delta; DIM])
    }


    pub fn shift(&self, offset: IntVector<DIM>) -> Self {
        if self.is_empty() {
            return *self
        }
        let mut result = *self;

        for d in 0..DIM {
            result.lower[d] += offset[d];
            result.upper[d] += offset[d];
        }
        result
    }


    /**
     * Return the box of side indexes normal to the given axis: the cell box
     * with its upper corner extended by one along that axis.
     */
    pub fn side_box(&self, axis: usize) -> Self {
        if self.is_empty() {
            return *self
        }
        let mut result = *self;
        result.upper[axis] += 1;
        result
    }


    /**
     * Return the linear offset for the given index, in a row-major memory
     * buffer aligned with the start of this index space.
     */
    pub fn row_major_offset(&self, index: [i64; DIM]) -> usize {
        let mut offset = 0;

        for d in 0..DIM {
            let n = (self.upper[d] - self.lower[d] + 1) as usize;
            offset = offset * n + (index[d] - self.lower[d]) as usize;
        }
        offset
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> IndexIter<DIM> {
        IndexIter {
            space: *self,
            next: if self.is_empty() { None } else { Some(self.lower) },
        }
    }
}




// ============================================================================
impl<const DIM: usize> IntoIterator for &IndexBox<DIM> {
    type Item = [i64; DIM];
    type IntoIter = IndexIter<DIM>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}




/**
 * Row-major traversal of the indexes in an `IndexBox`.
 */
pub struct IndexIter<const DIM: usize> {
    space: IndexBox<DIM>,
    next: Option<[i64; DIM]>,
}




// ============================================================================
impl<const DIM: usize> Iterator for IndexIter<DIM> {
    type Item = [i64; DIM];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut index = current;
        let mut advanced = false;

        for d in (0..DIM).rev() {
            if index[d] < self.space.upper[d] {
                index[d] += 1;
                advanced = true;
                break;
            }
            index[d] = self.space.lower[d];
        }
        self.next = if advanced { Some(index) } else { None };
        Some(current)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::IndexBox;

    #[test]
    fn intersection_of_disjoint_boxes_is_empty() {
        let a = IndexBox::new([0, 0], [3, 3]);
        let b = IndexBox::new([4, 0], [7, 3]);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&b).len(), 0);
        assert_eq!(a.intersect(&a.grow_all(1)), a);
    }

    #[test]
    fn refine_then_coarsen_recovers_box() {
        let b = IndexBox::new([-3, 2, 0], [4, 9, 0]);
        let r = [2, 3, 4];
        assert_eq!(b.refine(r).coarsen(r), b);
        assert_eq!(b.refine(r), IndexBox::new([-6, 6, 0], [9, 29, 3]));
    }

    #[test]
    fn coarsen_then_refine_recovers_divisible_box() {
        let b = IndexBox::new([-4, 0], [7, 11]);
        assert!(b.is_divisible_by([2, 4]));
        assert_eq!(b.coarsen([2, 4]).refine([2, 4]), b);
    }

    #[test]
    fn coarsen_rounds_toward_negative_infinity() {
        let b = IndexBox::new([-3, 1], [4, 6]);
        let c = b.coarsen([2, 4]);
        assert_eq!(c, IndexBox::new([-2, 0], [2, 1]));
        assert!(!b.is_divisible_by([2, 4]));
        assert!(c.refine([2, 4]).contains_box(&b));
    }

    #[test]
    fn empty_boxes_are_values() {
        let e = IndexBox::<3>::empty();
        assert!(e.is_empty());
        assert_eq!(e.refine([2, 2, 2]), e);
        assert_eq!(e.coarsen([2, 2, 2]), e);
        assert_eq!(e.iter().count(), 0);
        assert!(IndexBox::new([0, 0, 0], [1, 1, 1]).contains_box(&e));
        assert!(e.grow_all(1).is_empty());
        assert!(e.grow([0, 3, 1]).is_empty());
        assert_eq!(e.shift([5, -5, 1]), e);
    }

    #[test]
    fn traversal_is_row_major() {
        let b = IndexBox::new([1, 5], [2, 7]);
        let indexes: Vec<_> = b.iter().collect();
        assert_eq!(indexes.len(), 6);
        assert_eq!(indexes[0], [1, 5]);
        assert_eq!(indexes[1], [1, 6]);
        assert_eq!(indexes[3], [2, 5]);
        for (n, index) in indexes.iter().enumerate() {
            assert_eq!(b.row_major_offset(*index), n);
        }
    }

    #[test]
    fn side_box_extends_upper_face_only() {
        let b = IndexBox::new([0, 0], [3, 1]);
        assert_eq!(b.side_box(0), IndexBox::new([0, 0], [4, 1]));
        assert_eq!(b.side_box(1), IndexBox::new([0, 0], [3, 2]));
    }
}
