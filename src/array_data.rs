use crate::index_space::{IndexBox, IntVector};




/**
 * A dense array of values defined over a rectangular index space (the ghost
 * box). A sub-region of the ghost box, the valid box, holds the values
 * considered authoritative; the remaining ghost cells hold copies of values
 * owned elsewhere. Each index carries `depth` values, stored contiguously, and
 * indexes are laid out in row-major order over the ghost box.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData<T, const DIM: usize> {
    ghost_box: IndexBox<DIM>,
    valid_box: IndexBox<DIM>,
    depth: usize,
    data: Vec<T>,
}




// ============================================================================
impl<T: Copy, const DIM: usize> ArrayData<T, DIM> {


    /**
     * Allocate an array over the valid box grown by the given number of ghost
     * cells on each axis, with every value set to `fill`.
     */
    pub fn new(valid_box: IndexBox<DIM>, ghosts: IntVector<DIM>, depth: usize, fill: T) -> Self {
        assert!(depth > 0, "array depth must be positive");
        assert!(ghosts.iter().all(|&g| g >= 0), "ghost widths must be non-negative, got {:?}", ghosts);
        let ghost_box = valid_box.grow(ghosts);

        Self {
            ghost_box,
            valid_box,
            depth,
            data: vec![fill; ghost_box.len() * depth],
        }
    }


    /**
     * Generate an array of depth one without ghost cells, with values defined
     * from a closure.
     */
    pub fn from_function<F>(valid_box: IndexBox<DIM>, f: F) -> Self
    where
        F: Fn([i64; DIM]) -> T
    {
        Self {
            ghost_box: valid_box,
            valid_box,
            depth: 1,
            data: valid_box.iter().map(f).collect(),
        }
    }

    pub fn ghost_box(&self) -> &IndexBox<DIM> {
        &self.ghost_box
    }

    pub fn valid_box(&self) -> &IndexBox<DIM> {
        &self.valid_box
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn get(&self, index: [i64; DIM], component: usize) -> T {
        self.data[self.offset(index, component)]
    }

    pub fn set(&mut self, index: [i64; DIM], component: usize, value: T) {
        let n = self.offset(index, component);
        self.data[n] = value
    }

    /**
     * Return all components stored at the given index.
     */
    pub fn get_slice(&self, index: [i64; DIM]) -> &[T] {
        let n = self.offset(index, 0);
        &self.data[n .. n + self.depth]
    }

    pub fn get_slice_mut(&mut self, index: [i64; DIM]) -> &mut [T] {
        let n = self.offset(index, 0);
        &mut self.data[n .. n + self.depth]
    }

    /**
     * Set every component at each index of the region, within the ghost box,
     * to the given value.
     */
    pub fn fill(&mut self, value: T, region: &IndexBox<DIM>) {
        for index in &region.intersect(&self.ghost_box) {
            self.get_slice_mut(index).fill(value)
        }
    }

    /**
     * Return the values of one component over a region, in row-major order.
     */
    pub fn values(&self, region: &IndexBox<DIM>, component: usize) -> Vec<T> {
        region.intersect(&self.ghost_box).iter().map(|index| self.get(index, component)).collect()
    }

    /**
     * Return the offset into the backing buffer of one component at an index.
     */
    pub fn offset(&self, index: [i64; DIM], component: usize) -> usize {
        if !self.ghost_box.contains(index) || component >= self.depth {
            panic!("index {:?} component {} out of range on array over {:?} with depth {}",
                index,
                component,
                self.ghost_box,
                self.depth);
        }
        self.ghost_box.row_major_offset(index) * self.depth + component
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::ArrayData;
    use crate::index_space::IndexBox;

    #[test]
    fn components_are_interleaved_in_row_major_order() {
        let mut array = ArrayData::new(IndexBox::new([0, 0], [1, 2]), [1, 1], 2, 0.0);
        assert_eq!(array.ghost_box(), &IndexBox::new([-1, -1], [2, 3]));
        assert_eq!(array.as_slice().len(), 4 * 5 * 2);

        array.set([-1, -1], 1, 7.0);
        array.set([-1, 0], 0, 8.0);
        assert_eq!(array.as_slice()[1], 7.0);
        assert_eq!(array.as_slice()[2], 8.0);
        assert_eq!(array.get_slice([-1, -1]), &[0.0, 7.0]);
    }

    #[test]
    fn fill_is_limited_to_region() {
        let mut array = ArrayData::new(IndexBox::new([0], [4]), [0], 1, 0);
        array.fill(3, &IndexBox::new([3], [9]));
        assert_eq!(array.values(array.valid_box(), 0), vec![0, 0, 0, 3, 3]);
    }

    #[test]
    fn array_over_empty_box_holds_no_values() {
        let array = ArrayData::new(IndexBox::<2>::empty(), [1, 1], 3, 0.0);
        assert!(array.ghost_box().is_empty());
        assert!(array.as_slice().is_empty());
    }

    #[test]
    #[should_panic(expected = "ghost widths must be non-negative")]
    fn negative_ghost_width_panics() {
        ArrayData::new(IndexBox::new([0], [4]), [-1], 1, 0.0);
    }

    #[test]
    #[should_panic]
    fn access_outside_ghost_box_panics() {
        let array = ArrayData::from_function(IndexBox::new([0], [2]), |i| i[0] as f64);
        array.get([3], 0);
    }
}
