use crate::array_data::ArrayData;
use crate::index_space::{IndexBox, IntVector};




/**
 * Side-centered data over a box of cells: for each axis, one array of values
 * living on the cell faces normal to that axis. The array for axis `a` covers
 * the side box of the cells, which has one more index along `a`.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct SideData<T, const DIM: usize> {
    cell_box: IndexBox<DIM>,
    ghosts: IntVector<DIM>,
    arrays: [ArrayData<T, DIM>; DIM],
}




// ============================================================================
impl<T: Copy, const DIM: usize> SideData<T, DIM> {

    pub fn new(cell_box: IndexBox<DIM>, ghosts: IntVector<DIM>, depth: usize, fill: T) -> Self {
        Self {
            cell_box,
            ghosts,
            arrays: core::array::from_fn(|axis| ArrayData::new(cell_box.side_box(axis), ghosts, depth, fill)),
        }
    }

    /**
     * Return the box of cells this data is defined over.
     */
    pub fn cell_box(&self) -> &IndexBox<DIM> {
        &self.cell_box
    }

    pub fn ghosts(&self) -> IntVector<DIM> {
        self.ghosts
    }

    pub fn depth(&self) -> usize {
        self.arrays[0].depth()
    }

    pub fn array(&self, axis: usize) -> &ArrayData<T, DIM> {
        &self.arrays[axis]
    }

    pub fn array_mut(&mut self, axis: usize) -> &mut ArrayData<T, DIM> {
        &mut self.arrays[axis]
    }
}
