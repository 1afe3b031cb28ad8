use crate::boundary::{BoundaryBox, TouchFlags};
use crate::index_space::{IndexBox, IntVector};
use crate::num_vec::Vector;




/**
 * A patch is a single box-shaped block of cells within a level of the
 * hierarchy. The index box is expressed in the index space of the patch's own
 * level. Before numerical code can use the patch it must be given a
 * `PatchGeometry` by the level's grid geometry.
 */
#[derive(Clone, Debug)]
pub struct Patch<const DIM: usize> {
    level_number: usize,
    index_box: IndexBox<DIM>,
    geometry: Option<PatchGeometry<DIM>>,
}




// ============================================================================
impl<const DIM: usize> Patch<DIM> {

    pub fn new(level_number: usize, index_box: IndexBox<DIM>) -> Self {
        Self { level_number, index_box, geometry: None }
    }

    pub fn level_number(&self) -> usize {
        self.level_number
    }

    pub fn index_box(&self) -> &IndexBox<DIM> {
        &self.index_box
    }

    /**
     * Return the geometry attached to this patch, if it has been set.
     */
    pub fn geometry(&self) -> Option<&PatchGeometry<DIM>> {
        self.geometry.as_ref()
    }

    /**
     * Attach geometry to this patch, replacing any previous geometry.
     */
    pub fn set_geometry(&mut self, geometry: PatchGeometry<DIM>) {
        self.geometry = Some(geometry)
    }
}




/**
 * Geometry attached to a single patch: its mesh spacing, the physical
 * coordinates of its lower and upper corners, and the boundary boxes of the
 * faces, edges and corners that lie on the domain boundary.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct PatchGeometry<const DIM: usize> {
    pub(crate) index_box: IndexBox<DIM>,
    pub(crate) ratio: IntVector<DIM>,
    pub(crate) dx: Vector<f64, DIM>,
    pub(crate) x_lo: Vector<f64, DIM>,
    pub(crate) x_up: Vector<f64, DIM>,
    pub(crate) touches: TouchFlags<DIM>,
    pub(crate) boundary_boxes: Vec<BoundaryBox<DIM>>,
}




// ============================================================================
impl<const DIM: usize> PatchGeometry<DIM> {

    /**
     * Return the ratio of the patch resolution to the reference level of the
     * geometry that computed this data.
     */
    pub fn ratio(&self) -> IntVector<DIM> {
        self.ratio
    }

    pub fn dx(&self) -> &[f64; DIM] {
        self.dx.as_array()
    }

    pub fn x_lo(&self) -> &[f64; DIM] {
        self.x_lo.as_array()
    }

    pub fn x_up(&self) -> &[f64; DIM] {
        self.x_up.as_array()
    }

    pub fn touches(&self) -> &TouchFlags<DIM> {
        &self.touches
    }

    pub fn boundary_boxes(&self) -> &[BoundaryBox<DIM>] {
        &self.boundary_boxes
    }

    pub fn boundary_boxes_of_codimension(&self, codimension: usize) -> impl Iterator<Item = &BoundaryBox<DIM>> {
        self.boundary_boxes.iter().filter(move |b| b.codimension() == codimension)
    }

    /**
     * Return the physical coordinates of the center of the cell at the given
     * index.
     */
    pub fn cell_center(&self, index: [i64; DIM]) -> [f64; DIM] {
        let lower = self.index_box.lower();
        let offset = Vector::new(core::array::from_fn(|d| (index[d] - lower[d]) as f64 + 0.5));
        *(self.x_lo + self.dx * offset).as_array()
    }
}
