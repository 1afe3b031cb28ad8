//! Classification of patch faces against the physical domain, and
//! construction of the boundary boxes attached to patch geometry.

use itertools::Itertools;
use crate::error::{Error, Result};
use crate::index_space::{IndexBox, IntVector};




/// Location-index permutation for codimension-2 boundaries in three
/// dimensions, used when the legacy enumeration is requested. Entry `n` is the
/// legacy index of the edge whose standard index is `n`.
const ORIGINAL_EDGE_LOCATIONS_3D: [usize; 12] = [8, 9, 10, 11, 4, 6, 5, 7, 0, 1, 2, 3];




/// Lower or upper face of a box along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Lower,
    Upper,
}

impl Side {
    fn from_bit(bits: usize, n: usize) -> Self {
        if bits & (1 << n) == 0 { Side::Lower } else { Side::Upper }
    }

    fn index(self) -> usize {
        match self {
            Side::Lower => 0,
            Side::Upper => 1,
        }
    }
}




/// Whether a boundary box lies on the physical boundary of the domain or on
/// a face that wraps around periodically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Regular,
    Periodic,
}




/// Per-axis, per-side flags recording which faces of a patch lie on the
/// boundary of the domain. A face is at most one of regular or periodic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchFlags<const DIM: usize> {
    regular: [[bool; 2]; DIM],
    periodic: [[bool; 2]; DIM],
}

impl<const DIM: usize> TouchFlags<DIM> {

    /// Flags for a patch that touches no boundary.
    pub fn none() -> Self {
        Self { regular: [[false; 2]; DIM], periodic: [[false; 2]; DIM] }
    }

    pub fn new(regular: [[bool; 2]; DIM], periodic: [[bool; 2]; DIM]) -> Self {
        Self { regular, periodic }
    }

    pub fn regular(&self) -> &[[bool; 2]; DIM] {
        &self.regular
    }

    pub fn periodic(&self) -> &[[bool; 2]; DIM] {
        &self.periodic
    }

    pub fn set(&mut self, axis: usize, side: Side, kind: Option<BoundaryKind>) {
        let s = side.index();
        self.regular[axis][s] = kind == Some(BoundaryKind::Regular);
        self.periodic[axis][s] = kind == Some(BoundaryKind::Periodic);
    }

    /// Return the kind of boundary the given face touches, if any.
    pub fn kind(&self, axis: usize, side: Side) -> Option<BoundaryKind> {
        let s = side.index();
        if self.periodic[axis][s] {
            Some(BoundaryKind::Periodic)
        } else if self.regular[axis][s] {
            Some(BoundaryKind::Regular)
        } else {
            None
        }
    }

    pub fn touches_any(&self) -> bool {
        self.regular.iter().chain(self.periodic.iter()).flatten().any(|&t| t)
    }

    /// Return the first face flagged as both regular and periodic.
    pub fn conflict(&self) -> Option<(usize, Side)> {
        (0..DIM)
            .cartesian_product([Side::Lower, Side::Upper])
            .find(|&(d, side)| self.regular[d][side.index()] && self.periodic[d][side.index()])
    }
}




/// A one-cell-thick region just outside a patch, adjacent to a face, edge or
/// corner of the patch that lies on the domain boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryBox<const DIM: usize> {
    region: IndexBox<DIM>,
    location_index: usize,
    codimension: usize,
    kind: BoundaryKind,
}

impl<const DIM: usize> BoundaryBox<DIM> {

    pub fn region(&self) -> &IndexBox<DIM> {
        &self.region
    }

    pub fn location_index(&self) -> usize {
        self.location_index
    }

    pub fn codimension(&self) -> usize {
        self.codimension
    }

    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    pub fn is_periodic(&self) -> bool {
        self.kind == BoundaryKind::Periodic
    }
}




/// Determine which faces of `patch_box` coincide with faces of the domain
/// box. Faces along periodic axes are flagged periodic, all others regular.
/// The patch must overlap the domain.
pub fn compute_touches<const DIM: usize>(
    object: &str,
    domain: &IndexBox<DIM>,
    periodic: &[bool; DIM],
    patch_box: &IndexBox<DIM>,
) -> Result<TouchFlags<DIM>> {

    if !domain.intersects(patch_box) {
        return Err(Error::geometry(object, format!(
            "patch box {:?} lies outside the domain box {:?}", patch_box, domain)))
    }
    let mut touches = TouchFlags::none();
    let kind = |d: usize| if periodic[d] { BoundaryKind::Periodic } else { BoundaryKind::Regular };

    for d in 0..DIM {
        if patch_box.lower()[d] <= domain.lower()[d] {
            touches.set(d, Side::Lower, Some(kind(d)))
        }
        if patch_box.upper()[d] >= domain.upper()[d] {
            touches.set(d, Side::Upper, Some(kind(d)))
        }
    }
    Ok(touches)
}




/// Build the boundary boxes of a patch, ordered by codimension and then by
/// location index.
///
/// Location indexes for each codimension `c` enumerate the subsets of `c`
/// axes in lexicographic order, and within each subset the side combinations
/// with the lowest axis varying fastest. For faces this gives `2 * axis +
/// side`. A region is emitted only when every participating face touches
/// the boundary; it is periodic only when all of those faces are periodic.
pub fn boundary_boxes<const DIM: usize>(
    patch_box: &IndexBox<DIM>,
    touches: &TouchFlags<DIM>,
    use_original_location_indices: bool,
) -> Vec<BoundaryBox<DIM>> {

    let mut result = Vec::new();

    for codimension in 1..=DIM {
        let mut location = 0;

        for axes in (0..DIM).combinations(codimension) {
            for bits in 0..(1usize << codimension) {
                let faces: Vec<_> = axes.iter().enumerate().map(|(n, &d)| (d, Side::from_bit(bits, n))).collect();
                let kinds: Option<Vec<_>> = faces.iter().map(|&(d, side)| touches.kind(d, side)).collect();

                if let Some(kinds) = kinds {
                    let kind = if kinds.iter().all(|&k| k == BoundaryKind::Periodic) {
                        BoundaryKind::Periodic
                    } else {
                        BoundaryKind::Regular
                    };
                    let location_index = if use_original_location_indices && DIM == 3 && codimension == 2 {
                        ORIGINAL_EDGE_LOCATIONS_3D[location]
                    } else {
                        location
                    };
                    result.push(BoundaryBox {
                        region: outside_region(patch_box, &faces),
                        location_index,
                        codimension,
                        kind,
                    });
                }
                location += 1;
            }
        }
    }
    result.sort_by_key(|b| (b.codimension, b.location_index));
    result
}




/// Return the number of cells to shift by to wrap around each periodic axis
/// of the domain; zero along non-periodic axes.
pub fn periodic_shift<const DIM: usize>(domain: &IndexBox<DIM>, periodic: &[bool; DIM]) -> IntVector<DIM> {
    let mut shift = [0; DIM];

    for (d, s) in shift.iter_mut().enumerate() {
        if periodic[d] {
            *s = domain.num_cells(d)
        }
    }
    shift
}




fn outside_region<const DIM: usize>(patch_box: &IndexBox<DIM>, faces: &[(usize, Side)]) -> IndexBox<DIM> {
    let mut lower = patch_box.lower();
    let mut upper = patch_box.upper();

    for &(d, side) in faces {
        let i = match side {
            Side::Lower => patch_box.lower()[d] - 1,
            Side::Upper => patch_box.upper()[d] + 1,
        };
        lower[d] = i;
        upper[d] = i;
    }
    IndexBox::new(lower, upper)
}
