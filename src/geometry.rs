use core::fmt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use crate::boundary::{self, TouchFlags};
use crate::config::{to_array, BoxInput, GeometryInput};
use crate::error::{Error, Result};
use crate::index_space::{IndexBox, IntVector};
use crate::num_vec::Vector;
use crate::patch::{Patch, PatchGeometry};
use crate::restart::RestartDatabase;




/// Version tag written with every restart record. A record carrying any other
/// version is refused.
pub const CARTESIAN_GRID_GEOMETRY_VERSION: u32 = 2;




/**
 * Interface through which a patch level uses the geometry it owns. A level
 * only needs to derive the geometry of a finer or coarser level, attach
 * geometry to its patches, and persist the geometry; other kinds of geometry
 * may implement this trait without changes to the level.
 */
pub trait GridGeometry<const DIM: usize>: fmt::Debug + Send + Sync {

    fn object_name(&self) -> &str;

    /// The smallest box covering the index space of the domain.
    fn domain_box(&self) -> &IndexBox<DIM>;

    fn periodic(&self) -> &[bool; DIM];

    fn make_refined_geometry(&self, name: &str, ratio: IntVector<DIM>) -> Result<Box<dyn GridGeometry<DIM>>>;

    fn make_coarsened_geometry(&self, name: &str, ratio: IntVector<DIM>) -> Result<Box<dyn GridGeometry<DIM>>>;

    /// Compute the geometry of a patch, given its ratio to the reference
    /// resolution of this geometry and the boundary faces it touches, and
    /// attach it to the patch.
    fn set_geometry_on_patch(
        &self,
        patch: &mut Patch<DIM>,
        ratio_to_level_zero: IntVector<DIM>,
        touches: &TouchFlags<DIM>) -> Result<()>;

    fn put_to_restart(&self, db: &mut RestartDatabase) -> Result<()>;

    /// Classify the faces of a box in the index space of this geometry
    /// against the domain boundary.
    fn compute_touches(&self, patch_box: &IndexBox<DIM>) -> Result<TouchFlags<DIM>> {
        boundary::compute_touches(self.object_name(), self.domain_box(), self.periodic(), patch_box)
    }
}




#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct GeometryRecord {
    version: u32,
    periodic_dimension: Vec<bool>,
    x_lo: Vec<f64>,
    x_up: Vec<f64>,
    dx: Vec<f64>,
    domain_boxes: Vec<BoxInput>,
    use_original_location_indices: bool,
}




/**
 * Geometry of a logically rectangular domain discretized with a uniform
 * Cartesian mesh. The geometry holds the mesh spacing of its reference level,
 * the physical coordinates of the lower and upper corners of the domain, and
 * the boxes covering the index space of the reference level. The geometry of
 * a finer or coarser level is derived by scaling the spacing and the domain
 * boxes by a refinement ratio.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianGridGeometry<const DIM: usize> {
    object_name: String,
    dx: Vector<f64, DIM>,
    x_lo: Vector<f64, DIM>,
    x_up: Vector<f64, DIM>,
    physical_domain: Vec<IndexBox<DIM>>,
    domain_box: IndexBox<DIM>,
    periodic: [bool; DIM],
    use_original_location_indices: bool,
}




// ============================================================================
impl<const DIM: usize> CartesianGridGeometry<DIM> {


    /**
     * Build a geometry from the physical corners of the domain and the boxes
     * covering the index space of the reference level. The mesh spacing on
     * each axis is the physical extent divided by the number of cells. No
     * axis is periodic.
     */
    pub fn new(name: &str, x_lo: [f64; DIM], x_up: [f64; DIM], domain: Vec<IndexBox<DIM>>) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::config("<unnamed>", "geometry object name is empty"))
        }
        let mut geometry = Self {
            object_name: name.to_string(),
            dx: Vector::new([0.0; DIM]),
            x_lo: Vector::new(x_lo),
            x_up: Vector::new(x_up),
            physical_domain: Vec::new(),
            domain_box: IndexBox::empty(),
            periodic: [false; DIM],
            use_original_location_indices: DIM == 3,
        };
        geometry.set_geometry_data(x_lo, x_up, domain)?;
        info!("{}: built geometry with domain {:?} and spacing {:?}", name, geometry.domain_box, geometry.dx.as_array());
        Ok(geometry)
    }


    /**
     * Build a geometry from an input record, or from a restart database. When
     * a restart database is given the geometry is restored from it, and any
     * input values are ignored.
     */
    pub fn from_input(name: &str, input: Option<&GeometryInput>, restart: Option<&RestartDatabase>) -> Result<Self> {
        if let Some(db) = restart {
            if input.is_some() {
                warn!("{}: restoring from restart, input values are ignored", name);
            }
            return Self::from_restart(name, db)
        }
        let input = input.ok_or_else(|| Error::config(name, "no input given and not restarting"))?;
        let (x_lo, x_up) = input.corners(name)?;
        let mut geometry = Self::new(name, x_lo, x_up, input.domain(name)?)?;
        geometry.periodic = input.periodic(name)?;
        geometry.use_original_location_indices = input.use_original_location_indices::<DIM>();
        Ok(geometry)
    }


    /**
     * Restore a geometry from the record written by `put_to_restart` under
     * the given name. Every field is restored exactly as it was written.
     */
    pub fn from_restart(name: &str, db: &RestartDatabase) -> Result<Self> {
        let record: GeometryRecord = db.get(name)?;

        if record.version != CARTESIAN_GRID_GEOMETRY_VERSION {
            return Err(Error::RestartVersionMismatch {
                object: name.to_string(),
                found: record.version,
                expected: CARTESIAN_GRID_GEOMETRY_VERSION,
            })
        }
        let restart_array = |key: &str, values: &[f64]| -> Result<[f64; DIM]> {
            to_array(name, key, values).map_err(|e| Error::restart(name, e.to_string()))
        };
        let physical_domain = record.domain_boxes
            .iter()
            .map(|b| b.to_index_box(name).map_err(|e| Error::restart(name, e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        if physical_domain.is_empty() {
            return Err(Error::restart(name, "record has no domain boxes"))
        }
        let geometry = Self {
            object_name: name.to_string(),
            dx: Vector::new(restart_array("dx", &record.dx)?),
            x_lo: Vector::new(restart_array("x_lo", &record.x_lo)?),
            x_up: Vector::new(restart_array("x_up", &record.x_up)?),
            domain_box: physical_domain.iter().fold(IndexBox::empty(), |a, b| a.bounding_box(b)),
            physical_domain,
            periodic: to_array(name, "periodic_dimension", &record.periodic_dimension)
                .map_err(|e| Error::restart(name, e.to_string()))?,
            use_original_location_indices: record.use_original_location_indices,
        };
        info!("{}: restored geometry with domain {:?}", name, geometry.domain_box);
        Ok(geometry)
    }


    /**
     * Write the state of this geometry to the database, under its object
     * name.
     */
    pub fn put_to_restart(&self, db: &mut RestartDatabase) -> Result<()> {
        let record = GeometryRecord {
            version: CARTESIAN_GRID_GEOMETRY_VERSION,
            periodic_dimension: self.periodic.to_vec(),
            x_lo: self.x_lo.to_vec(),
            x_up: self.x_up.to_vec(),
            dx: self.dx.to_vec(),
            domain_boxes: self.physical_domain.iter().map(BoxInput::from).collect(),
            use_original_location_indices: self.use_original_location_indices,
        };
        debug!("{}: writing restart record", self.object_name);
        db.put(&self.object_name, &record)
    }


    /**
     * Reset the physical corners and domain boxes of this geometry, and
     * recompute the mesh spacing. On failure the geometry is unchanged.
     */
    pub fn set_geometry_data(&mut self, x_lo: [f64; DIM], x_up: [f64; DIM], domain: Vec<IndexBox<DIM>>) -> Result<()> {
        let name = &self.object_name;

        for d in 0..DIM {
            if !(x_lo[d].is_finite() && x_up[d].is_finite()) {
                return Err(Error::config(name, format!(
                    "non-finite domain corner in dimension {}: x_lo = {}, x_up = {}", d, x_lo[d], x_up[d])))
            }
            if x_lo[d] >= x_up[d] {
                return Err(Error::config(name, format!(
                    "x_lo must be less than x_up in dimension {}: x_lo = {}, x_up = {}", d, x_lo[d], x_up[d])))
            }
        }
        let domain_box = validate_domain(name, &domain)?;
        let cells = Vector::<f64, DIM>::from_ints(core::array::from_fn(|d| domain_box.num_cells(d)));

        self.x_lo = Vector::new(x_lo);
        self.x_up = Vector::new(x_up);
        self.dx = (self.x_up - self.x_lo) / cells;
        self.physical_domain = domain;
        self.domain_box = domain_box;
        Ok(())
    }


    /**
     * Return the geometry of a level refined from this one by the given
     * ratio. The spacing is divided by the ratio and the domain boxes are
     * refined; the physical corners, periodic axes and location index scheme
     * are copied.
     */
    pub fn make_refined(&self, name: &str, ratio: IntVector<DIM>) -> Result<Self> {
        self.validate_ratio(ratio, true)?;
        debug!("{}: refining by {:?} into {}", self.object_name, ratio, name);

        Ok(Self {
            object_name: name.to_string(),
            dx: self.dx.div_ratio(ratio),
            physical_domain: self.physical_domain.iter().map(|b| b.refine(ratio)).collect(),
            domain_box: self.domain_box.refine(ratio),
            ..self.clone()
        })
    }


    /**
     * Return the geometry of a level coarsened from this one by the given
     * ratio. Every domain box must be exactly divisible by the ratio, so that
     * refining the result by the same ratio gives back this domain.
     */
    pub fn make_coarsened(&self, name: &str, ratio: IntVector<DIM>) -> Result<Self> {
        self.validate_ratio(ratio, true)?;

        for b in &self.physical_domain {
            for d in 0..DIM {
                let r = ratio[d];
                if b.lower()[d].rem_euclid(r) != 0 || (b.upper()[d] + 1).rem_euclid(r) != 0 {
                    return Err(Error::ratio(&self.object_name, d, r, format!(
                        "domain box {:?} is not divisible by the coarsening ratio", b)))
                }
            }
        }
        debug!("{}: coarsening by {:?} into {}", self.object_name, ratio, name);

        Ok(Self {
            object_name: name.to_string(),
            dx: self.dx.mul_ratio(ratio),
            physical_domain: self.physical_domain.iter().map(|b| b.coarsen(ratio)).collect(),
            domain_box: self.domain_box.coarsen(ratio),
            ..self.clone()
        })
    }


    /**
     * Compute the geometry of a patch and attach it. Positive ratio entries
     * describe a patch refined relative to the reference level of this
     * geometry; negative entries describe a patch coarsened by the absolute
     * value. Calling this again with the same arguments attaches identical
     * geometry.
     */
    pub fn set_geometry_on_patch(
        &self,
        patch: &mut Patch<DIM>,
        ratio_to_level_zero: IntVector<DIM>,
        touches: &TouchFlags<DIM>) -> Result<()>
    {
        self.validate_ratio(ratio_to_level_zero, false)?;

        if let Some((d, side)) = touches.conflict() {
            return Err(Error::geometry(&self.object_name, format!(
                "{:?} face in dimension {} is flagged both regular and periodic", side, d)))
        }
        let index_box = *patch.index_box();
        let domain = self.domain_at_ratio(ratio_to_level_zero);

        if !domain.intersects(&index_box) {
            return Err(Error::geometry(&self.object_name, format!(
                "patch box {:?} lies outside the domain box {:?}", index_box, domain)))
        }
        let refine = ratio_to_level_zero.map(|r| r.max(1));
        let coarsen = ratio_to_level_zero.map(|r| (-r).max(1));
        let dx = self.dx.div_ratio(refine).mul_ratio(coarsen);
        let offset = Vector::<f64, DIM>::from_ints(core::array::from_fn(|d| index_box.lower()[d] - domain.lower()[d]));
        let cells = Vector::<f64, DIM>::from_ints(core::array::from_fn(|d| index_box.num_cells(d)));
        let x_lo = self.x_lo + offset * dx;
        let x_up = x_lo + cells * dx;
        let boundary_boxes = boundary::boundary_boxes(&index_box, touches, self.use_original_location_indices);

        debug!("{}: patch {:?} has {} boundary boxes", self.object_name, index_box, boundary_boxes.len());

        patch.set_geometry(PatchGeometry {
            index_box,
            ratio: ratio_to_level_zero,
            dx,
            x_lo,
            x_up,
            touches: *touches,
            boundary_boxes,
        });
        Ok(())
    }


    /**
     * Return the number of cells to shift a box by to wrap around each
     * periodic axis, at the given positive ratio to the reference level.
     */
    pub fn periodic_shift(&self, ratio: IntVector<DIM>) -> Result<IntVector<DIM>> {
        self.validate_ratio(ratio, true)?;
        Ok(boundary::periodic_shift(&self.domain_box.refine(ratio), &self.periodic))
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /**
     * Return the mesh spacing of the reference level.
     */
    pub fn dx(&self) -> &[f64; DIM] {
        self.dx.as_array()
    }

    pub fn x_lo(&self) -> &[f64; DIM] {
        self.x_lo.as_array()
    }

    pub fn x_up(&self) -> &[f64; DIM] {
        self.x_up.as_array()
    }

    pub fn domain_box(&self) -> &IndexBox<DIM> {
        &self.domain_box
    }

    pub fn physical_domain(&self) -> &[IndexBox<DIM>] {
        &self.physical_domain
    }

    pub fn periodic(&self) -> &[bool; DIM] {
        &self.periodic
    }

    pub fn set_periodic(&mut self, periodic: [bool; DIM]) {
        self.periodic = periodic
    }

    pub fn use_original_location_indices(&self) -> bool {
        self.use_original_location_indices
    }

    pub fn set_use_original_location_indices(&mut self, flag: bool) {
        self.use_original_location_indices = flag
    }

    fn validate_ratio(&self, ratio: IntVector<DIM>, positive: bool) -> Result<()> {
        for (d, &r) in ratio.iter().enumerate() {
            if r == 0 || (positive && r < 0) {
                return Err(Error::ratio(&self.object_name, d, r, "ratio must be positive"))
            }
        }
        Ok(())
    }

    fn domain_at_ratio(&self, ratio: IntVector<DIM>) -> IndexBox<DIM> {
        let mut refine = [1; DIM];
        let mut coarsen = [1; DIM];

        for d in 0..DIM {
            if ratio[d] > 0 {
                refine[d] = ratio[d]
            } else {
                coarsen[d] = -ratio[d]
            }
        }
        self.domain_box.refine(refine).coarsen(coarsen)
    }
}




// ============================================================================
impl<const DIM: usize> GridGeometry<DIM> for CartesianGridGeometry<DIM> {

    fn object_name(&self) -> &str {
        &self.object_name
    }

    fn domain_box(&self) -> &IndexBox<DIM> {
        &self.domain_box
    }

    fn periodic(&self) -> &[bool; DIM] {
        &self.periodic
    }

    fn make_refined_geometry(&self, name: &str, ratio: IntVector<DIM>) -> Result<Box<dyn GridGeometry<DIM>>> {
        Ok(Box::new(self.make_refined(name, ratio)?))
    }

    fn make_coarsened_geometry(&self, name: &str, ratio: IntVector<DIM>) -> Result<Box<dyn GridGeometry<DIM>>> {
        Ok(Box::new(self.make_coarsened(name, ratio)?))
    }

    fn set_geometry_on_patch(
        &self,
        patch: &mut Patch<DIM>,
        ratio_to_level_zero: IntVector<DIM>,
        touches: &TouchFlags<DIM>) -> Result<()>
    {
        CartesianGridGeometry::set_geometry_on_patch(self, patch, ratio_to_level_zero, touches)
    }

    fn put_to_restart(&self, db: &mut RestartDatabase) -> Result<()> {
        CartesianGridGeometry::put_to_restart(self, db)
    }
}

impl<const DIM: usize> fmt::Display for CartesianGridGeometry<DIM> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CartesianGridGeometry {}", self.object_name)?;
        writeln!(f, "    x_lo = {:?}", self.x_lo.as_array())?;
        writeln!(f, "    x_up = {:?}", self.x_up.as_array())?;
        writeln!(f, "    dx = {:?}", self.dx.as_array())?;
        writeln!(f, "    domain_box = {:?}", self.domain_box)?;
        writeln!(f, "    domain_boxes = {:?}", self.physical_domain)?;
        writeln!(f, "    periodic_dimension = {:?}", self.periodic)?;
        writeln!(f, "    use_original_location_indices = {}", self.use_original_location_indices)
    }
}




/**
 * Check that the domain boxes are non-empty, do not overlap, and exactly
 * tile their bounding box. Return the bounding box.
 */
fn validate_domain<const DIM: usize>(name: &str, domain: &[IndexBox<DIM>]) -> Result<IndexBox<DIM>> {
    if domain.is_empty() {
        return Err(Error::config(name, "domain has no boxes"))
    }
    if let Some(b) = domain.iter().find(|b| b.is_empty()) {
        return Err(Error::config(name, format!("domain box {:?} is empty", b)))
    }
    for (n, a) in domain.iter().enumerate() {
        if let Some(b) = domain[n + 1..].iter().find(|b| a.intersects(b)) {
            return Err(Error::config(name, format!("domain boxes {:?} and {:?} overlap", a, b)))
        }
    }
    let bounding = domain.iter().fold(IndexBox::empty(), |a, b| a.bounding_box(b));

    if domain.iter().map(IndexBox::len).sum::<usize>() != bounding.len() {
        return Err(Error::config(name, format!("domain boxes do not fill their bounding box {:?}", bounding)))
    }
    Ok(bounding)
}




// ============================================================================
#[cfg(test)]
mod test {

    use approx::assert_relative_eq;
    use super::*;
    use crate::config::GeometryInput;

    fn geometry2d() -> CartesianGridGeometry<2> {
        CartesianGridGeometry::new("geom", [0.0, 0.0], [50.0, 40.0], vec![IndexBox::new([0, 0], [49, 39])]).unwrap()
    }

    #[test]
    fn spacing_is_extent_over_number_of_cells() {
        let geometry = CartesianGridGeometry::new(
            "geom", [-1.0, 0.0, 2.0], [1.0, 3.0, 2.5], vec![IndexBox::new([0, 0, 0], [19, 5, 9])]).unwrap();
        assert_relative_eq!(geometry.dx()[0], 0.1);
        assert_relative_eq!(geometry.dx()[1], 0.5);
        assert_relative_eq!(geometry.dx()[2], 0.05);
        assert!(geometry.use_original_location_indices());
        assert!(!geometry2d().use_original_location_indices());
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let result = CartesianGridGeometry::new("geom", [0.0, 0.0], [0.0, 0.0], vec![IndexBox::new([0, 0], [9, 9])]);
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn invalid_domains_are_rejected() {
        let corners = ([0.0, 0.0], [1.0, 1.0]);
        let cases = vec![
            vec![],
            vec![IndexBox::empty()],
            vec![IndexBox::new([0, 0], [4, 4]), IndexBox::new([4, 0], [9, 4])],
            vec![IndexBox::new([0, 0], [4, 4]), IndexBox::new([5, 5], [9, 9])],
        ];
        for domain in cases {
            let result = CartesianGridGeometry::new("geom", corners.0, corners.1, domain);
            assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn domain_may_be_tiled_by_several_boxes() {
        let domain = vec![IndexBox::new([0, 0], [4, 9]), IndexBox::new([5, 0], [9, 9])];
        let geometry = CartesianGridGeometry::new("geom", [0.0, 0.0], [1.0, 1.0], domain).unwrap();
        assert_eq!(geometry.domain_box(), &IndexBox::new([0, 0], [9, 9]));
    }

    #[test]
    fn refined_and_coarsened_spacing_scale_with_ratio() {
        let geometry = geometry2d();
        let fine = geometry.make_refined("fine", [2, 4]).unwrap();
        let coarse = geometry.make_coarsened("coarse", [2, 2]).unwrap();

        assert_eq!(fine.dx(), &[0.5, 0.25]);
        assert_eq!(coarse.dx(), &[2.0, 2.0]);
        assert_eq!(fine.domain_box(), &IndexBox::new([0, 0], [99, 159]));
        assert_eq!(coarse.domain_box(), &IndexBox::new([0, 0], [24, 19]));
        assert_eq!(fine.x_lo(), geometry.x_lo());
        assert_eq!(fine.x_up(), geometry.x_up());
        assert_eq!(fine.object_name(), "fine");
    }

    #[test]
    fn coarsen_then_refine_recovers_domain() {
        let geometry = geometry2d();
        let round_trip = geometry
            .make_coarsened("coarse", [5, 4]).unwrap()
            .make_refined("geom", [5, 4]).unwrap();
        assert_eq!(round_trip.domain_box(), geometry.domain_box());
        assert_eq!(round_trip.physical_domain(), geometry.physical_domain());
    }

    #[test]
    fn coarsening_indivisible_domain_fails() {
        match geometry2d().make_coarsened("coarse", [3, 2]) {
            Err(Error::InvalidRatio { dimension, ratio, .. }) => {
                assert_eq!(dimension, 0);
                assert_eq!(ratio, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(geometry2d().make_refined("fine", [2, 0]), Err(Error::InvalidRatio { .. })));
    }

    #[test]
    fn restart_round_trip_is_exact() {
        let mut geometry = CartesianGridGeometry::new(
            "geom", [0.1, -0.3, 0.7], [1.0 / 3.0, 2.0, 1.9], vec![IndexBox::new([0, 0, 0], [6, 12, 2])]).unwrap();
        geometry.set_periodic([true, false, true]);
        geometry.set_use_original_location_indices(false);

        let mut db = RestartDatabase::new();
        geometry.put_to_restart(&mut db).unwrap();
        let restored = CartesianGridGeometry::<3>::from_restart("geom", &db).unwrap();

        assert_eq!(restored, geometry);
        for d in 0..3 {
            assert_eq!(restored.dx()[d].to_bits(), geometry.dx()[d].to_bits());
            assert_eq!(restored.x_lo()[d].to_bits(), geometry.x_lo()[d].to_bits());
            assert_eq!(restored.x_up()[d].to_bits(), geometry.x_up()[d].to_bits());
        }
    }

    #[test]
    fn restart_version_mismatch_is_fatal() {
        let mut db = RestartDatabase::new();
        let mut record = GeometryRecord {
            version: CARTESIAN_GRID_GEOMETRY_VERSION + 1,
            periodic_dimension: vec![false, false],
            x_lo: vec![0.0, 0.0],
            x_up: vec![1.0, 1.0],
            dx: vec![0.1, 0.1],
            domain_boxes: vec![BoxInput { lower: vec![0, 0], upper: vec![9, 9] }],
            use_original_location_indices: false,
        };
        db.put("geom", &record).unwrap();
        assert!(matches!(
            CartesianGridGeometry::<2>::from_restart("geom", &db),
            Err(Error::RestartVersionMismatch { found: 3, expected: 2, .. })));

        record.version = CARTESIAN_GRID_GEOMETRY_VERSION;
        db.put("geom", &record).unwrap();
        assert!(matches!(
            CartesianGridGeometry::<3>::from_restart("geom", &db),
            Err(Error::InvalidRestart { .. })));
        assert!(CartesianGridGeometry::<2>::from_restart("geom", &db).is_ok());
        assert!(matches!(
            CartesianGridGeometry::<2>::from_restart("other", &db),
            Err(Error::RestartRecordMissing { .. })));
    }

    #[test]
    fn restart_values_win_over_input() {
        let mut db = RestartDatabase::new();
        geometry2d().put_to_restart(&mut db).unwrap();

        let input = GeometryInput::from_ron_str("geom", r#"(
            domain_boxes: [(lower: [0, 0], upper: [9, 9])],
            x_lo: [0.0, 0.0],
            x_up: [1.0, 1.0],
            periodic_dimension: [true, true],
        )"#).unwrap();

        let restored = CartesianGridGeometry::<2>::from_input("geom", Some(&input), Some(&db)).unwrap();
        assert_eq!(restored, geometry2d());

        let fresh = CartesianGridGeometry::<2>::from_input("geom", Some(&input), None).unwrap();
        assert_eq!(fresh.periodic(), &[true, true]);
        assert_eq!(fresh.dx(), &[0.1, 0.1]);

        assert!(matches!(
            CartesianGridGeometry::<2>::from_input("geom", None, None),
            Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn patch_geometry_maps_index_box_to_physical_bounds() {
        let geometry = geometry2d();
        let mut patch = Patch::new(1, IndexBox::new([10, 20], [29, 79]));
        let touches = boundary::compute_touches("geom", &geometry.domain_box().refine([2, 2]), &[false, false], patch.index_box()).unwrap();
        geometry.set_geometry_on_patch(&mut patch, [2, 2], &touches).unwrap();

        let pg = patch.geometry().unwrap();
        assert_eq!(pg.dx(), &[0.5, 0.5]);
        assert_eq!(pg.x_lo(), &[5.0, 10.0]);
        assert_eq!(pg.x_up(), &[15.0, 40.0]);
        assert_eq!(pg.cell_center([10, 20]), [5.25, 10.25]);

        // touches only the upper y face of the refined domain
        let faces: Vec<_> = pg.boundary_boxes_of_codimension(1).map(|b| b.location_index()).collect();
        assert_eq!(faces, vec![3]);
    }

    #[test]
    fn attaching_geometry_twice_gives_identical_data() {
        let geometry = geometry2d();
        let mut patch = Patch::new(0, IndexBox::new([0, 0], [9, 9]));
        let touches = geometry.compute_touches(patch.index_box()).unwrap();

        geometry.set_geometry_on_patch(&mut patch, [1, 1], &touches).unwrap();
        let first = patch.geometry().cloned();
        geometry.set_geometry_on_patch(&mut patch, [1, 1], &touches).unwrap();
        assert_eq!(patch.geometry().cloned(), first);
    }

    #[test]
    fn negative_ratio_describes_a_coarser_patch() {
        let geometry = geometry2d();
        let mut patch = Patch::new(0, IndexBox::new([5, 0], [9, 9]));
        geometry.set_geometry_on_patch(&mut patch, [-5, -4], &TouchFlags::none()).unwrap();

        let pg = patch.geometry().unwrap();
        assert_eq!(pg.dx(), &[5.0, 4.0]);
        assert_eq!(pg.x_lo(), &[25.0, 0.0]);
        assert_eq!(pg.x_up(), &[50.0, 40.0]);
    }

    #[test]
    fn patch_outside_domain_is_rejected() {
        let mut patch = Patch::new(0, IndexBox::new([60, 0], [69, 9]));
        let result = geometry2d().set_geometry_on_patch(&mut patch, [1, 1], &TouchFlags::none());
        assert!(matches!(result, Err(Error::InvalidGeometry { .. })));
        assert!(patch.geometry().is_none());
    }

    #[test]
    fn periodic_shift_scales_with_ratio() {
        let mut geometry = geometry2d();
        geometry.set_periodic([false, true]);
        assert_eq!(geometry.periodic_shift([1, 1]).unwrap(), [0, 40]);
        assert_eq!(geometry.periodic_shift([2, 2]).unwrap(), [0, 80]);
    }
}
