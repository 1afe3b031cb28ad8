use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::geometry::{CartesianGridGeometry, GridGeometry};
use crate::index_space::{IndexBox, IntVector};
use crate::patch::Patch;
use crate::restart::RestartDatabase;




const PATCH_HIERARCHY_VERSION: u32 = 1;




/**
 * A level of uniform resolution within a patch hierarchy. The level owns the
 * geometry describing its resolution and the patches placed on it; every
 * patch is given its geometry as it is inserted.
 */
#[derive(Debug)]
pub struct PatchLevel<const DIM: usize> {
    level_number: usize,
    ratio_to_level_zero: IntVector<DIM>,
    geometry: Box<dyn GridGeometry<DIM>>,
    patches: Vec<Patch<DIM>>,
}




// ============================================================================
impl<const DIM: usize> PatchLevel<DIM> {

    pub fn new(level_number: usize, ratio_to_level_zero: IntVector<DIM>, geometry: Box<dyn GridGeometry<DIM>>) -> Self {
        Self { level_number, ratio_to_level_zero, geometry, patches: Vec::new() }
    }

    pub fn level_number(&self) -> usize {
        self.level_number
    }

    pub fn ratio_to_level_zero(&self) -> IntVector<DIM> {
        self.ratio_to_level_zero
    }

    pub fn geometry(&self) -> &dyn GridGeometry<DIM> {
        self.geometry.as_ref()
    }

    pub fn patches(&self) -> &[Patch<DIM>] {
        &self.patches
    }

    /**
     * Create a patch over the given box, in the index space of this level,
     * classify its faces against the domain, and attach its geometry.
     */
    pub fn insert_patch(&mut self, index_box: IndexBox<DIM>) -> Result<&Patch<DIM>> {
        let patch = make_patch(self.geometry.as_ref(), self.level_number, index_box)?;
        self.patches.push(patch);
        Ok(&self.patches[self.patches.len() - 1])
    }

    /**
     * Insert many patches at once. Patch geometry is computed in parallel;
     * if any box is invalid no patch is inserted.
     */
    pub fn insert_patches(&mut self, boxes: Vec<IndexBox<DIM>>) -> Result<()> {
        let geometry = self.geometry.as_ref();
        let level_number = self.level_number;
        let patches = boxes
            .into_par_iter()
            .map(|index_box| make_patch(geometry, level_number, index_box))
            .collect::<Result<Vec<_>>>()?;

        debug!("level {}: inserted {} patches", self.level_number, patches.len());
        self.patches.extend(patches);
        Ok(())
    }

    /**
     * Apply a function to every patch of the level in parallel, returning
     * the results in patch order.
     */
    pub fn par_map_patches<F, R>(&self, f: F) -> Vec<R>
    where
        F: Fn(&Patch<DIM>) -> R + Send + Sync,
        R: Send,
    {
        self.patches.par_iter().map(f).collect()
    }
}

fn make_patch<const DIM: usize>(geometry: &dyn GridGeometry<DIM>, level_number: usize, index_box: IndexBox<DIM>) -> Result<Patch<DIM>> {
    let touches = geometry.compute_touches(&index_box)?;
    let mut patch = Patch::new(level_number, index_box);
    geometry.set_geometry_on_patch(&mut patch, [1; DIM], &touches)?;
    Ok(patch)
}




#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct HierarchyRecord {
    version: u32,
    geometry_names: Vec<String>,
    ratios_to_level_zero: Vec<Vec<i64>>,
}




/**
 * A stack of patch levels, each finer than the one below it. The hierarchy
 * names the geometry of every level and writes them all to a restart
 * database on request.
 */
#[derive(Debug)]
pub struct PatchHierarchy<const DIM: usize> {
    name: String,
    levels: Vec<PatchLevel<DIM>>,
}




// ============================================================================
impl<const DIM: usize> PatchHierarchy<DIM> {

    /**
     * Start a hierarchy whose coarsest level has the given geometry.
     */
    pub fn new(name: &str, geometry: CartesianGridGeometry<DIM>) -> Self {
        Self {
            name: name.to_string(),
            levels: vec![PatchLevel::new(0, [1; DIM], Box::new(geometry))],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level_number: usize) -> &PatchLevel<DIM> {
        &self.levels[level_number]
    }

    pub fn level_mut(&mut self, level_number: usize) -> &mut PatchLevel<DIM> {
        &mut self.levels[level_number]
    }

    pub fn finest_level_mut(&mut self) -> &mut PatchLevel<DIM> {
        let n = self.levels.len() - 1;
        &mut self.levels[n]
    }

    /**
     * Add a level refined from the current finest level by the given ratio,
     * with a geometry derived from the finest level's geometry.
     */
    pub fn make_new_level(&mut self, ratio_to_coarser: IntVector<DIM>) -> Result<&mut PatchLevel<DIM>> {
        let coarser = &self.levels[self.levels.len() - 1];
        let level_number = coarser.level_number() + 1;
        let name = format!("{}_level_{}", self.name, level_number);
        let geometry = coarser.geometry().make_refined_geometry(&name, ratio_to_coarser)?;
        let mut ratio = coarser.ratio_to_level_zero();

        for d in 0..DIM {
            ratio[d] *= ratio_to_coarser[d]
        }
        info!("{}: added level {} with ratio {:?} to level zero", self.name, level_number, ratio);
        self.levels.push(PatchLevel::new(level_number, ratio, geometry));
        Ok(self.finest_level_mut())
    }

    /**
     * Write the geometry of every level, and the list of levels, to the
     * database.
     */
    pub fn put_to_restart(&self, db: &mut RestartDatabase) -> Result<()> {
        for level in &self.levels {
            level.geometry().put_to_restart(db)?;
        }
        let record = HierarchyRecord {
            version: PATCH_HIERARCHY_VERSION,
            geometry_names: self.levels.iter().map(|l| l.geometry().object_name().to_string()).collect(),
            ratios_to_level_zero: self.levels.iter().map(|l| l.ratio_to_level_zero().to_vec()).collect(),
        };
        db.put(&self.name, &record)
    }

    /**
     * Rebuild the levels of a hierarchy, and their geometry, from the
     * database. The restored levels have no patches.
     */
    pub fn from_restart(name: &str, db: &RestartDatabase) -> Result<Self> {
        let record: HierarchyRecord = db.get(name)?;

        if record.version != PATCH_HIERARCHY_VERSION {
            return Err(Error::RestartVersionMismatch {
                object: name.to_string(),
                found: record.version,
                expected: PATCH_HIERARCHY_VERSION,
            })
        }
        if record.geometry_names.is_empty() || record.geometry_names.len() != record.ratios_to_level_zero.len() {
            return Err(Error::restart(name, "level list is empty or inconsistent"))
        }
        let mut levels = Vec::new();

        for (n, (geometry_name, ratio)) in record.geometry_names.iter().zip(&record.ratios_to_level_zero).enumerate() {
            let ratio = crate::config::to_array(name, "ratio_to_level_zero", ratio)
                .map_err(|e| Error::restart(name, e.to_string()))?;
            let geometry = CartesianGridGeometry::<DIM>::from_restart(geometry_name, db)?;
            levels.push(PatchLevel::new(n, ratio, Box::new(geometry)));
        }
        Ok(Self { name: name.to_string(), levels })
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::array_data::ArrayData;
    use crate::boundary::BoundaryKind;
    use crate::math::ArrayDataBasicOps;

    fn hierarchy(periodic: [bool; 2]) -> PatchHierarchy<2> {
        let mut geometry = CartesianGridGeometry::new(
            "geom", [0.0, 0.0], [1.0, 1.0], vec![IndexBox::new([0, 0], [15, 15])]).unwrap();
        geometry.set_periodic(periodic);
        PatchHierarchy::new("hierarchy", geometry)
    }

    fn quadrants(n: i64) -> Vec<IndexBox<2>> {
        let h = n / 2;
        vec![
            IndexBox::new([0, 0], [h - 1, h - 1]),
            IndexBox::new([h, 0], [n - 1, h - 1]),
            IndexBox::new([0, h], [h - 1, n - 1]),
            IndexBox::new([h, h], [n - 1, n - 1]),
        ]
    }

    #[test]
    fn refined_level_patches_get_refined_spacing() {
        let mut hierarchy = hierarchy([false, false]);
        let level = hierarchy.make_new_level([2, 4]).unwrap();
        assert_eq!(level.ratio_to_level_zero(), [2, 4]);
        assert_eq!(level.geometry().domain_box(), &IndexBox::new([0, 0], [31, 63]));

        let patch = level.insert_patch(IndexBox::new([8, 16], [15, 31])).unwrap();
        let pg = patch.geometry().unwrap();
        assert_eq!(pg.dx(), &[1.0 / 32.0, 1.0 / 64.0]);
        assert_eq!(pg.x_lo(), &[0.25, 0.25]);
        assert!(pg.boundary_boxes().is_empty());

        let level = hierarchy.make_new_level([2, 2]).unwrap();
        assert_eq!(level.level_number(), 2);
        assert_eq!(level.ratio_to_level_zero(), [4, 8]);
    }

    #[test]
    fn parallel_insertion_classifies_every_patch() {
        let mut hierarchy = hierarchy([true, false]);
        let level = hierarchy.level_mut(0);
        level.insert_patches(quadrants(16)).unwrap();
        assert_eq!(level.patches().len(), 4);

        for patch in level.patches() {
            let pg = patch.geometry().unwrap();
            let faces: Vec<_> = pg.boundary_boxes_of_codimension(1).collect();
            assert_eq!(faces.len(), 2);
            assert_eq!(faces.iter().filter(|b| b.kind() == BoundaryKind::Periodic).count(), 1);
            assert_eq!(faces.iter().filter(|b| b.kind() == BoundaryKind::Regular).count(), 1);
        }
    }

    #[test]
    fn invalid_box_leaves_level_unchanged() {
        let mut hierarchy = hierarchy([false, false]);
        let level = hierarchy.level_mut(0);
        let mut boxes = quadrants(16);
        boxes.push(IndexBox::new([40, 40], [41, 41]));

        assert!(matches!(level.insert_patches(boxes), Err(Error::InvalidGeometry { .. })));
        assert!(level.patches().is_empty());
    }

    #[test]
    fn operations_run_on_patches_in_parallel() {
        let mut hierarchy = hierarchy([false, false]);
        let level = hierarchy.level_mut(0);
        level.insert_patches(quadrants(16)).unwrap();

        let ops = ArrayDataBasicOps::new();
        let maxima = level.par_map_patches(|patch| {
            let pg = patch.geometry().unwrap();
            let x = ArrayData::from_function(*patch.index_box(), |i| pg.cell_center(i)[0]);
            let y = ArrayData::from_function(*patch.index_box(), |i| pg.cell_center(i)[1]);
            let mut sum = ArrayData::new(*patch.index_box(), [1, 1], 1, 0.0);
            ops.add(&mut sum, &x, &y, patch.index_box());
            ops.max(&sum, patch.index_box()).unwrap()
        });
        let global = maxima.into_iter().fold(f64::MIN, f64::max);
        assert_eq!(global, 2.0 * (15.5 / 16.0));
    }

    #[test]
    fn hierarchy_restart_restores_every_level_geometry() {
        let mut hierarchy = hierarchy([false, true]);
        hierarchy.make_new_level([2, 2]).unwrap();
        hierarchy.make_new_level([4, 4]).unwrap();

        let mut db = RestartDatabase::new();
        hierarchy.put_to_restart(&mut db).unwrap();
        assert!(db.contains("hierarchy_level_2"));

        let restored = PatchHierarchy::<2>::from_restart("hierarchy", &db).unwrap();
        assert_eq!(restored.num_levels(), 3);
        assert_eq!(restored.level(2).ratio_to_level_zero(), [8, 8]);
        assert_eq!(restored.level(2).geometry().periodic(), &[false, true]);

        let mut again = RestartDatabase::new();
        restored.put_to_restart(&mut again).unwrap();
        assert_eq!(again, db);
    }
}
