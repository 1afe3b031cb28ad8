//! Input parameters for a Cartesian grid geometry.
//!
//! A sample input for a two-dimensional domain with 50 × 40 unit cells which
//! is periodic along the second axis:
//!
//! ```text
//! (
//!     domain_boxes: [(lower: [0, 0], upper: [49, 39])],
//!     x_lo: [0.0, 0.0],
//!     x_up: [50.0, 40.0],
//!     periodic_dimension: [false, true],
//! )
//! ```

use std::fs;
use std::path::Path;
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::index_space::IndexBox;




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxInput {
    pub lower: Vec<i64>,
    pub upper: Vec<i64>,
}




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryInput {

    /// Boxes covering the index space of the coarsest level.
    pub domain_boxes: Vec<BoxInput>,

    /// Physical coordinates of the lower corner of the domain.
    pub x_lo: Vec<f64>,

    /// Physical coordinates of the upper corner of the domain.
    pub x_up: Vec<f64>,

    /// Axes along which the domain wraps. Defaults to no periodic axes.
    #[serde(default)]
    pub periodic_dimension: Option<Vec<bool>>,

    /// Use the pre-revision location indexes for codimension 2 boundaries in
    /// three dimensions. Defaults to true in 3D, false otherwise.
    #[serde(default)]
    pub use_original_location_indices: Option<bool>,
}




// ============================================================================
impl GeometryInput {

    pub fn from_ron_str(object: &str, text: &str) -> Result<Self> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)
            .map_err(|e| Error::config(object, format!("malformed input: {}", e)))
    }

    pub fn from_ron_file<P: AsRef<Path>>(object: &str, path: P) -> Result<Self> {
        Self::from_ron_str(object, &fs::read_to_string(path)?)
    }

    pub(crate) fn domain<const DIM: usize>(&self, object: &str) -> Result<Vec<IndexBox<DIM>>> {
        if self.domain_boxes.is_empty() {
            return Err(Error::config(object, "key 'domain_boxes' is missing or empty"))
        }
        self.domain_boxes.iter().map(|b| b.to_index_box(object)).collect()
    }

    pub(crate) fn corners<const DIM: usize>(&self, object: &str) -> Result<([f64; DIM], [f64; DIM])> {
        Ok((to_array(object, "x_lo", &self.x_lo)?, to_array(object, "x_up", &self.x_up)?))
    }

    pub(crate) fn periodic<const DIM: usize>(&self, object: &str) -> Result<[bool; DIM]> {
        match &self.periodic_dimension {
            Some(flags) => to_array(object, "periodic_dimension", flags),
            None => Ok([false; DIM]),
        }
    }

    pub(crate) fn use_original_location_indices<const DIM: usize>(&self) -> bool {
        self.use_original_location_indices.unwrap_or(DIM == 3)
    }
}




// ============================================================================
impl BoxInput {

    pub(crate) fn to_index_box<const DIM: usize>(&self, object: &str) -> Result<IndexBox<DIM>> {
        Ok(IndexBox::new(
            to_array(object, "domain box lower corner", &self.lower)?,
            to_array(object, "domain box upper corner", &self.upper)?))
    }
}

impl<const DIM: usize> From<&IndexBox<DIM>> for BoxInput {
    fn from(index_box: &IndexBox<DIM>) -> Self {
        Self { lower: index_box.lower().to_vec(), upper: index_box.upper().to_vec() }
    }
}




/**
 * Convert a list of values into a fixed-size array, failing if the list does
 * not have exactly one entry per dimension.
 */
pub(crate) fn to_array<T: Copy + Default, const DIM: usize>(object: &str, key: &str, values: &[T]) -> Result<[T; DIM]> {
    if values.len() != DIM {
        return Err(Error::config(object, format!(
            "'{}' has {} entries, expected {}", key, values.len(), DIM)))
    }
    let mut result = [T::default(); DIM];
    result.copy_from_slice(values);
    Ok(result)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::GeometryInput;
    use crate::error::Error;
    use crate::index_space::IndexBox;

    const INPUT_2D: &str = r#"(
        domain_boxes: [(lower: [0, 0], upper: [49, 39])],
        x_lo: [0.0, 0.0],
        x_up: [50.0, 40.0],
        periodic_dimension: [false, true],
    )"#;

    #[test]
    fn parses_sample_input() {
        let input = GeometryInput::from_ron_str("geom", INPUT_2D).unwrap();
        assert_eq!(input.domain::<2>("geom").unwrap(), vec![IndexBox::new([0, 0], [49, 39])]);
        assert_eq!(input.periodic::<2>("geom").unwrap(), [false, true]);
        assert!(!input.use_original_location_indices::<2>());
    }

    #[test]
    fn optional_keys_take_defaults() {
        let input = GeometryInput::from_ron_str("geom", r#"(
            domain_boxes: [(lower: [0, 0, 0], upper: [7, 7, 7])],
            x_lo: [0.0, 0.0, 0.0],
            x_up: [1.0, 1.0, 1.0],
        )"#).unwrap();
        assert_eq!(input.periodic::<3>("geom").unwrap(), [false; 3]);
        assert!(input.use_original_location_indices::<3>());
    }

    #[test]
    fn missing_required_key_is_a_configuration_error() {
        let result = GeometryInput::from_ron_str("geom", r#"(
            domain_boxes: [(lower: [0, 0], upper: [9, 9])],
            x_lo: [0.0, 0.0],
        )"#);
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn wrong_number_of_entries_is_a_configuration_error() {
        let input = GeometryInput::from_ron_str("geom", INPUT_2D).unwrap();
        assert!(matches!(input.corners::<3>("geom"), Err(Error::InvalidConfiguration { .. })));
    }
}
