use thiserror::Error;




/**
 * Error to represent invalid geometry configuration, incompatible refinement
 * ratios, or a restart record that cannot be restored.
 */
#[derive(Debug, Error)]
pub enum Error {

    #[error("{object}: invalid configuration: {reason}")]
    InvalidConfiguration { object: String, reason: String },

    #[error("{object}: invalid geometry: {reason}")]
    InvalidGeometry { object: String, reason: String },

    #[error("{object}: invalid ratio {ratio} in dimension {dimension}: {reason}")]
    InvalidRatio {
        object: String,
        dimension: usize,
        ratio: i64,
        reason: String,
    },

    #[error("{object}: no restart record with this name")]
    RestartRecordMissing { object: String },

    #[error("{object}: restart version {found} does not match expected version {expected}")]
    RestartVersionMismatch {
        object: String,
        found: u32,
        expected: u32,
    },

    #[error("{object}: invalid restart record: {reason}")]
    InvalidRestart { object: String, reason: String },

    #[error("encoding error: {0}")]
    Codec(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}




pub type Result<T> = std::result::Result<T, Error>;




// ============================================================================
impl Error {

    pub(crate) fn config(object: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { object: object.to_string(), reason: reason.into() }
    }

    pub(crate) fn geometry(object: &str, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry { object: object.to_string(), reason: reason.into() }
    }

    pub(crate) fn ratio(object: &str, dimension: usize, ratio: i64, reason: impl Into<String>) -> Self {
        Self::InvalidRatio {
            object: object.to_string(),
            dimension,
            ratio,
            reason: reason.into(),
        }
    }

    pub(crate) fn restart(object: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRestart { object: object.to_string(), reason: reason.into() }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Error;

    #[test]
    fn ratio_error_names_object_dimension_and_value() {
        let message = Error::ratio("level_1", 1, 3, "domain not divisible").to_string();
        assert!(message.contains("level_1"));
        assert!(message.contains("dimension 1"));
        assert!(message.contains("ratio 3"));
    }

    #[test]
    fn version_mismatch_reports_both_versions() {
        let error = Error::RestartVersionMismatch { object: "geom".into(), found: 1, expected: 2 };
        assert_eq!(
            error.to_string(),
            "geom: restart version 1 does not match expected version 2");
    }
}
