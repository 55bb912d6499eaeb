use std::path::{Path, PathBuf};

use learn_core::model::Catalog;
use tracing::info;

use crate::error::CatalogServiceError;

/// Where the course definition comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSource {
    /// The catalog compiled into the binary.
    #[default]
    Builtin,
    /// A TOML document on disk.
    File(PathBuf),
}

impl CatalogSource {
    /// Load and validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError` if the file cannot be read or the
    /// document is malformed or violates id uniqueness.
    pub fn load(&self) -> Result<Catalog, CatalogServiceError> {
        let catalog = match self {
            CatalogSource::Builtin => Catalog::builtin()?,
            CatalogSource::File(path) => load_file(path)?,
        };
        info!(
            phases = catalog.phases().len(),
            topics = catalog.topic_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn load_file(path: &Path) -> Result<Catalog, CatalogServiceError> {
    let source = std::fs::read_to_string(path).map_err(|source| CatalogServiceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_toml_str(&source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::CatalogError;
    use std::io::Write;

    #[test]
    fn builtin_source_loads() {
        let catalog = CatalogSource::Builtin.load().unwrap();
        assert!(catalog.topic_count() > 0);
    }

    #[test]
    fn missing_file_is_read_error() {
        let source = CatalogSource::File(PathBuf::from("/definitely/not/here/course.toml"));
        assert!(matches!(
            source.load(),
            Err(CatalogServiceError::Read { .. })
        ));
    }

    #[test]
    fn file_with_duplicate_topics_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"
            [[phases]]
            id = "a"
            title = "A"
            color = "#111111"
            [[phases.topics]]
            id = "intro"
            title = "Intro"

            [[phases]]
            id = "b"
            title = "B"
            color = "#222222"
            [[phases.topics]]
            id = "intro"
            title = "Intro again"
            "##
        )
        .unwrap();

        let result = CatalogSource::File(file.path().to_path_buf()).load();
        assert!(matches!(
            result,
            Err(CatalogServiceError::Catalog(CatalogError::DuplicateTopic { .. }))
        ));
    }
}
