//! Footprint library discovery and reference resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::LibraryError;
use crate::footprint::{parse_footprint, Footprint};

/// Directory suffix marking a footprint collection.
pub const COLLECTION_SUFFIX: &str = ".pretty";
/// File extension of footprint documents.
pub const FOOTPRINT_EXTENSION: &str = "kicad_mod";

/// A named collection of footprints.
#[derive(Debug, Clone)]
pub struct FootprintLibrary {
    name: String,
    footprints: BTreeMap<String, Footprint>,
}

impl FootprintLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            footprints: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Footprint> {
        self.footprints.get(name)
    }

    pub fn insert(&mut self, footprint: Footprint) {
        self.footprints.insert(footprint.name.clone(), footprint);
    }
}

/// Footprint libraries in registration order.
///
/// The order is significant: an unqualified reference resolves to the first
/// library containing the footprint, so this is an ordered list rather than
/// a map.
#[derive(Debug, Clone, Default)]
pub struct FootprintLibraryIndex {
    libraries: Vec<FootprintLibrary>,
}

impl FootprintLibraryIndex {
    /// Build the index from footprint directory paths.
    ///
    /// A `.pretty` path is one collection named after itself (suffix
    /// stripped). Any other path is scanned for immediate `.pretty`
    /// children, each becoming its own collection; if there are none, the
    /// path itself is scanned as a collection named by its basename. A
    /// missing path is a hard error.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LibraryError> {
        let mut index = Self::default();
        for path in paths {
            index.add_path(path.as_ref())?;
        }
        Ok(index)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &FootprintLibrary> {
        self.libraries.iter()
    }

    /// Register a library. Re-registering a name replaces the existing
    /// contents in place, keeping the original position.
    pub fn register(&mut self, library: FootprintLibrary) {
        match self.libraries.iter_mut().find(|l| l.name == library.name) {
            Some(existing) => *existing = library,
            None => self.libraries.push(library),
        }
    }

    /// Resolve a `Library:Footprint` or bare `Footprint` reference.
    ///
    /// A qualified reference into a known library searches only that library
    /// (no fallback when the footprint is absent there). Unqualified
    /// references, and references naming an unknown or empty library, search
    /// every library in registration order and the first match wins.
    pub fn resolve(&self, reference: &str) -> Option<&Footprint> {
        let (library, footprint) = match reference.split_once(':') {
            Some((lib, fp)) if !lib.is_empty() => (Some(lib), fp),
            Some((_, fp)) => (None, fp),
            None => (None, reference),
        };
        if let Some(library) = library {
            if let Some(lib) = self.libraries.iter().find(|l| l.name == library) {
                return lib.get(footprint);
            }
        }
        self.libraries.iter().find_map(|lib| lib.get(footprint))
    }

    fn add_path(&mut self, path: &Path) -> Result<(), LibraryError> {
        if !path.exists() {
            return Err(LibraryError::NotFound(path.to_path_buf()));
        }
        if let Some(name) = collection_name(path) {
            self.register(scan_collection(name, path)?);
            return Ok(());
        }

        let mut collections = Vec::new();
        for child in read_dir_sorted(path)? {
            if !child.is_dir() {
                continue;
            }
            if let Some(name) = collection_name(&child) {
                collections.push((name, child));
            }
        }
        if collections.is_empty() {
            // no .pretty children: treat the directory itself as a collection
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => path.to_string_lossy().into_owned(),
            };
            self.register(scan_collection(name, path)?);
        } else {
            for (name, dir) in collections {
                self.register(scan_collection(name, &dir)?);
            }
        }
        Ok(())
    }
}

/// The library name of a `.pretty` collection path, `None` for anything else.
fn collection_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let name = file_name.strip_suffix(COLLECTION_SUFFIX)?;
    Some(name.to_owned())
}

fn scan_collection(name: String, dir: &Path) -> Result<FootprintLibrary, LibraryError> {
    let mut library = FootprintLibrary::new(name);
    for file in read_dir_sorted(dir)? {
        if file.extension().and_then(|e| e.to_str()) != Some(FOOTPRINT_EXTENSION) {
            continue;
        }
        let Some(stem) = file.file_stem() else {
            continue;
        };
        let stem = stem.to_string_lossy().into_owned();
        let content = fs::read_to_string(&file).map_err(|source| LibraryError::Io {
            path: file.clone(),
            source,
        })?;
        library.insert(parse_footprint(&stem, &content));
    }
    info!(
        "loaded {} footprints from {}",
        library.len(),
        dir.display()
    );
    Ok(library)
}

// Directory iteration order is platform-dependent; sorting keeps repeated
// runs byte-identical.
fn read_dir_sorted(path: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    let entries = fs::read_dir(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_footprint(dir: &Path, name: &str, pads: &[&str]) {
        let mut content = format!("(footprint \"{name}\"\n");
        for pad in pads {
            content.push_str(&format!(
                "  (pad \"{pad}\" smd rect (at 0 0) (size 1 1))\n"
            ));
        }
        content.push(')');
        fs::write(dir.join(format!("{name}.{FOOTPRINT_EXTENSION}")), content).unwrap();
    }

    fn library_with(name: &str, footprints: &[(&str, &[&str])]) -> FootprintLibrary {
        let mut library = FootprintLibrary::new(name);
        for (fp_name, pads) in footprints {
            library.insert(Footprint {
                name: (*fp_name).to_owned(),
                pad_numbers: pads.iter().map(|p| (*p).to_owned()).collect(),
            });
        }
        library
    }

    #[test]
    fn loads_a_pretty_directory_as_one_collection() {
        let tmp = TempDir::new().unwrap();
        let pretty = tmp.path().join("LCSC.pretty");
        fs::create_dir(&pretty).unwrap();
        write_footprint(&pretty, "R_0603", &["1", "2"]);

        let index = FootprintLibraryIndex::load(&[pretty]).unwrap();
        let libraries: Vec<_> = index.libraries().collect();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name(), "LCSC");
        let footprint = libraries[0].get("R_0603").unwrap();
        assert_eq!(
            footprint.pad_numbers,
            BTreeSet::from(["1".to_owned(), "2".to_owned()])
        );
    }

    #[test]
    fn loads_every_pretty_child_of_a_parent_directory() {
        let tmp = TempDir::new().unwrap();
        for lib in ["Alpha.pretty", "Beta.pretty"] {
            let dir = tmp.path().join(lib);
            fs::create_dir(&dir).unwrap();
            write_footprint(&dir, "FP", &["1"]);
        }
        fs::create_dir(tmp.path().join("not_a_collection")).unwrap();

        let index = FootprintLibraryIndex::load(&[tmp.path()]).unwrap();
        let names: Vec<_> = index.libraries().map(|l| l.name().to_owned()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn falls_back_to_scanning_the_directory_itself() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("footprints");
        fs::create_dir(&dir).unwrap();
        write_footprint(&dir, "QFN_16", &["1", "2", "3"]);

        let index = FootprintLibraryIndex::load(&[dir]).unwrap();
        let libraries: Vec<_> = index.libraries().collect();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name(), "footprints");
        assert!(libraries[0].get("QFN_16").is_some());
    }

    #[test]
    fn missing_path_is_a_hard_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.pretty");
        let err = FootprintLibraryIndex::load(&[missing]).unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[test]
    fn reregistering_a_library_replaces_it_in_place() {
        let mut index = FootprintLibraryIndex::default();
        index.register(library_with("A", &[("old", &["1"])]));
        index.register(library_with("B", &[("other", &["1"])]));
        index.register(library_with("A", &[("new", &["1"])]));

        let names: Vec<_> = index.libraries().map(|l| l.name().to_owned()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(index.libraries().next().unwrap().get("old").is_none());
        assert!(index.libraries().next().unwrap().get("new").is_some());
    }

    #[test]
    fn qualified_reference_searches_only_the_named_library() {
        let mut index = FootprintLibraryIndex::default();
        index.register(library_with("First", &[("U_SOIC_8", &["1"])]));
        index.register(library_with("LCSC", &[("U_SOIC_8", &["1", "2"])]));

        let footprint = index.resolve("LCSC:U_SOIC_8").unwrap();
        assert_eq!(footprint.pad_numbers.len(), 2);

        // known library without the footprint: no fallback
        assert!(index.resolve("LCSC:QFN_16").is_none());
    }

    #[test]
    fn unqualified_reference_takes_the_first_library_in_order() {
        let mut index = FootprintLibraryIndex::default();
        index.register(library_with("First", &[("U_SOIC_8", &["1"])]));
        index.register(library_with("Second", &[("U_SOIC_8", &["1", "2"])]));

        let footprint = index.resolve("U_SOIC_8").unwrap();
        assert_eq!(footprint.pad_numbers.len(), 1);
    }

    #[test]
    fn unknown_library_name_falls_back_to_searching_all() {
        let mut index = FootprintLibraryIndex::default();
        index.register(library_with("Only", &[("R_0603", &["1", "2"])]));

        assert!(index.resolve("Typo:R_0603").is_some());
        assert!(index.resolve(":R_0603").is_some());
        assert!(index.resolve("R_0402").is_none());
    }
}
