//! Class-file backed metadata for `supertype-hierarchy`: directories, jars and
//! jmods searched in order, with class headers parsed on demand.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;
use zip::ZipArchive;

mod reader;

pub use reader::ClassFileReader;

/// Upper bound on the buffer reserved from a zip entry's declared size.
const MAX_PREALLOCATION: u64 = 1 << 20;

#[derive(Debug, Error)]
pub enum ClasspathError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("classfile error: {0}")]
    ClassFile(#[from] supertype_classfile::Error),
}

/// Byte-level access to named resources such as `java/lang/Object.class`.
pub trait ResourceLoader: Send + Sync {
    fn has_resource(&self, name: &str) -> bool;

    /// `Ok(None)` when the resource does not exist.
    fn read_resource(&self, name: &str) -> Result<Option<Vec<u8>>, ClasspathError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClasspathEntry {
    ClassDir(PathBuf),
    Jar(PathBuf),
    Jmod(PathBuf),
}

impl ClasspathEntry {
    pub fn path(&self) -> &Path {
        match self {
            ClasspathEntry::ClassDir(path)
            | ClasspathEntry::Jar(path)
            | ClasspathEntry::Jmod(path) => path,
        }
    }

    /// Picks the entry kind from the file extension; anything that is not a
    /// `.jar` or `.jmod` is treated as a class directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jar") => ClasspathEntry::Jar(path),
            Some(ext) if ext.eq_ignore_ascii_case("jmod") => ClasspathEntry::Jmod(path),
            _ => ClasspathEntry::ClassDir(path),
        }
    }

    fn archive_name(&self, name: &str) -> Option<String> {
        match self {
            ClasspathEntry::ClassDir(_) => None,
            ClasspathEntry::Jar(_) => Some(name.to_string()),
            // JMODs place class files under `classes/`.
            ClasspathEntry::Jmod(_) => Some(format!("classes/{name}")),
        }
    }

    fn open_archive(&self) -> Result<Option<ZipArchive<File>>, ClasspathError> {
        let file = match File::open(self.path()) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(ZipArchive::new(file)?))
    }

    fn read_from_dir(&self, name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        match std::fs::read(self.path().join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_archive_entry(
    archive: &mut ZipArchive<File>,
    name: &str,
) -> Result<Option<Vec<u8>>, ClasspathError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOCATION) as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn log_unreadable(path: &Path, err: &ClasspathError) {
    tracing::debug!(
        target = "supertype.classpath",
        path = %path.display(),
        error = %err,
        "unreadable classpath archive"
    );
}

impl ResourceLoader for ClasspathEntry {
    fn has_resource(&self, name: &str) -> bool {
        let Some(archive_name) = self.archive_name(name) else {
            return self.path().join(name).is_file();
        };
        match self.open_archive() {
            Ok(Some(mut archive)) => archive.by_name(&archive_name).is_ok(),
            Ok(None) => false,
            Err(err) => {
                log_unreadable(self.path(), &err);
                false
            }
        }
    }

    fn read_resource(&self, name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        let Some(archive_name) = self.archive_name(name) else {
            return self.read_from_dir(name);
        };
        match self.open_archive()? {
            Some(mut archive) => read_archive_entry(&mut archive, &archive_name),
            None => Ok(None),
        }
    }
}

/// Ordered entries; the first entry that has a resource provides it.
///
/// Jar and jmod archives are opened on first use and kept open, so their
/// central directory is parsed once per classpath.
#[derive(Default)]
pub struct Classpath {
    entries: Vec<ClasspathEntry>,
    archives: Vec<Mutex<Option<ZipArchive<File>>>>,
}

impl Classpath {
    pub fn new(entries: Vec<ClasspathEntry>) -> Self {
        let archives = entries.iter().map(|_| Mutex::new(None)).collect();
        Self { entries, archives }
    }

    pub fn entries(&self) -> &[ClasspathEntry] {
        &self.entries
    }

    /// Runs `f` against the opened archive of entry `index`, opening it first
    /// if needed. `Ok(None)` when the archive file does not exist.
    fn with_archive<T>(
        &self,
        index: usize,
        f: impl FnOnce(&mut ZipArchive<File>) -> Result<T, ClasspathError>,
    ) -> Result<Option<T>, ClasspathError> {
        let mut slot = self.archives[index].lock();
        if slot.is_none() {
            *slot = self.entries[index].open_archive()?;
        }
        match slot.as_mut() {
            Some(archive) => f(archive).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for Classpath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classpath")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl FromIterator<ClasspathEntry> for Classpath {
    fn from_iter<I: IntoIterator<Item = ClasspathEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ResourceLoader for Classpath {
    fn has_resource(&self, name: &str) -> bool {
        self.entries.iter().enumerate().any(|(index, entry)| {
            let Some(archive_name) = entry.archive_name(name) else {
                return entry.path().join(name).is_file();
            };
            match self.with_archive(index, |archive| Ok(archive.by_name(&archive_name).is_ok())) {
                Ok(found) => found.unwrap_or(false),
                Err(err) => {
                    log_unreadable(entry.path(), &err);
                    false
                }
            }
        })
    }

    fn read_resource(&self, name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        for (index, entry) in self.entries.iter().enumerate() {
            let bytes = match entry.archive_name(name) {
                None => entry.read_from_dir(name)?,
                Some(archive_name) => self
                    .with_archive(index, |archive| read_archive_entry(archive, &archive_name))?
                    .flatten(),
            };
            if bytes.is_some() {
                return Ok(bytes);
            }
        }
        Ok(None)
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for std::sync::Arc<L> {
    fn has_resource(&self, name: &str) -> bool {
        (**self).has_resource(name)
    }

    fn read_resource(&self, name: &str) -> Result<Option<Vec<u8>>, ClasspathError> {
        (**self).read_resource(name)
    }
}
