//! Resource resolution collaborator interfaces.
//!
//! The pipeline never touches the filesystem directly; it resolves
//! URL-like location strings through a [`ResourceResolver`] and reads
//! through the returned [`Resource`] handle. [`FsResourceResolver`]
//! is the standard filesystem-backed implementation, mapping the
//! `classpath:` scheme onto a configured base directory and `file:`
//! onto a working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A handle to one resolvable configuration resource.
pub trait Resource {
    /// Returns true if the resource exists and can be read.
    fn exists(&self) -> bool;

    /// Returns the file-type suffix of the resource, if any.
    fn filename_extension(&self) -> Option<String>;

    /// Reads the whole resource as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be read.
    fn read_to_string(&self) -> io::Result<String>;

    /// Returns a human-readable description for log messages.
    fn description(&self) -> String;
}

/// Resolves URL-like location strings into [`Resource`] handles.
pub trait ResourceResolver {
    /// Resolves a location string.
    ///
    /// Resolution itself never fails; existence is checked on the
    /// returned handle before any read is attempted.
    fn resolve(&self, location: &str) -> Box<dyn Resource>;
}

/// A filesystem-backed resource.
#[derive(Debug, Clone)]
pub struct FsResource {
    path: PathBuf,
    location: String,
}

impl Resource for FsResource {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn filename_extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .filter(|ext| !ext.is_empty())
    }

    fn read_to_string(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn description(&self) -> String {
        format!("'{}' ({})", self.path.display(), self.location)
    }
}

/// Resolves `classpath:` and `file:` locations against two directory
/// roots.
///
/// # Examples
///
/// ```no_run
/// use lamina::resource::{FsResourceResolver, ResourceResolver};
/// use std::path::Path;
///
/// let resolver = FsResourceResolver::new(
///     Path::new("/opt/app/resources"),
///     Path::new("."),
/// );
/// let resource = resolver.resolve("classpath:/application.yaml");
/// if resource.exists() {
///     let content = resource.read_to_string().unwrap();
///     println!("{content}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FsResourceResolver {
    classpath_root: PathBuf,
    file_root: PathBuf,
}

impl FsResourceResolver {
    /// Creates a resolver with the given roots for the `classpath:`
    /// and `file:` schemes.
    #[must_use]
    pub fn new(classpath_root: &Path, file_root: &Path) -> Self {
        Self {
            classpath_root: classpath_root.to_path_buf(),
            file_root: file_root.to_path_buf(),
        }
    }

    fn path_for(&self, location: &str) -> PathBuf {
        if let Some(rest) = location.strip_prefix("classpath:") {
            return self.classpath_root.join(rest.trim_start_matches('/'));
        }
        let rest = location.strip_prefix("file:").unwrap_or(location);
        let rest = rest.strip_prefix("./").unwrap_or(rest);
        self.file_root.join(rest)
    }
}

impl ResourceResolver for FsResourceResolver {
    fn resolve(&self, location: &str) -> Box<dyn Resource> {
        Box::new(FsResource {
            path: self.path_for(location),
            location: location.to_string(),
        })
    }
}
