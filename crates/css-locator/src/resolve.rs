//! Specifier resolution.

use crate::error::LoadError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Maps a specifier, relative to the file that mentions it, to an absolute
/// filesystem path.
///
/// A resolver returns `None` when nothing matches; the locator turns that
/// into a [`LoadError::Resolution`] naming both the specifier and the
/// requesting file. Resolvers are free to hit the filesystem.
pub trait Resolver {
    /// Resolves `specifier` as referenced from `request`.
    fn resolve(&self, specifier: &str, request: &Utf8Path) -> Option<Utf8PathBuf>;
}

/// Wraps resolver output into the locator's fail-loudly form.
pub(crate) fn resolve_strict(
    resolver: &dyn Resolver,
    specifier: &str,
    request: &Utf8Path,
) -> Result<Utf8PathBuf, LoadError> {
    resolver
        .resolve(specifier, request)
        .ok_or_else(|| LoadError::Resolution {
            specifier: specifier.to_string(),
            request: request.to_owned(),
        })
}

/// The default filesystem resolver.
///
/// Relative and absolute specifiers are tried as written and then with each
/// known stylesheet extension appended. Bare specifiers are looked up in
/// `node_modules` directories walking up from the requesting file.
#[derive(Debug, Clone)]
pub struct FsResolver {
    extensions: Vec<String>,
}

impl Default for FsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FsResolver {
    /// Creates a resolver with the default extension list
    /// (`.css`, `.scss`, `.less`).
    pub fn new() -> Self {
        Self {
            extensions: vec![".css".into(), ".scss".into(), ".less".into()],
        }
    }

    /// Creates a resolver with a custom extension list. Extensions include
    /// the leading dot.
    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    /// Tries `candidate` as given, then with each extension appended.
    fn try_candidates(&self, candidate: &Utf8Path) -> Option<Utf8PathBuf> {
        if is_file(candidate) {
            return Some(normalize(candidate));
        }
        for ext in &self.extensions {
            let with_ext = Utf8PathBuf::from(format!("{candidate}{ext}"));
            if is_file(&with_ext) {
                return Some(normalize(&with_ext));
            }
        }
        None
    }
}

impl Resolver for FsResolver {
    fn resolve(&self, specifier: &str, request: &Utf8Path) -> Option<Utf8PathBuf> {
        let spec_path = Utf8Path::new(specifier);
        if spec_path.is_absolute() {
            return self.try_candidates(spec_path);
        }
        let base = request.parent()?;
        if specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." {
            return self.try_candidates(&base.join(specifier));
        }
        // Bare specifier: node_modules lookup through ancestor directories.
        let mut dir = Some(base);
        while let Some(current) = dir {
            let candidate = current.join("node_modules").join(specifier);
            if let Some(found) = self.try_candidates(&candidate) {
                return Some(found);
            }
            dir = current.parent();
        }
        None
    }
}

fn is_file(path: &Utf8Path) -> bool {
    std::fs::metadata(path.as_std_path())
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Lexically removes `.` and `..` components so dependency lists carry clean
/// absolute paths.
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                out.pop();
            }
            _ => out.push(component.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Utf8Path::new("/a/b/../c/./d.css")),
            Utf8PathBuf::from("/a/c/d.css")
        );
    }

    #[test]
    fn test_relative_resolution_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join("base.css"), ".base {}").unwrap();

        let resolver = FsResolver::new();
        let request = root.join("entry.css");
        assert_eq!(
            resolver.resolve("./base.css", &request),
            Some(root.join("base.css"))
        );
        assert_eq!(
            resolver.resolve("./base", &request),
            Some(root.join("base.css"))
        );
        assert_eq!(resolver.resolve("./missing.css", &request), None);
    }

    #[test]
    fn test_node_modules_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let pkg = root.join("node_modules/theme");
        std::fs::create_dir_all(&pkg).unwrap();
        std::fs::write(pkg.join("colors.css"), "").unwrap();

        let resolver = FsResolver::new();
        let request = root.join("src/entry.css");
        std::fs::create_dir_all(root.join("src")).unwrap();
        assert_eq!(
            resolver.resolve("theme/colors.css", &request),
            Some(pkg.join("colors.css"))
        );
    }
}
