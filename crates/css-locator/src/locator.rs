//! The load engine: cache lookup, read, transform, parse, recurse, assemble.

use crate::cache::{Cache, CacheEntry};
use crate::collect::collect;
use crate::error::LoadError;
use crate::locals::local_class_names;
use crate::position::PositionMapper;
use crate::resolve::{resolve_strict, FsResolver, Resolver};
use crate::specifier::is_ignored;
use crate::token::{LoadResult, Token};
use crate::transform::{self, ExtensionTransformer, Transformer};
use camino::{Utf8Path, Utf8PathBuf};
use css_parser::{AtValue, ComposesSource};
use rustc_hash::FxHashSet;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::time::UNIX_EPOCH;

/// Construction options for [`Locator`]. All fields are optional.
#[derive(Default)]
pub struct LocatorOptions {
    /// The preprocessor stage. Defaults to an [`ExtensionTransformer`] with
    /// no registered backends, which passes every file through untouched.
    pub transformer: Option<Box<dyn Transformer>>,
    /// The specifier resolver. Defaults to [`FsResolver`].
    pub resolver: Option<Box<dyn Resolver>>,
}

/// Locates the exported tokens of CSS Modules stylesheets.
///
/// A locator owns a per-file result cache invalidated by mtime, so repeated
/// loads after unrelated edits stay cheap. One locator serves one consumer:
/// it is single-threaded, and a second top-level [`load`](Self::load) while
/// one is in flight fails with [`LoadError::ConcurrentLoad`].
pub struct Locator {
    transformer: Box<dyn Transformer>,
    resolver: Box<dyn Resolver>,
    cache: RefCell<Cache>,
    loading: Cell<bool>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    /// Creates a locator with the default resolver and transformer.
    pub fn new() -> Self {
        Self::with_options(LocatorOptions::default())
    }

    /// Creates a locator with custom collaborators.
    pub fn with_options(options: LocatorOptions) -> Self {
        Self {
            transformer: options
                .transformer
                .unwrap_or_else(|| Box::new(ExtensionTransformer::new())),
            resolver: options.resolver.unwrap_or_else(|| Box::new(FsResolver::new())),
            cache: RefCell::new(Cache::default()),
            loading: Cell::new(false),
        }
    }

    /// Loads a stylesheet and every sheet reachable from it, returning its
    /// exported tokens and transitive dependencies.
    ///
    /// `file_path` must be absolute. The returned dependency list never
    /// contains `file_path` itself, and both lists are de-duplicated in
    /// first-seen order.
    pub async fn load(&self, file_path: &Utf8Path) -> Result<LoadResult, LoadError> {
        let _guard = InFlightGuard::acquire(&self.loading)?;
        self.load_file(file_path).await
    }

    /// Loads one file, consulting the cache first. Recursion point for
    /// imported sheets; does not touch the in-flight flag.
    fn load_file<'a>(
        &'a self,
        path: &'a Utf8Path,
    ) -> Pin<Box<dyn Future<Output = Result<LoadResult, LoadError>> + 'a>> {
        Box::pin(async move {
            if let Some(result) = self.fresh_cached(path).await {
                return Ok(result);
            }

            let mtime_ms = file_mtime_ms(path).await?;
            let source = tokio::fs::read_to_string(path.as_std_path())
                .await
                .map_err(|source| LoadError::Io {
                    path: path.to_owned(),
                    source,
                })?;

            // Sentinel entry: a cyclic import re-entering this file while it
            // is being built sees an empty result and terminates.
            self.cache.borrow_mut().insert(
                path.to_owned(),
                CacheEntry {
                    mtime_ms,
                    result: LoadResult::default(),
                },
            );

            match self.build(path, &source).await {
                Ok(result) => {
                    self.cache.borrow_mut().insert(
                        path.to_owned(),
                        CacheEntry {
                            mtime_ms,
                            result: result.clone(),
                        },
                    );
                    Ok(result)
                }
                Err(err) => {
                    self.cache.borrow_mut().remove(path);
                    Err(err)
                }
            }
        })
    }

    /// Returns the cached result when neither the file nor any recorded
    /// dependency changed mtime. Stat failures count as stale.
    async fn fresh_cached(&self, path: &Utf8Path) -> Option<LoadResult> {
        let (mtime_ms, dependencies) = {
            let cache = self.cache.borrow();
            let entry = cache.get(path)?;
            (entry.mtime_ms, entry.result.dependencies.clone())
        };
        match file_mtime_ms(path).await {
            Ok(current) if current == mtime_ms => {}
            _ => return None,
        }
        for dependency in &dependencies {
            let recorded = self.cache.borrow().get(dependency).map(|e| e.mtime_ms)?;
            match file_mtime_ms(dependency).await {
                Ok(current) if current == recorded => {}
                _ => return None,
            }
        }
        let cache = self.cache.borrow();
        cache.get(path).map(|entry| entry.result.clone())
    }

    /// Transforms, parses, and assembles the result for one file.
    async fn build(&self, path: &Utf8Path, source: &str) -> Result<LoadResult, LoadError> {
        let output = transform::apply(
            Some(self.transformer.as_ref()),
            source,
            path,
            self.resolver.as_ref(),
        )?;
        let mapper = PositionMapper::new(path, source, &output.css, output.map.as_ref());
        let sheet = css_parser::parse(&output.css).map_err(|err| {
            let location = mapper.location(err.span.start);
            LoadError::Syntax {
                path: path.to_owned(),
                line: location.line,
                column: location.column,
                message: err.to_string(),
            }
        })?;

        let locals = local_class_names(&sheet);
        let collected = collect(&sheet);

        let mut dependencies: Vec<Utf8PathBuf> = output.dependencies;
        let mut tokens: Vec<Token> = Vec::new();

        // `@import`: full re-export of the imported sheet.
        for import in &collected.imports {
            let Some(specifier) = css_parser::import_specifier(&import.params) else {
                continue;
            };
            if is_ignored(&specifier) {
                continue;
            }
            let resolved = resolve_strict(self.resolver.as_ref(), &specifier, path)?;
            let imported = self.load_file(&resolved).await?;
            dependencies.push(resolved);
            dependencies.extend(imported.dependencies.iter().cloned());
            tokens.extend(imported.tokens.iter().cloned());
        }

        // Class selectors declared locally in this sheet.
        for class in &collected.classes {
            if locals.contains(&class.name) {
                tokens.push(Token {
                    name: class.name.clone(),
                    imported_name: None,
                    original_location: mapper.location(class.span.start),
                });
            }
        }

        // `composes … from "…"`: a dependency edge, never a token.
        for composes in &collected.composes {
            let ComposesSource::File(specifier) = &composes.source else {
                continue;
            };
            if is_ignored(specifier) {
                continue;
            }
            let resolved = resolve_strict(self.resolver.as_ref(), specifier, path)?;
            let composed = self.load_file(&resolved).await?;
            dependencies.push(resolved);
            dependencies.extend(composed.dependencies.iter().cloned());
        }

        // `@value` declarations and imports.
        for (at_rule, value) in &collected.values {
            match value {
                AtValue::Declaration { name } => tokens.push(Token {
                    name: name.clone(),
                    imported_name: None,
                    original_location: mapper.location(at_rule.span.start),
                }),
                AtValue::Import { from, imports } => {
                    if is_ignored(from) {
                        continue;
                    }
                    let resolved = resolve_strict(self.resolver.as_ref(), from, path)?;
                    let imported_sheet = self.load_file(&resolved).await?;
                    dependencies.push(resolved);
                    dependencies.extend(imported_sheet.dependencies.iter().cloned());
                    for binding in imports {
                        // A name the source sheet does not export simply
                        // contributes nothing.
                        for token in imported_sheet
                            .tokens
                            .iter()
                            .filter(|t| t.name == binding.imported)
                        {
                            let imported_name = (binding.local != binding.imported)
                                .then(|| binding.imported.clone());
                            tokens.push(Token {
                                name: binding.local.clone(),
                                imported_name,
                                original_location: token.original_location.clone(),
                            });
                        }
                    }
                }
            }
        }

        // Finalise: first-seen order, the sheet itself excluded, structural
        // de-duplication.
        let mut seen_paths = FxHashSet::default();
        dependencies
            .retain(|dependency| dependency.as_path() != path && seen_paths.insert(dependency.clone()));
        let mut seen_tokens = FxHashSet::default();
        tokens.retain(|token| seen_tokens.insert(token.clone()));

        Ok(LoadResult {
            dependencies,
            tokens,
        })
    }
}

/// Clears the in-flight flag when the top-level load finishes, fails, or is
/// dropped mid-flight.
struct InFlightGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Result<Self, LoadError> {
        if flag.replace(true) {
            return Err(LoadError::ConcurrentLoad);
        }
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Stats a file and reports its mtime in milliseconds since the Unix epoch.
async fn file_mtime_ms(path: &Utf8Path) -> Result<i64, LoadError> {
    let metadata = tokio::fs::metadata(path.as_std_path())
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
    let modified = metadata.modified().map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let ms = match modified.duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis() as i64,
        Err(err) => -(err.duration().as_millis() as i64),
    };
    Ok(ms)
}
