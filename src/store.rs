//! Storage engine, its options, and the builder.

use crate::error::{Error, Result};
use crate::logger::{ConsoleLogger, Logger};
use crate::paths;
use crate::persist::{atomic_write, ensure_dir, list_records, read_bytes};
use crate::registry::LockRegistry;
use crate::serializer::{JsonSerializer, Serializer};
use crate::DefaultRegistry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bootstrap options. Everything is optional.
#[derive(Clone, Default)]
pub struct Options {
    /// Where the store sends its log messages. `None` means a
    /// [`ConsoleLogger`] at info level.
    pub logger: Option<Arc<dyn Logger>>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("logger", &self.logger.as_ref().map(|_| "<dyn Logger>"))
            .finish()
    }
}

/// Document store rooted at one directory.
///
/// Each collection is a subdirectory of the root and each resource is one
/// file inside it. Writes and deletes take the collection's exclusive lock;
/// reads take no lock and rely on rename to never see a partial record.
///
/// `Cabinet` is `Send + Sync`; wrap it in an `Arc` to share it between
/// threads. Every instance owns its own lock registry, so two instances over
/// the same root do not exclude each other.
pub struct Cabinet<R = DefaultRegistry, S = JsonSerializer> {
    root: PathBuf,
    locks: R,
    serializer: S,
    log: Arc<dyn Logger>,
}

impl Cabinet {
    /// Open (or create) a store at `root` with default options.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::builder(root).build()
    }

    /// Open (or create) a store at `root` with the given [`Options`].
    pub fn with_options(root: impl AsRef<Path>, options: Options) -> Result<Self> {
        let mut builder = Self::builder(root);
        builder.logger = options.logger;
        builder.build()
    }

    /// Start configuring a new store. Call [`.build()`](CabinetBuilder::build)
    /// when ready.
    pub fn builder(root: impl AsRef<Path>) -> CabinetBuilder {
        CabinetBuilder::new(root)
    }
}

impl<R, S> Cabinet<R, S>
where
    R: LockRegistry,
    S: Serializer,
{
    // ---- writes ----

    /// Serialize `value` and store it as `collection/resource`, replacing any
    /// previous content. The new file becomes visible in one rename.
    pub fn write<T>(&self, collection: &str, resource: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        require("collection", collection, "no place to save record")?;
        require("resource", resource, "unable to save record")?;

        let lock = self.locks.get_or_create(collection);
        let _guard = lock.lock();

        ensure_dir(&paths::collection_dir(&self.root, collection))?;
        let bytes = self.serializer.serialize(value)?;
        let ext = self.serializer.extension();
        let target = paths::resolve(&self.root, collection, resource, ext);
        if let Err(e) = atomic_write(&target, &bytes) {
            self.log
                .warning(format_args!("write {collection}/{resource} failed: {e}"));
            return Err(e);
        }
        self.log.trace(format_args!(
            "wrote {collection}/{resource} ({} bytes)",
            bytes.len()
        ));
        Ok(())
    }

    /// Remove `collection/resource`.
    ///
    /// `resource` is probed as given and then with the record extension. If
    /// it resolves to a directory the whole directory is removed, otherwise
    /// the single file is. Missing targets are [`Error::NotFound`].
    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        require("collection", collection, "unable to delete")?;
        require("resource", resource, "unable to delete")?;

        let lock = self.locks.get_or_create(collection);
        let _guard = lock.lock();

        let target = paths::collection_dir(&self.root, collection).join(resource);
        let (path, meta) = paths::probe(&target, self.serializer.extension())
            .map_err(|e| missing(e, &target, || format!("{collection}/{resource}")))?;

        let removed = if meta.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| Error::io_at(&path, e))?;
        self.log.trace(format_args!("deleted {collection}/{resource}"));
        Ok(())
    }

    /// Remove a collection directory and every record in it.
    pub fn delete_collection(&self, collection: &str) -> Result<()> {
        require("collection", collection, "unable to delete")?;

        let lock = self.locks.get_or_create(collection);
        let _guard = lock.lock();

        let dir = self.collection_dir_checked(collection)?;
        std::fs::remove_dir_all(&dir).map_err(|e| Error::io_at(&dir, e))?;
        self.log.debug(format_args!("deleted collection {collection}"));
        Ok(())
    }

    // ---- reads ----

    /// Load `collection/resource` and decode it as `T`.
    ///
    /// No lock is taken: a concurrent write is seen either entirely or not at
    /// all.
    pub fn read<T>(&self, collection: &str, resource: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        require("collection", collection, "unable to read")?;
        require("resource", resource, "unable to read record")?;

        let record = paths::collection_dir(&self.root, collection).join(resource);
        let (path, meta) = paths::probe(&record, self.serializer.extension())
            .map_err(|e| missing(e, &record, || format!("{collection}/{resource}")))?;
        if !meta.is_file() {
            return Err(Error::NotFound(format!(
                "{collection}/{resource} is not a record"
            )));
        }
        let bytes = read_bytes(&path)?;
        self.serializer.deserialize(&bytes)
    }

    /// Raw contents of every record in `collection`, ordered by file name.
    ///
    /// Not a snapshot: records written or deleted while the directory is
    /// being read may or may not show up.
    pub fn read_all(&self, collection: &str) -> Result<Vec<String>> {
        require("collection", collection, "unable to read")?;

        let dir = self.collection_dir_checked(collection)?;
        let files = list_records(&dir, self.serializer.extension())?;

        let mut records = Vec::with_capacity(files.len());
        for path in files {
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io_at(&path, e)),
            };
            let text = String::from_utf8(bytes)
                .map_err(|e| Error::Deserialize(format!("{}: {e}", path.display())))?;
            records.push(text);
        }
        Ok(records)
    }

    /// Like [`read_all`](Self::read_all) but decodes every record as `T`.
    pub fn read_all_as<T>(&self, collection: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.read_all(collection)?
            .iter()
            .map(|raw| self.serializer.deserialize(raw.as_bytes()))
            .collect()
    }

    // ---- accessors ----

    /// The normalized root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The per-collection lock registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.locks
    }

    /// The record serializer.
    #[must_use]
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    // ---- internal ----

    fn collection_dir_checked(&self, collection: &str) -> Result<PathBuf> {
        let dir = paths::collection_dir(&self.root, collection);
        let meta = std::fs::metadata(&dir)
            .map_err(|e| missing(e, &dir, || format!("collection {collection}")))?;
        if !meta.is_dir() {
            return Err(Error::NotFound(format!("collection {collection}")));
        }
        Ok(dir)
    }
}

impl<R, S> std::fmt::Debug for Cabinet<R, S>
where
    S: Serializer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cabinet")
            .field("root", &self.root)
            .field("extension", &self.serializer.extension())
            .finish_non_exhaustive()
    }
}

fn require(what: &str, value: &str, context: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("missing {what} - {context}")));
    }
    // names must stay inside their parent directory
    if value == "." || value == ".." || value.chars().any(std::path::is_separator) {
        return Err(Error::Validation(format!(
            "invalid {what} name {value:?} - {context}"
        )));
    }
    Ok(())
}

fn missing(err: std::io::Error, path: &Path, name: impl FnOnce() -> String) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(name())
    } else {
        Error::io_at(path, err)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Cabinet`].
///
/// ```rust,no_run
/// use json_cabinet::{Cabinet, ConsoleLogger, Level};
/// use std::sync::Arc;
///
/// let db = Cabinet::builder("./data")
///     .pretty(false)
///     .logger(Arc::new(ConsoleLogger::new(Level::Debug)))
///     .build()
///     .unwrap();
/// ```
pub struct CabinetBuilder<R = DefaultRegistry, S = JsonSerializer> {
    root: PathBuf,
    logger: Option<Arc<dyn Logger>>,
    serializer: S,
    _marker: PhantomData<R>,
}

impl CabinetBuilder {
    fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            logger: None,
            serializer: JsonSerializer::default(),
            _marker: PhantomData,
        }
    }
}

impl<R> CabinetBuilder<R, JsonSerializer> {
    /// Tab-indented JSON (default) or compact single-line JSON.
    pub fn pretty(mut self, yes: bool) -> Self {
        self.serializer = if yes {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::compact()
        };
        self
    }
}

impl<R, S> CabinetBuilder<R, S>
where
    R: LockRegistry + Default,
    S: Serializer,
{
    /// Send log messages to `logger` instead of the default console logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Use a different record format.
    pub fn serializer<S2: Serializer>(self, serializer: S2) -> CabinetBuilder<R, S2> {
        CabinetBuilder {
            root: self.root,
            logger: self.logger,
            serializer,
            _marker: PhantomData,
        }
    }

    /// Use a different lock registry type.
    pub fn registry<R2: LockRegistry + Default>(self) -> CabinetBuilder<R2, S> {
        CabinetBuilder {
            root: self.root,
            logger: self.logger,
            serializer: self.serializer,
            _marker: PhantomData,
        }
    }

    /// Create the root directory if needed and return the store.
    pub fn build(self) -> Result<Cabinet<R, S>> {
        let root = paths::normalize(&self.root);
        let log: Arc<dyn Logger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(ConsoleLogger::default()),
        };

        match std::fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {
                log.debug(format_args!(
                    "using '{}' (database already exists)",
                    root.display()
                ));
            }
            Ok(_) => {
                return Err(Error::Config(format!(
                    "'{}' exists and is not a directory",
                    root.display()
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log.debug(format_args!("creating the database at '{}'", root.display()));
                if let Err(e) = ensure_dir(&root) {
                    log.error(format_args!("cannot create '{}': {e}", root.display()));
                    return Err(e);
                }
            }
            Err(e) => return Err(Error::io_at(&root, e)),
        }

        Ok(Cabinet {
            root,
            locks: R::default(),
            serializer: self.serializer,
            log,
        })
    }
}

impl<R, S> std::fmt::Debug for CabinetBuilder<R, S>
where
    S: Serializer,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CabinetBuilder")
            .field("root", &self.root)
            .field("extension", &self.serializer.extension())
            .field("custom_logger", &self.logger.is_some())
            .finish()
    }
}
