//! The project filesystem collaborator.
//!
//! Maps dotted module names to files under a root directory, reads
//! modules lazily into an in-memory cache, and writes every touched
//! module back in a single terminal pass. Nothing reaches the disk
//! before [`Project::persist`]; a failure mid-persist reports the files
//! already written.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{MoveError, Result};
use crate::module::Module;

/// A non-empty dotted module name, ordered segment-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    /// Parse a dotted name; empty names and empty segments are rejected.
    pub fn parse(dotted: &str) -> Result<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_owned).collect();
        if dotted.is_empty() || segments.iter().any(String::is_empty) {
            return Err(MoveError::ImportShape(format!(
                "invalid module name '{dotted}'"
            )));
        }
        Ok(Self(segments))
    }

    pub fn from_segments(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(MoveError::ImportShape("empty module name".to_owned()));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The dotted rendering, e.g. `pkg.sub.mod`.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl std::fmt::Display for ModuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// A collection of named modules over a filesystem root.
pub struct Project {
    root: PathBuf,
    modules: BTreeMap<ModuleName, Module>,
}

impl Project {
    /// Open a project rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(MoveError::NotADirectory(root.display().to_string()));
        }
        Ok(Self {
            root,
            modules: BTreeMap::new(),
        })
    }

    /// File path of a module: segments joined by `/` with a `.py`
    /// suffix. A name whose file is missing but whose directory holds an
    /// `__init__.py` resolves to that package file instead.
    pub fn module_path(&self, name: &ModuleName) -> PathBuf {
        let mut path = self.root.clone();
        for segment in name.segments() {
            path.push(segment);
        }
        let init = path.join("__init__.py");
        path.set_extension("py");
        if !path.is_file() && init.is_file() {
            return init;
        }
        path
    }

    /// Load a module from disk (cached).
    pub fn module(&mut self, name: &ModuleName) -> Result<&mut Module> {
        if !self.modules.contains_key(name) {
            let path = self.module_path(name);
            if !path.is_file() {
                return Err(MoveError::ModuleNotFound(name.dotted()));
            }
            let source = fs::read_to_string(&path)?;
            let module = Module::parse(&source).map_err(|err| MoveError::Parse {
                module: name.dotted(),
                source: err,
            })?;
            self.modules.insert(name.clone(), module);
        }
        Ok(self.modules.get_mut(name).expect("just inserted"))
    }

    /// Load a module, or start an empty one when its file does not exist
    /// yet (the motion's destination).
    pub fn module_or_empty(&mut self, name: &ModuleName) -> Result<&mut Module> {
        if !self.modules.contains_key(name) && !self.module_path(name).is_file() {
            let module = Module::parse("").map_err(|err| MoveError::Parse {
                module: name.dotted(),
                source: err,
            })?;
            self.modules.insert(name.clone(), module);
            return Ok(self.modules.get_mut(name).expect("just inserted"));
        }
        self.module(name)
    }

    /// Write a module file immediately, creating containing packages
    /// (with empty `__init__.py` files) on demand.
    pub fn create_module(&mut self, name: &str, content: &str) -> Result<()> {
        let name = ModuleName::parse(name)?;
        self.ensure_packages(&name)?;
        fs::write(self.module_path(&name), content)?;
        Ok(())
    }

    /// Read a module's current file content.
    pub fn module_content(&self, name: &str) -> Result<String> {
        let name = ModuleName::parse(name)?;
        Ok(fs::read_to_string(self.module_path(&name))?)
    }

    fn ensure_packages(&self, name: &ModuleName) -> std::io::Result<()> {
        let mut dir = self.root.clone();
        for segment in &name.segments()[..name.segments().len() - 1] {
            dir.push(segment);
            fs::create_dir_all(&dir)?;
            let init = dir.join("__init__.py");
            if !init.exists() {
                fs::write(&init, "")?;
            }
        }
        Ok(())
    }

    /// Every module in the project, in deterministic (lexicographic
    /// path) order. Package `__init__.py` files appear with a trailing
    /// `__init__` segment.
    pub fn module_names(&self) -> Result<Vec<ModuleName>> {
        let mut names = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.file_type().is_dir() || entry.path().extension() == Some("py".as_ref())
            });
        for entry in walker {
            let entry = entry.map_err(|err| {
                MoveError::Io(err.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("walk error")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|_| MoveError::Internal("walk outside project root".to_owned()))?;
            let mut segments: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if let Some(last) = segments.last_mut() {
                *last = last.trim_end_matches(".py").to_owned();
            }
            if let Ok(name) = ModuleName::from_segments(segments) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Modules touched since load, in name order.
    pub fn touched(&self) -> Vec<ModuleName> {
        self.modules
            .iter()
            .filter(|(_, module)| module.revision() > 0)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Write the given modules back to disk, in order. Containing
    /// packages of new files are created on demand. On failure, the
    /// error reports the files already written.
    pub fn persist(&mut self, order: &[ModuleName]) -> Result<Vec<ModuleName>> {
        let mut written: Vec<ModuleName> = Vec::new();
        for name in order {
            let Some(module) = self.modules.get(name) else {
                continue;
            };
            let result = self
                .ensure_packages(name)
                .and_then(|()| fs::write(self.module_path(name), module.source()));
            if let Err(err) = result {
                if written.is_empty() {
                    return Err(MoveError::Io(err));
                }
                return Err(MoveError::Persist {
                    written: written.iter().map(ModuleName::dotted).collect(),
                    message: format!("writing '{}': {err}", name.dotted()),
                });
            }
            debug!(module = %name, path = %self.module_path(name).display(), "wrote module");
            written.push(name.clone());
        }
        Ok(written)
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_parsing() {
        assert_eq!(ModuleName::parse("a.b.c").unwrap().dotted(), "a.b.c");
        assert!(ModuleName::parse("").is_err());
        assert!(ModuleName::parse("a..b").is_err());
    }

    #[test]
    fn module_name_ordering() {
        let a = ModuleName::parse("pkg.a").unwrap();
        let b = ModuleName::parse("pkg.b").unwrap();
        assert!(a < b);
        assert_eq!(a, ModuleName::parse("pkg.a").unwrap());
    }

    #[test]
    fn path_mapping_and_package_creation() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = Project::open(dir.path()).unwrap();
        project.create_module("pkg.sub.mod", "x = 1\n").unwrap();

        assert!(dir.path().join("pkg/__init__.py").is_file());
        assert!(dir.path().join("pkg/sub/__init__.py").is_file());
        assert_eq!(project.module_content("pkg.sub.mod").unwrap(), "x = 1\n");

        let names: Vec<String> = project
            .module_names()
            .unwrap()
            .iter()
            .map(ModuleName::dotted)
            .collect();
        assert_eq!(
            names,
            vec!["pkg.__init__", "pkg.sub.__init__", "pkg.sub.mod"]
        );
    }

    #[test]
    fn open_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            Project::open(&missing),
            Err(MoveError::NotADirectory(_))
        ));
    }
}
