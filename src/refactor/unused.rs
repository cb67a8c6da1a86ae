//! Dead-import elimination.
//!
//! An imported name with zero references is dead unless the module
//! re-exports it via `__all__`. A multi-alias import survives with its
//! remaining aliases (comma positions normalized); a statement that
//! loses every alias disappears. Star imports are opaque and never
//! pruned.

use std::collections::{HashMap, HashSet};

use haul_cst::{
    Import, ImportFrom, ImportNames, ScopeIndex, SmallStatement, Span, Transform, Transformer,
};
use tracing::trace;

use crate::refactor::imports::normalize_alias_commas;

/// Imported names with no references and no export, grouped by the span
/// of their import statement.
pub fn find_unused_imports(
    index: &ScopeIndex,
    exports: &HashSet<String>,
) -> HashMap<Span, HashSet<String>> {
    let mut unused: HashMap<Span, HashSet<String>> = HashMap::new();
    for assignment in index.assignments() {
        if !assignment.kind.is_import() {
            continue;
        }
        if assignment.references.is_empty() && !exports.contains(&assignment.name) {
            unused
                .entry(assignment.node)
                .or_default()
                .insert(assignment.name.clone());
        }
    }
    unused
}

/// Removes unused import aliases discovered by [`find_unused_imports`].
pub struct RemoveUnusedImports {
    unused: HashMap<Span, HashSet<String>>,
    /// True when this pass changed the module.
    pub did_update: bool,
}

impl RemoveUnusedImports {
    pub fn new(index: &ScopeIndex, exports: &HashSet<String>) -> Self {
        let unused = find_unused_imports(index, exports);
        trace!(statements = unused.len(), "unused import analysis");
        Self {
            unused,
            did_update: false,
        }
    }

    fn trim_import(&mut self, node: Import) -> Transform<SmallStatement> {
        let Some(names) = self.unused.get(&node.span) else {
            return Transform::Keep(SmallStatement::Import(node));
        };
        let kept: Vec<_> = node
            .names
            .iter()
            .filter(|alias| !names.contains(&alias.bound_name()))
            .cloned()
            .collect();
        self.did_update = true;
        if kept.is_empty() {
            return Transform::Remove;
        }
        let mut trimmed = node;
        trimmed.names = normalize_alias_commas(kept);
        Transform::Keep(SmallStatement::Import(trimmed))
    }

    fn trim_import_from(&mut self, node: ImportFrom) -> Transform<SmallStatement> {
        let Some(names) = self.unused.get(&node.span) else {
            return Transform::Keep(SmallStatement::ImportFrom(node));
        };
        let ImportNames::Aliases(aliases) = &node.names else {
            // Star imports bind opaquely; leave them alone.
            return Transform::Keep(SmallStatement::ImportFrom(node));
        };
        let kept: Vec<_> = aliases
            .iter()
            .filter(|alias| !names.contains(&alias.bound_name()))
            .cloned()
            .collect();
        self.did_update = true;
        if kept.is_empty() {
            return Transform::Remove;
        }
        let mut trimmed = node;
        trimmed.names = ImportNames::Aliases(normalize_alias_commas(kept));
        Transform::Keep(SmallStatement::ImportFrom(trimmed))
    }
}

impl Transformer for RemoveUnusedImports {
    fn transform_small_statement(&mut self, small: SmallStatement) -> Transform<SmallStatement> {
        match small {
            SmallStatement::Import(node) => self.trim_import(node),
            SmallStatement::ImportFrom(node) => self.trim_import_from(node),
            other => Transform::Keep(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_cst::{parse_module, render, transform_module, ExportCollector};

    fn sweep(source: &str) -> String {
        let module = parse_module(source).unwrap();
        let index = ScopeIndex::build(&module);
        let exports = ExportCollector::collect(&module);
        let mut sweeper = RemoveUnusedImports::new(&index, &exports);
        render(&transform_module(module, &mut sweeper))
    }

    #[test]
    fn removes_fully_unused_import() {
        assert_eq!(sweep("import os\nx = 1\n"), "x = 1\n");
    }

    #[test]
    fn keeps_used_import() {
        let source = "import os\nx = os.sep\n";
        assert_eq!(sweep(source), source);
    }

    #[test]
    fn trims_unused_alias_from_multi_import() {
        assert_eq!(
            sweep("from os import path, sep\nx = sep\n"),
            "from os import sep\nx = sep\n"
        );
        assert_eq!(sweep("import os, sys\nx = sys.argv\n"), "import sys\nx = sys.argv\n");
    }

    #[test]
    fn exported_names_are_protected() {
        let source = "from os import path\n__all__ = [\"path\"]\n";
        assert_eq!(sweep(source), source);
    }

    #[test]
    fn star_imports_are_opaque() {
        let source = "from os import *\n";
        assert_eq!(sweep(source), source);
    }

    #[test]
    fn unused_aliased_import_is_removed() {
        assert_eq!(sweep("import numpy as np\nx = 1\n"), "x = 1\n");
        let used = "import numpy as np\nx = np.array\n";
        assert_eq!(sweep(used), used);
    }
}
