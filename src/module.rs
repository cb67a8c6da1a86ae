//! An in-memory module under refactoring.
//!
//! A [`Module`] owns its current CST plus the trees of every prior
//! revision. Each mutation goes through [`Module::update`], which
//! re-renders and re-parses the tree so that node spans and the scope
//! index always describe the current revision. The history enables
//! rollback and lets tests observe how many passes touched a module.

use haul_cst::{parse_module, render, ParserError};

use crate::error::{MoveError, Result};

/// A parsed module and its revision history.
#[derive(Debug)]
pub struct Module {
    tree: haul_cst::Module,
    source: String,
    history: Vec<haul_cst::Module>,
}

impl Module {
    /// Parse a module from source text.
    pub fn parse(source: &str) -> std::result::Result<Self, ParserError> {
        let tree = parse_module(source)?;
        Ok(Self {
            tree,
            source: source.to_owned(),
            history: Vec::new(),
        })
    }

    /// The current tree.
    pub fn tree(&self) -> &haul_cst::Module {
        &self.tree
    }

    /// The rendered source of the current tree.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the tree, pushing the old revision into history.
    ///
    /// The new tree is rendered and re-parsed so its spans are fresh.
    pub fn update(&mut self, tree: haul_cst::Module) -> Result<()> {
        let source = render(&tree);
        let reparsed = parse_module(&source).map_err(|err| {
            MoveError::Internal(format!("rewritten module no longer parses: {err}"))
        })?;
        self.history.push(std::mem::replace(&mut self.tree, reparsed));
        self.source = source;
        Ok(())
    }

    /// Number of revisions applied since load.
    pub fn revision(&self) -> usize {
        self.history.len()
    }

    /// Discard the latest revision, restoring the previous tree.
    pub fn rollback(&mut self) -> bool {
        match self.history.pop() {
            Some(tree) => {
                self.source = render(&tree);
                self.tree = tree;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_pushes_history_and_refreshes_source() {
        let mut module = Module::parse("x = 1\n").unwrap();
        assert_eq!(module.revision(), 0);

        let tree = module.tree().clone();
        module.update(tree).unwrap();
        assert_eq!(module.revision(), 1);
        assert_eq!(module.source(), "x = 1\n");
    }

    #[test]
    fn rollback_restores_previous_tree() {
        let mut module = Module::parse("x = 1\n").unwrap();
        let mut tree = module.tree().clone();
        tree.body.clear();
        module.update(tree).unwrap();
        assert_eq!(module.source(), "");

        assert!(module.rollback());
        assert_eq!(module.source(), "x = 1\n");
        assert!(!module.rollback());
    }
}
