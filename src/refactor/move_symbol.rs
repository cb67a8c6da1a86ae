//! The move orchestrator.
//!
//! Pipeline for one motion:
//!
//! 1. Load source and destination, gather the source export set.
//! 2. Extract the symbol and its requirements from the source.
//! 3. Leave a `from destination import symbol` stub in the source and
//!    sweep its dead imports (the stub survives only while the source
//!    still uses the symbol).
//! 4. Add the requirements and the symbol body to the destination.
//! 5. Rewrite every other module; sweep the ones the rewriter touched.
//! 6. Persist source, destination, and every changed module.
//!
//! Nothing is written before step 6, so any earlier failure leaves the
//! project untouched.

use std::collections::HashSet;

use haul_cst::{
    transform_module, EmptyLine, ExportCollector, Newline, ScopeIndex, SmallStatement, Statement,
    Suite,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::project::{ModuleName, Project};
use crate::refactor::extract::{extract_symbol, ExtractedSymbol};
use crate::refactor::imports::{import_from_module_name, AddImports, ReplaceImport};
use crate::refactor::unused::RemoveUnusedImports;

/// Result of a successful motion.
#[derive(Debug)]
pub struct MoveOutcome {
    /// Edited modules: source, destination, then every rewritten module
    /// in traversal order.
    pub edited: Vec<ModuleName>,
}

/// Move the top-level symbol at `(line, col)` of `origin` into `dest`.
pub fn move_symbol(
    project: &mut Project,
    origin: &ModuleName,
    line: u32,
    col: u32,
    dest: &ModuleName,
) -> Result<MoveOutcome> {
    // Step 1-2: extract from the source.
    let source_module = project.module(origin)?;
    let source_exports = ExportCollector::collect(source_module.tree());
    let index = ScopeIndex::build(source_module.tree());
    let (tree, symbol) = extract_symbol(
        source_module.tree(),
        &index,
        source_module.source(),
        line,
        col,
        origin,
    )?;
    source_module.update(tree)?;
    info!(symbol = %symbol.name, from = %origin, to = %dest, "moving symbol");

    let from_path = joined_path(origin, &symbol.name);
    let to_path = joined_path(dest, &symbol.name);

    // Step 3: re-export stub, then sweep the source.
    let stub = SmallStatement::ImportFrom(import_from_module_name(
        dest.segments(),
        &symbol.name,
    )?);
    let mut add = AddImports::new(vec![stub]);
    let tree = transform_module(source_module.tree().clone(), &mut add);
    source_module.update(tree)?;
    sweep(source_module, &source_exports)?;

    // Step 4: requirements and body into the destination. An import of
    // the symbol's old home would now shadow the definition; drop it
    // first (it is the stub an earlier opposite motion left behind).
    let dest_module = project.module_or_empty(dest)?;
    {
        let mut stale = DropSymbolImport::new(&from_path);
        let tree = transform_module(dest_module.tree().clone(), &mut stale);
        if stale.did_update {
            dest_module.update(tree)?;
        }
    }
    let requirements: Vec<SmallStatement> = symbol
        .requirements
        .iter()
        .filter(|(name, import)| !is_self_import(import, dest, name))
        .map(|(_, import)| import.clone())
        .collect();
    let mut tree = dest_module.tree().clone();
    if !requirements.is_empty() {
        let mut add = AddImports::new(requirements);
        tree = transform_module(tree, &mut add);
    }
    let dest_is_empty = tree.body.is_empty();
    tree.body.push(format_insertion(&symbol, dest_is_empty));
    if let Some(last) = tree.body.len().checked_sub(2) {
        ensure_trailing_newline(&mut tree.body[last]);
    }
    dest_module.update(tree)?;

    // Step 5: every other module. Compare by resolved path, so a
    // package origin or destination named `pkg` also skips its
    // `pkg.__init__` spelling from the walk.
    let origin_path = project.module_path(origin);
    let dest_path = project.module_path(dest);
    let mut rewritten = Vec::new();
    for name in project.module_names()? {
        let path = project.module_path(&name);
        if path == origin_path || path == dest_path {
            continue;
        }
        let module = project.module(&name)?;
        let exports = ExportCollector::collect(module.tree());
        let index = ScopeIndex::build(module.tree());
        let mut rewriter =
            ReplaceImport::new(module.tree(), &index, &from_path, &to_path, &exports)?;
        let tree = transform_module(module.tree().clone(), &mut rewriter);
        if rewriter.did_update {
            debug!(module = %name, "rewrote imports");
            module.update(tree)?;
            sweep(module, &exports)?;
            rewritten.push(name);
        }
    }

    // Step 6: persist.
    let mut order = vec![origin.clone(), dest.clone()];
    order.extend(rewritten);
    let edited = project.persist(&order)?;
    Ok(MoveOutcome { edited })
}

fn joined_path(module: &ModuleName, symbol: &str) -> Vec<String> {
    let mut path = module.segments().to_vec();
    path.push(symbol.to_owned());
    path
}

fn sweep(module: &mut crate::module::Module, exports: &HashSet<String>) -> Result<()> {
    let index = ScopeIndex::build(module.tree());
    let mut sweeper = RemoveUnusedImports::new(&index, exports);
    let tree = transform_module(module.tree().clone(), &mut sweeper);
    if sweeper.did_update {
        module.update(tree)?;
    }
    Ok(())
}

/// Removes a destination's own from-import of the moved symbol.
struct DropSymbolImport {
    from_path: Vec<String>,
    did_update: bool,
}

impl DropSymbolImport {
    fn new(from_path: &[String]) -> Self {
        Self {
            from_path: from_path.to_vec(),
            did_update: false,
        }
    }
}

impl haul_cst::Transformer for DropSymbolImport {
    fn transform_small_statement(
        &mut self,
        small: SmallStatement,
    ) -> haul_cst::Transform<SmallStatement> {
        use haul_cst::Transform;
        let SmallStatement::ImportFrom(node) = small else {
            return Transform::Keep(small);
        };
        let symbol = self.from_path.last().expect("motion path has a symbol");
        let module_path = &self.from_path[..self.from_path.len() - 1];
        let haul_cst::ImportNames::Aliases(aliases) = &node.names else {
            return Transform::Keep(SmallStatement::ImportFrom(node));
        };
        let imports_symbol = node.is_absolute()
            && node.module_segments() == module_path
            && aliases
                .iter()
                .any(|alias| alias.asname.is_none() && alias.dotted_segments() == [symbol.clone()]);
        if !imports_symbol {
            return Transform::Keep(SmallStatement::ImportFrom(node));
        }
        self.did_update = true;
        let kept: Vec<_> = aliases
            .iter()
            .filter(|alias| {
                !(alias.asname.is_none() && alias.dotted_segments() == [symbol.clone()])
            })
            .cloned()
            .collect();
        if kept.is_empty() {
            return Transform::Remove;
        }
        let mut trimmed = node;
        trimmed.names = haul_cst::ImportNames::Aliases(
            crate::refactor::imports::normalize_alias_commas(kept),
        );
        Transform::Keep(SmallStatement::ImportFrom(trimmed))
    }
}

/// A requirement that would import a name from the module it now lives
/// in is dropped; the name is in scope already.
fn is_self_import(import: &SmallStatement, dest: &ModuleName, _name: &str) -> bool {
    match import {
        SmallStatement::ImportFrom(node) => {
            node.is_absolute() && node.module_segments() == dest.segments()
        }
        _ => false,
    }
}

/// Adjust the extracted statement's leading blank lines for its new
/// position: two blank lines above it in a non-empty module, none at
/// the head of an empty one. Comment lines are preserved.
fn format_insertion(symbol: &ExtractedSymbol, dest_is_empty: bool) -> Statement {
    let mut statement = symbol.statement.clone();
    let target = if dest_is_empty { 0 } else { 2 };
    let lines = statement.leading_lines_mut();
    let mut blank = lines.iter().filter(|line| line.is_blank()).count();
    while blank > target {
        let idx = lines
            .iter()
            .position(EmptyLine::is_blank)
            .expect("counted above");
        lines.remove(idx);
        blank -= 1;
    }
    while blank < target {
        lines.insert(0, EmptyLine::blank());
        blank += 1;
    }
    statement
}

/// Make sure the statement before an appended symbol ends its last line,
/// so the separator blank lines stay blank lines.
fn ensure_trailing_newline(statement: &mut Statement) {
    match statement {
        Statement::Simple(line) => {
            if line.trailing.newline.0.is_empty() {
                line.trailing.newline = Newline::default();
            }
        }
        Statement::Compound(compound) => {
            if let Some(suite) = last_suite_mut(compound) {
                match suite {
                    Suite::Simple(simple) => {
                        if simple.trailing.newline.0.is_empty() {
                            simple.trailing.newline = Newline::default();
                        }
                    }
                    Suite::IndentedBlock(block) => {
                        if let Some(last) = block.body.last_mut() {
                            ensure_trailing_newline(last);
                        }
                    }
                }
            }
        }
    }
}

fn last_suite_mut(compound: &mut haul_cst::CompoundStatement) -> Option<&mut Suite> {
    use haul_cst::CompoundStatement::*;
    match compound {
        FunctionDef(node) => Some(&mut node.body),
        ClassDef(node) => Some(&mut node.body),
        With(node) => Some(&mut node.body),
        While(node) => match &mut node.orelse {
            Some(orelse) => Some(&mut orelse.body),
            None => Some(&mut node.body),
        },
        For(node) => match &mut node.orelse {
            Some(orelse) => Some(&mut orelse.body),
            None => Some(&mut node.body),
        },
        Try(node) => {
            if let Some(finalbody) = &mut node.finalbody {
                return Some(&mut finalbody.body);
            }
            if let Some(orelse) = &mut node.orelse {
                return Some(&mut orelse.body);
            }
            match node.handlers.last_mut() {
                Some(handler) => Some(&mut handler.body),
                None => Some(&mut node.body),
            }
        }
        If(node) => {
            let mut current = node;
            loop {
                match &mut current.orelse {
                    Some(orelse) => match &mut **orelse {
                        haul_cst::OrElse::Elif(elif) => current = elif,
                        haul_cst::OrElse::Else(els) => return Some(&mut els.body),
                    },
                    None => return Some(&mut current.body),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_cst::parse_module;

    fn symbol_with_leading(source: &str) -> ExtractedSymbol {
        let module = parse_module(source).unwrap();
        let index = ScopeIndex::build(&module);
        let origin = ModuleName::parse("mod1").unwrap();
        // The symbol is always the last top-level statement here.
        let line = source.lines().count() as u32;
        let (_, symbol) = extract_symbol(&module, &index, source, line, 0, &origin).unwrap();
        symbol
    }

    #[test]
    fn insertion_into_empty_module_strips_blanks() {
        let symbol = symbol_with_leading("x = 1\n\n\ntest = 2\n");
        let formatted = format_insertion(&symbol, true);
        assert_eq!(haul_cst::render(&formatted), "test = 2\n");
    }

    #[test]
    fn insertion_into_populated_module_gets_two_blanks() {
        let symbol = symbol_with_leading("x = 1\ntest = 2\n");
        let formatted = format_insertion(&symbol, false);
        assert_eq!(haul_cst::render(&formatted), "\n\ntest = 2\n");
    }

    #[test]
    fn insertion_preserves_comment_lines() {
        let symbol = symbol_with_leading("x = 1\n\n\n\n# about test\ntest = 2\n");
        let formatted = format_insertion(&symbol, false);
        assert_eq!(haul_cst::render(&formatted), "\n\n# about test\ntest = 2\n");
    }
}
