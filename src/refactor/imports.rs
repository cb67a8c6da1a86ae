//! Import matching and rewriting.
//!
//! This module knows the two surface forms a qualified symbol reference
//! can take (`import pkg.mod` plus `pkg.mod.sym`, and
//! `from pkg.mod import sym`) and rewrites either to point at a moved
//! symbol's new home. [`ReplaceImport`] performs the per-module
//! transform; [`AddImports`] appends imports to a module's import block.

use std::collections::{HashMap, HashSet};

use haul_cst::{
    Attribute, Expression, Import, ImportAlias, ImportFrom, ImportNames, Module, Name,
    NameOrAttribute, ScopeIndex, SimpleStatementLine, SmallStatement, Span, Statement,
    Transform, Transformer, VisitResult, Visitor,
};
use tracing::trace;

use crate::error::{MoveError, Result};

// ============================================================================
// Constructors
// ============================================================================

/// Build a dotted name `a.b.c` right-associatively from segments.
pub fn attribute_from_module_name(segments: &[String]) -> Result<NameOrAttribute> {
    let (last, init) = segments
        .split_last()
        .ok_or_else(|| MoveError::ImportShape("empty module path".to_owned()))?;
    if init.is_empty() {
        return Ok(NameOrAttribute::N(Name::new(last.clone())));
    }
    let value = match attribute_from_module_name(init)? {
        NameOrAttribute::N(name) => Expression::Name(name),
        NameOrAttribute::A(attr) => Expression::Attribute(attr),
    };
    Ok(NameOrAttribute::A(Box::new(Attribute {
        value,
        dot: Default::default(),
        attr: Name::new(last.clone()),
        span: Span::SYNTHETIC,
    })))
}

/// Canonical `from <module> import <name>` constructor.
pub fn import_from_module_name(module: &[String], name: &str) -> Result<ImportFrom> {
    Ok(ImportFrom {
        whitespace_after_from: haul_cst::SimpleWhitespace::one(),
        relative: Vec::new(),
        module: Some(attribute_from_module_name(module)?),
        whitespace_before_import: haul_cst::SimpleWhitespace::one(),
        whitespace_after_import: haul_cst::SimpleWhitespace::one(),
        lpar: None,
        names: ImportNames::Aliases(vec![ImportAlias::bare(name)]),
        rpar: None,
        span: Span::SYNTHETIC,
    })
}

/// Flatten a dotted head into segments; `None` for anything that is not
/// a pure name/attribute chain.
pub fn qualified_chain(expression: &Expression) -> Option<Vec<String>> {
    match expression {
        Expression::Name(name) => Some(vec![name.value.clone()]),
        Expression::Attribute(attr) => {
            let mut chain = qualified_chain(&attr.value)?;
            chain.push(attr.attr.value.clone());
            Some(chain)
        }
        _ => None,
    }
}

/// Reset comma separators on a rewritten alias list to the canonical
/// `, ` between entries and nothing after the last.
pub fn normalize_alias_commas(mut aliases: Vec<ImportAlias>) -> Vec<ImportAlias> {
    let len = aliases.len();
    for (idx, alias) in aliases.iter_mut().enumerate() {
        alias.comma = if idx + 1 < len {
            Some(haul_cst::Comma::default())
        } else {
            None
        };
    }
    aliases
}

// ============================================================================
// Import sites
// ============================================================================

/// A snapshot of one import statement, keyed by its span.
#[derive(Debug, Clone)]
pub struct ImportSite {
    pub span: Span,
    pub kind: ImportSiteKind,
    /// Module path of a from-import; empty for plain imports.
    pub module: Vec<String>,
    /// `(dotted path, alias)` per imported name; empty for star imports.
    pub aliases: Vec<(Vec<String>, Option<String>)>,
    pub is_star: bool,
    pub is_relative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSiteKind {
    Import,
    From,
}

impl ImportSite {
    fn from_import(node: &Import) -> Self {
        Self {
            span: node.span,
            kind: ImportSiteKind::Import,
            module: Vec::new(),
            aliases: node
                .names
                .iter()
                .map(|alias| {
                    (
                        alias.dotted_segments(),
                        alias.asname.as_ref().map(|a| a.name.value.clone()),
                    )
                })
                .collect(),
            is_star: false,
            is_relative: false,
        }
    }

    fn from_import_from(node: &ImportFrom) -> Self {
        let aliases = match &node.names {
            ImportNames::Aliases(aliases) => aliases
                .iter()
                .map(|alias| {
                    (
                        alias.dotted_segments(),
                        alias.asname.as_ref().map(|a| a.name.value.clone()),
                    )
                })
                .collect(),
            ImportNames::Star(_) => Vec::new(),
        };
        Self {
            span: node.span,
            kind: ImportSiteKind::From,
            module: node.module_segments(),
            aliases,
            is_star: node.is_star(),
            is_relative: !node.is_absolute(),
        }
    }

    /// The local name each alias binds.
    pub fn bound_names(&self) -> Vec<String> {
        self.aliases
            .iter()
            .filter_map(|(path, asname)| match asname {
                Some(alias) => Some(alias.clone()),
                None => match self.kind {
                    ImportSiteKind::Import => path.first().cloned(),
                    ImportSiteKind::From => path.last().cloned(),
                },
            })
            .collect()
    }
}

/// Collect every import statement of a module, keyed by span.
pub fn collect_import_sites(module: &Module) -> HashMap<Span, ImportSite> {
    struct SiteCollector {
        sites: HashMap<Span, ImportSite>,
    }

    impl Visitor for SiteCollector {
        fn visit_import_stmt(&mut self, node: &Import) -> VisitResult {
            self.sites.insert(node.span, ImportSite::from_import(node));
            VisitResult::Continue
        }

        fn visit_import_from(&mut self, node: &ImportFrom) -> VisitResult {
            self.sites
                .insert(node.span, ImportSite::from_import_from(node));
            VisitResult::Continue
        }
    }

    let mut collector = SiteCollector {
        sites: HashMap::new(),
    };
    haul_cst::visitor::walk_module(&mut collector, module);
    collector.sites
}

// ============================================================================
// Matching
// ============================================================================

/// Does this import make `module ++ names` (or a prefix extension of
/// `module` along `names`) resolve through one of its aliases?
///
/// Walks the candidate splits recursively: `import a.b` matches
/// `(["a"], ["b", ...])` at the second split, `from a import b` at the
/// first.
pub fn is_import_of(module: &[String], names: &[String], site: &ImportSite) -> bool {
    if module.is_empty() {
        return false;
    }
    match site.kind {
        ImportSiteKind::Import => {
            let mut path = module.to_vec();
            let mut rest = names;
            loop {
                if site.aliases.iter().any(|(alias_path, _)| alias_path == &path) {
                    return true;
                }
                match rest.split_first() {
                    Some((head, tail)) => {
                        path.push(head.clone());
                        rest = tail;
                    }
                    None => return false,
                }
            }
        }
        ImportSiteKind::From => {
            if site.is_relative || site.is_star || names.is_empty() {
                return false;
            }
            if site.module == module
                && site
                    .aliases
                    .iter()
                    .any(|(alias_path, _)| alias_path == names)
            {
                return true;
            }
            let mut module = module.to_vec();
            module.push(names[0].clone());
            is_import_of(&module, &names[1..], site)
        }
    }
}

// ============================================================================
// Import block handling
// ============================================================================

fn is_import_line(statement: &Statement) -> bool {
    match statement {
        Statement::Simple(line) => {
            !line.body.is_empty()
                && line.body.iter().all(|small| {
                    matches!(
                        small,
                        SmallStatement::Import(_) | SmallStatement::ImportFrom(_)
                    )
                })
        }
        Statement::Compound(_) => false,
    }
}

/// Partition a module body into its leading import block and the rest.
pub fn split_import_block(body: Vec<Statement>) -> (Vec<Statement>, Vec<Statement>) {
    let mut imports = Vec::new();
    let mut rest = Vec::new();
    let mut in_prefix = true;
    for statement in body {
        if in_prefix && is_import_line(&statement) {
            imports.push(statement);
        } else {
            in_prefix = false;
            rest.push(statement);
        }
    }
    (imports, rest)
}

/// Appends import statements to a module's import block, skipping any
/// that are already present (compared by rendered form).
pub struct AddImports {
    imports: Vec<SmallStatement>,
}

impl AddImports {
    pub fn new(imports: Vec<SmallStatement>) -> Self {
        Self { imports }
    }
}

impl Transformer for AddImports {
    fn leave_module(&mut self, module: Module) -> Module {
        let Module { body, footer } = module;
        let (mut imports, rest) = split_import_block(body);
        let existing: HashSet<String> = imports
            .iter()
            .filter_map(|statement| match statement {
                Statement::Simple(line) => Some(&line.body),
                Statement::Compound(_) => None,
            })
            .flatten()
            .map(haul_cst::render)
            .collect();
        for import in self.imports.drain(..) {
            if existing.contains(&haul_cst::render(&import)) {
                continue;
            }
            imports.push(Statement::Simple(SimpleStatementLine::new(import)));
        }
        imports.extend(rest);
        Module {
            body: imports,
            footer,
        }
    }
}

// ============================================================================
// ReplaceImport
// ============================================================================

/// Rewrites one module's imports and qualified accesses after a symbol
/// moved from `from_path` to `to_path` (both `module ++ [symbol]`).
///
/// Three transforms, per the matched import site:
///
/// 1. `from origin import sym, other` splits into the surviving aliases
///    plus `from destination import sym`.
/// 2. `import origin` used as `origin.sym` gains
///    `from destination import sym`, keeps the old import only while
///    other uses survive, and every `origin.sym` chain collapses to the
///    bare name.
/// 3. When the new import cannot land on an existing site, one is
///    appended to the import block at module leave.
///
/// Running the same motion twice is a no-op: the rewritten module no
/// longer imports the symbol through `from_path`.
pub struct ReplaceImport {
    from_path: Vec<String>,
    to_path: Vec<String>,
    old_import: Option<Span>,
    other_assignments: bool,
    should_add_import: bool,
    emitted_inline: bool,
    ref_replacements: HashSet<Span>,
    /// True when this pass changed the module.
    pub did_update: bool,
}

impl ReplaceImport {
    pub fn new(
        module: &Module,
        index: &ScopeIndex,
        from_path: &[String],
        to_path: &[String],
        exports: &HashSet<String>,
    ) -> Result<Self> {
        if from_path.len() < 2 || to_path.len() < 2 {
            return Err(MoveError::ImportShape(
                "motion paths need a module and a symbol".to_owned(),
            ));
        }
        let sites = collect_import_sites(module);
        let symbol = from_path.last().expect("checked above").clone();

        let mut old_import = None;
        let mut other_assignments = false;
        let mut should_add_import = false;
        let mut ref_replacements = HashSet::new();

        for assignment in index.assignments() {
            if !assignment.kind.is_import() {
                continue;
            }
            let Some(site) = sites.get(&assignment.node) else {
                continue;
            };
            for access_id in &assignment.references {
                let access = index.access(*access_id);
                let mut names: Vec<String> = from_path[1..].to_vec();
                names.extend(access.chain[1..].iter().cloned());
                if is_import_of(&from_path[..1], &names, site) {
                    if access.chain.last() == Some(&symbol) {
                        old_import = Some(site.span);
                        should_add_import = true;
                        ref_replacements.insert(access.top);
                    } else {
                        other_assignments = true;
                    }
                }
            }
        }

        // A re-exported import has no direct references but must still
        // follow the symbol (`__all__` in a package `__init__`).
        if old_import.is_none() && exports.contains(&symbol) {
            let mut spans: Vec<&Span> = sites.keys().collect();
            spans.sort();
            for span in spans {
                let site = &sites[span];
                if is_import_of(&from_path[..1], &from_path[1..], site) {
                    old_import = Some(site.span);
                    should_add_import = true;
                    break;
                }
            }
        }

        // Aliases of the matched statement that bind anything else the
        // module uses or exports keep the original statement alive.
        if let Some(span) = old_import {
            let site = &sites[&span];
            for (path, asname) in &site.aliases {
                let is_symbol_alias = site.kind == ImportSiteKind::From
                    && asname.is_none()
                    && path.len() == 1
                    && path[0] == symbol;
                if is_symbol_alias {
                    continue;
                }
                let bound = match asname {
                    Some(alias) => alias.clone(),
                    None => match site.kind {
                        ImportSiteKind::Import => path.first().cloned().unwrap_or_default(),
                        ImportSiteKind::From => path.last().cloned().unwrap_or_default(),
                    },
                };
                if exports.contains(&bound) {
                    other_assignments = true;
                }
            }
        }

        trace!(
            from = from_path.join("."),
            to = to_path.join("."),
            matched = old_import.is_some(),
            other_assignments,
            "replace-import analysis"
        );

        Ok(Self {
            from_path: from_path.to_vec(),
            to_path: to_path.to_vec(),
            old_import,
            other_assignments,
            should_add_import,
            emitted_inline: false,
            ref_replacements,
            did_update: false,
        })
    }

    fn symbol(&self) -> &str {
        self.from_path.last().expect("validated in new")
    }

    fn new_import(&self) -> SmallStatement {
        let (symbol, module) = self.to_path.split_last().expect("validated in new");
        SmallStatement::ImportFrom(
            import_from_module_name(module, symbol).expect("destination path is non-empty"),
        )
    }

    fn replace_from_import(&mut self, node: ImportFrom) -> Vec<SmallStatement> {
        self.did_update = true;
        self.emitted_inline = true;
        if !self.other_assignments {
            return vec![self.new_import()];
        }
        let ImportNames::Aliases(aliases) = &node.names else {
            return vec![self.new_import(), SmallStatement::ImportFrom(node)];
        };
        let kept: Vec<ImportAlias> = aliases
            .iter()
            .filter(|alias| {
                !(alias.asname.is_none()
                    && matches!(&alias.name, NameOrAttribute::N(name) if name.value == self.symbol()))
            })
            .cloned()
            .collect();
        if kept.is_empty() {
            return vec![self.new_import()];
        }
        let mut trimmed = node;
        trimmed.names = ImportNames::Aliases(normalize_alias_commas(kept));
        vec![SmallStatement::ImportFrom(trimmed), self.new_import()]
    }

    fn replace_plain_import(&mut self, node: Import) -> Vec<SmallStatement> {
        self.did_update = true;
        self.emitted_inline = true;
        if !self.other_assignments {
            return vec![self.new_import()];
        }
        vec![SmallStatement::Import(node), self.new_import()]
    }
}

impl Transformer for ReplaceImport {
    fn transform_statement(&mut self, statement: Statement) -> Transform<Statement> {
        let Some(old_span) = self.old_import else {
            return Transform::Keep(statement);
        };
        let Statement::Simple(mut line) = statement else {
            return Transform::Keep(statement);
        };
        let matched = line.body.iter().any(|small| match small {
            SmallStatement::Import(node) => node.span == old_span,
            SmallStatement::ImportFrom(node) => node.span == old_span,
            _ => false,
        });
        if !matched {
            return Transform::Keep(Statement::Simple(line));
        }

        // Distribute replacements column-wise: the first replacement of
        // each import stays on the original line, later ones open new
        // lines below it.
        let mut bodies: Vec<Vec<SmallStatement>> = vec![Vec::new()];
        for small in std::mem::take(&mut line.body) {
            let replacement = match small {
                SmallStatement::Import(node) if node.span == old_span => {
                    self.replace_plain_import(node)
                }
                SmallStatement::ImportFrom(node) if node.span == old_span => {
                    self.replace_from_import(node)
                }
                other => vec![other],
            };
            for (row, small) in replacement.into_iter().enumerate() {
                if bodies.len() <= row {
                    bodies.push(Vec::new());
                }
                bodies[row].push(small);
            }
        }

        line.semicolons = Vec::new();
        if bodies.len() == 1 {
            line.body = bodies.remove(0);
            return Transform::Keep(Statement::Simple(line));
        }
        let mut lines = Vec::new();
        for (row, body) in bodies.into_iter().enumerate() {
            if row == 0 {
                let mut first = line.clone();
                first.body = body;
                lines.push(Statement::Simple(first));
            } else {
                let mut extra = SimpleStatementLine::new(SmallStatement::Pass);
                extra.body = body;
                lines.push(Statement::Simple(extra));
            }
        }
        Transform::Flatten(lines)
    }

    fn transform_expression(&mut self, expression: Expression) -> Expression {
        let span = match &expression {
            Expression::Name(name) => name.span,
            Expression::Attribute(attr) => attr.span,
            _ => return expression,
        };
        if self.ref_replacements.contains(&span) {
            self.did_update = true;
            return Expression::Name(Name::new(self.symbol()));
        }
        expression
    }

    fn leave_module(&mut self, module: Module) -> Module {
        let mut module = module;
        if self.should_add_import && !self.emitted_inline {
            let Module { body, footer } = module;
            let (mut imports, rest) = split_import_block(body);
            imports.push(Statement::Simple(SimpleStatementLine::new(
                self.new_import(),
            )));
            imports.extend(rest);
            module = Module {
                body: imports,
                footer,
            };
            self.did_update = true;
        }
        if self.did_update {
            module = merge_destination_imports(module, &self.to_path[..self.to_path.len() - 1]);
        }
        module
    }
}

/// Collapse duplicate `from <destination> import ...` statements in the
/// import block into the earliest one, preserving alias order.
fn merge_destination_imports(module: Module, destination: &[String]) -> Module {
    let Module { body, footer } = module;
    let (imports, rest) = split_import_block(body);

    let mut merged: Vec<Statement> = Vec::new();
    let mut first_idx: Option<usize> = None;
    let mut aliases: Vec<ImportAlias> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for statement in imports {
        let is_dest_from = match &statement {
            Statement::Simple(line) => match line.body.as_slice() {
                [SmallStatement::ImportFrom(node)] => {
                    node.is_absolute() && !node.is_star() && node.module_segments() == destination
                }
                _ => false,
            },
            Statement::Compound(_) => false,
        };
        if !is_dest_from {
            merged.push(statement);
            continue;
        }
        let Statement::Simple(line) = &statement else {
            unreachable!("checked above");
        };
        let [SmallStatement::ImportFrom(node)] = line.body.as_slice() else {
            unreachable!("checked above");
        };
        let ImportNames::Aliases(node_aliases) = &node.names else {
            merged.push(statement);
            continue;
        };
        for alias in node_aliases {
            let key = format!(
                "{}|{}",
                alias.dotted_segments().join("."),
                alias
                    .asname
                    .as_ref()
                    .map(|a| a.name.value.as_str())
                    .unwrap_or("")
            );
            if seen.insert(key) {
                aliases.push(alias.clone());
            }
        }
        if first_idx.is_none() {
            first_idx = Some(merged.len());
            merged.push(statement);
        }
        // Later duplicates are dropped; their aliases were absorbed.
    }

    if let Some(idx) = first_idx {
        if let Statement::Simple(line) = &mut merged[idx] {
            if let [SmallStatement::ImportFrom(node)] = line.body.as_mut_slice() {
                node.names = ImportNames::Aliases(normalize_alias_commas(aliases));
            }
        }
    }

    merged.extend(rest);
    Module {
        body: merged,
        footer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_cst::parse_module;

    fn site_of(source: &str) -> ImportSite {
        let module = parse_module(source).unwrap();
        let sites = collect_import_sites(&module);
        assert_eq!(sites.len(), 1, "expected one import in {source:?}");
        sites.into_values().next().unwrap()
    }

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matches_from_import() {
        let site = site_of("from pkg.mod import fn\n");
        assert!(is_import_of(&seg(&["pkg"]), &seg(&["mod", "fn"]), &site));
        assert!(is_import_of(&seg(&["pkg", "mod"]), &seg(&["fn"]), &site));
        assert!(!is_import_of(&seg(&["pkg", "mod"]), &seg(&["other"]), &site));
        assert!(!is_import_of(&seg(&["other"]), &seg(&["fn"]), &site));
    }

    #[test]
    fn matches_plain_import_with_trailing() {
        let site = site_of("import pkg.mod\n");
        // `pkg.mod.fn` resolves through this import.
        assert!(is_import_of(&seg(&["pkg"]), &seg(&["mod", "fn", "fn"]), &site));
        assert!(is_import_of(&seg(&["pkg", "mod"]), &seg(&["fn"]), &site));
        assert!(!is_import_of(&seg(&["pkg", "other"]), &seg(&["fn"]), &site));

        let site = site_of("import pkg\n");
        assert!(is_import_of(&seg(&["pkg"]), &seg(&["mod", "fn"]), &site));
    }

    #[test]
    fn relative_and_star_imports_never_match() {
        let site = site_of("from . import mod\n");
        assert!(!is_import_of(&seg(&["pkg"]), &seg(&["mod"]), &site));
        let site = site_of("from pkg import *\n");
        assert!(!is_import_of(&seg(&["pkg"]), &seg(&["fn"]), &site));
    }

    #[test]
    fn attribute_from_segments() {
        let attr = attribute_from_module_name(&seg(&["a", "b", "c"])).unwrap();
        assert_eq!(attr.segments(), vec!["a", "b", "c"]);
        assert!(attribute_from_module_name(&[]).is_err());
    }

    #[test]
    fn qualified_chain_flattens_dotted_heads() {
        let module = parse_module("x = pkg.mod.fn\ny = (a + b).attr\n").unwrap();
        let mut chains = Vec::new();
        for statement in &module.body {
            if let haul_cst::Statement::Simple(line) = statement {
                if let [SmallStatement::Assign(assign)] = line.body.as_slice() {
                    chains.push(qualified_chain(&assign.value));
                }
            }
        }
        assert_eq!(
            chains[0],
            Some(vec!["pkg".to_owned(), "mod".to_owned(), "fn".to_owned()])
        );
        // A call or arithmetic base is not a qualified access.
        assert_eq!(chains[1], None);
    }

    #[test]
    fn canonical_from_import_renders() {
        let import = import_from_module_name(&seg(&["pkg", "mod"]), "fn").unwrap();
        assert_eq!(haul_cst::render(&import), "from pkg.mod import fn");
    }

    #[test]
    fn split_prefix_stops_at_first_non_import() {
        let module = parse_module("import os\nfrom sys import path\nx = 1\nimport late\n").unwrap();
        let (imports, rest) = split_import_block(module.body);
        assert_eq!(imports.len(), 2);
        assert_eq!(rest.len(), 2);
    }

    fn rewrite(source: &str, from: &[&str], to: &[&str]) -> (String, bool) {
        let module = parse_module(source).unwrap();
        let index = ScopeIndex::build(&module);
        let exports = HashSet::new();
        let mut rewriter =
            ReplaceImport::new(&module, &index, &seg(from), &seg(to), &exports).unwrap();
        let out = haul_cst::transform_module(module, &mut rewriter);
        (haul_cst::render(&out), rewriter.did_update)
    }

    #[test]
    fn rewrites_from_import_site() {
        let (out, updated) = rewrite(
            "from mod1 import test\nx = test()\n",
            &["mod1", "test"],
            &["mod2", "test"],
        );
        assert!(updated);
        assert_eq!(out, "from mod2 import test\nx = test()\n");
    }

    #[test]
    fn rewrites_qualified_access_to_bare_name() {
        let (out, updated) = rewrite(
            "import mod1\ny = mod1.test()\n",
            &["mod1", "test"],
            &["mod2", "test"],
        );
        assert!(updated);
        assert_eq!(out, "from mod2 import test\ny = test()\n");
    }

    #[test]
    fn rewriter_pass_is_idempotent() {
        let first = rewrite(
            "from mod1 import test\nx = test()\n",
            &["mod1", "test"],
            &["mod2", "test"],
        )
        .0;
        let (second, updated) = rewrite(&first, &["mod1", "test"], &["mod2", "test"]);
        assert!(!updated);
        assert_eq!(second, first);
    }

    #[test]
    fn unrelated_module_is_untouched() {
        let source = "import math\n\nprint(math.pi)\n";
        let (out, updated) = rewrite(source, &["mod1", "test"], &["mod2", "test"]);
        assert!(!updated);
        assert_eq!(out, source);
    }

    #[test]
    fn rewrites_import_inside_function_scope() {
        let (out, updated) = rewrite(
            "def use():\n    from mod1 import test\n    return test()\n",
            &["mod1", "test"],
            &["mod2", "test"],
        );
        assert!(updated);
        assert_eq!(
            out,
            "def use():\n    from mod2 import test\n    return test()\n"
        );
    }
}
