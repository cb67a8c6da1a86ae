//! Symbol extraction.
//!
//! Locates the top-level symbol at a (line, column), classifies it,
//! collects the imports and same-module names its body depends on, and
//! removes it from the module tree.

use std::collections::HashSet;

use haul_cst::{
    Expression, ImportAlias, ImportFrom, ImportNames, LineCol, Module, ScopeIndex,
    SmallStatement, Span, Spanned, Statement, VisitResult, Visitor,
};
use tracing::debug;

use crate::error::{MoveError, Result};
use crate::project::ModuleName;
use crate::refactor::imports::{collect_import_sites, import_from_module_name, ImportSiteKind};

/// What kind of top-level statement a symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    FunctionDef,
    ClassDef,
    SimpleAssign,
    AnnAssign,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::FunctionDef => "function",
            SymbolKind::ClassDef => "class",
            SymbolKind::SimpleAssign => "assignment",
            SymbolKind::AnnAssign => "annotated assignment",
        }
    }
}

/// A symbol lifted out of its defining module.
#[derive(Debug)]
pub struct ExtractedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The statement, with its original leading trivia.
    pub statement: Statement,
    /// Imports the symbol's body needs at its destination, keyed by the
    /// local name the symbol uses; insertion order is preserved.
    pub requirements: Vec<(String, SmallStatement)>,
    pub origin: ModuleName,
}

/// Locate, analyze, and remove the symbol at `(line, col)`.
///
/// Returns the module tree without the symbol plus the extraction.
pub fn extract_symbol(
    module: &Module,
    index: &ScopeIndex,
    source: &str,
    line: u32,
    col: u32,
    origin: &ModuleName,
) -> Result<(Module, ExtractedSymbol)> {
    let offset = LineCol::new(line, col)
        .to_offset(source)
        .ok_or(MoveError::SymbolNotFound { line, col })?;

    let position = module
        .body
        .iter()
        .position(|statement| statement.span().covers_offset(offset))
        .ok_or(MoveError::SymbolNotFound { line, col })?;

    let (name, kind) = classify(&module.body[position], line, col)?;
    let span = module.body[position].span();
    debug!(symbol = %name, kind = kind.as_str(), "extracting symbol");

    let requirements = collect_requirements(module, index, span, origin)?;
    check_string_annotations(&module.body[position], &requirements)?;

    let mut tree = module.clone();
    let statement = tree.body.remove(position);
    if position == 0 {
        if let Some(first) = tree.body.first_mut() {
            // Keep head comments, drop the blank lines the symbol left
            // behind.
            first
                .leading_lines_mut()
                .retain(|line| !line.is_blank());
        }
    }

    Ok((
        tree,
        ExtractedSymbol {
            name,
            kind,
            statement,
            requirements,
            origin: origin.clone(),
        },
    ))
}

fn classify(statement: &Statement, line: u32, col: u32) -> Result<(String, SymbolKind)> {
    let unsupported = |reason: &str| MoveError::UnsupportedStatement {
        line,
        col,
        reason: reason.to_owned(),
    };
    match statement {
        Statement::Compound(compound) => match compound {
            haul_cst::CompoundStatement::FunctionDef(def) => {
                Ok((def.name.value.clone(), SymbolKind::FunctionDef))
            }
            haul_cst::CompoundStatement::ClassDef(def) => {
                Ok((def.name.value.clone(), SymbolKind::ClassDef))
            }
            _ => Err(unsupported("not a function, class, or assignment")),
        },
        Statement::Simple(simple) => {
            let [small] = simple.body.as_slice() else {
                return Err(unsupported("multiple statements on one line"));
            };
            match small {
                SmallStatement::Assign(assign) => {
                    let [target] = assign.targets.as_slice() else {
                        return Err(unsupported("assignment with multiple targets"));
                    };
                    match target.target.unparenthesized() {
                        Expression::Name(name) => {
                            Ok((name.value.clone(), SymbolKind::SimpleAssign))
                        }
                        _ => Err(unsupported("assignment target is not a plain name")),
                    }
                }
                SmallStatement::AnnAssign(assign) => match assign.target.unparenthesized() {
                    Expression::Name(name) => Ok((name.value.clone(), SymbolKind::AnnAssign)),
                    _ => Err(unsupported("assignment target is not a plain name")),
                },
                _ => Err(unsupported("not a function, class, or assignment")),
            }
        }
    }
}

/// Translate every external dependency of the symbol into an import the
/// destination module can carry.
fn collect_requirements(
    module: &Module,
    index: &ScopeIndex,
    symbol_span: Span,
    origin: &ModuleName,
) -> Result<Vec<(String, SmallStatement)>> {
    let sites = collect_import_sites(module);
    let mut requirements: Vec<(String, SmallStatement)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for access in index.accesses() {
        if !symbol_span.contains(access.node) {
            continue;
        }
        for referent_id in &access.referents {
            let assignment = index.assignment(*referent_id);
            if symbol_span.contains(assignment.node) {
                // Defined inside the symbol itself (parameters, locals,
                // recursion).
                continue;
            }
            if seen.contains(&assignment.name) {
                continue;
            }

            let import = if assignment.kind.is_import() {
                let Some(site) = sites.get(&assignment.node) else {
                    continue;
                };
                match lift_import(module, site.span, site.kind, &assignment.name) {
                    Some(import) => import,
                    None => continue,
                }
            } else if assignment.scope == index.module_scope() {
                // A same-module top-level definition: the moved symbol
                // reaches back for it through its origin.
                SmallStatement::ImportFrom(import_from_module_name(
                    origin.segments(),
                    &assignment.name,
                )?)
            } else {
                continue;
            };

            seen.insert(assignment.name.clone());
            requirements.push((assignment.name.clone(), import));
        }
    }

    Ok(requirements)
}

/// Rebuild the single-alias import that binds `name` at the given site.
fn lift_import(
    module: &Module,
    span: Span,
    kind: ImportSiteKind,
    name: &str,
) -> Option<SmallStatement> {
    let node = find_import(module, span)?;
    match (kind, node) {
        (ImportSiteKind::Import, FoundImport::Plain(import)) => {
            let alias = import
                .names
                .iter()
                .find(|alias| alias.bound_name() == name)?;
            let mut alias = alias.clone();
            alias.comma = None;
            let mut lifted = import.clone();
            lifted.names = vec![alias];
            lifted.span = Span::SYNTHETIC;
            Some(SmallStatement::Import(lifted))
        }
        (ImportSiteKind::From, FoundImport::From(import)) => {
            let ImportNames::Aliases(aliases) = &import.names else {
                return None;
            };
            let alias = aliases.iter().find(|alias| alias.bound_name() == name)?;
            let mut alias = alias.clone();
            alias.comma = None;
            let mut lifted = single_alias_from(import, alias);
            lifted.span = Span::SYNTHETIC;
            Some(SmallStatement::ImportFrom(lifted))
        }
        _ => None,
    }
}

fn single_alias_from(import: &ImportFrom, alias: ImportAlias) -> ImportFrom {
    let mut lifted = import.clone();
    lifted.names = ImportNames::Aliases(vec![alias]);
    lifted.lpar = None;
    lifted.rpar = None;
    lifted
}

enum FoundImport<'a> {
    Plain(&'a haul_cst::Import),
    From(&'a ImportFrom),
}

fn find_import(module: &Module, span: Span) -> Option<FoundImport<'_>> {
    struct Finder<'a> {
        span: Span,
        found: Option<FoundImport<'a>>,
    }
    // A manual scan keeps the borrow tied to the module, which the
    // Visitor trait cannot express.
    fn scan<'a>(statements: &'a [Statement], finder: &mut Finder<'a>) {
        for statement in statements {
            match statement {
                Statement::Simple(line) => {
                    for small in &line.body {
                        match small {
                            SmallStatement::Import(node) if node.span == finder.span => {
                                finder.found = Some(FoundImport::Plain(node));
                            }
                            SmallStatement::ImportFrom(node) if node.span == finder.span => {
                                finder.found = Some(FoundImport::From(node));
                            }
                            _ => {}
                        }
                    }
                }
                Statement::Compound(compound) => {
                    for suite in suites_of(compound) {
                        match suite {
                            haul_cst::Suite::IndentedBlock(block) => scan(&block.body, finder),
                            haul_cst::Suite::Simple(simple) => {
                                for small in &simple.body {
                                    match small {
                                        SmallStatement::Import(node)
                                            if node.span == finder.span =>
                                        {
                                            finder.found = Some(FoundImport::Plain(node));
                                        }
                                        SmallStatement::ImportFrom(node)
                                            if node.span == finder.span =>
                                        {
                                            finder.found = Some(FoundImport::From(node));
                                        }
                                        _ => {}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    let mut finder = Finder { span, found: None };
    scan(&module.body, &mut finder);
    finder.found
}

fn suites_of(compound: &haul_cst::CompoundStatement) -> Vec<&haul_cst::Suite> {
    use haul_cst::CompoundStatement::*;
    let mut suites = Vec::new();
    match compound {
        FunctionDef(node) => suites.push(&node.body),
        ClassDef(node) => suites.push(&node.body),
        If(node) => {
            let mut current = Some(node);
            while let Some(if_node) = current {
                suites.push(&if_node.body);
                current = None;
                if let Some(orelse) = &if_node.orelse {
                    match &**orelse {
                        haul_cst::OrElse::Elif(elif) => current = Some(elif),
                        haul_cst::OrElse::Else(els) => suites.push(&els.body),
                    }
                }
            }
        }
        While(node) => {
            suites.push(&node.body);
            if let Some(orelse) = &node.orelse {
                suites.push(&orelse.body);
            }
        }
        For(node) => {
            suites.push(&node.body);
            if let Some(orelse) = &node.orelse {
                suites.push(&orelse.body);
            }
        }
        Try(node) => {
            suites.push(&node.body);
            for handler in &node.handlers {
                suites.push(&handler.body);
            }
            if let Some(orelse) = &node.orelse {
                suites.push(&orelse.body);
            }
            if let Some(finalbody) = &node.finalbody {
                suites.push(&finalbody.body);
            }
        }
        With(node) => suites.push(&node.body),
    }
    suites
}

/// Reject string-typed annotations that mention a name the motion would
/// have to rewrite; they are invisible to the reference index.
fn check_string_annotations(
    statement: &Statement,
    requirements: &[(String, SmallStatement)],
) -> Result<()> {
    if requirements.is_empty() {
        return Ok(());
    }

    struct AnnotationStrings {
        texts: Vec<String>,
    }

    impl AnnotationStrings {
        fn record(&mut self, expression: &Expression) {
            match expression.unparenthesized() {
                Expression::SimpleString(string) => {
                    if let Some(value) = string.evaluated_value() {
                        self.texts.push(value);
                    }
                }
                Expression::ConcatenatedString(string) => {
                    if let Some(value) = string.evaluated_value() {
                        self.texts.push(value);
                    }
                }
                _ => {}
            }
        }
    }

    impl Visitor for AnnotationStrings {
        fn visit_ann_assign(&mut self, node: &haul_cst::AnnAssign) -> VisitResult {
            self.record(&node.annotation.annotation);
            VisitResult::Continue
        }

        fn visit_param(&mut self, node: &haul_cst::Param) -> VisitResult {
            if let Some(annotation) = &node.annotation {
                self.record(&annotation.annotation);
            }
            VisitResult::Continue
        }

        fn visit_function_def(&mut self, node: &haul_cst::FunctionDef) -> VisitResult {
            if let Some(returns) = &node.returns {
                self.record(&returns.annotation);
            }
            VisitResult::Continue
        }
    }

    let mut collector = AnnotationStrings { texts: Vec::new() };
    haul_cst::visitor::walk_statement(&mut collector, statement);

    for text in &collector.texts {
        for token in identifier_tokens(text) {
            if requirements.iter().any(|(name, _)| name == token) {
                return Err(MoveError::UnsupportedAnnotation {
                    name: token.to_owned(),
                });
            }
        }
    }
    Ok(())
}

fn identifier_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !(ch == '_' || ch.is_alphanumeric()))
        .filter(|token| {
            !token.is_empty() && !token.starts_with(|ch: char| ch.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_cst::parse_module;

    fn extract(
        source: &str,
        line: u32,
        col: u32,
    ) -> Result<(Module, ExtractedSymbol)> {
        let module = parse_module(source).unwrap();
        let index = ScopeIndex::build(&module);
        let origin = ModuleName::parse("mod1").unwrap();
        extract_symbol(&module, &index, source, line, col, &origin)
    }

    #[test]
    fn extracts_function_at_point() {
        let (tree, symbol) = extract("def test():\n    return 1\n", 1, 5).unwrap();
        assert_eq!(symbol.name, "test");
        assert_eq!(symbol.kind, SymbolKind::FunctionDef);
        assert!(tree.body.is_empty());
        assert_eq!(haul_cst::render(&symbol.statement), "def test():\n    return 1\n");
    }

    #[test]
    fn extracts_class_and_variables() {
        let (_, symbol) = extract("class Test:\n    pass\n", 1, 6).unwrap();
        assert_eq!(symbol.kind, SymbolKind::ClassDef);

        let (_, symbol) = extract("test = 1\n", 1, 1).unwrap();
        assert_eq!(symbol.kind, SymbolKind::SimpleAssign);
        assert_eq!(symbol.name, "test");

        let (_, symbol) = extract("test: int = 1\n", 1, 1).unwrap();
        assert_eq!(symbol.kind, SymbolKind::AnnAssign);
    }

    #[test]
    fn rejects_multi_target_assignment() {
        let err = extract("test = other = 1\n", 1, 1).unwrap_err();
        assert!(matches!(err, MoveError::UnsupportedStatement { .. }));

        let err = extract("a, b = 1, 2\n", 1, 1).unwrap_err();
        assert!(matches!(err, MoveError::UnsupportedStatement { .. }));
    }

    #[test]
    fn missing_position_is_symbol_not_found() {
        let err = extract("x = 1\n", 5, 0).unwrap_err();
        assert!(matches!(err, MoveError::SymbolNotFound { line: 5, col: 0 }));
    }

    #[test]
    fn collects_same_module_dependency() {
        let source = "helper = 2\n\n\ndef test():\n    return helper\n";
        let (_, symbol) = extract(source, 4, 5).unwrap();
        assert_eq!(symbol.requirements.len(), 1);
        let (name, import) = &symbol.requirements[0];
        assert_eq!(name, "helper");
        assert_eq!(haul_cst::render(import), "from mod1 import helper");
    }

    #[test]
    fn lifts_imports_the_symbol_uses() {
        let source = "import os\nfrom json import dumps\n\n\ndef test():\n    return dumps(os.sep)\n";
        let (_, symbol) = extract(source, 5, 5).unwrap();
        let rendered: Vec<String> = symbol
            .requirements
            .iter()
            .map(|(_, import)| haul_cst::render(import))
            .collect();
        assert!(rendered.contains(&"import os".to_owned()));
        assert!(rendered.contains(&"from json import dumps".to_owned()));
    }

    #[test]
    fn ignores_locals_params_and_builtins() {
        let source = "def test(a):\n    b = len(a)\n    return b\n";
        let (_, symbol) = extract(source, 1, 5).unwrap();
        assert!(symbol.requirements.is_empty());
    }

    #[test]
    fn head_blank_lines_removed_after_extraction() {
        let source = "def test():\n    return 1\n\n\nx = 2\n";
        let (tree, _) = extract(source, 1, 5).unwrap();
        assert_eq!(haul_cst::render(&tree), "x = 2\n");
    }

    #[test]
    fn head_comments_survive_extraction() {
        let source = "def test():\n    return 1\n\n# keep me\nx = 2\n";
        let (tree, _) = extract(source, 1, 5).unwrap();
        assert_eq!(haul_cst::render(&tree), "# keep me\nx = 2\n");
    }

    #[test]
    fn string_annotation_naming_dependency_is_rejected() {
        let source = "Helper = int\n\n\ndef test(x: \"Helper\"):\n    return Helper(x)\n";
        let err = extract(source, 4, 5).unwrap_err();
        assert!(matches!(err, MoveError::UnsupportedAnnotation { .. }));
    }

    #[test]
    fn unrelated_string_annotation_is_fine() {
        let source = "def test(x: \"SomeType\"):\n    return x\n";
        let (_, symbol) = extract(source, 1, 5).unwrap();
        assert_eq!(symbol.kind, SymbolKind::FunctionDef);
    }
}
