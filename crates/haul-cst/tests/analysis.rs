// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tests for scope analysis and export extraction.

use haul_cst::{parse_module, BindingKind, ExportCollector, ScopeIndex};

fn index_of(source: &str) -> ScopeIndex {
    ScopeIndex::build(&parse_module(source).expect("parse error"))
}

#[test]
fn module_assignment_with_reference() {
    let index = index_of("x = 1\ny = x\n");
    let x = index
        .module_assignments()
        .find(|a| a.name == "x")
        .expect("binding for x");
    assert_eq!(x.kind, BindingKind::Assign);
    assert_eq!(x.references.len(), 1);
    let access = index.access(x.references[0]);
    assert_eq!(access.chain, vec!["x".to_owned()]);
}

#[test]
fn import_binding_references() {
    let index = index_of("import os\np = os.path.join(a, b)\n");
    let os = index
        .module_assignments()
        .find(|a| a.name == "os")
        .expect("binding for os");
    assert_eq!(os.kind, BindingKind::Import);
    assert_eq!(os.references.len(), 1);
    let access = index.access(os.references[0]);
    assert_eq!(
        access.chain,
        vec!["os".to_owned(), "path".to_owned(), "join".to_owned()]
    );
    // The qualified chain's top span covers `os.path.join`.
    assert!(access.top.end > access.node.end);
}

#[test]
fn unused_import_has_no_references() {
    let index = index_of("import os\nimport sys\nprint(sys.argv)\n");
    let os = index
        .module_assignments()
        .find(|a| a.name == "os")
        .expect("binding for os");
    assert!(os.references.is_empty());
    let sys = index
        .module_assignments()
        .find(|a| a.name == "sys")
        .expect("binding for sys");
    assert_eq!(sys.references.len(), 1);
}

#[test]
fn import_alias_binds_alias_name() {
    let index = index_of("import numpy as np\nx = np.array([])\n");
    let np = index
        .module_assignments()
        .find(|a| a.name == "np")
        .expect("binding for np");
    assert_eq!(np.references.len(), 1);
    assert!(!index.module_assignments().any(|a| a.name == "numpy"));
}

#[test]
fn dotted_import_binds_first_segment() {
    let index = index_of("import os.path\nx = os.path.sep\n");
    let os = index
        .module_assignments()
        .find(|a| a.name == "os")
        .expect("binding for os");
    assert_eq!(os.kind, BindingKind::Import);
    assert_eq!(os.references.len(), 1);
}

#[test]
fn function_scope_is_function_wide() {
    let index = index_of("def f():\n    return x\n    x = 1\n");
    // The access to x inside f resolves to the local assignment, not to
    // any module binding.
    let local_x = index
        .assignments()
        .iter()
        .find(|a| a.name == "x")
        .expect("local binding for x");
    assert_ne!(local_x.scope, index.module_scope());
    assert_eq!(local_x.references.len(), 1);
}

#[test]
fn nested_function_sees_enclosing_names() {
    let index = index_of("def outer():\n    v = 1\n    def inner():\n        return v\n");
    let v = index
        .assignments()
        .iter()
        .find(|a| a.name == "v")
        .expect("binding for v");
    assert_eq!(v.references.len(), 1);
}

#[test]
fn class_scope_not_visible_to_methods() {
    let index = index_of(
        "x = 1\n\nclass C:\n    x = 2\n\n    def m(self):\n        return x\n",
    );
    let module_x = index
        .module_assignments()
        .find(|a| a.name == "x")
        .expect("module binding for x");
    // The method's access skips the class-body binding.
    assert_eq!(module_x.references.len(), 1);
}

#[test]
fn global_declaration_escapes_to_module() {
    let index = index_of("count = 0\n\ndef bump():\n    global count\n    count = count + 1\n");
    let module_count = index
        .module_assignments()
        .find(|a| a.name == "count")
        .expect("module binding for count");
    assert!(!module_count.references.is_empty());
}

#[test]
fn builtin_access_has_no_referents() {
    let index = index_of("x = len([1])\n");
    let access = index
        .accesses()
        .iter()
        .find(|a| a.chain == ["len"])
        .expect("access to len");
    assert!(access.referents.is_empty());
}

#[test]
fn comprehension_target_is_scoped() {
    let index = index_of("items = [1]\nsquares = [i * i for i in items]\n");
    let i = index
        .assignments()
        .iter()
        .find(|a| a.name == "i")
        .expect("binding for i");
    assert_ne!(i.scope, index.module_scope());
    assert_eq!(i.references.len(), 2);
    let items = index
        .module_assignments()
        .find(|a| a.name == "items")
        .expect("binding for items");
    assert_eq!(items.references.len(), 1);
}

#[test]
fn function_parameters_bind() {
    let index = index_of("def f(a, b=1):\n    return a + b\n");
    let a = index
        .assignments()
        .iter()
        .find(|a| a.name == "a" && a.kind == BindingKind::Param)
        .expect("binding for parameter a");
    assert_eq!(a.references.len(), 1);
}

#[test]
fn exports_from_list_assignment() {
    let module = parse_module("__all__ = [\"fn\", \"Class\"]\n").unwrap();
    let exports = ExportCollector::collect(&module);
    assert!(exports.contains("fn"));
    assert!(exports.contains("Class"));
    assert_eq!(exports.len(), 2);
}

#[test]
fn exports_from_tuple_set_and_augmented() {
    let module = parse_module("__all__ = (\"a\",)\n__all__ += [\"b\"]\n").unwrap();
    let exports = ExportCollector::collect(&module);
    assert!(exports.contains("a"));
    assert!(exports.contains("b"));

    let module = parse_module("__all__ = {\"s\"}\n").unwrap();
    assert!(ExportCollector::collect(&module).contains("s"));
}

#[test]
fn exports_from_annotated_and_destructured() {
    let module = parse_module("__all__: list = [\"x\"]\n").unwrap();
    assert!(ExportCollector::collect(&module).contains("x"));

    let module = parse_module("__all__, other = (\"y\",), 1\n").unwrap();
    let exports = ExportCollector::collect(&module);
    assert!(exports.contains("y"));
    assert_eq!(exports.len(), 1);
}

#[test]
fn exports_ignore_computed_entries() {
    let module = parse_module("__all__ = [\"ok\", name, f()]\n").unwrap();
    let exports = ExportCollector::collect(&module);
    assert_eq!(exports.len(), 1);
    assert!(exports.contains("ok"));
}

#[test]
fn exports_concatenated_strings() {
    let module = parse_module("__all__ = [\"ab\" \"cd\"]\n").unwrap();
    assert!(ExportCollector::collect(&module).contains("abcd"));
}
