//! End-to-end move scenarios on temporary project roots.
//!
//! Each test builds a throwaway project, runs one motion, and asserts
//! the exact file contents afterwards.

use haul::{move_symbol, ModuleName, MoveError, Project};
use tempfile::TempDir;

fn temp_project() -> (TempDir, Project) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let project = Project::open(dir.path()).expect("open project");
    (dir, project)
}

fn run_move(project: &mut Project, from: &str, line: u32, col: u32, to: &str) -> Vec<String> {
    let origin = ModuleName::parse(from).unwrap();
    let dest = ModuleName::parse(to).unwrap();
    let outcome = move_symbol(project, &origin, line, col, &dest).expect("move failed");
    outcome.edited.iter().map(ModuleName::dotted).collect()
}

#[test]
fn move_function_without_references() {
    let (_dir, mut project) = temp_project();
    project.create_module("mod1", "def test():\n    return 1").unwrap();
    project.create_module("mod2", "").unwrap();

    let edited = run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "");
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "def test():\n    return 1"
    );
    assert_eq!(edited, vec!["mod1", "mod2"]);
}

#[test]
fn move_function_with_internal_dependency() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod1").unwrap(),
        "from mod2 import test\nx = test()"
    );
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "def test():\n    return 1\n"
    );
}

#[test]
fn move_into_populated_module_separates_with_blank_lines() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\n\nx = 2")
        .unwrap();
    project
        .create_module("mod2", "def fn():\n    return 1")
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "x = 2");
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "def fn():\n    return 1\n\n\ndef test():\n    return 1\n"
    );
}

#[test]
fn move_between_nested_modules() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("pkg.mod", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "pkg.mod", 1, 5, "mod2");

    assert_eq!(
        project.module_content("pkg.mod").unwrap(),
        "from mod2 import test\nx = test()"
    );
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "def test():\n    return 1\n"
    );
}

#[test]
fn move_into_new_package_creates_init_files() {
    let (dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1")
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "pkg.sub.mod2");

    assert!(dir.path().join("pkg/__init__.py").is_file());
    assert!(dir.path().join("pkg/sub/__init__.py").is_file());
    assert_eq!(
        project.module_content("pkg.sub.mod2").unwrap(),
        "def test():\n    return 1"
    );
}

#[test]
fn unrelated_modules_are_untouched() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "from mod4 import x\n\nprint(x)")
        .unwrap();
    project.create_module("mod4", "x = 2").unwrap();
    project
        .create_module("mod5", "import math\n\nprint(math.pi)")
        .unwrap();

    let edited = run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod4 import x\n\nprint(x)"
    );
    assert_eq!(project.module_content("mod4").unwrap(), "x = 2");
    assert_eq!(
        project.module_content("mod5").unwrap(),
        "import math\n\nprint(math.pi)"
    );
    assert_eq!(edited, vec!["mod1", "mod2"]);
}

#[test]
fn rewrites_from_import_in_third_module() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "from mod1 import test\nx = test()")
        .unwrap();

    let edited = run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod2 import test\nx = test()"
    );
    assert_eq!(edited, vec!["mod1", "mod2", "mod3"]);
}

#[test]
fn splits_multi_alias_from_import() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()\ny = 0")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "from mod1 import test, y\nx = test()\nz = y")
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod1").unwrap(),
        "from mod2 import test\nx = test()\ny = 0"
    );
    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod1 import y\nfrom mod2 import test\nx = test()\nz = y"
    );
}

#[test]
fn merges_into_existing_destination_import() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "y = 0").unwrap();
    project
        .create_module(
            "mod3",
            "from mod1 import test\nfrom mod2 import y\nx = test()\nz = y",
        )
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod2 import test, y\nx = test()\nz = y"
    );
}

#[test]
fn rewrites_absolute_import_to_bare_name() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "import mod1\n\ny = mod1.test()")
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "");
    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod2 import test\n\ny = test()"
    );
}

#[test]
fn rewrites_package_qualified_access() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("pkg.mod1", "def test():\n    return 1")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "import pkg.mod1\n\ny = pkg.mod1.test()")
        .unwrap();

    run_move(&mut project, "pkg.mod1", 1, 5, "mod2");

    assert_eq!(project.module_content("pkg.mod1").unwrap(), "");
    assert_eq!(
        project.module_content("mod3").unwrap(),
        "from mod2 import test\n\ny = test()"
    );
}

#[test]
fn keeps_absolute_import_with_other_uses() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nother = 2")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module("mod3", "import mod1\ny = mod1.test()\nz = mod1.other")
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("mod3").unwrap(),
        "import mod1\nfrom mod2 import test\ny = test()\nz = mod1.other"
    );
}

#[test]
fn all_listed_names_survive_the_sweep() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\n\n\ndef fn():\n    return 2")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    project
        .create_module(
            "pkg.__init__",
            "from mod1 import test, fn\n__all__ = [\"fn\", \"test\"]",
        )
        .unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");

    assert_eq!(
        project.module_content("pkg.__init__").unwrap(),
        "from mod1 import fn\nfrom mod2 import test\n__all__ = [\"fn\", \"test\"]"
    );
}

#[test]
fn moves_class_and_variables() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "class Test:\n    def test(self):\n        return 1")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 1, 6, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "");
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "class Test:\n    def test(self):\n        return 1"
    );
}

#[test]
fn moves_simple_and_annotated_variables() {
    let (_dir, mut project) = temp_project();
    project.create_module("mod1", "test = 1").unwrap();
    project.create_module("mod2", "").unwrap();
    run_move(&mut project, "mod1", 1, 1, "mod2");
    assert_eq!(project.module_content("mod1").unwrap(), "");
    assert_eq!(project.module_content("mod2").unwrap(), "test = 1");

    let (_dir, mut project) = temp_project();
    project.create_module("mod1", "test: int = 1").unwrap();
    project.create_module("mod2", "").unwrap();
    run_move(&mut project, "mod1", 1, 1, "mod2");
    assert_eq!(project.module_content("mod1").unwrap(), "");
    assert_eq!(project.module_content("mod2").unwrap(), "test: int = 1");
}

#[test]
fn moved_symbol_carries_its_imports() {
    let (_dir, mut project) = temp_project();
    project
        .create_module(
            "mod1",
            "import os\n\n\ndef test():\n    return os.sep\n\n\nx = os.curdir",
        )
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 4, 5, "mod2");

    assert_eq!(
        project.module_content("mod1").unwrap(),
        "import os\n\n\nx = os.curdir"
    );
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "import os\n\n\ndef test():\n    return os.sep\n"
    );
}

#[test]
fn moved_symbol_depends_on_origin_definition() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "helper = 2\n\n\ndef test():\n    return helper")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 4, 5, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "helper = 2\n");
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "from mod1 import helper\n\n\ndef test():\n    return helper"
    );
}

#[test]
fn multi_target_assignment_is_rejected_without_writes() {
    let (_dir, mut project) = temp_project();
    project.create_module("mod1", "test = other = 1").unwrap();
    project.create_module("mod2", "").unwrap();

    let origin = ModuleName::parse("mod1").unwrap();
    let dest = ModuleName::parse("mod2").unwrap();
    let err = move_symbol(&mut project, &origin, 1, 1, &dest).unwrap_err();

    assert!(matches!(err, MoveError::UnsupportedStatement { .. }));
    assert_eq!(project.module_content("mod1").unwrap(), "test = other = 1");
    assert_eq!(project.module_content("mod2").unwrap(), "");
}

#[test]
fn missing_symbol_is_rejected_without_writes() {
    let (_dir, mut project) = temp_project();
    project.create_module("mod1", "x = 1").unwrap();
    project.create_module("mod2", "").unwrap();

    let origin = ModuleName::parse("mod1").unwrap();
    let dest = ModuleName::parse("mod2").unwrap();
    let err = move_symbol(&mut project, &origin, 9, 0, &dest).unwrap_err();

    assert!(matches!(err, MoveError::SymbolNotFound { line: 9, col: 0 }));
    assert_eq!(project.module_content("mod1").unwrap(), "x = 1");
}

#[test]
fn move_back_restores_simple_project() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");
    run_move(&mut project, "mod2", 1, 5, "mod1");

    assert_eq!(
        project.module_content("mod1").unwrap(),
        "def test():\n    return 1"
    );
    assert_eq!(project.module_content("mod2").unwrap(), "");
}

#[test]
fn move_back_drops_the_stub_import() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 1, 5, "mod2");
    run_move(&mut project, "mod2", 1, 5, "mod1");

    // The definition returns below its use site; the stub import is
    // gone either way.
    assert_eq!(
        project.module_content("mod1").unwrap(),
        "x = test()\n\n\ndef test():\n    return 1\n"
    );
    assert_eq!(project.module_content("mod2").unwrap(), "");
}

#[test]
fn comments_around_symbol_travel_with_it() {
    let (_dir, mut project) = temp_project();
    project
        .create_module(
            "mod1",
            "x = 1\n\n\n# computes the answer\ndef test():\n    return 1",
        )
        .unwrap();
    project.create_module("mod2", "").unwrap();

    run_move(&mut project, "mod1", 5, 5, "mod2");

    assert_eq!(project.module_content("mod1").unwrap(), "x = 1\n");
    assert_eq!(
        project.module_content("mod2").unwrap(),
        "# computes the answer\ndef test():\n    return 1"
    );
}

#[test]
fn json_contract_success_and_failure() {
    let (dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1")
        .unwrap();
    project.create_module("mod2", "").unwrap();
    drop(project);

    let out = haul::cli::run_move_json(dir.path(), "mod1", 1, 5, "mod2");
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["editedFiles"][0]["filename"], "mod1");
    assert_eq!(value["editedFiles"][0]["location"], 0);
    assert_eq!(value["editedFiles"][1]["filename"], "mod2");

    let out = haul::cli::run_move_json(dir.path(), "mod2", 9, 0, "mod1");
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["errorMsg"], "no symbol found at L9 C0");
    assert!(value["trace"].is_string());
}

#[test]
fn module_history_tracks_passes() {
    let (_dir, mut project) = temp_project();
    project
        .create_module("mod1", "def test():\n    return 1\nx = test()")
        .unwrap();
    project.create_module("mod2", "").unwrap();

    let origin = ModuleName::parse("mod1").unwrap();
    let dest = ModuleName::parse("mod2").unwrap();
    move_symbol(&mut project, &origin, 1, 5, &dest).unwrap();

    // Extraction, stub insertion, and the destination append each push
    // a revision.
    assert!(project.module(&origin).unwrap().revision() >= 2);
    assert_eq!(project.module(&dest).unwrap().revision(), 1);
}
