// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the haul-cst parser.
//!
//! These tests verify that `render(parse(code)) == code`. This is the
//! fundamental invariant behind every refactoring pass: untouched code
//! must come back byte-for-byte.

use difference::assert_diff;
use haul_cst::{parse_module, render};

/// Helper to visualize whitespace differences in test output.
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").replace('\n', "↩\n")
}

fn assert_roundtrip(input: &str) {
    let module = match parse_module(input) {
        Ok(module) => module,
        Err(err) => panic!("parse failed for {input:?}: {err}"),
    };
    let generated = render(&module);
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

#[test]
fn roundtrip_empty_module() {
    assert_roundtrip("");
    assert_roundtrip("\n");
    assert_roundtrip("\n\n\n");
}

#[test]
fn roundtrip_simple_assignment() {
    assert_roundtrip("x = 1\n");
    assert_roundtrip("x = y = 1\n");
    assert_roundtrip("x=1\n");
    assert_roundtrip("x   =   1\n");
    assert_roundtrip("x = 1");
}

#[test]
fn roundtrip_annotated_and_augmented() {
    assert_roundtrip("x: int = 1\n");
    assert_roundtrip("x: int\n");
    assert_roundtrip("x += 1\n");
    assert_roundtrip("x //= 2\n");
    assert_roundtrip("x **= 2\n");
    assert_roundtrip("flags |= MASK\n");
}

#[test]
fn roundtrip_comments_and_blank_lines() {
    assert_roundtrip("# leading comment\nx = 1\n");
    assert_roundtrip("x = 1  # trailing\n");
    assert_roundtrip("\n\n# comment\n\nx = 1\n\n# footer\n");
    assert_roundtrip("x = 1\n# only a footer comment");
}

#[test]
fn roundtrip_function_def() {
    assert_roundtrip("def test():\n    return 1\n");
    assert_roundtrip("def test():\n    return 1");
    assert_roundtrip("def f(a, b=2, *args, **kwargs):\n    pass\n");
    assert_roundtrip("def f(a: int, b: str = \"x\") -> bool:\n    return True\n");
    assert_roundtrip("def f(a, /, b, *, c):\n    pass\n");
    assert_roundtrip("def f(): return 1\n");
    assert_roundtrip("async def f():\n    await g()\n");
}

#[test]
fn roundtrip_decorators() {
    assert_roundtrip("@decorator\ndef f():\n    pass\n");
    assert_roundtrip("@mod.decorator(arg)\n# between\n@other\ndef f():\n    pass\n");
}

#[test]
fn roundtrip_class_def() {
    assert_roundtrip("class Test:\n    def method(self):\n        return 1\n");
    assert_roundtrip("class Test(Base, metaclass=Meta):\n    pass\n");
    assert_roundtrip("class Test:\n\n    x = 1\n");
}

#[test]
fn roundtrip_imports() {
    assert_roundtrip("import os\n");
    assert_roundtrip("import os.path\n");
    assert_roundtrip("import os, sys\n");
    assert_roundtrip("import numpy as np\n");
    assert_roundtrip("from os import path\n");
    assert_roundtrip("from os import path as p, sep\n");
    assert_roundtrip("from os import *\n");
    assert_roundtrip("from . import sibling\n");
    assert_roundtrip("from ..pkg import mod\n");
    assert_roundtrip("from pkg import (a, b,\n    c)\n");
}

#[test]
fn roundtrip_control_flow() {
    assert_roundtrip("if x:\n    pass\nelif y:\n    pass\nelse:\n    pass\n");
    assert_roundtrip("while x:\n    break\nelse:\n    pass\n");
    assert_roundtrip("for i in range(10):\n    continue\n");
    assert_roundtrip("for k, v in items:\n    print(k, v)\n");
    assert_roundtrip(
        "try:\n    f()\nexcept ValueError as e:\n    raise\nexcept Exception:\n    pass\nelse:\n    g()\nfinally:\n    h()\n",
    );
    assert_roundtrip("with open(p) as f, lock:\n    f.read()\n");
}

#[test]
fn roundtrip_expressions() {
    assert_roundtrip("y = a + b * c - d / e // f % g\n");
    assert_roundtrip("y = (a + b) * c\n");
    assert_roundtrip("y = a ** -b\n");
    assert_roundtrip("y = a < b <= c == d != e\n");
    assert_roundtrip("y = a in b and c not in d or e is not f\n");
    assert_roundtrip("y = not x\n");
    assert_roundtrip("y = x if cond else z\n");
    assert_roundtrip("f(a, b=1, *args, **kwargs)\n");
    assert_roundtrip("obj.attr.method(x)[0]\n");
    assert_roundtrip("x[1:2, ::3]\n");
    assert_roundtrip("y = lambda a, b=1: a + b\n");
    assert_roundtrip("y = (n := compute())\n");
    assert_roundtrip("print(*values)\n")
}

#[test]
fn roundtrip_collections() {
    assert_roundtrip("x = [1, 2, 3]\n");
    assert_roundtrip("x = []\n");
    assert_roundtrip("x = (1,)\n");
    assert_roundtrip("x = 1, 2\n");
    assert_roundtrip("x = ()\n");
    assert_roundtrip("x = {1, 2}\n");
    assert_roundtrip("x = {\"a\": 1, **rest}\n");
    assert_roundtrip("x = {}\n");
    assert_roundtrip("x = [\n    1,\n    2,\n]\n");
}

#[test]
fn roundtrip_comprehensions() {
    assert_roundtrip("x = [i for i in range(10) if i % 2]\n");
    assert_roundtrip("x = {k: v for k, v in items}\n");
    assert_roundtrip("x = {i for i in s}\n");
    assert_roundtrip("x = (i * j for i in a for j in b)\n");
    assert_roundtrip("total = sum(x for x in values)\n");
}

#[test]
fn roundtrip_strings() {
    assert_roundtrip("s = \"hello\"\n");
    assert_roundtrip("s = 'hello'\n");
    assert_roundtrip("s = \"esc \\\" quote\"\n");
    assert_roundtrip("s = \"\"\"multi\nline\"\"\"\n");
    assert_roundtrip("s = r\"raw\\d+\"\n");
    assert_roundtrip("s = b\"bytes\"\n");
    assert_roundtrip("s = f\"value={x}\"\n");
    assert_roundtrip("s = \"concat\" \"enated\"\n");
}

#[test]
fn roundtrip_numbers() {
    assert_roundtrip("x = 42\n");
    assert_roundtrip("x = 0xFF\n");
    assert_roundtrip("x = 0b1010\n");
    assert_roundtrip("x = 1_000_000\n");
    assert_roundtrip("x = 3.14\n");
    assert_roundtrip("x = 1e-5\n");
    assert_roundtrip("x = 2j\n");
}

#[test]
fn roundtrip_semicolons_and_continuations() {
    assert_roundtrip("a = 1; b = 2\n");
    assert_roundtrip("a = 1 ; b = 2;\n");
    assert_roundtrip("x = 1 + \\\n    2\n");
}

#[test]
fn roundtrip_multiline_calls() {
    assert_roundtrip("f(\n    a,\n    b,\n)\n");
    assert_roundtrip("result = f(a,  # first\n    b)\n");
}

#[test]
fn roundtrip_yield_and_global() {
    assert_roundtrip("def g():\n    yield\n    yield 1\n    yield from items\n");
    assert_roundtrip("def f():\n    global counter\n    counter += 1\n");
    assert_roundtrip("def outer():\n    def inner():\n        nonlocal state\n    return inner\n");
}

#[test]
fn roundtrip_nested_blocks() {
    assert_roundtrip(
        "class A:\n    def f(self):\n        if x:\n            return 1\n        return 2\n\n    def g(self):\n        pass\n",
    );
    assert_roundtrip("if a:\n    if b:\n        pass\n    # dedented comment\n    else:\n        pass\n");
}

#[test]
fn roundtrip_module_docstring() {
    assert_roundtrip("\"\"\"Module docstring.\"\"\"\n\nimport os\n\n\ndef f():\n    \"\"\"Doc.\"\"\"\n    return os\n");
}

#[test]
fn roundtrip_del_assert_raise() {
    assert_roundtrip("del x\n");
    assert_roundtrip("del x, y\n");
    assert_roundtrip("assert x, \"message\"\n");
    assert_roundtrip("raise ValueError(\"bad\") from err\n");
}

#[test]
fn parse_error_reports_location() {
    let err = parse_module("def f(:\n    pass\n").unwrap_err();
    assert_eq!(err.line, 1);
    let err = parse_module("x = 1\n  y = 2\n").unwrap_err();
    assert_eq!(err.line, 2);
}
