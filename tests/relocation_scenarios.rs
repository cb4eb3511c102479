// tests/relocation_scenarios.rs

use std::error::Error;

use pycify::cli::CliArgs;
use pycify::compile::CompilerBackend;
use pycify::fs::RealFileSystem;
use pycify::relocate::{IgnoreSet, RelocateOptions};
use pycify::replace_py_with_pyc;
use pycify::runtime::RuntimeVersion;
use pycify_test_utils::builders::{with_extension, SourceTreeBuilder};
use pycify_test_utils::fake_compiler::FakeCompiler;
use pycify_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn v312() -> RuntimeVersion {
    "3.12".parse().unwrap()
}

#[test]
fn in_place_replaces_every_source() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("a.py")
        .source("sub/b.py")
        .build();
    let fs = RealFileSystem;
    let compiler = FakeCompiler::new(&fs, v312().tag());

    let options = RelocateOptions::new(v312().tag());
    let created = replace_py_with_pyc(&fs, tree.root(), &compiler, &options)?;

    assert_eq!(created.len(), 2);
    assert_eq!(tree.files(), vec!["a.pyc", "sub/b.pyc"]);
    assert!(!tree.path("__pycache__").exists());
    assert!(!tree.path("sub/__pycache__").exists());
    assert_eq!(std::fs::read_to_string(tree.path("sub/b.pyc"))?, "compiled:sub/b.py");
    Ok(())
}

#[test]
fn setup_py_is_left_alone() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("setup.py")
        .source("pkg/mod.py")
        .build();
    let fs = RealFileSystem;
    let compiler = FakeCompiler::new(&fs, v312().tag());
    let options = RelocateOptions::new(v312().tag()).with_ignore(IgnoreSet::new(["setup.py"])?);

    let created = replace_py_with_pyc(&fs, tree.root(), &compiler, &options)?;

    assert_eq!(created, vec![tree.path("pkg/mod.pyc")]);
    assert_eq!(tree.files(), vec!["pkg/mod.pyc", "setup.py"]);
    Ok(())
}

#[test]
fn mirror_mode_preserves_sources() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("src/app/__init__.py")
        .source("src/app/cli.py")
        .source("src/app/util/strings.py")
        .dir("out")
        .build();
    let fs = RealFileSystem;
    let compiler = FakeCompiler::new(&fs, v312().tag());
    let options = RelocateOptions::new(v312().tag()).with_out_dir(tree.path("out"));

    let created = replace_py_with_pyc(&fs, &tree.path("src"), &compiler, &options)?;

    assert_eq!(created.len(), 3);
    assert_eq!(
        tree.files_under("src"),
        vec!["app/__init__.py", "app/cli.py", "app/util/strings.py"]
    );
    assert_eq!(
        tree.files_under("out"),
        vec!["app/__init__.pyc", "app/cli.pyc", "app/util/strings.pyc"]
    );
    Ok(())
}

#[test]
fn pinned_version_names_artifacts_by_its_minor() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new().source("mod.py").build();
    let fs = RealFileSystem;
    let pinned: RuntimeVersion = "3.12".parse()?;
    let other: RuntimeVersion = "3.9".parse()?;

    // Artifacts for 3.12 exist, but the walk looks up the 3.9 name.
    FakeCompiler::new(&fs, pinned.tag()).compile_tree(tree.root())?;
    assert!(tree.path("__pycache__/mod.cpython-312.pyc").is_file());

    let err = pycify::relocate::relocate(&fs, tree.root(), &RelocateOptions::new(other.tag()))
        .unwrap_err();
    assert!(matches!(err, pycify::errors::PycifyError::CacheNotEmpty { .. }));
    assert!(tree.path("mod.py").is_file());

    let options = RelocateOptions::new(pinned.tag());
    let created = pycify::relocate::relocate(&fs, tree.root(), &options)?;
    assert_eq!(created, vec![tree.path("mod.pyc")]);
    Ok(())
}

#[test]
fn skipped_sources_stay_in_place() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("good.py")
        .file("bad.py", "def (:\n")
        .build();
    let fs = RealFileSystem;
    let compiler = FakeCompiler::new(&fs, v312().tag()).skip("bad.py");

    let options = RelocateOptions::new(v312().tag());
    let created = replace_py_with_pyc(&fs, tree.root(), &compiler, &options)?;

    assert_eq!(created, vec![tree.path("good.pyc")]);
    assert_eq!(tree.files(), vec!["bad.py", "good.pyc"]);
    Ok(())
}

#[test]
fn rerun_on_relocated_tree_is_a_noop() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("a.py")
        .source("sub/b.py")
        .build();
    let fs = RealFileSystem;
    let options = RelocateOptions::new(v312().tag());
    let compiler = FakeCompiler::new(&fs, v312().tag());
    replace_py_with_pyc(&fs, tree.root(), &compiler, &options)?;

    let created = pycify::relocate::relocate(&fs, tree.root(), &options)?;

    assert!(created.is_empty());
    assert_eq!(with_extension(&tree.files(), "pyc"), vec!["a.pyc", "sub/b.pyc"]);
    Ok(())
}

#[test]
fn packaged_project_layout() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("setup.py")
        .source("src/packaged/__init__.py")
        .source("src/packaged/__main__.py")
        .source("src/packaged/cli.py")
        .source("src/packaged/config.py")
        .source("example/minesweeper/setup.py")
        .source("example/minesweeper/minesweeper.py")
        .source("example/mandelbrot/mandelbrot.py")
        .source("tests/cli_test.py")
        .source("tests/conftest.py")
        .file("README.md", "# packaged\n")
        .build();
    let fs = RealFileSystem;
    let compiler = FakeCompiler::new(&fs, v312().tag());
    let options = RelocateOptions::new(v312().tag())
        .with_ignore(IgnoreSet::new(["setup.py", "tests"])?);

    let created = replace_py_with_pyc(&fs, tree.root(), &compiler, &options)?;

    assert_eq!(created.len(), 7);
    assert_eq!(
        tree.files(),
        vec![
            "README.md",
            "example/mandelbrot/mandelbrot.pyc",
            "example/minesweeper/minesweeper.pyc",
            "example/minesweeper/setup.pyc",
            "setup.py",
            "src/packaged/__init__.pyc",
            "src/packaged/__main__.pyc",
            "src/packaged/cli.pyc",
            "src/packaged/config.pyc",
            "tests/cli_test.py",
            "tests/conftest.py",
        ]
    );
    assert_eq!(compiler.compiled_dirs().len(), 1);
    Ok(())
}

#[test]
fn dry_run_leaves_the_tree_alone() -> TestResult {
    init_tracing();
    let tree = SourceTreeBuilder::new()
        .source("a.py")
        .file("__pycache__/a.cpython-312.pyc", "pyc")
        .build();
    let before = tree.files();

    pycify::run(CliArgs {
        directory: tree.root().to_path_buf(),
        python_version: Some("3.12".to_string()),
        dry_run: true,
        ..CliArgs::default()
    })?;

    assert_eq!(tree.files(), before);
    Ok(())
}
