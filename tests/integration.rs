//! Integration tests for leviso-pe through the public API.

use leviso_pe::{
    bundle, Blacklist, BundleError, BundleOptions, CopyOutcome, ImportReader, Objdump,
    Result, SearchPaths,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for objdump that reads imports from a sidecar `<file>.imports`
/// listing one DLL name per line.
struct SidecarImports;

impl ImportReader for SidecarImports {
    fn dll_imports(&self, binary: &Path) -> Result<Vec<String>> {
        let mut sidecar = binary.as_os_str().to_owned();
        sidecar.push(".imports");
        match fs::read_to_string(PathBuf::from(sidecar)) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(_) => Ok(Vec::new()),
        }
    }
}

fn write_binary(path: &Path, imports: &[&str]) {
    fs::write(path, b"MZ").unwrap();
    if !imports.is_empty() {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(".imports");
        fs::write(PathBuf::from(sidecar), imports.join("\n")).unwrap();
    }
}

#[test]
fn test_bundle_copies_transitive_closure() {
    let temp = TempDir::new().unwrap();
    let dist = temp.path().join("dist");
    let sysroot = temp.path().join("mingw64/bin");
    fs::create_dir_all(&dist).unwrap();
    fs::create_dir_all(&sysroot).unwrap();

    let exe = dist.join("app.exe");
    write_binary(&exe, &["libgtk-3-0.dll", "KERNEL32.dll", "msvcrt.dll"]);
    write_binary(&sysroot.join("libgtk-3-0.dll"), &["libglib-2.0-0.dll", "USER32.dll"]);
    write_binary(&sysroot.join("libglib-2.0-0.dll"), &["libintl-8.dll"]);
    write_binary(&sysroot.join("libintl-8.dll"), &["libglib-2.0-0.dll"]);

    let report = bundle(
        &exe,
        &BundleOptions::new(true, false).unwrap(),
        &SearchPaths::new([sysroot.clone()]),
        &Blacklist::default(),
        &SidecarImports,
        &mut Vec::<u8>::new(),
    )
    .unwrap();

    assert_eq!(report.dependencies.len(), 3);
    for name in ["libgtk-3-0.dll", "libglib-2.0-0.dll", "libintl-8.dll"] {
        assert!(dist.join(name).exists(), "{name} was not copied");
    }
    assert!(report
        .copies
        .iter()
        .all(|c| matches!(c, CopyOutcome::Copied { .. })));
}

#[test]
fn test_bundle_unknown_dll_fails_with_not_found() {
    let temp = TempDir::new().unwrap();
    let exe = temp.path().join("app.exe");
    write_binary(&exe, &["libmystery.dll"]);
    let mut out = Vec::<u8>::new();

    let err = bundle(
        &exe,
        &BundleOptions::default(),
        &SearchPaths::new([temp.path()]),
        &Blacklist::default(),
        &SidecarImports,
        &mut out,
    )
    .unwrap_err();

    assert!(err.to_string().contains("libmystery.dll"));
    assert_ne!(err.exit_code(), 0);
    assert!(out.is_empty());
}

#[test]
fn test_custom_blacklist_suppresses_dll() {
    let temp = TempDir::new().unwrap();
    let exe = temp.path().join("app.exe");
    write_binary(&exe, &["VendorRuntime.dll"]);

    let report = bundle(
        &exe,
        &BundleOptions::default(),
        &SearchPaths::new([temp.path()]),
        &Blacklist::from_names(["vendorruntime.dll"]),
        &SidecarImports,
        &mut Vec::<u8>::new(),
    )
    .unwrap();

    assert!(report.dependencies.is_empty());
}

#[test]
fn test_objdump_nonexistent_binary() {
    let result = Objdump::default().dll_imports(Path::new("/nonexistent/path/to/app.exe"));
    let err = result.unwrap_err();
    assert!(matches!(err, BundleError::MissingFile(_)));
    assert!(
        err.to_string().contains("does not exist"),
        "Expected 'does not exist' in error message, got: {err}"
    );
}

#[test]
fn test_objdump_rejects_non_binary() {
    // Either objdump refuses the text file or is not installed; both must fail loudly
    let temp = TempDir::new().unwrap();
    let text = temp.path().join("notes.txt");
    fs::write(&text, "not a PE file\n").unwrap();

    let result = Objdump::default().dll_imports(&text);
    assert!(matches!(result, Err(BundleError::Introspection { .. })));
}
