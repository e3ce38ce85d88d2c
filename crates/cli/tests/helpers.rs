use std::fs;

use linkorder::{collect_library_files, format_filename, NameStyle};
use tempfile::tempdir;

#[test]
fn collect_library_files_recurses_and_sorts_directories() {
    let tmp = tempdir().expect("tempdir");
    let nested = tmp.path().join("nested");
    fs::create_dir_all(&nested).expect("create nested");

    fs::write(tmp.path().join("libz.a"), b"").expect("write");
    fs::write(tmp.path().join("liba.so"), b"").expect("write");
    fs::write(tmp.path().join("README.md"), b"").expect("write");
    fs::write(nested.join("libdeep.a"), b"").expect("write");

    let files = collect_library_files(&[tmp.path().to_path_buf()]).expect("collect");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().expect("name").to_string_lossy().into_owned())
        .collect();

    // Sorted per directory, recursing into subdirectories in order; the
    // markdown file is not a library and is skipped.
    assert_eq!(names, vec!["liba.so", "libz.a", "libdeep.a"]);
}

#[test]
fn collect_library_files_passes_explicit_files_through() {
    let tmp = tempdir().expect("tempdir");
    let odd = tmp.path().join("weird_extension.bin");
    fs::write(&odd, b"").expect("write");

    // Explicit files are not extension-filtered; the extractor decides by
    // magic signature later.
    let files = collect_library_files(&[odd.clone()]).expect("collect");
    assert_eq!(files, vec![odd]);
}

#[test]
fn format_filename_styles() {
    assert_eq!(format_filename("libfoo.a", NameStyle::Short, ""), "foo");
    assert_eq!(format_filename("libfoo.a", NameStyle::Full, ""), "libfoo.a");
    assert_eq!(format_filename("libfoo.a", NameStyle::Short, "\""), "\"foo\"");
}
