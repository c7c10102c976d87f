use hoor::pipeline::classify;
use hoor::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

#[test]
fn test_supported_extensions() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("a.md"), "").unwrap();
    fs::write(root.join("b.markdown"), "").unwrap();
    fs::write(root.join("c.txt"), "").unwrap();
    fs::write(root.join("d.HTML"), "").unwrap();
    fs::create_dir(root.join("subdir")).unwrap();
    fs::write(root.join("subdir/e.adoc"), "").unwrap();
    fs::write(root.join("subdir/f.jpg"), "").unwrap();

    let supported: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let extension = e.path().extension()?.to_str()?.to_string();
            PageHandler::for_extension(&extension)
        })
        .collect();

    assert_eq!(supported.len(), 4);
}

#[test]
fn test_classify_through_fs_site() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("notes")).unwrap();
    fs::write(root.join("post.md"), "---\ndate: 2021-03-21\n---\n").unwrap();
    fs::write(root.join("notes/plan.org"), "#+TITLE: plan\n").unwrap();
    fs::write(root.join("notes/draft.md"), "---\ndate: [\n---\n").unwrap();
    fs::write(root.join("style.css"), "body {}").unwrap();

    let site = FsSite::new(root);
    let files = site.files().unwrap();
    assert_eq!(files.len(), 4);

    let mut pages = Vec::new();
    let mut unsupported = 0;
    let mut unreadable = 0;
    for file in &files {
        match classify(&site, file) {
            Ok(Some(page)) => pages.push(page),
            Ok(None) => unsupported += 1,
            Err(_) => unreadable += 1,
        }
    }

    assert_eq!(unsupported, 1);
    assert_eq!(unreadable, 1);
    assert_eq!(
        pages,
        vec![
            Page::new("notes/plan.org", PageKind::Org),
            Page::new("post.md", PageKind::Markdown),
        ]
    );

    let resolved = site.resolve(root, Path::new("notes/plan.org")).unwrap();
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("notes/plan.org"));
}
