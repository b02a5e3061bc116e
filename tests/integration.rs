use repotext::output::{BINARY_MARKER, SEPARATOR, render_document, write_document_to_file};
use repotext::tree::render_structure;
use repotext::{Config, RepotextBuilder, generate, repotext};
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn write(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn config(dir: &TempDir) -> Config {
    RepotextBuilder::new(dir.path()).build().unwrap()
}

#[test]
fn integration_full_flow() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/main.txt", "hello");
    write(dir.path(), "src/util/img.png", [0x89, b'P', b'N', b'G', 0, 0, 0, 0x0d]);
    write(dir.path(), "node_modules/pkg/index.txt", "module.exports = {}");
    let config = config(&dir);

    let document = generate(&config).unwrap();

    let expected = format!(
        "Repository Structure:\n\
         └── {root}\n    \
         └── src\n        \
         ├── main.txt\n        \
         └── util\n            \
         └── img.png\n\
         \n\
         Files Content:\n\
         {sep}\nFile: src/main.txt\n{sep}\nhello\n\n\
         {sep}\nFile: src/util/img.png\n{sep}\n{binary}\n\n",
        root = config.root_name(),
        sep = SEPARATOR,
        binary = BINARY_MARKER,
    );
    assert_eq!(document, expected);
    assert!(!document.contains("node_modules"));
}

#[test]
fn test_entries_sorted_by_codepoint_not_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.txt", "b");
    write(dir.path(), "a.txt", "a");
    fs::create_dir(dir.path().join("A")).unwrap();
    let config = config(&dir);

    let snapshot = repotext(&config).unwrap();
    let names: Vec<_> = snapshot
        .root
        .children()
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(names, ["A", "a.txt", "b.txt"]);

    let structure = render_structure(&snapshot.root);
    assert!(structure.ends_with("    ├── A\n    ├── a.txt\n    └── b.txt\n"));
}

#[test]
fn test_empty_directory_is_kept() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("empty/inner")).unwrap();
    write(dir.path(), "z.txt", "z");
    let config = config(&dir);

    let structure = render_structure(&repotext(&config).unwrap().root);
    assert!(structure.contains("    ├── empty\n    │   └── inner\n    └── z.txt\n"));
}

#[test]
fn test_pruned_directory_hides_all_descendants() {
    let dir = tempdir().unwrap();
    write(dir.path(), "generated/keep_me.txt", "should not appear");
    write(dir.path(), "generated/deep/also.txt", "nor this");
    write(dir.path(), "src/generated.txt", "a file, not the directory");
    let config = RepotextBuilder::new(dir.path())
        .add_ignore_pattern("generated/")
        .build()
        .unwrap();

    let document = generate(&config).unwrap();
    assert!(!document.contains("keep_me"));
    assert!(!document.contains("also.txt"));
    assert!(!document.contains("deep"));
    assert!(document.contains("File: src/generated.txt"));
}

#[test]
fn test_ignored_files_are_omitted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app.log", "log line");
    write(dir.path(), "cache.pyc", [0u8, 1, 2]);
    write(dir.path(), ".git/config", "[core]");
    write(dir.path(), "notes.md", "# notes");
    let snapshot = repotext(&config(&dir)).unwrap();

    let names: Vec<_> = snapshot
        .root
        .children()
        .iter()
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(names, ["notes.md"]);
}

#[test]
fn test_every_listed_file_has_one_block() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/one.txt", "1");
    write(dir.path(), "a/b/two.txt", "2");
    write(dir.path(), "a/b/c/three.bin", [0u8, 0, 0]);
    write(dir.path(), "four.txt", "4");
    fs::create_dir(dir.path().join("no_files")).unwrap();
    let snapshot = repotext(&config(&dir)).unwrap();

    let document = render_document(&snapshot);
    let blocks = document.matches("\nFile: ").count();
    assert_eq!(blocks, snapshot.root.files().len());
    assert_eq!(blocks, 4);
    assert!(!document.contains("File: no_files"));
    assert_eq!(document.matches(SEPARATOR).count(), 2 * blocks);
}

#[test]
fn test_output_is_deterministic() {
    let dir = tempdir().unwrap();
    for name in ["z.txt", "m/y.txt", "m/x.txt", "B/w.txt", "a.txt"] {
        write(dir.path(), name, name);
    }
    let config = config(&dir);
    assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
}

#[test]
fn test_size_limit_boundary() {
    let dir = tempdir().unwrap();
    write(dir.path(), "exact.txt", "A".repeat(100));
    write(dir.path(), "over.txt", "A".repeat(101));
    let config = RepotextBuilder::new(dir.path())
        .max_file_size(100)
        .build()
        .unwrap();

    let document = generate(&config).unwrap();
    assert!(document.contains(&format!("File: exact.txt\n{}\n{}\n\n", SEPARATOR, "A".repeat(100))));
    assert!(document.contains(&format!(
        "File: over.txt\n{}\n[File too large to include: exceeds 100 bytes]\n\n",
        SEPARATOR
    )));
}

#[test]
fn test_invalid_utf8_is_decoded_with_replacement() {
    let dir = tempdir().unwrap();
    write(dir.path(), "latin1.txt", b"caf\xe9\r\n");
    let document = generate(&config(&dir)).unwrap();
    assert!(document.contains("caf\u{FFFD}\r\n\n\n"));
}

#[test]
fn test_stats() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.txt", "abc");
    write(dir.path(), "src/b.bin", [0u8, 1]);
    write(dir.path(), "big.txt", "A".repeat(20));
    let config = RepotextBuilder::new(dir.path())
        .max_file_size(10)
        .build()
        .unwrap();

    let stats = repotext(&config).unwrap().stats();
    assert_eq!(stats.directories, 1);
    assert_eq!(stats.files, 3);
    assert_eq!(stats.total_bytes, 25);
    assert_eq!((stats.text, stats.binary, stats.oversized, stats.unreadable), (1, 1, 1, 0));
}

#[test]
fn test_write_document_to_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "alpha");
    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("doc.txt");

    let snapshot = repotext(&config(&dir)).unwrap();
    write_document_to_file(&snapshot, &out).unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), render_document(&snapshot));
    let leftovers: Vec<_> = fs::read_dir(out_dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_file_deleted_before_render_gets_marker() {
    let dir = tempdir().unwrap();
    write(dir.path(), "vanishing.txt", "now you see me");
    let snapshot = repotext(&config(&dir)).unwrap();
    fs::remove_file(dir.path().join("vanishing.txt")).unwrap();

    let document = render_document(&snapshot);
    assert!(document.contains("[Unreadable file: not found]"));
    assert!(!document.contains("now you see me"));
}

#[cfg(unix)]
mod links {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn test_symlink_to_file_is_followed() {
        let dir = tempdir().unwrap();
        write(dir.path(), "real.txt", "target content");
        symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

        let document = generate(&config(&dir)).unwrap();
        assert!(document.contains(&format!("File: link.txt\n{}\ntarget content\n\n", SEPARATOR)));
    }

    #[test]
    fn test_broken_symlink_is_unreadable() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "a");
        symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();

        let document = generate(&config(&dir)).unwrap();
        assert!(document.contains("    ├── a.txt\n    └── dangling\n"));
        assert!(document.contains(&format!(
            "File: dangling\n{}\n[Unreadable file: broken link]\n\n",
            SEPARATOR
        )));
    }

    #[test]
    fn test_symlink_loop_is_not_descended() {
        let dir = tempdir().unwrap();
        write(dir.path(), "sub/file.txt", "x");
        symlink(dir.path().join("sub"), dir.path().join("sub/again")).unwrap();

        let document = generate(&config(&dir)).unwrap();
        assert!(document.contains("[Unreadable file: link loop]"));
        assert_eq!(document.matches("File: sub/file.txt").count(), 1);
    }
}
