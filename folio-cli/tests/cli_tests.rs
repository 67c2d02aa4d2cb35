//! Integration tests for the Folio CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn folio() -> Command {
    Command::cargo_bin("folio").unwrap()
}

/// `folio` with its cache and downloads kept inside `dir`
fn folio_in(dir: &TempDir) -> Command {
    let mut cmd = folio();
    cmd.env("FOLIO_DATA_DIR", dir.path().join("data"));
    cmd.env_remove("FOLIO_DEVANAGARI_FONT");
    cmd
}

/// Create a book file with `folio new`
fn create_book(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    folio_in(dir)
        .args(["new", path.to_str().unwrap(), "--title", "CLI Book", "--author", "Tester"])
        .assert()
        .success();
    path
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help() {
    folio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("save"))
        .stdout(predicate::str::contains("recover"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_version() {
    folio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));
}

#[test]
fn test_export_help() {
    folio()
        .args(["export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_new_creates_introduction_book() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "intro.book");

    let json = read_json(&path);
    assert_eq!(json["title"], "CLI Book");
    assert_eq!(json["author"], "Tester");
    assert_eq!(json["pages"][0]["title"], "Introduction");
    assert_eq!(json["pages"][0]["pageNumber"], 1);
}

#[test]
fn test_new_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "twice.book");
    folio_in(&dir)
        .args(["new", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_info_json() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "info.book");

    let output = folio_in(&dir)
        .args(["info", path.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "CLI Book");
    assert_eq!(json["pages"], 1);
    assert_eq!(json["chapters"], 0);
    assert!(json["words"].as_u64().unwrap() > 0);
    assert_eq!(json["page_size"], "A4");
}

#[test]
fn test_validate_accepts_minimal_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("minimal.book");
    fs::write(&path, r#"{"pages": [{"title": "Only", "content": "<p>x</p>"}]}"#).unwrap();

    folio_in(&dir)
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid book file"))
        .stdout(predicate::str::contains("Title: My Book"));
}

#[test]
fn test_validate_rejects_missing_pages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.book");
    fs::write(&path, r#"{"title": "No pages here"}"#).unwrap();

    folio_in(&dir)
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing `pages` array"));
}

#[test]
fn test_validate_missing_file() {
    folio()
        .args(["validate", "/nonexistent/book.book"])
        .assert()
        .failure();
}

#[test]
fn test_edit_add_chapter_and_page() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "edit.book");
    let p = path.to_str().unwrap();

    folio_in(&dir)
        .args(["edit", p, "add-chapter", "--title", "Part One"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter title updated"));
    folio_in(&dir)
        .args(["edit", p, "add-page", "--chapter", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New page added"));

    let json = read_json(&path);
    assert_eq!(json["chapters"][0]["title"], "Part One");
    assert_eq!(json["pages"][1]["title"], "Page 2");
    assert_eq!(json["pages"][1]["chapterId"], json["chapters"][0]["id"]);
    assert_eq!(json["chapters"][0]["pageIds"][0], json["pages"][1]["id"]);
}

#[test]
fn test_edit_move_and_delete() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "move.book");
    let p = path.to_str().unwrap();

    folio_in(&dir).args(["edit", p, "add-page"]).assert().success();
    folio_in(&dir).args(["edit", p, "add-page"]).assert().success();
    folio_in(&dir)
        .args(["edit", p, "move-page", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page order updated"));

    let json = read_json(&path);
    let titles: Vec<&str> = json["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Page 2", "Page 3", "Introduction"]);
    assert_eq!(json["pages"][2]["pageNumber"], 3);

    folio_in(&dir)
        .args(["edit", p, "--yes", "delete-page", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page deleted"));
    assert_eq!(read_json(&path)["pages"].as_array().unwrap().len(), 2);
}

#[test]
fn test_edit_delete_declined() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "declined.book");

    folio_in(&dir)
        .args(["edit", path.to_str().unwrap(), "delete-page", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes made"));
    assert_eq!(read_json(&path)["pages"].as_array().unwrap().len(), 1);
}

#[test]
fn test_edit_page_out_of_range() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "range.book");

    folio_in(&dir)
        .args(["edit", path.to_str().unwrap(), "rename-page", "5", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page 5 does not exist"));
}

#[test]
fn test_export_all_formats() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "export.book");
    let out = dir.path().join("out");

    folio_in(&dir)
        .args([
            "export",
            path.to_str().unwrap(),
            "--format",
            "all",
            "--output-dir",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDF successfully exported!"))
        .stdout(predicate::str::contains("DOCX successfully exported!"))
        .stdout(predicate::str::contains("EPUB successfully exported!"))
        .stdout(predicate::str::contains("HTML successfully exported!"));

    let mut extensions: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| {
            e.unwrap()
                .path()
                .extension()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    extensions.sort();
    assert_eq!(extensions, vec!["docx", "epub", "html", "typ"]);
}

#[test]
fn test_export_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "unknown.book");

    folio_in(&dir)
        .args(["export", path.to_str().unwrap(), "--format", "rtf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exporter available for rtf format"));
}

#[test]
fn test_save_and_recover() {
    let dir = TempDir::new().unwrap();
    let path = create_book(&dir, "draft.book");
    let data = dir.path().join("data");

    folio_in(&dir)
        .args(["edit", path.to_str().unwrap(), "add-page"])
        .assert()
        .success();

    let restored = dir.path().join("restored.book");
    folio_in(&dir)
        .args(["recover", restored.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-saved draft restored"));
    assert_eq!(read_json(&restored)["pages"].as_array().unwrap().len(), 2);

    folio_in(&dir)
        .args(["save", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book saved to local storage and downloaded"));
    assert!(data.join("downloads").join("CLI_Book.book").is_file());
    assert!(data.join("cache").join("folio_projects").is_file());
    assert!(!data.join("cache").join("folio_autosave_draft").exists());
    assert!(read_json(&path)["savedAt"].is_string());

    folio_in(&dir)
        .args(["recover", restored.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    folio_in(&dir)
        .args(["recover", restored.to_str().unwrap(), "--force", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last saved book loaded"));
    assert_eq!(read_json(&restored)["title"], "CLI Book");

    folio_in(&dir)
        .args(["recover", restored.to_str().unwrap(), "--force"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("New book created"));
    assert_eq!(read_json(&restored)["title"], "My Book");
}

#[test]
fn test_export_ships_devanagari_font() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hindi.book");
    fs::write(
        &path,
        r#"{"title": "Kavita", "pages": [{"title": "Hindi", "content": "<p>नमस्ते दुनिया</p>"}]}"#,
    )
    .unwrap();
    let font = dir.path().join("NotoSansDevanagari-Regular.ttf");
    fs::write(&font, [0x00u8, 0x01, 0x00, 0x00, 0x00, 0x10]).unwrap();
    let out = dir.path().join("out");

    folio_in(&dir)
        .env("FOLIO_DEVANAGARI_FONT", &font)
        .args([
            "export",
            path.to_str().unwrap(),
            "--output-dir",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PDF successfully exported!"))
        .stdout(predicate::str::contains("NotoSansDevanagari.ttf"));

    assert_eq!(
        fs::read(out.join("fonts").join("NotoSansDevanagari.ttf")).unwrap(),
        vec![0x00, 0x01, 0x00, 0x00, 0x00, 0x10]
    );
}
