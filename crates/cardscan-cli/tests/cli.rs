//! End-to-end CLI tests over fixture PDFs.

use std::path::Path;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;

/// Write a single-page PDF with the given text lines.
fn write_text_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut operations = vec![Operation::new("BT", vec![])];
    let mut y = 720;
    for line in lines {
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), 72.into(), y.into()],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        y -= 24;
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Write a single-page PDF whose only content is a raw DeviceRGB image.
fn write_scan_pdf(path: &Path, width: u32, height: u32) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let pixels = vec![200u8; (width * height * 3) as usize];
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        pixels,
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as i64).into(),
                    0.into(),
                    0.into(),
                    (height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Write a config file pointing every path into `root`.
fn write_config(root: &Path) -> std::path::PathBuf {
    let config = serde_json::json!({
        "paths": {
            "source_dir": root.join("source"),
            "scratch_dir": root.join("scratch"),
            "output_dir": root.join("processed"),
        },
        "ocr": {
            "model_dir": root.join("models"),
        }
    });

    let path = root.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn test_batch_copies_matches_and_skips_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    std::fs::create_dir_all(&source).unwrap();

    write_text_pdf(
        &source.join("card-a.pdf"),
        &["Offering Record", "Smith, Mrs. Jane Doe"],
    );
    write_text_pdf(&source.join("card-b.pdf"), &["no names on this card"]);
    write_scan_pdf(&source.join("card-c.PDF"), 120, 90);

    let config_path = write_config(dir.path());

    Command::cargo_bin("cardscan")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "batch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Smith, Mrs. Jane Doe"))
        .stdout(predicate::str::contains("1 renamed, 2 skipped"));

    let output = dir.path().join("processed");
    let copies: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(copies, vec!["Smith, Mrs. Jane Doe.pdf".to_string()]);

    // Scratch artifacts are deleted as each document completes
    let scratch = dir.path().join("scratch");
    if scratch.exists() {
        assert_eq!(std::fs::read_dir(&scratch).unwrap().count(), 0);
    }
}

#[test]
fn test_batch_fails_on_empty_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = dir.path().join("*.pdf");

    Command::cargo_bin("cardscan")
        .unwrap()
        .args(["batch", pattern.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No PDF files found"));
}

#[test]
fn test_process_prints_extracted_name() {
    let dir = tempfile::tempdir().unwrap();
    let card = dir.path().join("card.pdf");
    write_text_pdf(&card, &["Jones, Miss Anne Carter"]);

    let config_path = write_config(dir.path());

    Command::cargo_bin("cardscan")
        .unwrap()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "process",
            card.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jones, Miss Anne Carter"));
}

#[test]
fn test_process_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let card = dir.path().join("blank.pdf");
    write_scan_pdf(&card, 100, 80);

    let config_path = write_config(dir.path());

    Command::cargo_bin("cardscan")
        .unwrap()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "process",
            card.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("no name found"));
}
