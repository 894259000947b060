//! Tests for serve, resolve and materials.

use super::parse;
use crate::cli::CliCommand;

#[test]
fn cli_parse_serve() {
    match parse(&["hubdl", "serve"]) {
        CliCommand::Serve { bind } => assert!(bind.is_none()),
        _ => panic!("expected Serve"),
    }
    match parse(&["hubdl", "serve", "--bind", "0.0.0.0:9000"]) {
        CliCommand::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:9000")),
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_resolve() {
    match parse(&["hubdl", "resolve", "https://x/file", "--type", "pptx"]) {
        CliCommand::Resolve { url, title, file_type } => {
            assert_eq!(url, "https://x/file");
            assert!(title.is_none());
            assert_eq!(file_type.as_deref(), Some("pptx"));
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_materials() {
    match parse(&["hubdl", "materials"]) {
        CliCommand::Materials {
            subject,
            material_type,
            download,
            download_dir,
        } => {
            assert!(subject.is_none());
            assert!(material_type.is_none());
            assert!(download.is_none());
            assert!(download_dir.is_none());
        }
        _ => panic!("expected Materials"),
    }
}

#[test]
fn cli_parse_materials_download() {
    match parse(&[
        "hubdl",
        "materials",
        "--subject",
        "bn101-anatomy",
        "--type",
        "pyq",
        "--download",
        "7",
    ]) {
        CliCommand::Materials {
            subject,
            material_type,
            download,
            ..
        } => {
            assert_eq!(subject.as_deref(), Some("bn101-anatomy"));
            assert_eq!(material_type.as_deref(), Some("pyq"));
            assert_eq!(download, Some(7));
        }
        _ => panic!("expected Materials"),
    }
}
