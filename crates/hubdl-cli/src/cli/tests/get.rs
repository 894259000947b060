//! Tests for `get` and the runtime-mode flags.

use super::parse;
use crate::cli::{mode_override, Cli, CliCommand};
use clap::Parser;
use hubdl_core::config::RuntimeMode;
use std::path::PathBuf;

#[test]
fn cli_parse_get_minimal() {
    match parse(&["hubdl", "get", "https://cdn.example.com/a.pdf"]) {
        CliCommand::Get {
            url,
            title,
            file_type,
            dev,
            prod,
            download_dir,
        } => {
            assert_eq!(url, "https://cdn.example.com/a.pdf");
            assert!(title.is_none());
            assert!(file_type.is_none());
            assert!(!dev && !prod);
            assert!(download_dir.is_none());
        }
        _ => panic!("expected Get"),
    }
}

#[test]
fn cli_parse_get_with_options() {
    match parse(&[
        "hubdl",
        "get",
        "https://cdn.example.com/raw/abc",
        "--title",
        "Unit 1 Notes",
        "--type",
        "docx",
        "--dev",
        "--download-dir",
        "/tmp/notes",
    ]) {
        CliCommand::Get {
            title,
            file_type,
            dev,
            prod,
            download_dir,
            ..
        } => {
            assert_eq!(title.as_deref(), Some("Unit 1 Notes"));
            assert_eq!(file_type.as_deref(), Some("docx"));
            assert!(dev);
            assert!(!prod);
            assert_eq!(download_dir, Some(PathBuf::from("/tmp/notes")));
        }
        _ => panic!("expected Get"),
    }
}

#[test]
fn cli_get_dev_and_prod_conflict() {
    assert!(Cli::try_parse_from(["hubdl", "get", "https://x/a.pdf", "--dev", "--prod"]).is_err());
}

#[test]
fn cli_get_requires_url() {
    assert!(Cli::try_parse_from(["hubdl", "get"]).is_err());
}

#[test]
fn mode_flags_override_config() {
    assert_eq!(mode_override(true, false), Some(RuntimeMode::Dev));
    assert_eq!(mode_override(false, true), Some(RuntimeMode::Prod));
    assert_eq!(mode_override(false, false), None);
}
