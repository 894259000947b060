//! `hubdl resolve` – print the filename a download would use.

use hubdl_core::filename::{resolve_filename, FilenameRequest};

pub fn run_resolve(url: &str, title: Option<&str>, file_type: Option<&str>) {
    let resolved = resolve_filename(&FilenameRequest::new(url).title(title).file_type(file_type));
    println!("{}", resolved.full);
}
