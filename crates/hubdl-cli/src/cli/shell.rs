//! Native stand-in for the browser: downloads land in a directory.
//!
//! `blob:` URLs are read from an [`ObjectUrlRegistry`]; other URLs (the
//! proxy route) are fetched, resolved against the proxy origin when relative.
//! Unlike a browser, a failing proxy fetch is reported synchronously, so the
//! dispatcher falls through to the blob strategy.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hubdl_core::dispatch::{BrowserShell, Notice, NoticeLevel, ObjectUrlRegistry, ShellError};
use hubdl_core::fetch::Fetcher;
use hubdl_core::filename::{parse_content_disposition_filename, sanitize_filename};

pub struct DiskShell {
    download_dir: PathBuf,
    proxy_origin: String,
    fetcher: Arc<dyn Fetcher>,
    objects: ObjectUrlRegistry,
    saved: Mutex<Vec<PathBuf>>,
}

impl DiskShell {
    pub fn new(download_dir: impl Into<PathBuf>, proxy_origin: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            download_dir: download_dir.into(),
            proxy_origin: proxy_origin.into(),
            fetcher,
            objects: ObjectUrlRegistry::new(),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// Files written so far, in order.
    pub fn saved(&self) -> Vec<PathBuf> {
        self.saved
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with('/') {
            format!("{}{}", self.proxy_origin.trim_end_matches('/'), url)
        } else {
            url.to_string()
        }
    }

    fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ShellError> {
        let path = self.download_dir.join(filename);
        fs::write(&path, bytes)
            .map_err(|e| ShellError::Trigger(format!("write {}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved download");
        match self.saved.lock() {
            Ok(mut saved) => saved.push(path),
            Err(poisoned) => poisoned.into_inner().push(path),
        }
        Ok(())
    }
}

/// Name to save under: a usable sanitized `preferred`, else `fallback`.
fn local_name(preferred: Option<String>, fallback: &str) -> String {
    preferred
        .map(|n| sanitize_filename(&n))
        .filter(|n| is_plain_file_name(n))
        .unwrap_or_else(|| fallback.to_string())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && Path::new(name).file_name().is_some()
}

impl BrowserShell for DiskShell {
    fn trigger_browser_download(&self, url: &str, filename: &str) -> Result<(), ShellError> {
        if !is_plain_file_name(filename) {
            return Err(ShellError::Trigger(format!("unusable filename {:?}", filename)));
        }

        if ObjectUrlRegistry::is_object_url(url) {
            let bytes = self
                .objects
                .get(url)
                .ok_or_else(|| ShellError::UnknownObjectUrl(url.to_string()))?;
            return self.save(filename, &bytes);
        }

        let absolute = self.absolute(url);
        let response = self
            .fetcher
            .fetch(&absolute)
            .map_err(|e| ShellError::Trigger(format!("GET {}: {}", absolute, e)))?;
        if !response.is_success() {
            return Err(ShellError::Trigger(format!("GET {}: HTTP {}", absolute, response.status)));
        }

        let served_name = response
            .headers
            .get("content-disposition")
            .and_then(parse_content_disposition_filename);
        self.save(&local_name(served_name, filename), &response.body)
    }

    fn open_in_new_tab(&self, url: &str) {
        tracing::info!(%url, "handing download to the user");
        println!("Could not save the file automatically. Open it in a browser:\n  {}", url);
    }

    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("{}: {}", notice.title, notice.message),
            NoticeLevel::Info => tracing::info!("{}: {}", notice.title, notice.message),
        }
        eprintln!("{}: {}", notice.title, notice.message);
    }

    fn create_object_url(&self, body: Vec<u8>) -> Result<String, ShellError> {
        Ok(self.objects.create(body))
    }

    fn revoke_object_url(&self, object_url: &str) -> Result<(), ShellError> {
        self.objects.revoke(object_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubdl_core::fetch::{FetchError, FetchedResponse, ResponseHeaders};

    struct Served(u32, Vec<(&'static str, &'static str)>, &'static [u8]);

    impl Fetcher for Served {
        fn fetch(&self, _url: &str) -> Result<FetchedResponse, FetchError> {
            Ok(FetchedResponse {
                status: self.0,
                headers: ResponseHeaders::from_pairs(self.1.clone()),
                body: self.2.to_vec(),
            })
        }
    }

    #[test]
    fn saves_object_url_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let shell = DiskShell::new(dir.path(), "http://127.0.0.1:1", Arc::new(Served(500, vec![], b"")));

        let url = shell.create_object_url(b"%PDF-1.4".to_vec()).unwrap();
        shell.trigger_browser_download(&url, "Notes.pdf").unwrap();
        shell.revoke_object_url(&url).unwrap();

        assert_eq!(fs::read(dir.path().join("Notes.pdf")).unwrap(), b"%PDF-1.4");
        assert_eq!(shell.objects.live_count(), 0);
        assert_eq!(shell.saved(), vec![dir.path().join("Notes.pdf")]);
    }

    #[test]
    fn proxy_download_prefers_served_name() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Served(
            200,
            vec![("Content-Disposition", "attachment; filename=\"Unit_1.docx\"")],
            b"PK",
        );
        let shell = DiskShell::new(dir.path(), "http://127.0.0.1:8787/", Arc::new(fetcher));

        shell
            .trigger_browser_download("/api/download?url=x&name=a.pdf", "a.pdf")
            .unwrap();

        assert_eq!(fs::read(dir.path().join("Unit_1.docx")).unwrap(), b"PK");
    }

    #[test]
    fn proxy_error_status_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let shell = DiskShell::new(dir.path(), "http://127.0.0.1:8787", Arc::new(Served(502, vec![], b"")));

        let err = shell.trigger_browser_download("/api/download?url=x", "a.pdf").unwrap_err();

        assert!(matches!(err, ShellError::Trigger(msg) if msg.contains("HTTP 502")));
        assert!(shell.saved().is_empty());
    }

    #[test]
    fn unusable_names_fall_back() {
        assert_eq!(local_name(Some("..".to_string()), "a.pdf"), "a.pdf");
        assert_eq!(local_name(Some("My Notes.pdf".to_string()), "a.pdf"), "My_Notes.pdf");
        assert_eq!(local_name(None, "a.pdf"), "a.pdf");
    }

    /// Proxy origin unreachable; the source itself serves the file.
    struct NoProxy;

    impl Fetcher for NoProxy {
        fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
            if url.starts_with("http://127.0.0.1:8787") {
                return Err(FetchError::Task("connection refused".to_string()));
            }
            Ok(FetchedResponse {
                status: 200,
                headers: ResponseHeaders::new(),
                body: b"%PDF-1.7".to_vec(),
            })
        }
    }

    #[test]
    fn prod_dispatch_falls_back_to_blob_when_proxy_is_down() {
        use hubdl_core::config::RuntimeMode;
        use hubdl_core::dispatch::{Delivery, DispatchConfig, Dispatcher, DownloadRequest, Strategy};

        let dir = tempfile::tempdir().unwrap();
        let fetcher: Arc<dyn Fetcher> = Arc::new(NoProxy);
        let shell = DiskShell::new(dir.path(), "http://127.0.0.1:8787", fetcher.clone());
        let config = DispatchConfig {
            mode: RuntimeMode::Prod,
            proxy_route: "/api/download".to_string(),
        };
        let dispatcher = Dispatcher::new(config, shell, fetcher);

        let request = DownloadRequest::new("https://cdn.example.com/raw/abc").with_title("Pharmacology Notes");
        let outcome = dispatcher.dispatch(&request);

        assert_eq!(outcome.delivery, Delivery::Blob);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, Strategy::Proxy);
        assert_eq!(
            fs::read(dir.path().join("Pharmacology_Notes.pdf")).unwrap(),
            b"%PDF-1.7"
        );
        assert_eq!(dispatcher.shell().objects.live_count(), 0);
    }
}
