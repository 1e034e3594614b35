//! Request path → file resolution for the static site

use std::path::{Path, PathBuf};

/// Entry document returned for every path that does not match a file
pub const INDEX_FILE: &str = "index.html";

/// Outcome of resolving a request path against the asset root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// An existing file under the root
    File(PathBuf),
    /// No matching file; serve the single-page entry document
    Index(PathBuf),
    /// The path tried to leave the root
    Rejected,
}

/// Resolve a URI path (query already stripped) to a file under `root`
pub fn resolve(root: &Path, request_path: &str) -> Resolved {
    let index = root.join(INDEX_FILE);
    let mut candidate = root.to_path_buf();

    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        if segment == ".." || segment.contains('\\') || segment.contains('\0') {
            return Resolved::Rejected;
        }
        if segment == "." {
            continue;
        }
        candidate.push(segment);
    }

    if candidate != root && candidate.is_file() {
        Resolved::File(candidate)
    } else {
        Resolved::Index(index)
    }
}

/// Content type derived from the file extension
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("folio-assets-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(root.join("assets")).unwrap();
        std::fs::write(root.join(INDEX_FILE), "<html></html>").unwrap();
        std::fs::write(root.join("assets").join("app.js"), "console.log(1)").unwrap();
        root
    }

    #[test]
    fn test_existing_file_resolves() {
        let root = site("existing");
        assert_eq!(
            resolve(&root, "/assets/app.js"),
            Resolved::File(root.join("assets").join("app.js"))
        );
    }

    #[test]
    fn test_unmatched_paths_fall_back_to_index() {
        let root = site("fallback");
        let index = Resolved::Index(root.join(INDEX_FILE));
        assert_eq!(resolve(&root, "/"), index);
        assert_eq!(resolve(&root, "/projects/42"), index);
        // A directory is not a file
        assert_eq!(resolve(&root, "/assets"), index);
    }

    #[test]
    fn test_traversal_is_rejected() {
        let root = site("traversal");
        assert_eq!(resolve(&root, "/../etc/passwd"), Resolved::Rejected);
        assert_eq!(resolve(&root, "/assets/../../secret"), Resolved::Rejected);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("a/b.WOFF2")), "font/woff2");
        assert_eq!(content_type(Path::new("cv.pdf")), "application/pdf");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
