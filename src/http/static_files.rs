//! Static file service.
//!
//! Path resolution, MIME types, conditional and range requests, and index files
//! all come from `tower_http::services::ServeDir`. Requests escaping the root
//! with `..` and missing files are answered with 404, non GET/HEAD methods with 405.

use tower_http::services::ServeDir;

use crate::config::FilesConfig;

/// Build the service serving `files.root`.
pub fn serve_dir(files: &FilesConfig) -> ServeDir {
    ServeDir::new(&files.root).append_index_html_on_directories(files.index_html)
}
