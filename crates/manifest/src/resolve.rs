//! Manifest URL to logical archive path.
//!
//! Rules are tried in order and the first one that applies wins. Host
//! comparisons use the lowercased first path segment; the rewrites themselves
//! operate on the URL as written.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use homecache_storage::validate_path;
use std::path::PathBuf;

/// Regional publisher tokens and their canonical host names. Also used to
/// rename legacy top-level archive folders.
pub const REGION_HOSTS: [(&str, &str); 4] = [
    ("scee", "scee-home.playstation.net"),
    ("scea", "scea-home.playstation.net"),
    ("scej", "scej-home.playstation.net"),
    ("sceasia", "sceasia-home.playstation.net"),
];

const IMAGE_HOSTS: [&str; 5] = [
    "images-us-az.crackle.com",
    "images.crackle.com",
    "images2.crackle.com",
    "images3.crackle.com",
    "dl.dropbox.com",
];

const SECURE_HOST: &str = "secure.cprod.homeps3.online.scee.com";

/// `(prefix, suffix, folder)`: a first segment starting with `prefix` and
/// ending with `suffix` is filed under `folder`.
const BUCKETS: [(&str, &str, &str); 7] = [
    ("avatar-", ".jpg", "img-profile-avatars"),
    ("vers_", ".xml", "xml-scene-versions"),
    ("npwr00432", ".xml", "xml-clubhouses"),
    ("profanity", ".bin", "bin-profanityfilters"),
    ("profile-", "", "xml-profile"),
    ("npia00005-", "", "xml-clubhouses"),
    ("inventory-", ".xml", "xml-inventory"),
];

/// A manifest URL together with the logical path it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub url: String,
    /// Archive-relative, no leading or trailing slash.
    pub logical: String,
}
impl Resolved {
    /// Appends a sniffed extension (with its dot) to both the URL and the
    /// logical path, unless the URL already ends with it. Returns whether
    /// anything changed.
    pub fn append_extension(&mut self, extension: &str) -> bool {
        if self.url.ends_with(extension) {
            return false;
        }
        self.url.push_str(extension);
        self.logical.push_str(extension);
        true
    }

    /// The logical path as a validated relative path.
    pub fn path(&self) -> Result<PathBuf> {
        validate_path(&self.logical).or_raise(|| ErrorKind::InvalidPath(self.logical.clone()))
    }

    /// Lowercase extension of the logical path, without the dot.
    pub fn extension(&self) -> String {
        let name = self.logical.rsplit('/').next().unwrap_or_default();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
            _ => String::new(),
        }
    }
}

/// Resolves a manifest URL into its logical archive path.
pub fn resolve(url: &str) -> Resolved {
    let rewritten = rewrite(url);
    if rewritten != url {
        tracing::trace!(url, rewritten, "Rewrote manifest URL");
    }
    let logical = rewritten.trim_matches('/').to_string();
    Resolved { url: rewritten, logical }
}

fn rewrite(url: &str) -> String {
    let host = url.split('/').next().unwrap_or_default().to_lowercase();

    if IMAGE_HOSTS.contains(&host.as_str()) {
        return rewrite_image_host(url);
    }
    if let Some(rewritten) = rewrite_secure_root(url) {
        return rewritten;
    }
    if let Some((token, canonical)) = REGION_HOSTS.iter().find(|(token, _)| *token == host) {
        return url.replacen(&format!("{token}/"), &format!("{canonical}/"), 1);
    }
    if let Some((_, _, folder)) =
        BUCKETS.iter().find(|(prefix, suffix, _)| host.starts_with(prefix) && host.ends_with(suffix))
    {
        return format!("{folder}/{url}");
    }
    if host == "data" {
        return format!("tss-data/{url}");
    }
    if is_flickr_farm(&host) {
        let corrected = host.replace("staticflickr.com", "static.flickr.com");
        return url.replacen(&host, &corrected, 1);
    }
    url.to_string()
}

/// Cached thumbnails sometimes carry a cache-busting query glued onto the
/// extension (`foo.jpgts=123`).
fn rewrite_image_host(url: &str) -> String {
    let extension = url.rsplit('/').next().and_then(|name| name.rsplit_once('.')).map(|(_, ext)| ext.to_lowercase());
    if matches!(extension.as_deref(), Some("jpg" | "png")) {
        return url.to_string();
    }
    let lower = url.to_lowercase();
    let cut = || url.split('=').next().unwrap_or_default();
    if lower.contains(".jpgts=") {
        cut().replace(".jpgts", ".jpg")
    } else if lower.contains(".jpgdl=") {
        cut().replace(".jpgdl", ".jpg")
    } else {
        url.to_string()
    }
}

fn rewrite_secure_root(url: &str) -> Option<String> {
    for (legacy, folder) in [("secureobjectroot/", "objects/"), ("securesceneroot/", "scenes/")] {
        let web = format!("web/{legacy}");
        if url.starts_with(&web) || url.starts_with(legacy) {
            let canonical = format!("{SECURE_HOST}/{folder}");
            return Some(url.replace(&web, &canonical).replace(legacy, &canonical));
        }
    }
    None
}

fn is_flickr_farm(host: &str) -> bool {
    host.strip_prefix("farm")
        .and_then(|rest| rest.strip_suffix(".staticflickr.com"))
        .is_some_and(|n| matches!(n, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9"))
}
