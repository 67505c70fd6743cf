// tests/no_direct_http.rs
// Fails if HTTP client calls appear outside the REST boundary.
// Allowed: src/api/client.rs, which implements ApiBackend.

use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.is_dir() {
                collect_rs_files(&p, files);
            } else if p.extension().is_some_and(|s| s == "rs") {
                files.push(p);
            }
        }
    }
}

fn is_whitelisted(path: &Path) -> bool {
    let p = path.to_string_lossy();
    p.contains("/api/client.rs") || p.contains("\\api\\client.rs")
}

#[test]
fn no_direct_http_outside_api_client() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let src_dir = Path::new(manifest_dir).join("src");

    let mut files = Vec::new();
    collect_rs_files(&src_dir, &mut files);
    assert!(!files.is_empty(), "no sources found under {:?}", src_dir);

    let bad_patterns = ["reqwest::", "use reqwest", "ureq::", "hyper::"];

    let mut offenders: Vec<(String, String)> = Vec::new();

    for file in files {
        if is_whitelisted(&file) {
            continue;
        }
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for pat in &bad_patterns {
            if content.contains(pat) {
                offenders.push((file.to_string_lossy().to_string(), pat.to_string()));
            }
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::from("HTTP client calls found outside the REST boundary:\n");
        for (file, pat) in offenders {
            msg.push_str(&format!("  {} contains pattern '{}': go through ApiBackend instead\n", file, pat));
        }
        panic!("{}", msg);
    }
}
