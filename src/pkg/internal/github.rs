use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref REPO_RE: Regex =
        Regex::new(r"github\.com/([\w.-]+/[\w.-]+)").expect("invalid repo regex");
}

/// Well-known entry points worth showing to the project evaluator. Paths that
/// do not exist in a given repository are skipped.
const KEY_FILES: &[&str] = &[
    "README.md",
    "package.json",
    "Cargo.toml",
    "index.js",
    "server.js",
    "src/main.rs",
    "src/index.js",
];

/// Extracts `owner/repo` from the first GitHub URL in the text, if any.
pub fn find_repo_path(text: &str) -> Option<String> {
    REPO_RE
        .captures(text)
        .map(|caps| caps[1].trim_end_matches(".git").to_string())
}

/// Best-effort fetch of a few key files from a public repository, used only
/// as extra evidence for project evaluation. 404s are skipped silently, other
/// failures are logged; the caller treats an empty result as "code
/// unavailable" rather than an error.
pub async fn fetch_key_files(client: &reqwest::Client, repo_path: &str) -> String {
    let mut combined = String::new();
    for file_path in KEY_FILES {
        let api_url = format!(
            "https://api.github.com/repos/{}/contents/{}",
            repo_path, file_path
        );
        let response = client
            .get(&api_url)
            .header("Accept", "application/vnd.github.v3.raw")
            .header("User-Agent", "cveval")
            .send()
            .await;
        match response {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => {
                    combined.push_str(&format!("// FILE: {}\n{}\n\n---\n\n", file_path, body));
                }
                Err(e) => {
                    tracing::warn!("could not read {} from {}: {}", file_path, repo_path, e);
                }
            },
            Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => {}
            Ok(resp) => {
                tracing::warn!(
                    "could not fetch {} from {}: status {}",
                    file_path,
                    repo_path,
                    resp.status()
                );
            }
            Err(e) => {
                tracing::warn!("could not fetch {} from {}: {}", file_path, repo_path, e);
            }
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::find_repo_path;

    #[test]
    fn test_extracts_repo_path_from_report_text() {
        let report = "Source lives at https://github.com/acme/eval-service and runs on k8s.";
        assert_eq!(find_repo_path(report).as_deref(), Some("acme/eval-service"));
    }

    #[test]
    fn test_strips_git_suffix() {
        assert_eq!(
            find_repo_path("clone github.com/acme/thing.git please").as_deref(),
            Some("acme/thing")
        );
    }

    #[test]
    fn test_no_url_yields_none() {
        assert_eq!(find_repo_path("no repository was linked"), None);
    }
}
