//! Repository URL normalization
//!
//! Every repository comparison in Freightyard goes through [`normalize_repo_url`],
//! so that `https://GitHub.com/org/repo.git`, `git@github.com:org/repo` and
//! `github.com/org/repo/` all identify the same repository.

use url::Url;

/// Normalize a git, image or chart repository URL for comparison.
///
/// The result has no scheme, no credentials, no default port, no trailing
/// slash and no `.git` suffix, and is lowercase. Normalizing an already
/// normalized URL returns it unchanged.
pub fn normalize_repo_url(repo_url: &str) -> String {
    let lowered = repo_url.trim().to_lowercase();
    if lowered.is_empty() {
        return lowered;
    }

    let location = match lowered.split_once("://") {
        Some((scheme, rest)) => match Url::parse(&lowered) {
            Ok(parsed) if parsed.host_str().is_some() => host_and_path(&parsed, scheme),
            _ => strip_userinfo(rest).to_string(),
        },
        None => scp_to_location(&lowered),
    };

    tidy(&location)
}

/// Returns true if two repository URLs identify the same repository
pub fn same_repo(a: &str, b: &str) -> bool {
    normalize_repo_url(a) == normalize_repo_url(b)
}

fn host_and_path(parsed: &Url, scheme: &str) -> String {
    let host = parsed.host_str().unwrap_or_default();
    let port = parsed
        .port()
        .filter(|port| Some(*port) != default_port(scheme));
    match port {
        Some(port) => format!("{}:{}{}", host, port, parsed.path()),
        None => format!("{}{}", host, parsed.path()),
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "https" | "oci" => Some(443),
        "http" => Some(80),
        "ssh" | "git+ssh" | "ssh+git" => Some(22),
        "git" => Some(9418),
        _ => None,
    }
}

/// Drop `user[:password]@` when it precedes the first path separator
fn strip_userinfo(location: &str) -> &str {
    let authority_end = location.find('/').unwrap_or(location.len());
    match location[..authority_end].rfind('@') {
        Some(at) => &location[at + 1..],
        None => location,
    }
}

/// Rewrite SCP-style `git@host:org/repo` into `host/org/repo`.
///
/// `host:5000/org/app` is a host with a port and is left alone, as is a
/// bracketed IPv6 host such as `[::1]:8443/org/repo`.
fn scp_to_location(location: &str) -> String {
    let location = strip_userinfo(location);
    if location.starts_with('[') {
        return location.to_string();
    }
    let authority_end = location.find('/').unwrap_or(location.len());
    let Some(colon) = location[..authority_end].find(':') else {
        return location.to_string();
    };

    let after = &location[colon + 1..];
    let segment = after.split('/').next().unwrap_or_default();
    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        return location.to_string();
    }
    format!("{}/{}", &location[..colon], after.trim_start_matches('/'))
}

fn tidy(location: &str) -> String {
    let mut out = String::with_capacity(location.len());
    for segment in location.split('/').filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    while let Some(stripped) = out.strip_suffix(".git") {
        out = stripped.trim_end_matches('/').to_string();
    }
    out
}
