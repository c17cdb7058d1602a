use sha2::{Digest, Sha256};

/// Local filename for a downloaded artifact.
///
/// Prefers the server-reported filename, then the last segment of the
/// download path; falls back to `capture--{short_hash(path)}` when neither
/// yields a usable name.
pub fn artifact_filename(preferred: Option<&str>, download_path: &str) -> String {
    let last_segment = download_path
        .split(['?', '#'])
        .next()
        .unwrap_or(download_path)
        .rsplit('/')
        .next()
        .unwrap_or_default();

    [preferred.unwrap_or_default(), last_segment]
        .into_iter()
        .map(sanitize)
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| format!("capture--{}", short_hash(download_path)))
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse runs of underscores.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.len() > 120 {
        let mut cut = 120;
        while !compacted.is_char_boundary(cut) {
            cut -= 1;
        }
        compacted.truncate(cut);
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
