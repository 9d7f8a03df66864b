use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes issued by the supported providers.
const KEY_PREFIXES: [&str; 4] = ["sk-", "AIza", "ya29.", "sess-"];

/// Places a credential shows up in echoed requests or error bodies.
const KEY_MARKERS: [&str; 8] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "\"authorization\":\"Bearer ",
    "x-goog-api-key: ",
    "api_key=",
    "key=",
    "\"api_key\":\"",
    "\"key\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

/// Replace every `<marker><token>` with the redaction tag. Prefix markers are
/// themselves part of the secret and get redacted along with it.
fn redact_after(scrubbed: &mut String, marker: &str, keep_marker: bool) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let value_start = start + marker.len();
        let end = token_end(scrubbed, value_start);

        if end == value_start {
            search_from = value_start;
            continue;
        }

        let redact_from = if keep_marker { value_start } else { start };
        scrubbed.replace_range(redact_from..end, REDACTED);
        search_from = redact_from + REDACTED.len();
    }
}

/// Scrub provider keys and bearer tokens from free text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let hit = KEY_PREFIXES
        .iter()
        .chain(KEY_MARKERS.iter())
        .any(|p| input.contains(p));
    if !hit {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in KEY_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    for prefix in KEY_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and truncate to a loggable length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &scrubbed[..end])
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    let sanitized = sanitize_api_error(&body);
    anyhow::anyhow!("{provider} API error ({status}): {sanitized}")
}
