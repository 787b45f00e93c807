//! Detecting tool requests in free-form chat text.

use cohort_tools::ToolKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// A tool run inferred from a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedIntent {
    pub tool: ToolKind,
    /// Target in the form the tool expects: a host for nmap, a URL for gobuster.
    pub target: String,
}

/// Decides whether a chat message is really a tool request.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<DetectedIntent>;
}

// Compile-time check: IntentClassifier must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn IntentClassifier) {}
};

/// Never detects anything; every chat goes to the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIntent;

impl IntentClassifier for NoIntent {
    fn classify(&self, _text: &str) -> Option<DetectedIntent> {
        None
    }
}

static SCAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:scan\w*|nmap|ports?|escanea\w*|escaneo)\b").expect("valid regex")
});
static DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:gobuster|director(?:y|ies)|dirb|brute[\s-]?force|fuzz\w*)\b")
        .expect("valid regex")
});
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bhttps?://[^\s"'<>]+"#).expect("valid regex"));
static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|1?\d?\d)\.){3}(?:25[0-5]|2[0-4]\d|1?\d?\d)(?:/\d{1,2})?\b")
        .expect("valid regex")
});
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,24}\b")
        .expect("valid regex")
});

/// Keyword-based classifier for port-scan and directory brute-force requests
/// (English and Spanish keywords).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

enum Target {
    Url(String),
    Host(String),
}

impl KeywordClassifier {
    fn find_target(text: &str) -> Option<Target> {
        if let Some(m) = URL_RE.find(text) {
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':', ')', ']', '!', '?']);
            return Some(Target::Url(url.to_string()));
        }
        if let Some(m) = IPV4_RE.find(text) {
            return Some(Target::Host(m.as_str().to_string()));
        }
        DOMAIN_RE
            .find(text)
            .map(|m| Target::Host(m.as_str().to_lowercase()))
    }

    fn host_of(url: &str) -> String {
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        host.split(':').next().unwrap_or(host).to_string()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Option<DetectedIntent> {
        let wants_dirs = DIR_RE.is_match(text);
        let wants_scan = SCAN_RE.is_match(text);
        if !wants_dirs && !wants_scan {
            return None;
        }

        let target = Self::find_target(text)?;
        if wants_dirs {
            let url = match target {
                Target::Url(url) => url,
                Target::Host(host) => format!("http://{host}"),
            };
            return Some(DetectedIntent {
                tool: ToolKind::Gobuster,
                target: url,
            });
        }

        let host = match target {
            Target::Url(url) => Self::host_of(&url),
            Target::Host(host) => host,
        };
        Some(DetectedIntent {
            tool: ToolKind::Nmap,
            target: host,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Option<DetectedIntent> {
        KeywordClassifier.classify(text)
    }

    #[test]
    fn test_scan_with_ip() {
        let intent = classify("Please scan 192.168.1.10 for open services").unwrap();
        assert_eq!(intent.tool, ToolKind::Nmap);
        assert_eq!(intent.target, "192.168.1.10");
    }

    #[test]
    fn test_spanish_scan_with_cidr() {
        let intent = classify("escanea la red 10.0.0.0/24").unwrap();
        assert_eq!(intent.tool, ToolKind::Nmap);
        assert_eq!(intent.target, "10.0.0.0/24");
    }

    #[test]
    fn test_scan_url_uses_host() {
        let intent = classify("what ports are open on https://admin:pw@Example.com:8443/x?").unwrap();
        assert_eq!(intent.target, "Example.com");
    }

    #[test]
    fn test_directory_bruteforce_with_url() {
        let intent = classify("Find hidden directories on http://target.local/app.").unwrap();
        assert_eq!(intent.tool, ToolKind::Gobuster);
        assert_eq!(intent.target, "http://target.local/app");
    }

    #[test]
    fn test_directory_bruteforce_with_domain() {
        let intent = classify("run a brute force against shop.example.org").unwrap();
        assert_eq!(intent.tool, ToolKind::Gobuster);
        assert_eq!(intent.target, "http://shop.example.org");
    }

    #[test]
    fn test_keyword_without_target() {
        assert!(classify("how does a port scan work?").is_none());
    }

    #[test]
    fn test_target_without_keyword() {
        assert!(classify("summarize the page at http://example.com").is_none());
    }

    #[test]
    fn test_port_inside_other_word_is_ignored() {
        assert!(classify("write a report about example.com").is_none());
    }

    #[test]
    fn test_no_intent_classifier() {
        assert!(NoIntent.classify("nmap 10.0.0.1").is_none());
    }
}
