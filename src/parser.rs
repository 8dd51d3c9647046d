use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::net::IpAddr;
use std::path::Path;

use crate::error::{FilterError, Result};

/// Regex pattern for a (lowercased) domain name: dot-separated labels of
/// letters, digits, '-' and '_', no label starting or ending with '-'.
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?\.)*[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?$")
        .expect("DOMAIN_PATTERN: hardcoded regex is invalid")
});

/// Maximum nesting depth for `file:` include directives.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Host names found in hosts files that are not list entries
const HOSTS_FILE_RESERVED: [&str; 4] = ["localhost", "localhost.localdomain", "local", "broadcasthost"];

/// Parse a domain list from text.
///
/// One entry per line, `#` starts a comment. Hosts-file lines
/// (`0.0.0.0 ads.example.com`) contribute their host names. A leading `*.`
/// or `.` is dropped; whether subdomains match is decided by the filter's
/// match mode.
///
/// Supports `file: /path/to/list.txt` directive to include an external list.
pub fn parse_domains(text: &str) -> Result<Vec<String>> {
    parse_domains_inner(text, 0)
}

fn parse_domains_inner(text: &str, depth: usize) -> Result<Vec<String>> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(FilterError::Parse(format!(
            "file include depth exceeds maximum ({MAX_INCLUDE_DEPTH}), possible circular include"
        )));
    }

    let mut domains = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers

        // Remove comments and trim whitespace
        let line = if let Some(comment_pos) = line.find('#') {
            &line[..comment_pos]
        } else {
            line
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        // Handle file include directive
        if let Some(path) = line.strip_prefix("file:") {
            let path = path.trim();
            domains.extend(parse_domains_from_file_inner(path, depth + 1)?);
            continue;
        }

        parse_line(line, line_num, &mut domains)?;
    }

    Ok(domains)
}

/// Parse a domain list from a file.
pub fn parse_domains_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    parse_domains_from_file_inner(path, 0)
}

fn parse_domains_from_file_inner(path: impl AsRef<Path>, depth: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| FilterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_domains_inner(&text, depth)
}

/// Parse a single non-empty line
fn parse_line(line: &str, line_num: usize, domains: &mut Vec<String>) -> Result<()> {
    let mut fields = line.split_whitespace();
    let first = fields.next().unwrap_or_default();

    if first.parse::<IpAddr>().is_ok() {
        // Hosts-file line: address followed by one or more host names
        for host in fields {
            let host = host.to_ascii_lowercase();
            if HOSTS_FILE_RESERVED.contains(&host.as_str()) || host.parse::<IpAddr>().is_ok() {
                continue;
            }
            domains.push(parse_entry(&host, line_num)?);
        }
        return Ok(());
    }

    if fields.next().is_some() {
        return Err(FilterError::ParseAtLine {
            line: line_num,
            message: format!("Unexpected whitespace in entry: {}", line),
        });
    }

    domains.push(parse_entry(first, line_num)?);
    Ok(())
}

/// Validate and normalize a single entry
pub(crate) fn parse_entry(entry: &str, line_num: usize) -> Result<String> {
    let lower = entry.to_ascii_lowercase();
    let domain = lower
        .strip_prefix("*.")
        .or_else(|| lower.strip_prefix('.'))
        .unwrap_or(&lower);
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.len() > 253 || !DOMAIN_PATTERN.is_match(domain) {
        return Err(FilterError::ParseAtLine {
            line: line_num,
            message: format!("Invalid domain: {}", entry),
        });
    }

    Ok(domain.to_string())
}
