//! Link resolution
//!
//! Turns a raw, possibly-relative href plus its listing context into one
//! canonical absolute URL. Classification is an explicit three-way decision
//! evaluated in a fixed priority order, independent of any single site's
//! quirks:
//!
//! 1. Same-directory relative (`./...`): strip the prefix, concatenate onto
//!    the listing URL.
//! 2. Parent-directory relative (`../...`): strip the prefix, concatenate
//!    onto the site base URL.
//! 3. Anything else is treated as already absolute (or protocol-relative)
//!    and passed through unchanged.
//!
//! Resolution is a pure function: identical inputs always yield the same
//! canonical link. The caller relies on this for cache-key stability.

use crate::LinkError;
use url::Url;

/// The three recognized raw-link forms, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Begins with `./` - relative to the listing URL
    SameDirectory,
    /// Begins with `../` - relative to the site base URL
    ParentDirectory,
    /// Already absolute or protocol-relative; passed through unchanged
    Absolute,
}

/// Base URLs a raw link is resolved against
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// URL of the listing page the link was found on (trailing slash expected)
    pub listing_url: String,
    /// Root URL of the site (trailing slash expected)
    pub site_base_url: String,
}

/// Classifies a raw link into exactly one [`LinkKind`]
pub fn classify_link(raw: &str) -> LinkKind {
    if raw.starts_with("./") {
        LinkKind::SameDirectory
    } else if raw.starts_with("../") {
        LinkKind::ParentDirectory
    } else {
        LinkKind::Absolute
    }
}

/// Resolves a raw link to its canonical absolute form
///
/// Empty or malformed raw links are a per-candidate error; the caller drops
/// the candidate and continues the run.
pub fn resolve_link(raw: &str, ctx: &ResolveContext) -> Result<String, LinkError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LinkError::Empty);
    }

    let resolved = match classify_link(raw) {
        LinkKind::SameDirectory => {
            let rest = &raw[2..];
            if rest.is_empty() {
                return Err(LinkError::Malformed {
                    raw: raw.to_string(),
                    message: "nothing after './'".to_string(),
                });
            }
            format!("{}{}", ctx.listing_url, rest)
        }
        LinkKind::ParentDirectory => {
            let rest = &raw[3..];
            if rest.is_empty() {
                return Err(LinkError::Malformed {
                    raw: raw.to_string(),
                    message: "nothing after '../'".to_string(),
                });
            }
            format!("{}{}", ctx.site_base_url, rest)
        }
        LinkKind::Absolute => raw.to_string(),
    };

    // Protocol-relative links are legitimate absolute forms; everything else
    // must parse as a URL to count as canonical.
    if !resolved.starts_with("//") {
        Url::parse(&resolved).map_err(|e| LinkError::Malformed {
            raw: raw.to_string(),
            message: e.to_string(),
        })?;
    }

    Ok(resolved)
}
