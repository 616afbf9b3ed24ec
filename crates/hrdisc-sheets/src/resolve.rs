//! Worksheet lookup with fallbacks

/// Worksheet names tried, in order, when the preferred one is absent
pub const FALLBACK_WORKSHEETS: [&str; 5] = ["Clients", "Client Data", "Sheet1", "Main", "Data"];

/// Which rule picked the worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    /// Exact match on the preferred title
    Preferred,
    /// One of the fallback titles
    Fallback,
    /// No name matched; the first worksheet in tab order was used
    FirstAvailable,
}

/// A resolved worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Worksheet title
    pub title: String,
    /// How it was found
    pub resolved_by: ResolvedBy,
}

/// Pick the worksheet to read from `titles`.
///
/// Returns `None` only when the document has no worksheets at all.
pub fn resolve_worksheet<S: AsRef<str>>(titles: &[String], preferred: &str, fallbacks: &[S]) -> Option<Resolution> {
    if titles.iter().any(|t| t == preferred) {
        return Some(Resolution {
            title: preferred.to_string(),
            resolved_by: ResolvedBy::Preferred,
        });
    }

    for name in fallbacks {
        let name = name.as_ref();
        if titles.iter().any(|t| t == name) {
            tracing::warn!("Worksheet '{preferred}' not found, using '{name}'");
            return Some(Resolution {
                title: name.to_string(),
                resolved_by: ResolvedBy::Fallback,
            });
        }
    }

    let first = titles.first()?;
    tracing::warn!("Worksheet '{preferred}' not found and no fallback matched, using first worksheet '{first}'");
    Some(Resolution {
        title: first.clone(),
        resolved_by: ResolvedBy::FirstAvailable,
    })
}
