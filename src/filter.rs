use regex::Regex;
use url::Url;

/// Targets that never lead to a readable page
const BUILTIN_EXCLUDES: &[&str] = &[
    r"(?i)^\s*javascript:",
    r"(?i)^\s*mailto:",
    r"(?i)^\s*tel:",
    r"(?i)^\s*data:",
    r"^\s*#",
];

/// Decides which anchor targets are kept as links, and resolves them
#[derive(Debug)]
pub struct LinkFilter {
    builtin_regexes: Vec<Regex>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self::new(&[], &[]).expect("Built-in link patterns should be valid")
    }
}

impl LinkFilter {
    /// Create a link filter with extra include and exclude patterns
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let builtin_regexes = BUILTIN_EXCLUDES
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let mut include_regexes = Vec::with_capacity(include_patterns.len());
        for pattern in include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            builtin_regexes,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Resolve `href` against the page and return the target if it is kept
    pub fn accept(&self, href: &str, base_url: Option<&Url>) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        if self.builtin_regexes.iter().any(|regex| regex.is_match(href)) {
            ::log::trace!("Link filter rejected non-navigable target: {}", href);
            return None;
        }

        let target = resolve_target(href, base_url);

        // Exclusions take precedence over inclusions
        if self.exclude_regexes.iter().any(|regex| regex.is_match(&target)) {
            ::log::trace!("Link filter excluded: {}", target);
            return None;
        }

        if !self.include_regexes.is_empty()
            && !self.include_regexes.iter().any(|regex| regex.is_match(&target))
        {
            ::log::trace!("Link filter did not include: {}", target);
            return None;
        }

        Some(target)
    }
}

/// Join `href` onto the base URL, keeping it verbatim when that is impossible
pub fn resolve_target(href: &str, base_url: Option<&Url>) -> String {
    match base_url.map(|base| base.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.to_string(),
    }
}
