//! Include/exclude filtering of acquired items by string patterns.
//!
//! A filter keeps or drops items whose extracted string matches any of the
//! given patterns. Patterns are either compared literally or compiled as
//! unanchored regular expressions, so `ext` matches `ext4` while `^ext4$`
//! only matches exactly.

use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("invalid filter expression '{pattern}': {source}")]
pub struct MatchError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// What an empty pattern list means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPatterns {
    /// The whole input is returned (include and exclude lists both use this)
    PassAll,
    /// Nothing is returned, whatever the polarity
    MatchNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Literal,
    Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    KeepMatches,
    DropMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub empty: EmptyPatterns,
    pub mode: MatchMode,
    pub polarity: Polarity,
}

impl FilterOptions {
    /// Regex include filter: keep matches, an empty list keeps everything
    pub fn include() -> Self {
        Self {
            empty: EmptyPatterns::PassAll,
            mode: MatchMode::Regex,
            polarity: Polarity::KeepMatches,
        }
    }

    /// Regex exclude filter: drop matches, an empty list drops nothing
    pub fn exclude() -> Self {
        Self {
            empty: EmptyPatterns::PassAll,
            mode: MatchMode::Regex,
            polarity: Polarity::DropMatches,
        }
    }

    pub fn literal(mut self) -> Self {
        self.mode = MatchMode::Literal;
        self
    }

    pub fn when_empty(mut self, empty: EmptyPatterns) -> Self {
        self.empty = empty;
        self
    }
}

enum Matcher<'a> {
    Literal(&'a [String]),
    Regex(Vec<Regex>),
}

impl Matcher<'_> {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Literal(patterns) => patterns.iter().any(|p| p == candidate),
            Matcher::Regex(regexes) => regexes.iter().any(|re| re.is_match(candidate)),
        }
    }
}

/// Check that every pattern compiles, so bad expressions are rejected
/// before any measurement is taken.
pub fn validate_patterns(patterns: &[String]) -> Result<(), MatchError> {
    compile(patterns).map(|_| ())
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, MatchError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| MatchError {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Filter `items` by the string `extract` yields for each of them.
///
/// The input is never modified; survivors keep their relative order. An
/// invalid regex aborts the whole call without a partial result.
pub fn filter<T, F>(
    items: &[T],
    patterns: &[String],
    extract: F,
    options: FilterOptions,
) -> Result<Vec<T>, MatchError>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    filter_any(items, patterns, |item| vec![extract(item)], options)
}

/// Like [`filter`], but an item matches when any of the strings `extract`
/// yields for it matches a pattern (e.g. one of several mount options).
pub fn filter_any<T, F>(
    items: &[T],
    patterns: &[String],
    extract: F,
    options: FilterOptions,
) -> Result<Vec<T>, MatchError>
where
    T: Clone,
    F: Fn(&T) -> Vec<&str>,
{
    if patterns.is_empty() {
        return Ok(match options.empty {
            EmptyPatterns::PassAll => items.to_vec(),
            EmptyPatterns::MatchNone => Vec::new(),
        });
    }

    let matcher = match options.mode {
        MatchMode::Literal => Matcher::Literal(patterns),
        MatchMode::Regex => Matcher::Regex(compile(patterns)?),
    };
    let keep_matches = options.polarity == Polarity::KeepMatches;

    Ok(items
        .iter()
        .filter(|item| {
            let matched = extract(*item).into_iter().any(|s| matcher.matches(s));
            matched == keep_matches
        })
        .cloned()
        .collect())
}

/// An include list applied before an exclude list on the same attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeExclude {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl IncludeExclude {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        validate_patterns(&self.include)?;
        validate_patterns(&self.exclude)
    }

    pub fn apply<T, F>(&self, items: &[T], extract: F) -> Result<Vec<T>, MatchError>
    where
        T: Clone,
        F: Fn(&T) -> &str,
    {
        let included = filter(items, &self.include, &extract, FilterOptions::include())?;
        filter(&included, &self.exclude, &extract, FilterOptions::exclude())
    }

    pub fn apply_any<T, F>(&self, items: &[T], extract: F) -> Result<Vec<T>, MatchError>
    where
        T: Clone,
        F: Fn(&T) -> Vec<&str>,
    {
        let included = filter_any(items, &self.include, &extract, FilterOptions::include())?;
        filter_any(&included, &self.exclude, &extract, FilterOptions::exclude())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn pats(items: &[&str]) -> Vec<String> {
        names(items)
    }

    #[test]
    fn test_include_regex_keeps_matches_in_order() {
        let items = names(&["ext4", "tmpfs", "xfs", "ext3"]);
        let out = filter(&items, &pats(&["^ext"]), |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(out, names(&["ext4", "ext3"]));
    }

    #[test]
    fn test_regex_is_unanchored() {
        let items = names(&["ext4", "myext4fs"]);
        let out = filter(&items, &pats(&["ext4"]), |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(out.len(), 2);
        let out = filter(&items, &pats(&["^ext4$"]), |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(out, names(&["ext4"]));
    }

    #[test]
    fn test_exclude_drops_matches() {
        let items = names(&["lo", "eth0", "wlan0"]);
        let out = filter(&items, &pats(&["^lo$"]), |s| s.as_str(), FilterOptions::exclude()).unwrap();
        assert_eq!(out, names(&["eth0", "wlan0"]));
    }

    #[test]
    fn test_empty_patterns() {
        let items = names(&["a", "b"]);
        let all = filter(&items, &[], |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(all, items);
        let all = filter(&items, &[], |s| s.as_str(), FilterOptions::exclude()).unwrap();
        assert_eq!(all, items);
        let none = filter(
            &items,
            &[],
            |s| s.as_str(),
            FilterOptions::include().when_empty(EmptyPatterns::MatchNone),
        )
        .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_match_none_drops_everything_for_exclude_lists_too() {
        let items = names(&["a", "b"]);
        let out = filter(
            &items,
            &[],
            |s| s.as_str(),
            FilterOptions::exclude().when_empty(EmptyPatterns::MatchNone),
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_exclude_defaults_to_pass_all() {
        assert_eq!(FilterOptions::exclude().empty, EmptyPatterns::PassAll);
    }

    #[test]
    fn test_literal_mode() {
        let items = names(&["a.b", "axb"]);
        let out = filter(&items, &pats(&["a.b"]), |s| s.as_str(), FilterOptions::include().literal()).unwrap();
        assert_eq!(out, names(&["a.b"]));
    }

    #[test]
    fn test_patterns_are_ored() {
        let items = names(&["ext4", "xfs", "btrfs"]);
        let out = filter(&items, &pats(&["^xfs$", "^btrfs$"]), |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(out, names(&["xfs", "btrfs"]));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let items = names(&["a"]);
        let err = filter(&items, &pats(&["(unclosed"]), |s| s.as_str(), FilterOptions::include()).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert!(validate_patterns(&pats(&["ok", "[bad"])).is_err());
        assert!(validate_patterns(&pats(&["ok"])).is_ok());
    }

    #[test]
    fn test_input_is_untouched() {
        let items = names(&["a", "b"]);
        let _ = filter(&items, &pats(&["a"]), |s| s.as_str(), FilterOptions::include()).unwrap();
        assert_eq!(items, names(&["a", "b"]));
    }

    #[test]
    fn test_filter_any_matches_on_any_string() {
        let items = vec![
            ("/", vec!["rw".to_string(), "relatime".to_string()]),
            ("/boot", vec!["ro".to_string()]),
        ];
        let out = filter_any(
            &items,
            &pats(&["^ro$"]),
            |(_, opts)| opts.iter().map(String::as_str).collect(),
            FilterOptions::include(),
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "/boot");
    }

    #[test]
    fn test_include_then_exclude() {
        let items = names(&["ext4", "ext3", "xfs"]);
        let filters = IncludeExclude::new(pats(&["^ext"]), pats(&["3"]));
        let out = filters.apply(&items, |s| s.as_str()).unwrap();
        assert_eq!(out, names(&["ext4"]));
    }
}
