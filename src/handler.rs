//! Mapping file extensions to the page kinds the host knows how to read

use crate::error::Result;
use crate::site::{Page, Site, SourceFile};
use std::fmt;

/// Content formats a site can hold pages in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Markdown,
    Html,
    AsciiDoc,
    ReStructuredText,
    Org,
    MMark,
}

impl PageKind {
    pub const ALL: [PageKind; 6] = [
        Self::Markdown,
        Self::Html,
        Self::AsciiDoc,
        Self::ReStructuredText,
        Self::Org,
        Self::MMark,
    ];

    /// Lowercase extensions handled by this kind
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md", "markdown", "mdown", "mkd", "mkdn"],
            Self::Html => &["html", "htm"],
            Self::AsciiDoc => &["adoc", "asciidoc", "ad"],
            Self::ReStructuredText => &["rst", "rest"],
            Self::Org => &["org"],
            Self::MMark => &["mmark"],
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::AsciiDoc => "asciidoc",
            Self::ReStructuredText => "rst",
            Self::Org => "org",
            Self::MMark => "mmark",
        };
        f.write_str(name)
    }
}

/// Reads one kind of page through the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandler {
    kind: PageKind,
}

impl PageHandler {
    /// Look up the handler for an extension, ignoring case and a leading dot.
    pub fn for_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        PageKind::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&extension.as_str()))
            .map(|kind| Self { kind })
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn read<S: Site + ?Sized>(&self, site: &S, file: &SourceFile) -> Result<Page> {
        site.read_page(file, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_extension() {
        let kind = |ext| PageHandler::for_extension(ext).map(|h| h.kind());

        assert_eq!(kind("md"), Some(PageKind::Markdown));
        assert_eq!(kind("MarkDown"), Some(PageKind::Markdown));
        assert_eq!(kind(".mkdn"), Some(PageKind::Markdown));
        assert_eq!(kind("htm"), Some(PageKind::Html));
        assert_eq!(kind("adoc"), Some(PageKind::AsciiDoc));
        assert_eq!(kind("rest"), Some(PageKind::ReStructuredText));
        assert_eq!(kind("org"), Some(PageKind::Org));
        assert_eq!(kind("mmark"), Some(PageKind::MMark));
    }

    #[test]
    fn test_unsupported_extensions() {
        for ext in ["", "txt", "png", "css", "mdx"] {
            assert!(PageHandler::for_extension(ext).is_none(), "{ext:?}");
        }
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in PageKind::ALL {
            for ext in kind.extensions() {
                assert!(seen.insert(*ext), "{ext} claimed twice");
            }
        }
    }
}
