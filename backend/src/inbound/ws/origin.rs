//! Origin allow-list for WebSocket upgrades.

use std::collections::BTreeSet;

use url::Url;

const LOCALHOST: &str = "localhost";

/// Accepted browser origins.
///
/// The development default accepts `http://localhost` with any explicit
/// non-zero port. Configured lists match exact origins instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginAllowList {
    allow_local_dev: bool,
    origins: BTreeSet<String>,
}

impl Default for OriginAllowList {
    fn default() -> Self {
        Self::local_dev()
    }
}

impl OriginAllowList {
    /// Accept only HTTP localhost origins with an explicit port.
    pub fn local_dev() -> Self {
        Self {
            allow_local_dev: true,
            origins: BTreeSet::new(),
        }
    }

    /// Accept exactly the listed origins.
    ///
    /// # Errors
    ///
    /// Returns the parse error of the first entry that is not a URL.
    ///
    /// # Examples
    /// ```
    /// use pawscout::inbound::ws::origin::OriginAllowList;
    /// use url::Url;
    ///
    /// let list = OriginAllowList::from_entries(["https://pawscout.example"]).expect("urls");
    /// assert!(list.is_allowed(&Url::parse("https://pawscout.example").expect("url")));
    /// assert!(!list.is_allowed(&Url::parse("http://localhost:3000").expect("url")));
    /// ```
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, url::ParseError> {
        let origins = entries
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| Url::parse(entry).map(|url| url.origin().ascii_serialization()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            allow_local_dev: false,
            origins,
        })
    }

    /// Whether a parsed `Origin` header value may open a session.
    pub fn is_allowed(&self, origin: &Url) -> bool {
        if self.allow_local_dev && is_local_dev(origin) {
            return true;
        }
        let serialised = origin.origin();
        serialised.is_tuple() && self.origins.contains(&serialised.ascii_serialization())
    }
}

fn is_local_dev(origin: &Url) -> bool {
    origin.scheme() == "http"
        && origin.host_str() == Some(LOCALHOST)
        && matches!(origin.port(), Some(port) if port != 0)
}
