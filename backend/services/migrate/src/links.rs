use crate::glpi::models::Link;

/// Re-roots hrefs from the source API to the destination API.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    source_root: String,
    destination_root: String,
}

impl LinkRewriter {
    pub fn new(source_root: &str, destination_root: &str) -> Self {
        Self {
            source_root: source_root.to_owned(),
            destination_root: destination_root.to_owned(),
        }
    }

    /// Replaces every occurrence of the source root in `href`.
    pub fn rewrite_href(&self, href: &str) -> String {
        if self.source_root.is_empty() {
            return href.to_owned();
        }
        href.replace(&self.source_root, &self.destination_root)
    }

    pub fn rewrite(&self, links: &[Link]) -> Vec<Link> {
        links
            .iter()
            .map(|link| Link {
                rel: link.rel.clone(),
                href: self.rewrite_href(&link.href),
            })
            .collect()
    }

    pub fn rewrite_in_place(&self, links: &mut [Link]) {
        for link in links {
            link.href = self.rewrite_href(&link.href);
        }
    }
}
