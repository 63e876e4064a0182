//! Filter and sort state for the browse list, and its canonical query form.

//
// ─── SORT DIMENSIONS ───────────────────────────────────────────────────────────
//

/// The mutually exclusive sort dimensions of the browse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    CreatedAt,
    LikeCount,
    PlayCount,
    Name,
}

impl SortKey {
    fn param(self) -> &'static str {
        match self {
            Self::CreatedAt => "orderByCreatedAt",
            Self::LikeCount => "orderByLikeAmount",
            Self::PlayCount => "orderByPlayAmount",
            Self::Name => "orderByName",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

//
// ─── QUERY BUILDER ─────────────────────────────────────────────────────────────
//

/// Filter/sort state behind the browse controls.
///
/// At most one sort dimension is active at a time; holding the sort as a
/// single field makes a second active dimension unrepresentable. The search
/// term and template filter are independent of the sort and of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameListQuery {
    search: Option<String>,
    sort: Option<(SortKey, SortDir)>,
    template_slug: Option<String>,
}

impl Default for GameListQuery {
    /// Newest first, no search, no type filter.
    fn default() -> Self {
        Self {
            search: None,
            sort: Some((SortKey::CreatedAt, SortDir::Desc)),
            template_slug: None,
        }
    }
}

impl GameListQuery {
    /// An entirely unconstrained query (no sort at all).
    #[must_use]
    pub fn unsorted() -> Self {
        Self {
            search: None,
            sort: None,
            template_slug: None,
        }
    }

    #[must_use]
    pub fn sort(&self) -> Option<(SortKey, SortDir)> {
        self.sort
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub fn template_slug(&self) -> Option<&str> {
        self.template_slug.as_deref()
    }

    /// Toggle a sort dimension, replacing whichever one was active.
    ///
    /// Re-selecting the active key/direction pair clears the sort instead,
    /// mirroring the browse dropdowns.
    pub fn toggle_sort(&mut self, key: SortKey, dir: SortDir) {
        if self.sort == Some((key, dir)) {
            self.sort = None;
        } else {
            self.sort = Some((key, dir));
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Set the free-text search term; blank input clears it.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term.trim().is_empty() {
            self.search = None;
        } else {
            self.search = Some(term);
        }
    }

    /// Toggle the template filter; re-selecting the active slug clears it.
    pub fn toggle_template(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        if self.template_slug.as_deref() == Some(slug.as_str()) {
            self.template_slug = None;
        } else {
            self.template_slug = Some(slug);
        }
    }

    pub fn clear_template(&mut self) {
        self.template_slug = None;
    }

    /// Canonical ordered parameter set for the list-fetch request.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some((key, dir)) = self.sort {
            params.push((key.param(), dir.param().to_string()));
        }
        if let Some(slug) = &self.template_slug {
            params.push(("gameTypeSlug", slug.clone()));
        }
        params
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
