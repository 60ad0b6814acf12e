//! Offset pagination.

/// Numbered page request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// Number of the requested page, starting from `1`.
    page: usize,

    /// Maximum number of items on a page.
    per_page: usize,
}

impl Arguments {
    /// Largest allowed number of items on a page.
    pub const MAX_PER_PAGE: usize = 100;

    /// Number of items on a page when not specified.
    pub const DEFAULT_PER_PAGE: usize = 10;

    /// Creates new [`Arguments`], defaulting to the first page of
    /// [`Arguments::DEFAULT_PER_PAGE`] items.
    ///
    /// Returns [`None`] if the `page` is zero or negative, or the `per_page`
    /// is not within `1..=`[`Arguments::MAX_PER_PAGE`].
    pub fn new<Num>(page: Option<Num>, per_page: Option<Num>) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let page: usize = page.map_or(Some(1), |p| p.try_into().ok())?;
        let per_page: usize = per_page
            .map_or(Some(Self::DEFAULT_PER_PAGE), |p| p.try_into().ok())?;

        (page >= 1 && (1..=Self::MAX_PER_PAGE).contains(&per_page))
            .then_some(Self { page, per_page })
    }

    /// Returns the number of the requested page, starting from `1`.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the maximum number of items on the requested page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.per_page
    }

    /// Returns the number of items preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// Page of items along with the total number of items matching the request.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of items on all the pages.
    pub total: usize,

    /// [`Arguments`] this [`Page`] was requested with.
    pub arguments: Arguments,
}

impl<I> Page<I> {
    /// Creates a new [`Page`].
    #[must_use]
    pub fn new(
        arguments: Arguments,
        items: impl IntoIterator<Item = impl Into<I>>,
        total: usize,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total,
            arguments,
        }
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn pages(&self) -> usize {
        self.total.div_ceil(self.arguments.per_page)
    }

    /// Indicates whether there are more pages after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.arguments.page < self.pages()
    }

    /// Converts items of this [`Page`].
    #[must_use]
    pub fn map<T>(self, f: impl FnMut(I) -> T) -> Page<T> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            arguments: self.arguments,
        }
    }
}

/// Page request narrowed by a filter.
#[derive(Clone, Copy, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter applied before paginating.
    pub filter: F,
}
