//! Pagination abstractions.
//!
//! Two flavours are provided:
//! - cursor-based [`Connection`]s, used by the GraphQL API;
//! - page [`Number`]-based [`Window`]s, used by the plain listing pages.

use std::{fmt, num::NonZeroU32};

/// Cursor-paginated slice of a list.
#[derive(Clone, Debug)]
pub struct Connection<C, I> {
    /// [`Edge`]s of this [`Connection`].
    pub edges: Vec<Edge<C, I>>,

    /// [`Kind`] of pagination that produced this [`Connection`].
    pub kind: Kind,

    /// Indicator whether there are more items in the paginated direction.
    pub has_more: bool,
}

/// Single page of a [`Connection`].
pub type Page<C, I> = Connection<C, I>;

impl<C, I> Connection<C, I> {
    /// Builds a [`Connection`] requested by the provided [`Arguments`].
    #[must_use]
    pub fn new(
        args: &Arguments<C>,
        edges: impl IntoIterator<Item = impl Into<Edge<C, I>>>,
        has_more: bool,
    ) -> Self {
        Self {
            edges: edges.into_iter().map(Into::into).collect(),
            kind: args.kind(),
            has_more,
        }
    }

    /// Returns [`PageInfo`] of this [`Connection`].
    #[must_use]
    pub fn page_info(&self) -> PageInfo<C>
    where
        C: Clone,
    {
        PageInfo {
            start_cursor: self.edges.first().map(|e| e.cursor.clone()),
            end_cursor: self.edges.last().map(|e| e.cursor.clone()),
            has_next_page: self.has_more && self.kind.is_forward(),
            has_previous_page: self.has_more && self.kind.is_backward(),
        }
    }
}

/// Information about a [`Connection`] page.
#[derive(Clone, Copy, Debug)]
pub struct PageInfo<C> {
    /// First cursor of the page.
    pub start_cursor: Option<C>,

    /// Last cursor of the page.
    pub end_cursor: Option<C>,

    /// Indicator whether there is a next page.
    pub has_next_page: bool,

    /// Indicator whether there is a previous page.
    pub has_previous_page: bool,
}

/// Edge of a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, I> {
    /// Cursor pointing to this [`Edge`].
    pub cursor: C,

    /// Node of this [`Edge`].
    pub node: I,
}

impl<C, I> From<(C, I)> for Edge<C, I> {
    fn from((cursor, node): (C, I)) -> Self {
        Self { cursor, node }
    }
}

/// Cursor pagination arguments.
#[derive(Clone, Copy, Debug)]
pub enum Arguments<C> {
    /// Items after a cursor.
    Forward {
        /// Maximum number of items.
        first: usize,

        /// Cursor to start after.
        after: Option<C>,

        /// Indicator whether the `after` item itself is included.
        including: bool,
    },

    /// Items before a cursor.
    Backward {
        /// Maximum number of items.
        last: usize,

        /// Cursor to end before.
        before: Option<C>,

        /// Indicator whether the `before` item itself is included.
        including: bool,
    },
}

impl<C> Arguments<C> {
    /// Interprets the provided Relay-style arguments.
    ///
    /// Setting `after` and `before` to the same cursor selects that very item
    /// (inclusively). [`None`] is returned for ambiguous combinations or
    /// out-of-range numbers.
    pub fn new<Num>(
        first: Option<Num>,
        after: Option<C>,
        last: Option<Num>,
        before: Option<C>,
        default: Num,
    ) -> Option<Self>
    where
        C: PartialEq + fmt::Debug,
        Num: TryInto<usize> + fmt::Debug,
    {
        Some(match (first, after, last, before) {
            (None, None, None, None) => Self::Forward {
                first: default.try_into().ok()?,
                after: None,
                including: false,
            },
            (Some(first), after, None, None) => Self::Forward {
                first: first.try_into().ok()?,
                after,
                including: false,
            },
            (Some(first), Some(after), None, Some(before))
                if after == before =>
            {
                Self::Forward {
                    first: first.try_into().ok()?,
                    after: Some(after),
                    including: true,
                }
            }
            (None, None, Some(last), before) => Self::Backward {
                last: last.try_into().ok()?,
                before,
                including: false,
            },
            (None, Some(after), Some(last), Some(before))
                if after == before =>
            {
                Self::Backward {
                    last: last.try_into().ok()?,
                    before: Some(before),
                    including: true,
                }
            }
            (None, Some(after), None, Some(before)) if after == before => {
                Self::Forward {
                    first: 1,
                    after: Some(after),
                    including: true,
                }
            }
            _ => return None,
        })
    }

    /// Returns the cursor of the single exact item requested, if any.
    pub fn exact_cursor(&self) -> Option<&C> {
        match self {
            Self::Forward {
                first: 1,
                after,
                including: true,
            } => after.as_ref(),
            Self::Backward {
                last: 1,
                before,
                including: true,
            } => before.as_ref(),
            Self::Forward { .. } | Self::Backward { .. } => None,
        }
    }

    /// Returns the cursor the pagination starts from, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&C> {
        match self {
            Self::Forward { after, .. } => after.as_ref(),
            Self::Backward { before, .. } => before.as_ref(),
        }
    }

    /// Returns [`Kind`] of these [`Arguments`].
    pub fn kind(&self) -> Kind {
        match *self {
            Self::Forward { including, .. } => {
                if including {
                    Kind::ForwardIncluding
                } else {
                    Kind::Forward
                }
            }
            Self::Backward { including, .. } => {
                if including {
                    Kind::BackwardIncluding
                } else {
                    Kind::Backward
                }
            }
        }
    }

    /// Returns the maximum number of requested items.
    #[must_use]
    pub fn limit(&self) -> usize {
        match *self {
            Self::Forward { first, .. } => first,
            Self::Backward { last, .. } => last,
        }
    }
}

/// [`Arguments`] paired with a filter.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C, F> {
    /// Cursor pagination [`Arguments`].
    pub arguments: Arguments<C>,

    /// Filter applied before paginating.
    pub filter: F,
}

/// Kind of cursor pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Items strictly after the cursor.
    Forward,

    /// Items after the cursor, the cursor included.
    ForwardIncluding,

    /// Items strictly before the cursor.
    Backward,

    /// Items before the cursor, the cursor included.
    BackwardIncluding,
}

impl Kind {
    /// Indicates whether this [`Kind`] paginates forward.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward | Self::ForwardIncluding)
    }

    /// Indicates whether this [`Kind`] paginates backward.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        matches!(self, Self::Backward | Self::BackwardIncluding)
    }

    /// Returns the comparison operator selecting items against the cursor.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::ForwardIncluding => ">=",
            Self::Backward => "<",
            Self::BackwardIncluding => "<=",
        }
    }

    /// Returns the [`Order`] items are fetched in.
    #[must_use]
    pub const fn order(&self) -> Order {
        match self {
            Self::Forward | Self::ForwardIncluding => Order::Ascending,
            Self::Backward | Self::BackwardIncluding => Order::Descending,
        }
    }
}

/// Sorting order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Returns the SQL keyword of this [`Order`].
    #[cfg(feature = "postgres")]
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One-based page number.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Number(NonZeroU32);

impl Number {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Creates a new [`Number`] if the provided `n` is positive.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Parses a page [`Number`] out of a raw request parameter.
    ///
    /// Surrounding whitespace is ignored. Anything that is not a positive
    /// integer yields [`None`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().and_then(Self::new)
    }

    /// Same as [`Number::parse()`], but falls back to [`Number::FIRST`].
    #[must_use]
    pub fn parse_or_first(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or(Self::FIRST)
    }

    /// Returns this [`Number`] as a [`u32`].
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the [`Number`] of the next page.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Returns the [`Number`] of the previous page.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::new(self.get() - 1)
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Slice of a list addressed by a page [`Number`] and a page size.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window {
    /// [`Number`] of the page.
    pub number: Number,

    /// Maximum number of items on a page.
    pub size: NonZeroU32,
}

impl Window {
    /// Returns the number of items preceding this [`Window`].
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number.get() - 1) * u64::from(self.size.get())
    }

    /// Returns the number of items in this [`Window`].
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.size.get()
    }

    /// Returns the total number of pages needed for `total` items.
    ///
    /// An empty list still has one (empty) page.
    #[must_use]
    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size.get())).max(1)
    }
}

/// Defines cursor pagination type aliases for a single list.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty, $filter:ty) => {
        #[doc = "Edge of a [`Connection`]."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "Cursor-paginated list."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "Page of a [`Connection`]."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "Information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo<$cursor>;

        #[doc = "Arguments selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "Filtered [`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$cursor, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroU32;

    use super::{Arguments, Kind, Number, Window};

    #[test]
    fn parses_page_numbers() {
        assert_eq!(Number::parse("3").map(Number::get), Some(3));
        assert_eq!(Number::parse(" 12 ").map(Number::get), Some(12));
        assert_eq!(Number::parse("0"), None);
        assert_eq!(Number::parse("-2"), None);
        assert_eq!(Number::parse("abc"), None);
        assert_eq!(Number::parse(""), None);
        assert_eq!(Number::parse("2.5"), None);
    }

    #[test]
    fn falls_back_to_first_page() {
        assert_eq!(Number::parse_or_first(None), Number::FIRST);
        assert_eq!(Number::parse_or_first(Some("nope")), Number::FIRST);
        assert_eq!(Number::parse_or_first(Some("4")).get(), 4);
    }

    #[test]
    fn navigates_between_pages() {
        assert_eq!(Number::FIRST.previous(), None);
        assert_eq!(Number::FIRST.next().map(Number::get), Some(2));
        assert_eq!(
            Number::new(u32::MAX).and_then(Number::next),
            None,
        );
    }

    #[test]
    fn computes_window_bounds() {
        let window = Window {
            number: Number::new(3).unwrap(),
            size: NonZeroU32::new(20).unwrap(),
        };

        assert_eq!(window.offset(), 40);
        assert_eq!(window.limit(), 20);
        assert_eq!(window.pages(0), 1);
        assert_eq!(window.pages(40), 2);
        assert_eq!(window.pages(41), 3);
    }

    #[test]
    fn interprets_cursor_arguments() {
        let args = Arguments::new(Some(5), Some(1), None, None, 10).unwrap();
        assert_eq!(args.kind(), Kind::Forward);
        assert_eq!(args.limit(), 5);
        assert_eq!(args.cursor(), Some(&1));

        let args = Arguments::<i32>::new(None, None, None, None, 10).unwrap();
        assert_eq!(args.limit(), 10);

        let exact = Arguments::new(None, Some(7), None, Some(7), 10).unwrap();
        assert_eq!(exact.exact_cursor(), Some(&7));

        assert!(Arguments::<i32>::new(Some(1), None, Some(1), None, 10).is_none());
        assert!(Arguments::new(Some(-1), Some(2), None, None, 10).is_none());
    }
}
