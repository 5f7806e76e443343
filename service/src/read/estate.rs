//! [`Estate`]-related read definitions.
//!
//! [`Estate`]: crate::domain::Estate

use common::money::Currency;
use rust_decimal::Decimal;

use crate::domain::{data, estate, taxon, user};
#[cfg(doc)]
use crate::domain::Estate;

/// Filter of [`Estate`] lists.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// [`taxon::Id`] of the estate type to match.
    pub kind: Option<taxon::Id>,

    /// Rent flag to match.
    pub rent: Option<bool>,

    /// Housing flag to match.
    pub housing: Option<bool>,

    /// [`estate::City`] to match case-insensitively.
    pub city: Option<estate::City>,

    /// [`PriceRange`] to match.
    pub price: Option<PriceRange>,

    /// [`data::Name`] (or its part) to fuzzy search for.
    pub search: Option<data::Name>,

    /// Viewer of the list.
    ///
    /// Disabled [`Estate`]s are listed to their owners only.
    pub viewer: Option<user::Id>,
}

/// Range of [`Estate`] prices in a single [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PriceRange {
    /// [`Currency`] of the bounds.
    pub currency: Currency,

    /// Lower inclusive bound, if any.
    pub min: Option<Decimal>,

    /// Upper inclusive bound, if any.
    pub max: Option<Decimal>,
}

/// Total count of [`Estate`]s matching a [`Filter`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TotalCount(pub u64);

pub mod list {
    //! Cursor-paginated [`Estate`] list definitions.

    use common::define_pagination;

    use crate::domain::estate;
    #[cfg(doc)]
    use crate::domain::Estate;

    pub use super::Filter;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = estate::Id;

    /// Cursor pointing to a specific [`Estate`] in a list.
    pub type Cursor = estate::Id;
}

pub mod numbered {
    //! Page [`Number`]-based [`Estate`] list definitions.
    //!
    //! [`Number`]: common::pagination::Number

    use common::pagination::Window;

    use crate::domain::estate;
    #[cfg(doc)]
    use crate::domain::Estate;

    use super::{Filter, TotalCount};

    /// Selector of a numbered [`Page`].
    #[derive(Clone, Debug)]
    pub struct Selector {
        /// [`Window`] to select.
        pub window: Window,

        /// [`Filter`] applied before paginating.
        pub filter: Filter,
    }

    /// Numbered page of an [`Estate`] list, ordered by position and name.
    #[derive(Clone, Debug)]
    pub struct Page {
        /// [`Window`] of this [`Page`].
        pub window: Window,

        /// Total number of [`Estate`]s matching the [`Filter`].
        pub total: TotalCount,

        /// IDs of the [`Estate`]s on this [`Page`].
        pub ids: Vec<estate::Id>,
    }

    impl Page {
        /// Returns the total number of pages.
        #[must_use]
        pub fn pages(&self) -> u64 {
            self.window.pages(self.total.0)
        }

        /// Indicates whether a page follows this one.
        #[must_use]
        pub fn has_next(&self) -> bool {
            u64::from(self.window.number.get()) < self.pages()
        }

        /// Indicates whether a page precedes this one.
        #[must_use]
        pub fn has_previous(&self) -> bool {
            self.window.number.previous().is_some()
        }
    }

    #[cfg(test)]
    mod spec {
        use std::num::NonZeroU32;

        use common::pagination::{Number, Window};

        use super::{Page, TotalCount};

        fn page(number: u32, total: u64) -> Page {
            Page {
                window: Window {
                    number: Number::new(number).unwrap(),
                    size: NonZeroU32::new(10).unwrap(),
                },
                total: TotalCount(total),
                ids: vec![],
            }
        }

        #[test]
        fn tells_neighbours() {
            let first = page(1, 25);
            assert_eq!(first.pages(), 3);
            assert!(first.has_next());
            assert!(!first.has_previous());

            let last = page(3, 25);
            assert!(!last.has_next());
            assert!(last.has_previous());

            let empty = page(1, 0);
            assert_eq!(empty.pages(), 1);
            assert!(!empty.has_next());
        }
    }
}
