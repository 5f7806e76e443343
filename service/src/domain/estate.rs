//! [`Estate`] definitions.

use std::collections::BTreeSet;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};
use derive_more::{Display, Error, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

use super::{
    company, compass, define_id, define_text,
    taxon::{self, Vocabulary},
    user, Data, Taxon,
};

/// Real-estate listing.
#[derive(Clone, Debug)]
pub struct Estate {
    /// ID of this [`Estate`].
    pub id: Id,

    /// Editable [`Details`] of this [`Estate`].
    pub details: Details,

    /// ID of the [`User`] owning this [`Estate`], if any.
    ///
    /// [`User`]: super::User
    pub user_id: Option<user::Id>,

    /// [`DateTime`] when this [`Estate`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Estate`] was last modified.
    pub updated_at: ModificationDateTime,
}

impl Estate {
    /// Returns the [`CostPerMeter`] of this [`Estate`].
    #[must_use]
    pub fn cost_meter(&self) -> CostPerMeter {
        CostPerMeter::new(self.details.price, self.details.gross_size)
    }

    /// Indicates whether the provided [`user::Id`] owns this [`Estate`].
    #[must_use]
    pub fn is_owned_by(&self, user_id: user::Id) -> bool {
        self.user_id == Some(user_id)
    }

    /// Indicates whether this [`Estate`] may be shown to the provided viewer.
    ///
    /// Disabled [`Estate`]s are shown to their owners only.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<user::Id>) -> bool {
        self.details.data.enabled || viewer.is_some_and(|u| self.is_owned_by(u))
    }

    /// Indicates whether the exact [`Location::address`] and [`Coordinates`]
    /// of this [`Estate`] may be shown to the provided viewer.
    #[must_use]
    pub fn reveals_location_to(&self, viewer: Option<user::Id>) -> bool {
        self.details.location_public
            || viewer.is_some_and(|u| self.is_owned_by(u))
    }
}

/// Editable details of an [`Estate`].
#[derive(Clone, Debug)]
pub struct Details {
    /// Descriptive [`Data`].
    pub data: Data,

    /// [`Taxon`] of [`Vocabulary::EstateType`] this [`Estate`] is of.
    pub kind: taxon::Id,

    /// [`Location`] of the [`Estate`].
    pub location: Location,

    /// Indicator whether the exact [`Location::address`] and [`Coordinates`]
    /// are public.
    pub location_public: bool,

    /// Geographical [`Coordinates`], if known.
    pub coordinates: Option<Coordinates>,

    /// Price of the [`Estate`].
    pub price: Money,

    /// Gross [`Area`].
    pub gross_size: Area,

    /// Living [`Area`].
    pub live_size: Area,

    /// [`ConstructionYear`], if known.
    pub construction_year: Option<ConstructionYear>,

    /// Total number of rooms, if known.
    pub total_room: Option<Rooms>,

    /// [`Floor`] the [`Estate`] is located on, if applicable.
    pub floor: Option<Floor>,

    /// Number of floors in the building, if known.
    pub total_floor: Option<Floor>,

    /// Indicator whether this [`Estate`] is a housing.
    pub housing: bool,

    /// Indicator whether this [`Estate`] is offered for rent rather than sale.
    pub rent: bool,

    /// [`Taxon`]s of [`Vocabulary::Material`].
    pub materials: BTreeSet<taxon::Id>,

    /// [`Taxon`]s of [`Vocabulary::Trim`] applied inside.
    pub interior: BTreeSet<taxon::Id>,

    /// [`Taxon`]s of [`Vocabulary::Trim`] applied outside.
    pub exterior: BTreeSet<taxon::Id>,

    /// [`Taxon`]s of [`Vocabulary::EstateFeature`].
    pub features: BTreeSet<taxon::Id>,

    /// [`Compass`] points the [`Estate`] faces.
    ///
    /// [`Compass`]: super::Compass
    pub compass: BTreeSet<compass::Id>,

    /// ID of the [`Company`] owning the [`Estate`], if any.
    ///
    /// [`Company`]: super::Company
    pub company_id: Option<company::Id>,
}

impl Details {
    /// Checks the invariants of these [`Details`] not involving other
    /// entities.
    ///
    /// # Errors
    ///
    /// With the first found [`Violation`].
    pub fn check(&self, current_year: i32) -> Result<(), Violation> {
        if self.price.is_negative() {
            return Err(Violation::NegativePrice);
        }
        if self.live_size > self.gross_size {
            return Err(Violation::LiveSizeExceedsGross);
        }
        if let (Some(floor), Some(total)) = (self.floor, self.total_floor) {
            if floor > total {
                return Err(Violation::FloorAboveTotal { floor, total });
            }
        }
        if let Some(year) = self.construction_year {
            if i32::from(year.get()) > current_year {
                return Err(Violation::ConstructionYearInFuture(year));
            }
        }
        Ok(())
    }

    /// Returns every referenced [`Taxon`] along with the [`TaxonRelation`]
    /// it is referenced in.
    ///
    /// The [`Details::kind`] is reported as [`None`].
    pub fn taxons(
        &self,
    ) -> impl Iterator<Item = (taxon::Id, Option<TaxonRelation>)> + '_ {
        use TaxonRelation as R;

        std::iter::once((self.kind, None)).chain(
            [
                (R::Material, &self.materials),
                (R::Interior, &self.interior),
                (R::Exterior, &self.exterior),
                (R::Feature, &self.features),
            ]
            .into_iter()
            .flat_map(|(rel, ids)| ids.iter().map(move |id| (*id, Some(rel)))),
        )
    }

    /// Returns the set of [`taxon::Id`]s referenced in the provided
    /// [`TaxonRelation`].
    #[must_use]
    pub fn related(&self, rel: TaxonRelation) -> &BTreeSet<taxon::Id> {
        match rel {
            TaxonRelation::Material => &self.materials,
            TaxonRelation::Interior => &self.interior,
            TaxonRelation::Exterior => &self.exterior,
            TaxonRelation::Feature => &self.features,
        }
    }

    /// Returns the mutable set of [`taxon::Id`]s referenced in the provided
    /// [`TaxonRelation`].
    #[must_use]
    pub fn related_mut(
        &mut self,
        rel: TaxonRelation,
    ) -> &mut BTreeSet<taxon::Id> {
        match rel {
            TaxonRelation::Material => &mut self.materials,
            TaxonRelation::Interior => &mut self.interior,
            TaxonRelation::Exterior => &mut self.exterior,
            TaxonRelation::Feature => &mut self.features,
        }
    }
}

/// Violated invariant of [`Details`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum Violation {
    /// Price is below zero.
    #[display("Price must not be negative")]
    NegativePrice,

    /// Living area is larger than the gross one.
    #[display("Living size must not exceed gross size")]
    LiveSizeExceedsGross,

    /// Floor is above the top floor of the building.
    #[display("Floor {floor} is above the total {total} floors")]
    FloorAboveTotal {
        /// Offending floor.
        floor: Floor,

        /// Total number of floors.
        total: Floor,
    },

    /// Construction year has not come yet.
    #[display("Construction year {_0} is in the future")]
    ConstructionYearInFuture(#[error(not(source))] ConstructionYear),

    /// Referenced [`Taxon`] does not suit the place it is referenced in.
    #[display("`Taxon(id: {id})` cannot be used as {expected}")]
    UnsuitableTaxon {
        /// ID of the [`Taxon`].
        id: taxon::Id,

        /// Where the [`Taxon`] is referenced.
        expected: &'static str,
    },
}

define_id! {
    /// ID of an [`Estate`].
    Id
}

define_kind! {
    #[doc = "Relation an [`Estate`] references a [`Taxon`] in."]
    enum TaxonRelation {
        #[doc = "Building material."]
        Material = 1,

        #[doc = "Trim applied inside."]
        Interior = 2,

        #[doc = "Trim applied outside."]
        Exterior = 3,

        #[doc = "Feature of the estate."]
        Feature = 4,
    }
}

impl TaxonRelation {
    /// Checks whether the provided [`Taxon`] may be referenced in this
    /// [`TaxonRelation`], or as the [`Details::kind`] if [`None`].
    ///
    /// # Errors
    ///
    /// With [`Violation::UnsuitableTaxon`] if it may not.
    pub fn admit(rel: Option<Self>, taxon: &Taxon) -> Result<(), Violation> {
        let (vocabulary, expected) = match rel {
            None => (Vocabulary::EstateType, "an estate type"),
            Some(Self::Material) => (Vocabulary::Material, "a material"),
            Some(Self::Interior) => (Vocabulary::Trim, "an interior trim"),
            Some(Self::Exterior) => (Vocabulary::Trim, "an exterior trim"),
            Some(Self::Feature) => {
                (Vocabulary::EstateFeature, "an estate feature")
            }
        };
        let applicable = match rel {
            Some(Self::Interior) => taxon.applicability.internal,
            Some(Self::Exterior) => taxon.applicability.external,
            None | Some(Self::Material | Self::Feature) => true,
        };

        (taxon.vocabulary == vocabulary && applicable)
            .then_some(())
            .ok_or(Violation::UnsuitableTaxon {
                id: taxon.id,
                expected,
            })
    }
}

/// Location of an [`Estate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    /// [`Country`] of the [`Estate`].
    pub country: Country,

    /// [`Region`] of the [`Estate`], if any.
    pub region: Option<Region>,

    /// [`City`] of the [`Estate`].
    pub city: City,

    /// Exact [`Address`] of the [`Estate`], if known.
    pub address: Option<Address>,

    /// [`ZipCode`] of the [`Estate`], if known.
    pub zip_code: Option<ZipCode>,
}

define_text! {
    /// Country of an [`Estate`].
    Country(max = 100)
}

define_text! {
    /// Region (state, province) of an [`Estate`].
    Region(max = 255)
}

define_text! {
    /// City of an [`Estate`].
    City(max = 255)
}

define_text! {
    /// Street address of an [`Estate`].
    Address(max = 255)
}

define_text! {
    /// Zip code of an [`Estate`].
    ZipCode(max = 20)
}

/// Geographical coordinates of an [`Estate`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Coordinates {
    /// [`Latitude`] of the point.
    pub latitude: Latitude,

    /// [`Longitude`] of the point.
    pub longitude: Longitude,
}

/// Latitude in degrees, within `[-90, 90]`.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Latitude(Decimal);

impl Latitude {
    /// Creates a new [`Latitude`] if the given `degrees` are in range.
    ///
    /// Degrees are rounded to 6 decimal places.
    #[must_use]
    pub fn new(degrees: Decimal) -> Option<Self> {
        (degrees.abs() <= Decimal::from(90))
            .then(|| Self(degrees.round_dp(6)))
    }
}

/// Longitude in degrees, within `[-180, 180]`.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Longitude(Decimal);

impl Longitude {
    /// Creates a new [`Longitude`] if the given `degrees` are in range.
    ///
    /// Degrees are rounded to 6 decimal places.
    #[must_use]
    pub fn new(degrees: Decimal) -> Option<Self> {
        (degrees.abs() <= Decimal::from(180))
            .then(|| Self(degrees.round_dp(6)))
    }
}

/// Area in square metres with one decimal place.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Area(Decimal);

impl Area {
    /// Zero [`Area`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Upper bound (exclusive) of an [`Area`].
    const LIMIT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    /// Creates a new [`Area`] if the given `square_meters` are not negative.
    ///
    /// The value is rounded to one decimal place.
    #[must_use]
    pub fn new(square_meters: Decimal) -> Option<Self> {
        let rounded = square_meters.round_dp(1);
        (rounded >= Decimal::ZERO && rounded < Self::LIMIT)
            .then(|| Self(rounded.abs()))
    }

    /// Returns the underlying [`Decimal`].
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl std::str::FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Decimal>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Area`")
    }
}

/// Price of one square metre of an [`Estate`], with three decimal places.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{}{}", amount, currency)]
pub struct CostPerMeter {
    /// Amount per square metre.
    pub amount: Decimal,

    /// Currency of the [`CostPerMeter::amount`].
    pub currency: common::money::Currency,
}

impl CostPerMeter {
    /// Derives a [`CostPerMeter`] out of the total `price` and the `gross`
    /// [`Area`].
    ///
    /// Zero [`Area`] yields zero [`CostPerMeter`].
    #[must_use]
    pub fn new(price: Money, gross: Area) -> Self {
        let amount = price
            .amount
            .checked_div(gross.get())
            .map_or(Decimal::ZERO, |v| v.round_dp(3));
        Self {
            amount,
            currency: price.currency,
        }
    }
}

/// Year an [`Estate`] was built in.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ConstructionYear(i16);

impl ConstructionYear {
    /// Creates a new [`ConstructionYear`] if the given `year` is positive.
    #[must_use]
    pub fn new(year: i16) -> Option<Self> {
        (year > 0).then_some(Self(year))
    }

    /// Returns the year as a number.
    #[must_use]
    pub const fn get(self) -> i16 {
        self.0
    }
}

/// Floor number of an [`Estate`].
pub type Floor = u16;

/// Number of rooms in an [`Estate`].
pub type Rooms = u16;

/// [`DateTime`] when an [`Estate`] was created.
pub type CreationDateTime = DateTimeOf<(Estate, unit::Creation)>;

/// [`DateTime`] when an [`Estate`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Estate, unit::Modification)>;

#[cfg(test)]
mod spec {
    use std::collections::BTreeSet;

    use common::{money::Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{
        data::Name,
        taxon::{self, Applicability, Vocabulary},
        Data, Taxon,
    };

    use super::{
        Area, City, ConstructionYear, CostPerMeter, Country, Details, Estate,
        Id, Latitude, Location, Longitude, TaxonRelation, Violation,
    };

    fn details() -> Details {
        Details {
            data: Data::named(Name::new("Flat on Arbat").unwrap()),
            kind: taxon::Id::new(),
            location: Location {
                country: Country::new("Russia").unwrap(),
                region: None,
                city: City::new("Moscow").unwrap(),
                address: None,
                zip_code: None,
            },
            location_public: false,
            coordinates: None,
            price: Money {
                amount: Decimal::from(100_000),
                currency: Currency::Usd,
            },
            gross_size: "75.5".parse().unwrap(),
            live_size: "60".parse().unwrap(),
            construction_year: ConstructionYear::new(1998),
            total_room: Some(3),
            floor: Some(4),
            total_floor: Some(9),
            housing: true,
            rent: false,
            materials: BTreeSet::new(),
            interior: BTreeSet::new(),
            exterior: BTreeSet::new(),
            features: BTreeSet::new(),
            compass: BTreeSet::new(),
            company_id: None,
        }
    }

    fn taxon(vocabulary: Vocabulary, internal: bool, external: bool) -> Taxon {
        Taxon {
            id: taxon::Id::new(),
            vocabulary,
            data: Data::named(Name::new("Taxon").unwrap()),
            applicability: Applicability { internal, external },
        }
    }

    #[test]
    fn accepts_valid_details() {
        assert_eq!(details().check(2024), Ok(()));
    }

    #[test]
    fn rejects_live_size_exceeding_gross() {
        let mut d = details();
        d.live_size = "80".parse().unwrap();

        assert_eq!(d.check(2024), Err(Violation::LiveSizeExceedsGross));
    }

    #[test]
    fn rejects_floor_above_total() {
        let mut d = details();
        d.floor = Some(10);

        assert_eq!(
            d.check(2024),
            Err(Violation::FloorAboveTotal {
                floor: 10,
                total: 9
            }),
        );

        d.total_floor = None;
        assert_eq!(d.check(2024), Ok(()));
    }

    #[test]
    fn rejects_future_construction_year() {
        let mut d = details();
        d.construction_year = ConstructionYear::new(2025);

        assert!(matches!(
            d.check(2024),
            Err(Violation::ConstructionYearInFuture(_)),
        ));
        assert_eq!(d.check(2025), Ok(()));
    }

    #[test]
    fn rejects_negative_price() {
        let mut d = details();
        d.price.amount = Decimal::from(-1);

        assert_eq!(d.check(2024), Err(Violation::NegativePrice));
    }

    #[test]
    fn area_is_rounded_and_non_negative() {
        assert_eq!(
            "12.34".parse::<Area>().map(Area::get),
            Ok(Decimal::new(123, 1)),
        );
        assert!("-1".parse::<Area>().is_err());
        assert_eq!("-0.01".parse::<Area>(), Ok(Area::ZERO));
        assert!("1000000000".parse::<Area>().is_err());
    }

    #[test]
    fn coordinates_are_bounded() {
        assert!(Latitude::new(Decimal::from(90)).is_some());
        assert!(Latitude::new(Decimal::from(-91)).is_none());
        assert!(Longitude::new(Decimal::from(-180)).is_some());
        assert!(Longitude::new(Decimal::from(181)).is_none());
    }

    #[test]
    fn derives_cost_per_meter() {
        let price = Money {
            amount: Decimal::from(1000),
            currency: Currency::Eur,
        };

        let cost = CostPerMeter::new(price, "3".parse().unwrap());
        assert_eq!(cost.amount, Decimal::new(333_333, 3));
        assert_eq!(cost.currency, Currency::Eur);

        let cost = CostPerMeter::new(price, Area::ZERO);
        assert_eq!(cost.amount, Decimal::ZERO);
    }

    #[test]
    fn trims_must_match_their_side() {
        let inner = taxon(Vocabulary::Trim, true, false);
        let outer = taxon(Vocabulary::Trim, false, true);
        let both = taxon(Vocabulary::Trim, true, true);

        let interior = Some(TaxonRelation::Interior);
        let exterior = Some(TaxonRelation::Exterior);

        assert!(TaxonRelation::admit(interior, &inner).is_ok());
        assert!(TaxonRelation::admit(interior, &outer).is_err());
        assert!(TaxonRelation::admit(exterior, &outer).is_ok());
        assert!(TaxonRelation::admit(exterior, &inner).is_err());
        assert!(TaxonRelation::admit(interior, &both).is_ok());
        assert!(TaxonRelation::admit(exterior, &both).is_ok());
    }

    #[test]
    fn taxons_must_be_of_right_vocabulary() {
        let material = taxon(Vocabulary::Material, false, false);
        let kind = taxon(Vocabulary::EstateType, false, false);

        assert!(TaxonRelation::admit(None, &kind).is_ok());
        assert!(TaxonRelation::admit(None, &material).is_err());
        assert!(
            TaxonRelation::admit(Some(TaxonRelation::Material), &material)
                .is_ok(),
        );
        assert!(
            TaxonRelation::admit(Some(TaxonRelation::Feature), &material)
                .is_err(),
        );
    }

    #[test]
    fn lists_every_referenced_taxon() {
        let mut d = details();
        let trim = taxon::Id::new();
        let _ = d.interior.insert(trim);
        let _ = d.exterior.insert(trim);

        let taxons = d.taxons().collect::<Vec<_>>();

        assert_eq!(taxons.len(), 3);
        assert_eq!(taxons[0], (d.kind, None));
        assert!(taxons.contains(&(trim, Some(TaxonRelation::Interior))));
        assert!(taxons.contains(&(trim, Some(TaxonRelation::Exterior))));
    }

    #[test]
    fn hides_location_and_disabled_estates_from_strangers() {
        let owner = crate::domain::user::Id::new();
        let mut estate = Estate {
            id: Id::new(),
            details: details(),
            user_id: Some(owner),
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        };
        estate.details.data.enabled = false;

        assert!(estate.is_visible_to(Some(owner)));
        assert!(!estate.is_visible_to(None));
        assert!(!estate.is_visible_to(Some(crate::domain::user::Id::new())));

        assert!(estate.reveals_location_to(Some(owner)));
        assert!(!estate.reveals_location_to(None));
        estate.details.location_public = true;
        assert!(estate.reveals_location_to(None));
    }
}
