//! In-memory [`Database`] running [`Command`]s without PostgreSQL.
//!
//! [`Command`]: crate::Command

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time,
};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    DateTime, Money,
};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        company, compass,
        data::Name,
        estate::{self, City, Country, Details, Location},
        rm,
        taxon::{self, Applicability, Vocabulary},
        user, Company, Compass, Data, Estate, Rm, Taxon,
    },
    task, Config, Service,
};

use super::{Database, Error};

/// Entities stored in a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub(crate) struct State {
    pub(crate) estates: HashMap<estate::Id, Estate>,
    pub(crate) rms: HashMap<rm::Id, Rm>,
    pub(crate) taxons: HashMap<taxon::Id, Taxon>,
    pub(crate) compass: HashMap<compass::Id, Compass>,
    pub(crate) companies: HashMap<company::Id, Company>,
}

/// Committed [`State`] shared between clones.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Arc<Mutex<State>>);

impl Memory {
    /// Returns a copy of the committed [`State`].
    pub(crate) fn committed(&self) -> State {
        lock(&self.0).clone()
    }
}

/// Transaction staging its changes until [`Commit`].
#[derive(Debug)]
pub(crate) struct Tx {
    /// [`State`] the staged changes are committed into.
    base: Arc<Mutex<State>>,

    /// [`State`] with the uncommitted changes.
    staged: Mutex<State>,
}

impl Tx {
    fn staged(&self) -> MutexGuard<'_, State> {
        lock(&self.staged)
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

type Result<T> = std::result::Result<T, Traced<Error>>;

impl Database<Transact> for Memory {
    type Ok = Tx;
    type Err = Traced<Error>;

    async fn execute(&self, _: Transact) -> Result<Tx> {
        Ok(Tx {
            base: Arc::clone(&self.0),
            staged: Mutex::new(self.committed()),
        })
    }
}

impl Database<Commit> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Commit) -> Result<()> {
        *lock(&self.base) = self.staged().clone();
        Ok(())
    }
}

impl Database<Lock<By<Estate, estate::Id>>> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Lock<By<Estate, estate::Id>>) -> Result<()> {
        Ok(())
    }
}

impl Database<Select<By<Option<Estate>, estate::Id>>> for Tx {
    type Ok = Option<Estate>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Estate>, estate::Id>>,
    ) -> Result<Self::Ok> {
        Ok(self.staged().estates.get(&by.into_inner()).cloned())
    }
}

impl Database<Update<Estate>> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, Update(estate): Update<Estate>) -> Result<()> {
        _ = self.staged().estates.insert(estate.id, estate);
        Ok(())
    }
}

impl Database<Delete<By<Estate, estate::Id>>> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Estate, estate::Id>>,
    ) -> Result<()> {
        let id = by.into_inner();
        let mut state = self.staged();
        _ = state.estates.remove(&id);
        state.rms.retain(|_, rm| rm.estate_id != id);
        Ok(())
    }
}

impl Database<Select<By<Option<Rm>, rm::Id>>> for Tx {
    type Ok = Option<Rm>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rm>, rm::Id>>,
    ) -> Result<Self::Ok> {
        Ok(self.staged().rms.get(&by.into_inner()).cloned())
    }
}

impl Database<Insert<Rm>> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, Insert(rm): Insert<Rm>) -> Result<()> {
        _ = self.staged().rms.insert(rm.id, rm);
        Ok(())
    }
}

impl Database<Delete<By<Rm, rm::Id>>> for Tx {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, Delete(by): Delete<By<Rm, rm::Id>>) -> Result<()> {
        _ = self.staged().rms.remove(&by.into_inner());
        Ok(())
    }
}

impl Database<Select<By<HashMap<taxon::Id, Taxon>, Vec<taxon::Id>>>> for Tx {
    type Ok = HashMap<taxon::Id, Taxon>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<taxon::Id, Taxon>, Vec<taxon::Id>>>,
    ) -> Result<Self::Ok> {
        let state = self.staged();
        Ok(by
            .into_inner()
            .into_iter()
            .filter_map(|id| Some((id, state.taxons.get(&id)?.clone())))
            .collect())
    }
}

impl Database<Select<By<HashMap<compass::Id, Compass>, Vec<compass::Id>>>>
    for Tx
{
    type Ok = HashMap<compass::Id, Compass>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<compass::Id, Compass>, Vec<compass::Id>>,
        >,
    ) -> Result<Self::Ok> {
        let state = self.staged();
        Ok(by
            .into_inner()
            .into_iter()
            .filter_map(|id| Some((id, state.compass.get(&id)?.clone())))
            .collect())
    }
}

impl Database<Select<By<Option<Company>, company::Id>>> for Tx {
    type Ok = Option<Company>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Company>, company::Id>>,
    ) -> Result<Self::Ok> {
        Ok(self.staged().companies.get(&by.into_inner()).cloned())
    }
}

/// Creates a [`Service`] on top of the provided [`Memory`] database.
pub(crate) fn service(db: Memory) -> Service<Memory> {
    Service {
        config: Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(b"test"),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"test"),
            clean_visitor_hits: task::clean_visitor_hits::Config {
                interval: time::Duration::from_secs(60),
                retention: time::Duration::from_secs(60),
            },
        },
        database: db,
    }
}

/// Creates a [`Taxon`] of the provided [`Vocabulary`].
pub(crate) fn taxon(vocabulary: Vocabulary) -> Taxon {
    Taxon {
        id: taxon::Id::new(),
        vocabulary,
        data: Data::named(Name::new("Taxon").unwrap()),
        applicability: Applicability::default(),
    }
}

/// Creates valid [`Details`] of the provided estate type.
pub(crate) fn details(kind: taxon::Id) -> Details {
    Details {
        data: Data::named(Name::new("Cottage").unwrap()),
        kind,
        location: Location {
            country: Country::new("Russia").unwrap(),
            region: None,
            city: City::new("Sochi").unwrap(),
            address: None,
            zip_code: None,
        },
        location_public: false,
        coordinates: None,
        price: Money {
            amount: Decimal::from(250_000),
            currency: common::money::Currency::Eur,
        },
        gross_size: "120".parse().unwrap(),
        live_size: "90".parse().unwrap(),
        construction_year: None,
        total_room: Some(4),
        floor: None,
        total_floor: Some(2),
        housing: true,
        rent: false,
        materials: Default::default(),
        interior: Default::default(),
        exterior: Default::default(),
        features: Default::default(),
        compass: Default::default(),
        company_id: None,
    }
}

/// Creates an [`Estate`] of the provided type owned by the provided
/// [`user::Id`].
pub(crate) fn estate(kind: taxon::Id, owner: user::Id) -> Estate {
    Estate {
        id: estate::Id::new(),
        details: details(kind),
        user_id: Some(owner),
        created_at: DateTime::now().coerce(),
        updated_at: DateTime::now().coerce(),
    }
}

/// Creates an [`Rm`] of the provided type in the provided [`Estate`].
pub(crate) fn rm(estate_id: estate::Id, kind: taxon::Id) -> Rm {
    Rm {
        id: rm::Id::new(),
        estate_id,
        kind,
        data: Data::named(Name::new("Kitchen").unwrap()),
        size: "12.5".parse().unwrap(),
        features: Default::default(),
    }
}

/// Seeds a [`Memory`] database with an [`Estate`] owned by `owner`, one
/// [`Rm`] in it, and the room/estate type [`Taxon`]s they refer to.
pub(crate) fn seeded(owner: user::Id) -> (Memory, Estate, Rm, Taxon) {
    let estate_type = taxon(Vocabulary::EstateType);
    let room_type = taxon(Vocabulary::RoomType);
    let estate = estate(estate_type.id, owner);
    let rm = rm(estate.id, room_type.id);

    let mut state = State::default();
    _ = state.taxons.insert(estate_type.id, estate_type);
    _ = state.taxons.insert(room_type.id, room_type.clone());
    _ = state.estates.insert(estate.id, estate.clone());
    _ = state.rms.insert(rm.id, rm.clone());

    (Memory(Arc::new(Mutex::new(state))), estate, rm, room_type)
}
