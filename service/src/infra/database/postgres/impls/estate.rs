//! [`Estate`]-related [`Database`] implementations.

use std::collections::{BTreeSet, HashMap};

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        estate::{self, Coordinates, Details, Location, TaxonRelation},
        Estate,
    },
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

use super::data_from_row;

/// Reads an optional small unsigned integer out of an `INT4` column.
fn small(row: &Row, column: &str) -> Option<u16> {
    row.get::<_, Option<i32>>(column)
        .map(u16::try_from)
        .transpose()
        .unwrap_or_else(|_| panic!("`{column}` overflow"))
}

/// Reads an [`Estate`] without its related sets out of the provided
/// `estates` [`Row`].
fn estate_from_row(row: &Row) -> Estate {
    let coordinates = match (
        row.get::<_, Option<estate::Latitude>>("latitude"),
        row.get::<_, Option<estate::Longitude>>("longitude"),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };
    Estate {
        id: row.get("id"),
        details: Details {
            data: data_from_row(row),
            kind: row.get("kind"),
            location: Location {
                country: row.get("country"),
                region: row.get("region"),
                city: row.get("city"),
                address: row.get("address"),
                zip_code: row.get("zip_code"),
            },
            location_public: row.get("location_public"),
            coordinates,
            price: Money {
                amount: row.get("price"),
                currency: row.get("currency"),
            },
            gross_size: row.get("gross_size"),
            live_size: row.get("live_size"),
            construction_year: row.get("construction_year"),
            total_room: small(row, "total_room"),
            floor: small(row, "floor"),
            total_floor: small(row, "total_floor"),
            housing: row.get("housing"),
            rent: row.get("rent"),
            materials: BTreeSet::new(),
            interior: BTreeSet::new(),
            exterior: BTreeSet::new(),
            features: BTreeSet::new(),
            compass: BTreeSet::new(),
            company_id: row.get("company_id"),
        },
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Renders the SQL condition of the provided [`read::estate::Filter`],
/// binding its values to the `ps` parameters.
fn filter_sql<'a>(
    filter: &'a read::estate::Filter,
    search: Option<&'a FuzzPattern>,
    ps: &mut Vec<&'a (dyn ToSql + Sync)>,
) -> String {
    let read::estate::Filter {
        kind,
        rent,
        housing,
        city,
        price,
        search: _,
        viewer,
    } = filter;

    let mut bind = |p: &'a (dyn ToSql + Sync)| {
        ps.push(p);
        ps.len()
    };

    let mut conds = vec![match viewer {
        Some(v) => format!("(enabled OR user_id = ${}::UUID)", bind(v)),
        None => "enabled".to_owned(),
    }];
    if let Some(kind) = kind {
        conds.push(format!("kind = ${}::UUID", bind(kind)));
    }
    if let Some(rent) = rent {
        conds.push(format!("rent = ${}::BOOL", bind(rent)));
    }
    if let Some(housing) = housing {
        conds.push(format!("housing = ${}::BOOL", bind(housing)));
    }
    if let Some(city) = city {
        conds.push(format!("LOWER(city) = LOWER(${}::VARCHAR)", bind(city)));
    }
    if let Some(range) = price {
        conds.push(format!("currency = ${}::INT2", bind(&range.currency)));
        if let Some(min) = &range.min {
            conds.push(format!("price >= ${}::NUMERIC", bind(min)));
        }
        if let Some(max) = &range.max {
            conds.push(format!("price <= ${}::NUMERIC", bind(max)));
        }
    }
    if let Some(pattern) = search {
        conds.push(format!(
            "LOWER(name) SIMILAR TO LOWER(${}::VARCHAR)",
            bind(pattern),
        ));
    }

    conds.join(" AND ")
}

impl<C, IDs> Database<Select<By<HashMap<estate::Id, Estate>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[estate::Id]>,
{
    type Ok = HashMap<estate::Id, Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<estate::Id, Estate>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[estate::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, \
                   name, name_en, description, enabled, position, \
                   kind, \
                   country, region, city, address, zip_code, \
                   location_public, latitude, longitude, \
                   price, currency, gross_size, live_size, \
                   construction_year, total_room, floor, total_floor, \
                   housing, rent, \
                   user_id, company_id, created_at, updated_at \
            FROM estates \
            WHERE id = ANY($1::UUID[])";
        let mut estates = self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let estate = estate_from_row(row);
                (estate.id, estate)
            })
            .collect::<HashMap<_, _>>();

        const TAXONS_SQL: &str = "\
            SELECT estate_id, relation, taxon_id \
            FROM estate_taxons \
            WHERE estate_id = ANY($1::UUID[])";
        for row in self
            .query(TAXONS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            if let Some(e) = estates.get_mut(&row.get("estate_id")) {
                _ = e
                    .details
                    .related_mut(row.get("relation"))
                    .insert(row.get("taxon_id"));
            }
        }

        const COMPASS_SQL: &str = "\
            SELECT estate_id, compass_id \
            FROM estate_compass_points \
            WHERE estate_id = ANY($1::UUID[])";
        for row in self
            .query(COMPASS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
        {
            if let Some(e) = estates.get_mut(&row.get("estate_id")) {
                _ = e.details.compass.insert(row.get("compass_id"));
            }
        }

        Ok(estates)
    }
}

impl<C> Database<Select<By<Option<Estate>, estate::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Estate>, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::<HashMap<_, Estate>, _>::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Estate>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(estate): Insert<Estate>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(estate)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Estate>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(estate): Update<Estate>,
    ) -> Result<Self::Ok, Self::Err> {
        let Estate {
            id,
            details,
            user_id,
            created_at,
            updated_at,
        } = estate;
        let Details {
            data,
            kind,
            location,
            location_public,
            coordinates,
            price,
            gross_size,
            live_size,
            construction_year,
            total_room,
            floor,
            total_floor,
            housing,
            rent,
            materials: _,
            interior: _,
            exterior: _,
            features: _,
            compass,
            company_id,
        } = &details;

        let (latitude, longitude) =
            (*coordinates).map(|c| (c.latitude, c.longitude)).unzip();
        let total_room = (*total_room).map(i32::from);
        let floor = (*floor).map(i32::from);
        let total_floor = (*total_floor).map(i32::from);

        const SQL: &str = "\
            INSERT INTO estates (\
                id, \
                name, name_en, description, enabled, position, \
                kind, \
                country, region, city, address, zip_code, \
                location_public, latitude, longitude, \
                price, currency, gross_size, live_size, \
                construction_year, total_room, floor, total_floor, \
                housing, rent, \
                user_id, company_id, created_at, updated_at\
            ) VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::BOOL, $6::INT4, \
                $7::UUID, \
                $8::VARCHAR, $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
                $12::VARCHAR, \
                $13::BOOL, $14::NUMERIC, $15::NUMERIC, \
                $16::NUMERIC, $17::INT2, $18::NUMERIC, $19::NUMERIC, \
                $20::INT2, $21::INT4, $22::INT4, $23::INT4, \
                $24::BOOL, $25::BOOL, \
                $26::UUID, $27::UUID, $28::TIMESTAMPTZ, $29::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                name_en = EXCLUDED.name_en, \
                description = EXCLUDED.description, \
                enabled = EXCLUDED.enabled, \
                position = EXCLUDED.position, \
                kind = EXCLUDED.kind, \
                country = EXCLUDED.country, \
                region = EXCLUDED.region, \
                city = EXCLUDED.city, \
                address = EXCLUDED.address, \
                zip_code = EXCLUDED.zip_code, \
                location_public = EXCLUDED.location_public, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude, \
                price = EXCLUDED.price, \
                currency = EXCLUDED.currency, \
                gross_size = EXCLUDED.gross_size, \
                live_size = EXCLUDED.live_size, \
                construction_year = EXCLUDED.construction_year, \
                total_room = EXCLUDED.total_room, \
                floor = EXCLUDED.floor, \
                total_floor = EXCLUDED.total_floor, \
                housing = EXCLUDED.housing, \
                rent = EXCLUDED.rent, \
                user_id = EXCLUDED.user_id, \
                company_id = EXCLUDED.company_id, \
                updated_at = EXCLUDED.updated_at";
        _ = self
            .exec(
                SQL,
                &[
                    &id,
                    &data.name,
                    &data.name_en,
                    &data.description,
                    &data.enabled,
                    &data.position,
                    kind,
                    &location.country,
                    &location.region,
                    &location.city,
                    &location.address,
                    &location.zip_code,
                    location_public,
                    &latitude,
                    &longitude,
                    &price.amount,
                    &price.currency,
                    gross_size,
                    live_size,
                    construction_year,
                    &total_room,
                    &floor,
                    &total_floor,
                    housing,
                    rent,
                    &user_id,
                    company_id,
                    &created_at,
                    &updated_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;

        const CLEAR_TAXONS_SQL: &str = "\
            DELETE FROM estate_taxons \
            WHERE estate_id = $1::UUID";
        _ = self
            .exec(CLEAR_TAXONS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;

        let (relations, taxons): (Vec<TaxonRelation>, Vec<_>) = details
            .taxons()
            .filter_map(|(taxon, rel)| rel.map(|r| (r, taxon)))
            .unzip();
        if !taxons.is_empty() {
            const SQL: &str = "\
                INSERT INTO estate_taxons (estate_id, relation, taxon_id) \
                SELECT $1::UUID, r, t \
                FROM UNNEST($2::INT2[], $3::UUID[]) AS u(r, t)";
            _ = self
                .exec(SQL, &[&id, &relations, &taxons])
                .await
                .map_err(tracerr::wrap!())?;
        }

        const CLEAR_COMPASS_SQL: &str = "\
            DELETE FROM estate_compass_points \
            WHERE estate_id = $1::UUID";
        _ = self
            .exec(CLEAR_COMPASS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?;

        if !compass.is_empty() {
            let points = compass.iter().copied().collect::<Vec<_>>();
            const SQL: &str = "\
                INSERT INTO estate_compass_points (estate_id, compass_id) \
                SELECT $1::UUID, UNNEST($2::UUID[])";
            _ = self
                .exec(SQL, &[&id, &points])
                .await
                .map_err(tracerr::wrap!())?;
        }

        Ok(())
    }
}

impl<C> Database<Lock<By<Estate, estate::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Estate, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: estate::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM estates \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Delete<By<Estate, estate::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Estate, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: estate::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM estates \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::estate::list::Page, read::estate::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::estate::list::Page, read::estate::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::list::Selector { arguments, filter } =
            by.into_inner();

        let limit = i32::try_from(arguments.limit())
            .unwrap_or(i32::MAX - 1)
            .saturating_add(1);
        let search =
            filter.search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];
        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let filtering = filter_sql(&filter, search.as_ref(), &mut ps);

        let sql = format!(
            "SELECT id \
             FROM estates \
             WHERE {filtering} \
                   {cursor} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::estate::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C>
    Database<
        Select<
            By<read::estate::numbered::Page, read::estate::numbered::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::numbered::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::estate::numbered::Page, read::estate::numbered::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::numbered::Selector { window, filter } =
            by.into_inner();

        let limit = i64::from(window.limit());
        let offset = i64::try_from(window.offset()).unwrap_or(i64::MAX);
        let search =
            filter.search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit, &offset];
        let filtering = filter_sql(&filter, search.as_ref(), &mut ps);

        let sql = format!(
            "SELECT id, COUNT(*) OVER () AS total \
             FROM estates \
             WHERE {filtering} \
             ORDER BY position, name, id \
             LIMIT $1::INT8 OFFSET $2::INT8",
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let total = match rows.first() {
            Some(row) => {
                read::estate::TotalCount(
                    u64::try_from(row.get::<_, i64>("total"))
                        .unwrap_or_default(),
                )
            }
            // Past the last page the window function has nothing to count
            // over, so the total is asked for separately.
            None => self
                .execute(Select(By::<read::estate::TotalCount, _>::new(
                    filter.clone(),
                )))
                .await
                .map_err(tracerr::wrap!())?,
        };

        Ok(read::estate::numbered::Page {
            window,
            total,
            ids: rows.iter().map(|row| row.get("id")).collect(),
        })
    }
}

impl<C>
    Database<Select<By<read::estate::TotalCount, read::estate::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::estate::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::TotalCount, read::estate::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        let search =
            filter.search.as_ref().map(|s| FuzzPattern::new(s.as_ref()));

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let filtering = filter_sql(&filter, search.as_ref(), &mut ps);

        let sql = format!("SELECT COUNT(*) FROM estates WHERE {filtering}");
        let total = self
            .query_one(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, i64>(0);

        Ok(read::estate::TotalCount(u64::try_from(total).unwrap_or_default()))
    }
}
