//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{
    command,
    domain::{estate, taxon},
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `User` with the provided credentials and signs it in.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `LOGIN_OCCUPIED` - provided `UserLogin` is occupied by another
    ///                      `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = ?email,
            gql.name = "createUser",
            login = %login,
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user(
        name: api::user::Name,
        login: api::user::Login,
        password: api::user::Password,
        email: Option<api::user::Email>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                name: name.into(),
                login: login.into(),
                password: secrecy::SecretBox::init_with(|| {
                    password.clone().into()
                }),
                email: email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession {
                login: user.login,
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `User` session with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials do not match any `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            login = %login,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user_session(
        login: api::user::Login,
        password: api::user::Password,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession {
                login: login.into(),
                password: secrecy::SecretBox::init_with(move || {
                    password.into()
                }),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createCompany",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_company(
        name: api::company::Name,
        ctx: &Context,
    ) -> Result<api::Company, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateCompany { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Taxon` in the specified `Vocabulary`.
    ///
    /// `internal` and `external` may be set only for `ESTATE_FEATURE`,
    /// `TRIM`, `ROOM_FEATURE` and `ROOM_TYPE` vocabularies.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `UNSCOPED_VOCABULARY` - `internal` or `external` is set for a
    ///                           vocabulary not supporting them.
    #[tracing::instrument(
        skip_all,
        fields(
            external = ?external,
            gql.name = "createTaxon",
            internal = ?internal,
            name = %data.name,
            otel.name = Self::SPAN_NAME,
            vocabulary = ?vocabulary,
        ),
    )]
    pub async fn create_taxon(
        vocabulary: api::taxon::Vocabulary,
        data: api::data::Input,
        internal: Option<bool>,
        external: Option<bool>,
        ctx: &Context,
    ) -> Result<api::Taxon, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateTaxon {
                vocabulary: vocabulary.into(),
                data: data.into(),
                applicability: taxon::Applicability {
                    internal: internal.unwrap_or_default(),
                    external: external.unwrap_or_default(),
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `CompassPoint`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated.
    #[tracing::instrument(
        skip_all,
        fields(
            abbreviation = %abbreviation,
            gql.name = "createCompassPoint",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_compass_point(
        name: api::compass::Name,
        name_en: api::compass::Name,
        abbreviation: api::compass::Abbreviation,
        ctx: &Context,
    ) -> Result<api::Compass, Error> {
        _ = ctx.current_session().await?;

        ctx.service()
            .execute(command::CreateCompassPoint {
                name: name.into(),
                name_en: name_en.into(),
                abbreviation: abbreviation.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Estate` owned by the authenticated `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `INVALID_COORDINATES`, `INVALID_CONSTRUCTION_YEAR`,
    ///   `INVALID_NUMBER`, `INVALID_ESTATE_DETAILS` - the provided details
    ///   are invalid;
    /// - `TAXON_NOT_EXISTS`, `COMPASS_POINT_NOT_EXISTS`,
    ///   `COMPANY_NOT_EXISTS` - a referenced entity does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            city = %input.city,
            gql.name = "createEstate",
            name = %input.data.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_estate(
        input: api::estate::Input,
        ctx: &Context,
    ) -> Result<api::Estate, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let details = estate::Details::try_from(input)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        let estate = ctx
            .service()
            .execute(command::CreateEstate {
                by: my_id.into(),
                details,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.notify_success(format!(
            "Estate \"{}\" created",
            estate.details.data.name,
        ));
        Ok(estate.into())
    }

    /// Replaces the details of the `Estate` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `ESTATE_NOT_EXISTS` - the `Estate` does not exist;
    /// - `NOT_OWNER` - the authenticated `User` does not own the `Estate`;
    /// - the codes of `createEstate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateEstate",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_estate(
        id: api::estate::Id,
        input: api::estate::Input,
        ctx: &Context,
    ) -> Result<api::Estate, Error> {
        let my_id = ctx.current_session().await?.user_id;
        let details = estate::Details::try_from(input)
            .map_err(Error::from)
            .map_err(ctx.error())?;

        let estate = ctx
            .service()
            .execute(command::UpdateEstate {
                id: id.into(),
                by: my_id.into(),
                details,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.notify_success(format!(
            "Estate \"{}\" updated",
            estate.details.data.name,
        ));
        Ok(estate.into())
    }

    /// Deletes the `Estate` with the specified ID along with its `Room`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `ESTATE_NOT_EXISTS` - the `Estate` does not exist;
    /// - `NOT_OWNER` - the authenticated `User` does not own the `Estate`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteEstate",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_estate(
        id: api::estate::Id,
        ctx: &Context,
    ) -> Result<api::Estate, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let estate = ctx
            .service()
            .execute(command::DeleteEstate {
                id: id.into(),
                by: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.notify_success(format!(
            "Estate \"{}\" deleted",
            estate.details.data.name,
        ));
        Ok(estate.into())
    }

    /// Creates a new `Room` in the `Estate` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `ESTATE_NOT_EXISTS` - the `Estate` does not exist;
    /// - `NOT_OWNER` - the authenticated `User` does not own the `Estate`;
    /// - `TAXON_NOT_EXISTS` - a referenced `Taxon` does not exist;
    /// - `UNSUITABLE_TAXON` - a referenced `Taxon` is of a wrong
    ///                        `Vocabulary`.
    #[tracing::instrument(
        skip_all,
        fields(
            estate_id = %estate_id,
            gql.name = "createRoom",
            kind = %kind,
            name = %data.name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_room(
        estate_id: api::estate::Id,
        kind: api::taxon::Id,
        data: api::data::Input,
        size: api::estate::Area,
        features: Option<Vec<api::taxon::Id>>,
        ctx: &Context,
    ) -> Result<api::Rm, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let rm = ctx
            .service()
            .execute(command::CreateRm {
                estate_id: estate_id.into(),
                by: my_id.into(),
                kind: kind.into(),
                data: data.into(),
                size: size.into(),
                features: features
                    .into_iter()
                    .flatten()
                    .map(Into::into)
                    .collect(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.notify_success(format!("Room \"{}\" created", rm.data.name));
        Ok(rm.into())
    }

    /// Deletes the `Room` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the request is not authenticated;
    /// - `ROOM_NOT_EXISTS` - the `Room` does not exist;
    /// - `NOT_OWNER` - the authenticated `User` does not own the `Estate`
    ///                 of the `Room`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteRoom",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_room(
        id: api::rm::Id,
        ctx: &Context,
    ) -> Result<api::Rm, Error> {
        let my_id = ctx.current_session().await?.user_id;

        let rm = ctx
            .service()
            .execute(command::DeleteRm {
                id: id.into(),
                by: my_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.notify_success(format!("Room \"{}\" deleted", rm.data.name));
        Ok(rm.into())
    }
}

define_error! {
    enum ReferenceError {
        #[code = "COMPANY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Company` with the provided ID does not exist"]
        CompanyNotExists,

        #[code = "COMPASS_POINT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`CompassPoint` with the provided ID does not exist"]
        CompassPointNotExists,

        #[code = "ESTATE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Estate` with the provided ID does not exist"]
        EstateNotExists,

        #[code = "ROOM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Room` with the provided ID does not exist"]
        RoomNotExists,

        #[code = "TAXON_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Taxon` with the provided ID does not exist"]
        TaxonNotExists,
    }
}

/// Builds a `BAD_REQUEST` [`Error`] with the provided `code` and a message
/// describing the violation.
fn invalid(code: &'static str, violation: &impl ToString) -> Error {
    Error {
        code,
        status_code: http::StatusCode::BAD_REQUEST,
        message: violation.to_string(),
        backtrace: None,
    }
}

impl AsError for estate::Violation {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::UnsuitableTaxon { .. } => invalid("UNSUITABLE_TAXON", self),
            Self::NegativePrice
            | Self::LiveSizeExceedsGross
            | Self::FloorAboveTotal { .. }
            | Self::ConstructionYearInFuture(_) => {
                invalid("INVALID_ESTATE_DETAILS", self)
            }
        })
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "LOGIN_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Provided login is occupied by another `User`"]
                LoginOccupied,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::LoginOccupied(_) => Error::LoginOccupied.into(),
        })
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = UNAUTHORIZED]
                #[message = "Provided credentials do not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::WrongCredentials => Some(Error::WrongCredentials.into()),
        }
    }
}

impl AsError for command::create_taxon::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UnscopedVocabulary(_) => {
                Some(invalid("UNSCOPED_VOCABULARY", self))
            }
        }
    }
}

impl AsError for command::create_estate::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Invalid(v) => return v.try_as_error(),
            Self::TaxonNotExists(_) => ReferenceError::TaxonNotExists.into(),
            Self::CompassPointNotExists(_) => {
                ReferenceError::CompassPointNotExists.into()
            }
            Self::CompanyNotExists(_) => {
                ReferenceError::CompanyNotExists.into()
            }
        })
    }
}

impl AsError for command::update_estate::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::Details(e) => return e.try_as_error(),
            Self::EstateNotExists(_) => ReferenceError::EstateNotExists.into(),
            Self::NotOwner(_) => api::OwnershipError::NotOwner.into(),
        })
    }
}

impl AsError for command::delete_estate::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EstateNotExists(_) => ReferenceError::EstateNotExists.into(),
            Self::NotOwner(_) => api::OwnershipError::NotOwner.into(),
        })
    }
}

impl AsError for command::create_rm::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::EstateNotExists(_) => ReferenceError::EstateNotExists.into(),
            Self::NotOwner(_) => api::OwnershipError::NotOwner.into(),
            Self::TaxonNotExists(_) => ReferenceError::TaxonNotExists.into(),
            Self::UnsuitableTaxon(e) => invalid("UNSUITABLE_TAXON", e),
        })
    }
}

impl AsError for command::delete_rm::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RmNotExists(_) => ReferenceError::RoomNotExists.into(),
            Self::NotOwner(_) => api::OwnershipError::NotOwner.into(),
        })
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command,
        domain::{estate, taxon},
    };

    use crate::AsError as _;

    #[test]
    fn maps_ownership_and_missing_entities() {
        let id = estate::Id::new();

        let err = command::delete_estate::ExecutionError::NotOwner(id)
            .into_error();
        assert_eq!(err.code, "NOT_OWNER");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);

        let err = command::update_estate::ExecutionError::EstateNotExists(id)
            .into_error();
        assert_eq!(err.code, "ESTATE_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn exposes_violation_message() {
        let err = command::update_estate::ExecutionError::Details(
            command::create_estate::ExecutionError::Invalid(
                estate::Violation::FloorAboveTotal { floor: 10, total: 9 },
            ),
        )
        .into_error();

        assert_eq!(err.code, "INVALID_ESTATE_DETAILS");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Floor 10 is above the total 9 floors");
    }

    #[test]
    fn distinguishes_unsuitable_taxons() {
        let err = command::create_estate::ExecutionError::Invalid(
            estate::Violation::UnsuitableTaxon {
                id: taxon::Id::new(),
                expected: "a material",
            },
        )
        .into_error();

        assert_eq!(err.code, "UNSUITABLE_TAXON");
    }

    #[test]
    fn wrong_credentials_are_unauthorized() {
        let err = command::create_user_session::ExecutionError::WrongCredentials
            .into_error();

        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    }
}
