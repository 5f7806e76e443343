//! [`Command`] for recording a [`VisitorHit`].

use std::net::IpAddr;

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{user, visitor_hit, VisitorHit},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a [`VisitorHit`].
#[derive(Clone, Debug)]
pub struct RecordVisitorHit {
    /// Authenticated visitor, if any.
    pub user_id: Option<user::Id>,

    /// [`visitor_hit::UserAgent`] of the visitor.
    pub user_agent: visitor_hit::UserAgent,

    /// IP address of the visitor, if known.
    pub ip_address: Option<IpAddr>,

    /// [`visitor_hit::SessionKey`] of the visitor.
    pub session_key: visitor_hit::SessionKey,

    /// Indicator whether the page was requested over HTTPS.
    pub secure: bool,

    /// [`visitor_hit::Referrer`] of the page, if any.
    pub referrer: Option<visitor_hit::Referrer>,

    /// [`visitor_hit::Host`] the page was requested from, if any.
    pub host: Option<visitor_hit::Host>,

    /// Requested [`visitor_hit::Url`].
    pub url: visitor_hit::Url,
}

impl<Db> Command<RecordVisitorHit> for Service<Db>
where
    Db: Database<Insert<VisitorHit>, Err = Traced<database::Error>>,
{
    type Ok = VisitorHit;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordVisitorHit,
    ) -> Result<Self::Ok, Self::Err> {
        let RecordVisitorHit {
            user_id,
            user_agent,
            ip_address,
            session_key,
            secure,
            referrer,
            host,
            url,
        } = cmd;

        let hit = VisitorHit {
            id: visitor_hit::Id::new(),
            user_id,
            user_agent,
            ip_address,
            session_key,
            secure,
            referrer,
            host,
            url,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(hit.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(hit)
    }
}

/// Error of [`RecordVisitorHit`] [`Command`] execution.
pub type ExecutionError = database::Error;
