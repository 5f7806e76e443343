//! Descriptive [`domain::Data`]-related definitions shared by `Taxon`s,
//! `Estate`s and `Room`s.

use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLInputObject, GraphQLScalar};
use service::domain;

use crate::api::scalar;

/// Name of a catalogue entity.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "DataName", with = scalar::Via::<domain::data::Name>)]
pub struct Name(domain::data::Name);

/// Free-form description of a catalogue entity.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "DataDescription",
    with = scalar::Via::<domain::data::Description>,
)]
pub struct Description(domain::data::Description);

/// Descriptive data of a catalogue entity.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "DataInput")]
pub struct Input {
    /// Name of the entity.
    pub name: Name,

    /// Name of the entity in English, if it differs.
    pub name_en: Option<Name>,

    /// Description of the entity.
    pub description: Option<Description>,

    /// Indicator whether the entity is shown publicly. Defaults to `true`.
    pub enabled: Option<bool>,

    /// Position of the entity in lists. Lower goes first. Defaults to `0`.
    pub position: Option<i32>,
}

impl From<Input> for domain::Data {
    fn from(input: Input) -> Self {
        let Input {
            name,
            name_en,
            description,
            enabled,
            position,
        } = input;
        Self {
            name: name.into(),
            name_en: name_en.map(Into::into),
            description: description.map(Into::into),
            enabled: enabled.unwrap_or(true),
            position: position.unwrap_or_default().into(),
        }
    }
}

#[cfg(test)]
mod spec {
    use service::domain;

    use super::Input;

    #[test]
    fn fills_defaults() {
        let data = domain::Data::from(Input {
            name: domain::data::Name::new("Brick").unwrap().into(),
            name_en: None,
            description: None,
            enabled: None,
            position: None,
        });

        assert_eq!(data, domain::Data::named(data.name.clone()));
    }
}
