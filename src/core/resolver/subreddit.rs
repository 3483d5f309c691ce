use futures_util::future::join_all;
use serde_json::{Map, Value};

use super::context::ResolverContext;
use super::error::{FieldError, ResolveError};
use crate::core::reddit::{Subreddit, SubredditInfo};

/// Where the value of a subreddit field comes from.
pub enum FieldSource {
    /// Read straight from the entity.
    Entity(fn(&Subreddit) -> Value),
    /// Read from the subreddit info, fetched through the data loader.
    Info(fn(&SubredditInfo) -> Value),
}

pub static SUBREDDIT_FIELDS: &[(&str, FieldSource)] = &[
    ("id", FieldSource::Entity(id)),
    ("displayName", FieldSource::Entity(display_name)),
    ("urlPath", FieldSource::Entity(url_path)),
    ("url", FieldSource::Entity(url)),
    ("title", FieldSource::Info(title)),
    ("publicDescription", FieldSource::Info(public_description)),
    ("subscriberCount", FieldSource::Info(subscriber_count)),
];

fn id(subreddit: &Subreddit) -> Value {
    Value::from(subreddit.id.as_str())
}

fn display_name(subreddit: &Subreddit) -> Value {
    Value::from(subreddit.display_name.as_str())
}

fn url_path(subreddit: &Subreddit) -> Value {
    Value::from(subreddit.url_path.as_str())
}

fn url(subreddit: &Subreddit) -> Value {
    Value::from(subreddit.url.as_str())
}

fn title(info: &SubredditInfo) -> Value {
    Value::from(info.title.as_str())
}

fn public_description(info: &SubredditInfo) -> Value {
    Value::from(info.public_description.as_str())
}

fn subscriber_count(info: &SubredditInfo) -> Value {
    info.subscribers.map(Value::from).unwrap_or(Value::Null)
}

pub fn field_source(field: &str) -> Option<&'static FieldSource> {
    SUBREDDIT_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, source)| source)
}

pub async fn resolve_field(
    ctx: &ResolverContext,
    subreddit: &Subreddit,
    field: &str,
) -> Result<Value, ResolveError> {
    match field_source(field).ok_or_else(|| ResolveError::UnknownField(field.to_string()))? {
        FieldSource::Entity(resolve) => Ok(resolve(subreddit)),
        FieldSource::Info(resolve) => {
            let info = ctx
                .data_loaders
                .subreddit_info
                .load_one(subreddit.url_path.clone())
                .await?;
            Ok(resolve(&info))
        }
    }
}

/// Resolves `fields` of one subreddit. A field whose lookup fails becomes
/// `null` and is reported in the returned errors.
pub async fn resolve_subreddit(
    ctx: &ResolverContext,
    subreddit: &Subreddit,
    fields: &[String],
) -> (Map<String, Value>, Vec<FieldError>) {
    let values = join_all(fields.iter().map(|field| resolve_field(ctx, subreddit, field))).await;

    let mut object = Map::with_capacity(fields.len());
    let mut errors = Vec::new();
    for (field, value) in fields.iter().zip(values) {
        let value = value.unwrap_or_else(|err| {
            errors.push(FieldError { path: vec![field.clone()], message: err.to_string() });
            Value::Null
        });
        object.insert(field.clone(), value);
    }
    (object, errors)
}

/// Subreddit list returned to the caller, GraphQL style.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SubredditList {
    pub data: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Resolves `fields` for every subreddit in one pass, so all info lookups of
/// the pass land in the same batch.
pub async fn resolve_subreddits(
    ctx: &ResolverContext,
    subreddits: &[Subreddit],
    fields: &[String],
) -> Result<SubredditList, ResolveError> {
    if let Some(unknown) = fields.iter().find(|field| field_source(field).is_none()) {
        return Err(ResolveError::UnknownField(unknown.clone()));
    }

    let resolved = join_all(
        subreddits
            .iter()
            .map(|subreddit| resolve_subreddit(ctx, subreddit, fields)),
    )
    .await;

    let mut list = SubredditList::default();
    for (index, (object, errors)) in resolved.into_iter().enumerate() {
        list.data.push(object);
        list.errors.extend(errors.into_iter().map(|mut error| {
            error.path.insert(0, index.to_string());
            error
        }));
    }
    Ok(list)
}
