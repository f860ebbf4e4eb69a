//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Error;

fn parse_json_rejection(err: JsonRejection) -> Error {
    match err {
        JsonRejection::JsonDataError(err) => {
            Error::bad_request("Data error").with_description(err)
        }
        JsonRejection::JsonSyntaxError(err) => {
            let description = std::error::Error::source(&err)
                .map_or_else(|| err.body_text(), ToString::to_string);

            Error::bad_request("JSON syntax error").with_description(description)
        }
        JsonRejection::MissingJsonContentType(_err) => {
            Error::bad_request("Missing `application/json` content type")
        }
        JsonRejection::BytesRejection(err) => {
            Error::bad_request("Invalid characters in JSON").with_description(err)
        }
        err => Error::bad_request("Unknown JSON error").with_description(err),
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<F>::from_request(req, state).await {
            Ok(Json(form)) => Ok(Form(form)),
            Err(err) => Err(parse_json_rejection(err)),
        }
    }
}

fn parse_path_rejection(err: PathRejection) -> Error {
    match err {
        PathRejection::FailedToDeserializePathParams(err) => {
            Error::bad_request("Invalid path parameter").with_description(err)
        }
        PathRejection::MissingPathParams(err) => {
            Error::bad_request("Missing path parameter").with_description(err)
        }
        err => Error::bad_request("Unknown path error").with_description(err),
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<P>::from_request_parts(parts, state).await {
            Ok(Path(path)) => Ok(PathParameters(path)),
            Err(err) => Err(parse_path_rejection(err)),
        }
    }
}

fn parse_query_rejection(err: QueryRejection) -> Error {
    match err {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            Error::bad_request("Invalid query parameter").with_description(err.body_text())
        }
        err => Error::bad_request("Unknown query error").with_description(err),
    }
}

/// Wrapper for the query string extractor
pub struct QueryParameters<Q>(pub Q);

impl<S, Q> FromRequestParts<S> for QueryParameters<Q>
where
    S: Send + Sync,
    Q: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<Q>::from_request_parts(parts, state).await {
            Ok(Query(query)) => Ok(QueryParameters(query)),
            Err(err) => Err(parse_query_rejection(err)),
        }
    }
}
