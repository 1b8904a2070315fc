use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use crate::schemas::CreateUserFile;

/// Extracts a create-file body and runs the full field validation on it.
///
/// Rejections render as `400` with every violation listed; malformed JSON is
/// left to actix's own `Json` error handling.
#[derive(Debug)]
pub struct ValidatedCreate(pub CreateUserFile);

impl ValidatedCreate {
    pub fn into_inner(self) -> CreateUserFile {
        self.0
    }
}

impl FromRequest for ValidatedCreate {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(value) = body.await?;
            let create = CreateUserFile::from_value(&value)?;
            Ok(ValidatedCreate(create))
        })
    }
}
