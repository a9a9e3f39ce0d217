//! Automatic JSON bodies.
//!
//! Values whose shape is in the application's allow-list are serialized and
//! tagged `application/json`. Everything else is passed down the chain
//! untouched, as if this interceptor were not installed.

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::trace;

use super::{Interceptor, Next, ResponseContext};
use crate::config::ConfigStore;
use crate::error::Error;
use crate::response::ContentType;

/// Serializes eligible handler values. Installed by
/// [`Router::json`](crate::Router::json).
#[derive(Clone, Debug)]
pub struct JsonInterceptor {
    store: Arc<ConfigStore>,
}

impl JsonInterceptor {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }
}

impl Interceptor for JsonInterceptor {
    fn intercept(
        &self,
        value: Value,
        res: &mut ResponseContext,
        next: Next<'_>,
    ) -> Result<Bytes, Error> {
        let Some(shape) = self.store.eligible_types().classify(&value) else {
            trace!("no eligible shape, delegating");
            return next.run(value, res);
        };
        trace!(shape = shape.name(), "serializing as json");

        // Any existing content-type is overwritten, never merged.
        res.headers.insert(CONTENT_TYPE, ContentType::Json.header_value());
        let text = self.store.serialize(&value)?;
        Ok(Bytes::from(text))
    }
}
