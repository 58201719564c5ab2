//! Document serializer seam.
//!
//! The emitter only ever calls [`DocumentCodec::encode`]; the runtime-side
//! loader only ever calls [`DocumentCodec::decode`].

use crate::document::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

pub trait DocumentCodec {
    type Document;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deterministic, canonical text for `document`.
    fn encode(&self, document: &Self::Document) -> Result<String, Self::Error>;

    fn decode(&self, text: &str) -> Result<Self::Document, Self::Error>;
}

/// JSON codec over any serde document type, [`Document`] by default.
#[derive(Debug, Clone)]
pub struct JsonCodec<D = Document> {
    pretty: bool,
    _document: PhantomData<fn() -> D>,
}

impl<D> JsonCodec<D> {
    pub fn new() -> Self {
        Self {
            pretty: true,
            _document: PhantomData,
        }
    }

    /// Single-line output. Every document then fits in one segment line.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            _document: PhantomData,
        }
    }
}

impl<D> Default for JsonCodec<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DocumentCodec for JsonCodec<D>
where
    D: Serialize + DeserializeOwned,
{
    type Document = D;
    type Error = serde_json::Error;

    fn encode(&self, document: &D) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
    }

    fn decode(&self, text: &str) -> Result<D, serde_json::Error> {
        serde_json::from_str(text)
    }
}
