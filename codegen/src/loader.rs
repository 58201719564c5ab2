//! Runtime-side reconstruction of a document from a generated unit.

use crate::codec::DocumentCodec;
use crate::emitter::GeneratedUnit;
use crate::error::DocumentError;

/// Run the unit's driver and decode the reassembled text.
pub fn load<C: DocumentCodec>(
    codec: &C,
    unit: &GeneratedUnit,
) -> Result<C::Document, DocumentError<C::Error>> {
    let text = unit.run_driver()?;
    codec.decode(&text).map_err(DocumentError::Serialization)
}
