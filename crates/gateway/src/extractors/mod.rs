//! Request extractors that reject with the `{ code, message }` envelope.

mod params;
mod validated_json;

pub use params::{ApiPath, ApiQuery};
pub use validated_json::{OptionalJson, ValidatedJson};
