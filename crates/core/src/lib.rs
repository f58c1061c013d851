// Core types for the location-intelligence tool server: response
// normalization, the result envelope, input validation and vendor records

pub mod envelope;
pub mod normalize;
pub mod records;
pub mod validate;

pub use envelope::Envelope;
pub use normalize::{
    normalize, normalize_value, Exposure, IntoResponseNode, Primitive, Record, RecordField,
    ResponseNode,
};
pub use records::{CoordinateCheck, Coordinates, GraphQlError, GraphQlLocation, GraphQlResponse};
pub use validate::ValidationError;
