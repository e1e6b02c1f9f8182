//! Middleware for services that return envelopes

pub mod request_tracking;

pub use request_tracking::{
    request_id_from_headers, request_id_layer, request_id_propagation_layer, MakeUuidRequestId,
    REQUEST_ID_HEADER,
};
