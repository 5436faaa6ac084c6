//! Typed S3 listing documents.
//!
//! These are the two XML documents a plain `GET` can return besides raw
//! object bytes: the account's bucket list and a bucket's object list.

mod common;
mod responses;

pub use common::*;
pub use responses::*;
