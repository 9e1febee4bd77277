//! # Link Validation
//!
//! Pure classification of a submitted project link against track rules.
//! Nothing here touches the network or the store; an invalid link never
//! produces a submission.

mod link;

pub use link::{
    non_public_host, validate, LinkCheck, LinkRejection, DESIGN_DOMAINS, DOCUMENT_DOMAINS,
};
