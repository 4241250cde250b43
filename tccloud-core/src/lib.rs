//! Tencent Cloud provider core
//!
//! Entity model, provider trait and the list/resolve primitives shared by
//! every service of the Tencent Cloud provider

pub mod context;
pub mod paginate;
pub mod provider;
pub mod resolve;
pub mod resource;
pub mod schema;
