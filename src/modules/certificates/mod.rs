pub mod handlers;
pub mod issuer;
pub mod layout;
pub mod renderer;
pub mod routes;
