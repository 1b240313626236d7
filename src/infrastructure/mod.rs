pub mod graphql;

pub use graphql::{BoardsApi, GraphqlClient};
