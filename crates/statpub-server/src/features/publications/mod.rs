pub mod queries;
pub mod routes;

pub use queries::{
    GetPublicationError, GetPublicationQuery, GetPublicationTitleError, GetPublicationTitleQuery,
    ListPublicationsError, ListPublicationsQuery, ListPublicationsResponse, PublicationDetail,
    PublicationListItem, PublicationSort, PublicationTitle,
};
pub use routes::publications_routes;
