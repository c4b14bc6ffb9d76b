pub mod get;
pub mod get_title;
pub mod list;

pub use get::{GetPublicationError, GetPublicationQuery, PublicationDetail, ReleaseLink};
pub use get_title::{GetPublicationTitleError, GetPublicationTitleQuery, PublicationTitle};
pub use list::{
    ListPublicationsError, ListPublicationsQuery, ListPublicationsResponse, PublicationListItem,
    PublicationSort,
};
