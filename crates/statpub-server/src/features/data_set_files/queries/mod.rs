pub mod get;
pub mod list;

pub use get::{GetDataSetFileError, GetDataSetFileQuery};
pub use list::{
    ListDataSetFilesError, ListDataSetFilesQuery, ListDataSetFilesResponse,
    ResolvedDataSetFilesQuery,
};
