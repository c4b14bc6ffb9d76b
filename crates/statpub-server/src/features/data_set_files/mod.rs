//! Data set files: the published data files of releases, searchable and
//! filterable across themes and publications.

pub mod queries;
pub mod routes;
pub mod types;

pub use queries::{
    GetDataSetFileError, GetDataSetFileQuery, ListDataSetFilesError, ListDataSetFilesQuery,
    ListDataSetFilesResponse,
};
pub use routes::data_set_files_routes;
pub use types::{DataSetFileDetail, DataSetFileSort, DataSetFileSummary, DataSetType};
