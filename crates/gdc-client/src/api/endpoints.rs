//! API endpoint URI builders
//!
//! Paths are relative to the host selected on the request.

/// Project collection
pub const PROJECTS_URI: &str = "/gdc/projects";

/// Root of the WebDAV staging area
pub const STAGING_URI: &str = "/uploads/";

/// Single project resource
pub fn project_uri(project_id: &str) -> String {
    format!("{}/{}", PROJECTS_URI, project_id)
}

/// Dataset listing for a project
pub fn datasets_uri(project_id: &str) -> String {
    format!("/gdc/md/{}/data/sets", project_id)
}

/// Logical data model management (MAQL execution)
pub fn maql_exec_uri(project_id: &str) -> String {
    format!("/gdc/md/{}/ldm/manage", project_id)
}

/// ETL pull (integration trigger)
pub fn pull_uri(project_id: &str) -> String {
    format!("/gdc/md/{}/etl/pull", project_id)
}

/// Staging directory for one upload
pub fn staging_dir_uri(dir_name: &str) -> String {
    format!("{}{}", STAGING_URI, dir_name)
}

/// File inside a staging directory
pub fn staging_file_uri(dir_name: &str, file_name: &str) -> String {
    format!("{}{}/{}", STAGING_URI, dir_name, file_name)
}
