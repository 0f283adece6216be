//! Project handle and single-request operations
//!
//! A [`Project`] is an id plus a shared transport. It does not own the transport's lifecycle.

use crate::api::endpoints;
use crate::api::transport::{Transport, TransportRequest};
use crate::api::types::{
    decode, CreateProjectRequest, DataSet, DataSetsInfo, DataSetsResponse, Link, ManageRequest,
    ManageResponse,
};
use crate::config::SchemaErrorPolicy;
use crate::error::{GdcError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Handle to one project on the platform
#[derive(Clone)]
pub struct Project {
    transport: Arc<dyn Transport>,
    id: String,
    schema_errors: SchemaErrorPolicy,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("id", &self.id)
            .field("schema_errors", &self.schema_errors)
            .finish()
    }
}

impl Project {
    pub fn new(transport: Arc<dyn Transport>, id: impl Into<String>) -> Self {
        Self {
            transport,
            id: id.into(),
            schema_errors: SchemaErrorPolicy::default(),
        }
    }

    pub fn with_schema_error_policy(mut self, policy: SchemaErrorPolicy) -> Self {
        self.schema_errors = policy;
        self
    }

    /// Create a new project and return a handle to it
    #[instrument(skip(transport, authorization_token))]
    pub async fn create(
        transport: Arc<dyn Transport>,
        title: &str,
        summary: &str,
        authorization_token: &str,
    ) -> Result<Self> {
        let body = serde_json::to_value(CreateProjectRequest::new(
            title,
            summary,
            authorization_token,
        ))?;

        let response = transport
            .request(TransportRequest::post_json(endpoints::PROJECTS_URI, body))
            .await?;

        let link: Link = decode(response, "project creation")?;
        let id = link
            .uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GdcError::unexpected(format!("project uri '{}' has no id", link.uri)))?
            .to_string();

        info!(project = %id, "Created project");
        Ok(Self::new(transport, id))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    pub fn schema_error_policy(&self) -> SchemaErrorPolicy {
        self.schema_errors
    }

    /// Delete the project.
    ///
    /// Any failure to reach the project is reported as `ProjectNotOpened`.
    pub async fn delete(&self) -> Result<()> {
        match self
            .transport
            .request(TransportRequest::delete(endpoints::project_uri(&self.id)))
            .await
        {
            Ok(_) => {
                info!(project = %self.id, "Deleted project");
                Ok(())
            },
            Err(err) => {
                warn!(project = %self.id, error = %err, "Project deletion failed");
                Err(GdcError::ProjectNotOpened(self.id.clone()))
            },
        }
    }

    /// Execute MAQL against the project's logical data model.
    ///
    /// Returns `true` when the server reports at least one affected object. Under
    /// [`SchemaErrorPolicy::Swallow`] a transport failure yields `Ok(false)` instead of an
    /// error, unlike every other operation in this crate.
    #[instrument(skip(self, maql), fields(project = %self.id))]
    pub async fn execute_maql(&self, maql: &str) -> Result<bool> {
        let body = serde_json::to_value(ManageRequest::new(maql))?;

        let response = match self
            .transport
            .request(TransportRequest::post_json(endpoints::maql_exec_uri(&self.id), body))
            .await
        {
            Ok(response) => response,
            Err(err) if err.is_transport() && self.schema_errors == SchemaErrorPolicy::Swallow => {
                warn!(error = %err, "MAQL execution failed, treating as no-op");
                return Ok(false);
            },
            Err(err) => return Err(err),
        };

        let manage: ManageResponse = decode(response, "MAQL execution")?;
        debug!(objects = manage.uris.len(), "Executed MAQL");
        Ok(!manage.uris.is_empty())
    }

    /// List the project's datasets
    pub async fn get_datasets(&self) -> Result<DataSetsInfo> {
        let response = self
            .transport
            .request(TransportRequest::get(endpoints::datasets_uri(&self.id)))
            .await?;

        let listing: DataSetsResponse = decode(response, "dataset listing")?;
        Ok(listing.data_sets_info)
    }

    /// Find a dataset by its title
    pub async fn get_dataset(&self, title: &str) -> Result<DataSet> {
        self.get_datasets()
            .await?
            .sets
            .into_iter()
            .find(|set| set.meta.title == title)
            .ok_or_else(|| GdcError::DataSetNotFound(title.to_string()))
    }

    /// Delete a dataset by its title
    pub async fn delete_dataset(&self, title: &str) -> Result<Value> {
        let dataset = self.get_dataset(title).await?;
        let response = self
            .transport
            .request(TransportRequest::delete(dataset.meta.uri.clone()))
            .await?;

        info!(project = %self.id, dataset = %title, uri = %dataset.meta.uri, "Deleted dataset");
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::transport::{Body, Method};
    use crate::testing::{MockTransport, PROJECT_ID};
    use serde_json::json;

    fn project(mock: &Arc<MockTransport>) -> Project {
        Project::new(mock.clone(), PROJECT_ID)
    }

    fn listing() -> Value {
        json!({
            "dataSetsInfo": {
                "sets": [
                    {"meta": {"title": "Sales", "uri": "/gdc/md/p1/obj/10"}},
                    {"meta": {"title": "Customers", "uri": "/gdc/md/p1/obj/11"}}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_execute_maql_with_results() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/ldm/manage", json!({"uris": ["/gdc/md/p1/obj/3"]}));

        assert!(project(&mock).execute_maql("CREATE DATASET {dataset.x};").await.unwrap());

        let call = &mock.calls()[0];
        assert_eq!(call.method, Method::Post);
        assert_eq!(
            call.body,
            Body::Json(json!({"manage": {"maql": "CREATE DATASET {dataset.x};"}}))
        );
    }

    #[tokio::test]
    async fn test_execute_maql_empty_results() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/ldm/manage", json!({"uris": []}));

        assert!(!project(&mock).execute_maql("SYNCHRONIZE {dataset.x};").await.unwrap());
    }

    #[tokio::test]
    async fn test_execute_maql_swallows_transport_errors() {
        let mock = Arc::new(MockTransport::default());
        mock.fail_on(Method::Post, 500);

        assert!(!project(&mock).execute_maql("bad").await.unwrap());
    }

    #[tokio::test]
    async fn test_execute_maql_propagates_when_configured() {
        let mock = Arc::new(MockTransport::default());
        mock.fail_on(Method::Post, 500);

        let err = project(&mock)
            .with_schema_error_policy(SchemaErrorPolicy::Propagate)
            .execute_maql("bad")
            .await
            .unwrap_err();
        assert!(matches!(err, GdcError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_execute_maql_malformed_response_is_not_swallowed() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/ldm/manage", json!({"error": "nope"}));

        let err = project(&mock).execute_maql("x").await.unwrap_err();
        assert!(matches!(err, GdcError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_get_dataset_by_title() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/data/sets", listing());

        let set = project(&mock).get_dataset("Customers").await.unwrap();
        assert_eq!(set.meta.uri, "/gdc/md/p1/obj/11");
    }

    #[tokio::test]
    async fn test_get_dataset_missing() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/data/sets", listing());

        let err = project(&mock).get_dataset("missing").await.unwrap_err();
        assert!(matches!(err, GdcError::DataSetNotFound(ref name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_delete_dataset_uses_meta_uri() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/md/p1/data/sets", listing());

        project(&mock).delete_dataset("Sales").await.unwrap();

        assert_eq!(mock.count(Method::Delete, "/gdc/md/p1/obj/10"), 1);
    }

    #[tokio::test]
    async fn test_delete_project_failure_means_not_opened() {
        let mock = Arc::new(MockTransport::default());
        mock.fail_on(Method::Delete, 404);

        let err = project(&mock).delete().await.unwrap_err();
        assert!(matches!(err, GdcError::ProjectNotOpened(ref id) if id == PROJECT_ID));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let mock = Arc::new(MockTransport::default());

        project(&mock).delete().await.unwrap();
        assert_eq!(mock.count(Method::Delete, "/gdc/projects/p1"), 1);
    }

    #[tokio::test]
    async fn test_create_project_parses_id() {
        let mock = Arc::new(MockTransport::default());
        mock.respond("/gdc/projects", json!({"uri": "/gdc/projects/xk9q2"}));

        let created = Project::create(mock.clone(), "Demo", "", "TOKEN").await.unwrap();
        assert_eq!(created.id(), "xk9q2");
    }
}
