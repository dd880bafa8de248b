use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::dto::{ActivityLogResponse, SyncRequest, SyncResponse};
use super::transport::{HttpRequest, Method, Transport};
use crate::error::{ReportError, Result};
use crate::models::{ActivityPage, Project};

pub const DEFAULT_SYNC_URL: &str = "https://api.todoist.com/sync/v9/sync";
pub const DEFAULT_ACTIVITY_URL: &str = "https://api.todoist.com/sync/v9/activity/get";

/// Source of activity log pages for the report builder
pub trait ActivitySource {
    fn fetch_activity_page(
        &self,
        project_id: &str,
        event_type: &str,
        page: u32,
        offset: u64,
        limit: u32,
    ) -> Result<ActivityPage>;
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub sync: Url,
    pub activity: Url,
}

impl Endpoints {
    pub fn parse(sync: &str, activity: &str) -> Result<Self> {
        let parse = |raw: &str| {
            Url::parse(raw)
                .map_err(|e| ReportError::Config(format!("Invalid endpoint URL {}: {}", raw, e)))
        };
        Ok(Self {
            sync: parse(sync)?,
            activity: parse(activity)?,
        })
    }
}

/// Client for the project listing and activity log endpoints
pub struct ActivityClient<T: Transport> {
    transport: T,
    token: String,
    endpoints: Endpoints,
}

impl<T: Transport> ActivityClient<T> {
    pub fn new(transport: T, token: impl Into<String>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            token: token.into(),
            endpoints,
        }
    }

    /// Fetch every project with a full sync
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let body = serde_json::to_vec(&SyncRequest::all_projects())
            .map_err(|e| ReportError::remote(self.endpoints.sync.path(), e))?;

        let request = HttpRequest::new(Method::Post, self.endpoints.sync.clone())
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            .body(body);

        let response: SyncResponse = self.execute(request)?;
        debug!(
            projects = response.projects.len(),
            full_sync = response.full_sync,
            sync_token = %response.sync_token,
            "fetched projects"
        );

        Ok(response.projects.into_iter().map(Project::from).collect())
    }

    /// Resolve a project name to its id. Matching is exact and case-sensitive.
    pub fn resolve_project_id(&self, name: &str) -> Result<String> {
        let projects = self.list_projects()?;
        find_project(&projects, name)
            .map(|p| p.id.clone())
            .ok_or_else(|| ReportError::ProjectNotFound(name.to_string()))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        let endpoint = request.url.path().to_string();
        let response = self
            .transport
            .send(request)
            .map_err(|e| ReportError::transport(&endpoint, e))?;

        if !response.is_success() {
            return Err(ReportError::remote(
                &endpoint,
                format!(
                    "HTTP {}: {}",
                    response.status,
                    String::from_utf8_lossy(&response.body).trim()
                ),
            ));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| ReportError::remote(&endpoint, format!("invalid response: {}", e)))
    }
}

impl<T: Transport> ActivitySource for ActivityClient<T> {
    fn fetch_activity_page(
        &self,
        project_id: &str,
        event_type: &str,
        page: u32,
        offset: u64,
        limit: u32,
    ) -> Result<ActivityPage> {
        let mut url = self.endpoints.activity.clone();
        url.query_pairs_mut()
            .append_pair("event_type", event_type)
            .append_pair("parent_project_id", project_id)
            .append_pair("page", &page.to_string())
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());

        let request = HttpRequest::new(Method::Get, url).header("Authorization", self.bearer());
        let response: ActivityLogResponse = self.execute(request)?;

        debug!(page, offset, events = response.events.len(), count = response.count, "fetched activity page");
        Ok(response.into())
    }
}

fn find_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.name == name)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::transport::{HttpResponse, TransportError};
    use std::io;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records every request
    pub(crate) struct FakeTransport {
        responses: RefCell<VecDeque<std::result::Result<HttpResponse, TransportError>>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self {
                responses: RefCell::new(VecDeque::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            }));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            let err = io::Error::new(io::ErrorKind::ConnectionRefused, message.to_string());
            self.responses.borrow_mut().push_back(Err(err.into()));
            self
        }
    }

    impl Transport for &FakeTransport {
        fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::Other, "no canned response left").into()))
        }
    }

    const PROJECTS_JSON: &str = r#"{
        "projects": [
            {"id": "1", "name": "Home", "is_archived": false, "is_deleted": false, "parent_id": null},
            {"id": "2", "name": "Work", "is_archived": false, "is_deleted": false, "parent_id": null}
        ],
        "full_sync": true,
        "sync_token": "tok"
    }"#;

    fn client(transport: &FakeTransport) -> ActivityClient<&FakeTransport> {
        let endpoints = Endpoints::parse(DEFAULT_SYNC_URL, DEFAULT_ACTIVITY_URL).unwrap();
        ActivityClient::new(transport, "secret", endpoints)
    }

    #[test]
    fn test_resolve_project_id() {
        let transport = FakeTransport::new().respond(200, PROJECTS_JSON);
        let id = client(&transport).resolve_project_id("Work").unwrap();
        assert_eq!(id, "2");

        let requests = transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url.as_str(), DEFAULT_SYNC_URL);
        assert_eq!(request.header_value("Authorization"), Some("Bearer secret"));
        assert_eq!(request.header_value("Content-Type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["sync_token"], "*");
        assert_eq!(body["resource_types"], serde_json::json!(["projects"]));
    }

    #[test]
    fn test_resolve_project_not_found() {
        let transport = FakeTransport::new()
            .respond(200, r#"{"projects": [{"id": "1", "name": "Home"}], "full_sync": true, "sync_token": "t"}"#);
        let err = client(&transport).resolve_project_id("Work").unwrap_err();
        assert!(matches!(err, ReportError::ProjectNotFound(name) if name == "Work"));
    }

    #[test]
    fn test_resolve_project_is_case_sensitive() {
        let transport = FakeTransport::new().respond(200, PROJECTS_JSON);
        let err = client(&transport).resolve_project_id("work").unwrap_err();
        assert!(matches!(err, ReportError::ProjectNotFound(_)));

        let transport = FakeTransport::new().respond(200, PROJECTS_JSON);
        assert!(client(&transport).resolve_project_id("").is_err());
    }

    #[test]
    fn test_fetch_activity_page_query() {
        let transport = FakeTransport::new().respond(
            200,
            r#"{"events": [{"id": 7, "event_date": "2024-02-05T10:00:00Z", "extra_data": {"content": "Ship it"}}], "count": 1}"#,
        );

        let page = client(&transport)
            .fetch_activity_page("2203306141", "completed", 3, 100, 100)
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.events[0].extra_data.content, "Ship it");

        let requests = transport.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.method, Method::Get);
        assert!(request.body.is_none());
        assert_eq!(request.header_value("Authorization"), Some("Bearer secret"));

        let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        let expected = [
            ("event_type", "completed"),
            ("parent_project_id", "2203306141"),
            ("page", "3"),
            ("offset", "100"),
            ("limit", "100"),
        ];
        assert_eq!(query.len(), expected.len());
        for (key, value) in expected {
            assert!(query.contains(&(key.to_string(), value.to_string())), "missing {}", key);
        }
    }

    #[test]
    fn test_transport_failure_is_remote_error() {
        let transport = FakeTransport::new().fail("connection refused");
        let err = client(&transport)
            .fetch_activity_page("1", "completed", 0, 0, 100)
            .unwrap_err();
        assert!(matches!(err, ReportError::RemoteFetch { source: Some(TransportError::Io(_)), .. }));

        let chain: Vec<String> = anyhow::Error::from(err).chain().map(|e| e.to_string()).collect();
        assert!(chain.iter().any(|e| e == "connection refused"), "{:?}", chain);
    }

    #[test]
    fn test_error_status_is_remote_error() {
        let transport = FakeTransport::new().respond(401, "Unauthorized");
        let err = client(&transport).list_projects().unwrap_err();
        assert!(matches!(err, ReportError::RemoteFetch { message, .. } if message.contains("401")));
    }

    #[test]
    fn test_undecodable_body_is_remote_error() {
        let transport = FakeTransport::new().respond(200, "<html>maintenance</html>");
        let err = client(&transport)
            .fetch_activity_page("1", "completed", 0, 0, 100)
            .unwrap_err();
        assert!(matches!(err, ReportError::RemoteFetch { .. }));
    }
}
