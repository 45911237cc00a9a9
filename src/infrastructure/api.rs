//! Blocking HTTP client for the deployment platform

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Config, DeployRequest, Deployment, EnvVar, PackageUpload, ResourceType};
use crate::infrastructure::error::{ApiError, ApiErrorKind, ApiResult};
use crate::infrastructure::traits::PlatformApi;

/// Version of the deploy API this client speaks.
const DEPLOY_API_VERSION: &str = "v1";

/// Mime type of package archives.
const ARCHIVE_MIME: &str = "application/x-gzip";

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    prefix: &'a str,
    suffix: &'a str,
    version: &'a str,
}

#[derive(Serialize)]
struct BranchListBody<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct BranchList {
    branches: Vec<String>,
}

#[derive(Serialize)]
struct AddRepositoryBody<'a> {
    url: &'a str,
    branch: &'a str,
    jsons: &'a [String],
}

#[derive(Deserialize)]
struct AddRepositoryResponse {
    id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployBody<'a> {
    resource_type: ResourceType,
    suffix: &'a str,
    release: &'a str,
    env: &'a [EnvVar],
    plan: &'a str,
    version: &'a str,
}

/// Platform client authenticating with `Authorization: jwt <token>`.
#[derive(Debug, Clone)]
pub struct HttpPlatformApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpPlatformApi {
    pub fn new(config: &Config, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::new(ApiErrorKind::Transport, format!("build client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(AUTHORIZATION, format!("jwt {}", self.token))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header(AUTHORIZATION, format!("jwt {}", self.token))
    }

    /// Send and turn non-success statuses into tagged errors.
    fn send(&self, request: RequestBuilder, action: &str) -> ApiResult<Response> {
        let response = request
            .send()
            .map_err(|e| ApiError::new(ApiErrorKind::Transport, format!("{action}: {e}")))?;

        let status = response.status();
        debug!("{action}: HTTP {status}");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let detail = body.trim();
        let message = if detail.is_empty() {
            format!("{action}: HTTP {status}")
        } else {
            format!("{action}: HTTP {status}: {detail}")
        };
        Err(ApiError::from_status(status.as_u16(), message))
    }

    fn json<T: DeserializeOwned>(response: Response, action: &str) -> ApiResult<T> {
        response
            .json::<T>()
            .map_err(|e| ApiError::new(ApiErrorKind::Decode, format!("{action}: {e}")))
    }
}

impl PlatformApi for HttpPlatformApi {
    #[instrument(skip(self))]
    fn validate(&self) -> ApiResult<()> {
        self.send(self.get("validate"), "validate token")?;
        Ok(())
    }

    #[instrument(skip(self, password))]
    fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let request = self
            .client
            .post(self.url("login"))
            .json(&LoginBody { email, password });
        let response = self.send(request, "login")?;
        let token = response
            .text()
            .map_err(|e| ApiError::new(ApiErrorKind::Decode, format!("login: {e}")))?;
        let token = token.trim().trim_matches('"').to_string();
        if token.is_empty() {
            return Err(ApiError::new(ApiErrorKind::Decode, "login: empty token"));
        }
        Ok(token)
    }

    #[instrument(skip(self))]
    fn inspect(&self) -> ApiResult<Vec<Deployment>> {
        let response = self.send(self.get("api/inspect"), "inspect")?;
        Self::json(response, "inspect")
    }

    #[instrument(skip(self))]
    fn delete(&self, prefix: &str, suffix: &str, version: &str) -> ApiResult<()> {
        let body = DeleteBody {
            prefix,
            suffix,
            version,
        };
        self.send(self.post("api/deploy/delete").json(&body), "delete deployment")?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn branch_list(&self, url: &str) -> ApiResult<Vec<String>> {
        let request = self
            .post("api/repository/branchlist")
            .json(&BranchListBody { url });
        let response = self.send(request, "list branches")?;
        Ok(Self::json::<BranchList>(response, "list branches")?.branches)
    }

    #[instrument(skip(self, jsons))]
    fn add_repository(&self, url: &str, branch: &str, jsons: &[String]) -> ApiResult<String> {
        let request = self
            .post("api/repository/add")
            .json(&AddRepositoryBody { url, branch, jsons });
        let response = self.send(request, "add repository")?;
        Ok(Self::json::<AddRepositoryResponse>(response, "add repository")?.id)
    }

    #[instrument(skip(self, upload), fields(name = %upload.name, bytes = upload.archive.len()))]
    fn upload_package(&self, upload: &PackageUpload) -> ApiResult<()> {
        let encode = |e: serde_json::Error| {
            ApiError::new(ApiErrorKind::Client, format!("upload package: {e}"))
        };
        let raw = Part::bytes(upload.archive.clone())
            .file_name(format!("{}.tar.gz", upload.name))
            .mime_str(ARCHIVE_MIME)
            .map_err(|e| ApiError::new(ApiErrorKind::Client, format!("upload package: {e}")))?;
        let form = Form::new()
            .text("id", upload.name.clone())
            .text("type", ARCHIVE_MIME)
            .text("jsons", serde_json::to_string(&upload.jsons).map_err(encode)?)
            .text("runners", serde_json::to_string(&upload.runners).map_err(encode)?)
            .part("raw", raw);

        self.send(self.post("api/package/create").multipart(form), "upload package")?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(suffix = %request.suffix, plan = %request.plan))]
    fn deploy(&self, request: &DeployRequest) -> ApiResult<()> {
        let body = DeployBody {
            resource_type: request.resource_type,
            suffix: &request.suffix,
            release: &request.release,
            env: &request.env,
            plan: request.plan.as_str(),
            version: DEPLOY_API_VERSION,
        };
        self.send(self.post("api/deploy/create").json(&body), "create deployment")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Plan;

    fn api(base_url: &str) -> HttpPlatformApi {
        let config = Config {
            token: "t0k3n".into(),
            base_url: base_url.into(),
        };
        HttpPlatformApi::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn given_trailing_slash_when_building_url_then_joins_once() {
        let api = api("https://platform.test/");
        assert_eq!(api.url("api/inspect"), "https://platform.test/api/inspect");
        assert_eq!(api.url("/validate"), "https://platform.test/validate");
    }

    #[test]
    fn given_deploy_request_when_serializing_body_then_uses_camel_case() {
        let request = DeployRequest {
            suffix: "my-app".into(),
            resource_type: ResourceType::Repository,
            plan: Plan::new("Essential").unwrap(),
            env: vec!["A=1".parse().unwrap()],
            release: "18c".into(),
        };
        let body = DeployBody {
            resource_type: request.resource_type,
            suffix: &request.suffix,
            release: &request.release,
            env: &request.env,
            plan: request.plan.as_str(),
            version: DEPLOY_API_VERSION,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["resourceType"], "Repository");
        assert_eq!(json["suffix"], "my-app");
        assert_eq!(json["plan"], "Essential");
        assert_eq!(json["version"], "v1");
        assert_eq!(json["env"][0]["name"], "A");
        assert_eq!(json["env"][0]["value"], "1");
    }

    #[test]
    fn given_unreachable_host_when_calling_then_reports_transport_error() {
        // Nothing listens on the discard port locally.
        let api = api("http://127.0.0.1:9");
        let err = api.inspect().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(err.message.starts_with("inspect:"));
    }
}
