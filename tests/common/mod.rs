//! Shared mocks for the I/O boundary traits
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use faasctl::config::Settings;
use faasctl::domain::{
    Config, DeployRequest, Deployment, DeploymentStatus, PackageUpload,
};
use faasctl::infrastructure::di::ServiceContainer;
use faasctl::infrastructure::traits::{
    ApiConnector, PlatformApi, Prompter, RealFileSystem, Selector,
};
use faasctl::infrastructure::{ApiError, ApiErrorKind, ApiResult};

/// One recorded platform interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect { token: String, base_url: String },
    Validate,
    Login { email: String, password: String },
    Inspect,
    Delete {
        prefix: String,
        suffix: String,
        version: String,
    },
    BranchList { url: String },
    AddRepository { url: String, branch: String },
    Upload(PackageUpload),
    Deploy(DeployRequest),
}

struct PlatformState {
    calls: Vec<Call>,
    validate: ApiResult<()>,
    login: ApiResult<String>,
    inspect: ApiResult<Vec<Deployment>>,
    delete: ApiResult<()>,
    branches: Vec<String>,
    repository_id: String,
}

/// Scripted platform: acts as both connector and client, recording every call.
#[derive(Clone)]
pub struct MockApi {
    state: Arc<Mutex<PlatformState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PlatformState {
                calls: Vec::new(),
                validate: Ok(()),
                login: Ok("fresh-token".to_string()),
                inspect: Ok(Vec::new()),
                delete: Ok(()),
                branches: vec!["main".to_string()],
                repository_id: "repo-id".to_string(),
            })),
        }
    }

    pub fn with_validate(self, result: ApiResult<()>) -> Self {
        self.state.lock().unwrap().validate = result;
        self
    }

    pub fn with_login(self, result: ApiResult<String>) -> Self {
        self.state.lock().unwrap().login = result;
        self
    }

    pub fn with_deployments(self, deployments: Vec<Deployment>) -> Self {
        self.with_inspect(Ok(deployments))
    }

    pub fn with_inspect(self, result: ApiResult<Vec<Deployment>>) -> Self {
        self.state.lock().unwrap().inspect = result;
        self
    }

    pub fn with_delete(self, result: ApiResult<()>) -> Self {
        self.state.lock().unwrap().delete = result;
        self
    }

    pub fn with_branches(self, branches: &[&str]) -> Self {
        self.state.lock().unwrap().branches = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn with_repository_id(self, id: &str) -> Self {
        self.state.lock().unwrap().repository_id = id.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn deploys(&self) -> Vec<DeployRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Deploy(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<PackageUpload> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload(upload) => Some(upload),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Delete { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl ApiConnector for MockApi {
    fn connect(&self, config: &Config) -> ApiResult<Box<dyn PlatformApi>> {
        self.record(Call::Connect {
            token: config.token.clone(),
            base_url: config.base_url.clone(),
        });
        Ok(Box::new(self.clone()))
    }
}

impl PlatformApi for MockApi {
    fn validate(&self) -> ApiResult<()> {
        self.record(Call::Validate);
        self.state.lock().unwrap().validate.clone()
    }

    fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        self.record(Call::Login {
            email: email.to_string(),
            password: password.to_string(),
        });
        self.state.lock().unwrap().login.clone()
    }

    fn inspect(&self) -> ApiResult<Vec<Deployment>> {
        self.record(Call::Inspect);
        self.state.lock().unwrap().inspect.clone()
    }

    fn delete(&self, prefix: &str, suffix: &str, version: &str) -> ApiResult<()> {
        self.record(Call::Delete {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            version: version.to_string(),
        });
        self.state.lock().unwrap().delete.clone()
    }

    fn branch_list(&self, url: &str) -> ApiResult<Vec<String>> {
        self.record(Call::BranchList {
            url: url.to_string(),
        });
        Ok(self.state.lock().unwrap().branches.clone())
    }

    fn add_repository(&self, url: &str, branch: &str, _jsons: &[String]) -> ApiResult<String> {
        self.record(Call::AddRepository {
            url: url.to_string(),
            branch: branch.to_string(),
        });
        Ok(self.state.lock().unwrap().repository_id.clone())
    }

    fn upload_package(&self, upload: &PackageUpload) -> ApiResult<()> {
        self.record(Call::Upload(upload.clone()));
        Ok(())
    }

    fn deploy(&self, request: &DeployRequest) -> ApiResult<()> {
        self.record(Call::Deploy(request.clone()));
        Ok(())
    }
}

/// Selector answering from a script of indices; records each prompt with its items.
pub struct MockSelector {
    answers: Mutex<VecDeque<Option<usize>>>,
    prompts: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockSelector {
    pub fn new(answers: &[Option<usize>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Selector that must never be asked.
    pub fn silent() -> Self {
        Self::new(&[])
    }

    pub fn prompts(&self) -> Vec<(String, Vec<String>)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Selector for MockSelector {
    fn select_one(&self, items: &[String], prompt: &str) -> io::Result<Option<usize>> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), items.to_vec()));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "unexpected selection prompt"))
    }
}

/// Prompter returning fixed answers; records the prompts shown.
pub struct MockPrompter {
    email: String,
    password: String,
    prompts: Mutex<Vec<String>>,
}

impl MockPrompter {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Prompter for MockPrompter {
    fn input(&self, prompt: &str) -> io::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.email.clone())
    }

    fn password(&self, prompt: &str) -> io::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.password.clone())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        base_url: "https://platform.test".to_string(),
        token: Some("saved-token".to_string()),
        timeout_secs: 5,
    }
}

/// Container over the real filesystem with scripted terminal and platform.
pub fn container(
    api: &MockApi,
    selector: Arc<MockSelector>,
    prompter: Arc<MockPrompter>,
    credentials_path: Option<PathBuf>,
) -> ServiceContainer {
    let mut container = ServiceContainer::with_deps(
        test_settings(),
        Arc::new(RealFileSystem),
        selector,
        prompter,
        Arc::new(api.clone()),
    );
    container.credentials_path = credentials_path;
    container
}

pub fn deployment(suffix: &str, version: &str, status: DeploymentStatus) -> Deployment {
    Deployment {
        status,
        prefix: "alice".to_string(),
        suffix: suffix.to_string(),
        version: version.to_string(),
        packages: BTreeMap::new(),
        ports: Vec::new(),
    }
}

pub fn forbidden() -> ApiError {
    ApiError::new(ApiErrorKind::Forbidden, "account disabled")
}

pub fn server_error() -> ApiError {
    ApiError::new(ApiErrorKind::Server, "inspect unavailable")
}

pub fn unauthorized() -> ApiError {
    ApiError::new(ApiErrorKind::Unauthorized, "token expired")
}
