//! Domain entities: core data structures

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Lifecycle state reported by the platform for a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Create,
    Ready,
    Fail,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentStatus::Create => "create",
            DeploymentStatus::Ready => "ready",
            DeploymentStatus::Fail => "fail",
            DeploymentStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Function exported by a deployed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
}

/// Exported scope of a deployed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scope {
    pub funcs: Vec<Function>,
}

/// Package loaded by a deployment, as reported by inspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentPackage {
    pub name: String,
    pub scope: Scope,
}

/// A deployed application, identified by (prefix, suffix, version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub status: DeploymentStatus,
    /// Account-scoped prefix assigned by the platform
    pub prefix: String,
    /// Deployment name
    pub suffix: String,
    pub version: String,
    /// Packages keyed by language id (e.g. "node", "py")
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<DeploymentPackage>>,
    #[serde(default)]
    pub ports: Vec<u16>,
}

impl Deployment {
    pub fn is_ready(&self) -> bool {
        self.status == DeploymentStatus::Ready
    }

    /// Text shown in selection lists: `<suffix> <version>`.
    pub fn label(&self) -> String {
        format!("{} {}", self.suffix, self.version)
    }

    /// Names of all exported functions across packages, in language order.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.packages
            .values()
            .flatten()
            .flat_map(|p| p.scope.funcs.iter())
            .map(|f| f.name.as_str())
    }

    /// URL used to invoke `function` on this deployment.
    pub fn invoke_url(&self, base_url: &str, function: &str) -> String {
        format!(
            "{}/{}/{}/{}/call/{}",
            base_url.trim_end_matches('/'),
            self.prefix,
            self.suffix,
            self.version,
            function
        )
    }
}

/// Credentials and endpoint for one run, produced by startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub base_url: String,
}

/// Deployment plan (tier/quota). Opaque to the client and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plan(String);

impl Plan {
    /// Plans offered by the interactive selection.
    pub const KNOWN: [&'static str; 3] = ["Essential", "Standard", "Premium"];

    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyPlan);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Environment variable passed to a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl FromStr for EnvVar {
    type Err = DomainError;

    /// Parse `NAME=value`. The value may be empty and may contain `=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidEnvVar(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(DomainError::InvalidEnvVar(s.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Parse dotenv content into variables.
///
/// Accepts `NAME=value` and `export NAME=value` lines, skips blanks and `#` comments,
/// strips trailing comments outside quotes and surrounding quotes from values.
pub fn parse_dotenv(content: &str) -> Result<Vec<EnvVar>, DomainError> {
    let mut vars = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let rest = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let mut var: EnvVar = rest.parse()?;
        var.value = strip_quotes(strip_trailing_comment(&var.value));
        vars.push(var);
    }
    Ok(vars)
}

/// Merge variables so that later entries override earlier ones with the same name.
/// First-seen order of names is kept.
pub fn merge_env(base: Vec<EnvVar>, overrides: &[EnvVar]) -> Vec<EnvVar> {
    let mut merged = base;
    for var in overrides {
        match merged.iter_mut().find(|v| v.name == var.name) {
            Some(existing) => existing.value = var.value.clone(),
            None => merged.push(var.clone()),
        }
    }
    merged
}

/// Cut a `#` comment that is not inside quotes: `'a#b' # note` → `'a#b'`.
fn strip_trailing_comment(s: &str) -> &str {
    let s = s.trim();
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(open), c) if c == open => quote = None,
            (None, '#') => return s[..i].trim_end(),
            _ => {}
        }
    }
    s
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    let quoted = (s.starts_with('"') && s.ends_with('"'))
        || (s.starts_with('\'') && s.ends_with('\''));
    if quoted && s.len() >= 2 {
        return s[1..s.len() - 1].to_string();
    }
    s.to_string()
}

/// Where the platform takes the deployment's code from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Package,
    Repository,
}

/// Request to create a deployment from an uploaded package or a registered repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Deployment name (package id or repository id)
    pub suffix: String,
    pub resource_type: ResourceType,
    pub plan: Plan,
    pub env: Vec<EnvVar>,
    /// Release tag distinguishing successive deploys of the same name
    pub release: String,
}

/// Archive plus metadata sent to the package upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpload {
    pub name: String,
    /// gzip'd tarball of the package files
    pub archive: Vec<u8>,
    /// Contents of the package's descriptor files
    pub jsons: Vec<String>,
    pub runners: Vec<String>,
}

/// Descriptor file found in a package (`metacall.json`, `metacall-<lang>.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Path relative to the package root
    pub path: PathBuf,
    pub content: String,
}

/// Deployable contents of a work directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub root: PathBuf,
    /// Files relative to `root`, sorted
    pub files: Vec<PathBuf>,
    /// Runtimes the platform must provision, sorted and unique
    pub runners: BTreeSet<String>,
    pub descriptors: Vec<Descriptor>,
}

/// Runner implied by a dependency manifest file name.
pub fn detect_runner(file_name: &str) -> Option<&'static str> {
    match file_name {
        "package.json" => Some("nodejs"),
        "requirements.txt" => Some("python"),
        "Gemfile" => Some("ruby"),
        name if name.ends_with(".csproj") => Some("csharp"),
        _ => None,
    }
}

/// Whether a file name denotes a deployment descriptor.
pub fn is_descriptor(file_name: &str) -> bool {
    file_name == "metacall.json"
        || (file_name.starts_with("metacall-") && file_name.ends_with(".json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn deployment(suffix: &str, version: &str, status: DeploymentStatus) -> Deployment {
        Deployment {
            status,
            prefix: "acme".into(),
            suffix: suffix.into(),
            version: version.into(),
            packages: BTreeMap::new(),
            ports: vec![],
        }
    }

    #[test]
    fn given_deployment_when_label_then_joins_suffix_and_version() {
        let dep = deployment("foo", "1.2.3", DeploymentStatus::Ready);
        assert_eq!(dep.label(), "foo 1.2.3");
        assert!(dep.is_ready());
    }

    #[test]
    fn given_unknown_status_when_deserializing_then_maps_to_unknown() {
        let json = r#"{"status":"sleeping","prefix":"p","suffix":"s","version":"v1"}"#;
        let dep: Deployment = serde_json::from_str(json).unwrap();
        assert_eq!(dep.status, DeploymentStatus::Unknown);
        assert!(dep.packages.is_empty());
        assert!(!dep.is_ready());
    }

    #[test]
    fn given_packages_when_listing_functions_then_flattens_all_languages() {
        let json = r#"{
            "status": "ready", "prefix": "p", "suffix": "s", "version": "v1",
            "packages": {
                "node": [{"name": "index.js", "scope": {"funcs": [{"name": "sum"}]}}],
                "py": [{"name": "main.py", "scope": {"funcs": [{"name": "mul"}, {"name": "div"}]}}]
            },
            "ports": [9000]
        }"#;
        let dep: Deployment = serde_json::from_str(json).unwrap();
        let funcs: Vec<&str> = dep.functions().collect();
        assert_eq!(funcs, vec!["sum", "mul", "div"]);
        assert_eq!(
            dep.invoke_url("https://platform.test/", "sum"),
            "https://platform.test/p/s/v1/call/sum"
        );
    }

    #[rstest]
    #[case("FOO=bar", "FOO", "bar")]
    #[case("FOO=", "FOO", "")]
    #[case("URL=http://x?a=b", "URL", "http://x?a=b")]
    #[case(" FOO =bar", "FOO", "bar")]
    fn given_valid_pair_when_parsing_env_var_then_splits_on_first_equals(
        #[case] input: &str,
        #[case] name: &str,
        #[case] value: &str,
    ) {
        let var: EnvVar = input.parse().unwrap();
        assert_eq!(var.name, name);
        assert_eq!(var.value, value);
    }

    #[rstest]
    #[case("FOO")]
    #[case("=bar")]
    #[case("MY VAR=1")]
    fn given_malformed_pair_when_parsing_env_var_then_errors(#[case] input: &str) {
        assert!(input.parse::<EnvVar>().is_err());
    }

    #[test]
    fn given_dotenv_content_when_parsing_then_handles_export_comments_and_quotes() {
        let content = r#"
# database
export DB_HOST=localhost
DB_PASS='se#cret'  # trailing
EMPTY=
GREETING="hello world"
"#;
        let vars = parse_dotenv(content).unwrap();
        let pairs: Vec<(&str, &str)> = vars
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("DB_HOST", "localhost"),
                ("DB_PASS", "se#cret"),
                ("EMPTY", ""),
                ("GREETING", "hello world"),
            ]
        );
    }

    #[test]
    fn given_overrides_when_merging_env_then_later_values_win() {
        let base = vec!["A=1".parse().unwrap(), "B=2".parse().unwrap()];
        let overrides: Vec<EnvVar> = vec!["B=3".parse().unwrap(), "C=4".parse().unwrap()];
        let merged = merge_env(base, &overrides);
        let pairs: Vec<String> = merged
            .iter()
            .map(|v| format!("{}={}", v.name, v.value))
            .collect();
        assert_eq!(pairs, vec!["A=1", "B=3", "C=4"]);
    }

    #[test]
    fn given_blank_name_when_creating_plan_then_errors() {
        assert!(Plan::new("  ").is_err());
        assert_eq!(Plan::new("Essential").unwrap().as_str(), "Essential");
    }

    #[rstest]
    #[case("package.json", Some("nodejs"))]
    #[case("requirements.txt", Some("python"))]
    #[case("Gemfile", Some("ruby"))]
    #[case("app.csproj", Some("csharp"))]
    #[case("index.js", None)]
    fn given_file_name_when_detecting_runner_then_maps_manifest(
        #[case] file_name: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(detect_runner(file_name), expected);
    }

    #[test]
    fn given_descriptor_names_when_checking_then_matches_metacall_json_family() {
        assert!(is_descriptor("metacall.json"));
        assert!(is_descriptor("metacall-py.json"));
        assert!(!is_descriptor("package.json"));
        assert!(!is_descriptor("metacall.yaml"));
    }
}
