//! Plans and executes a superglance invocation across one or more environments

use superglance_secrets::CredentialStore;

use crate::config::Document;
use crate::error::RunError;
use crate::group;
use crate::launcher::{client_args, ClientExit, LaunchRequest, Launcher, ProcessEnvironment};
use crate::resolver;

/// Validated work for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub environments: Vec<String>,
    pub client_args: Vec<String>,
}

/// Expand `requested` and validate every environment and the client arguments.
///
/// Nothing is launched unless every group member exists.
pub fn plan(
    document: &Document,
    requested: &str,
    client_args: &[String],
) -> Result<RunPlan, RunError> {
    let environments = group::expand(document, requested);

    if let Some(name) = environments
        .iter()
        .find(|name| !document.is_valid_environment(name))
    {
        return Err(RunError::InvalidEnvironment {
            name: name.clone(),
            valid: document.sections().into_iter().map(str::to_string).collect(),
        });
    }

    if client_args.is_empty() {
        return Err(RunError::NoClientArgs);
    }

    if environments.len() > 1 {
        tracing::info!(group = requested, members = ?environments, "Expanded environment group");
    }

    Ok(RunPlan {
        environments,
        client_args: client_args.to_vec(),
    })
}

/// Result of one environment's client run
#[derive(Debug)]
pub enum Outcome {
    Exited(ClientExit),
    /// The client could not be run at all
    Failed(String),
}

impl Outcome {
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Exited(exit) if exit.success())
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, Outcome)>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.success())
    }

    /// 0 when every run succeeded, else the last failure's code (1 if it had none)
    pub fn exit_code(&self) -> i32 {
        self.outcomes
            .iter()
            .rev()
            .find(|(_, outcome)| !outcome.success())
            .map(|(_, outcome)| match outcome {
                Outcome::Exited(exit) => exit.code().unwrap_or(1),
                Outcome::Failed(_) => 1,
            })
            .unwrap_or(0)
    }
}

/// Resolve and launch each planned environment in order.
///
/// A credential failure stops the run. A client that fails to start or exits
/// nonzero is logged and the remaining environments still run.
pub async fn execute<S, L>(
    document: &Document,
    store: &S,
    launcher: &L,
    plan: &RunPlan,
    force_debug: bool,
) -> Result<RunSummary, RunError>
where
    S: CredentialStore + ?Sized,
    L: Launcher + ?Sized,
{
    let mut summary = RunSummary::default();

    for environment in &plan.environments {
        let entries = resolver::resolve(document, environment, store).map_err(|source| {
            RunError::Resolve {
                environment: environment.clone(),
                source,
            }
        })?;

        let request = LaunchRequest::new(
            client_args(&plan.client_args, force_debug),
            ProcessEnvironment::capture().overlay(&entries),
        );

        let outcome = match launcher.launch(environment, request).await {
            Ok(exit) => {
                if !exit.success() {
                    tracing::warn!(environment = %environment, code = ?exit.code(), "glance client failed");
                }
                Outcome::Exited(exit)
            }
            Err(e) => {
                tracing::error!(environment = %environment, error = %e, "Failed to run glance client");
                Outcome::Failed(e.to_string())
            }
        };
        summary.outcomes.push((environment.clone(), outcome));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LaunchError, ResolveError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use superglance_secrets::MemoryStore;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        codes: Vec<(String, i32)>,
    }

    #[async_trait]
    impl Launcher for Recorder {
        async fn launch(
            &self,
            environment: &str,
            request: LaunchRequest,
        ) -> Result<ClientExit, LaunchError> {
            self.calls
                .lock()
                .unwrap()
                .push((environment.to_string(), request.args));
            if environment == "broken" {
                return Err(LaunchError::MissingPipe);
            }
            let code = self
                .codes
                .iter()
                .find(|(env, _)| env == environment)
                .map(|(_, code)| *code)
                .unwrap_or(0);
            Ok(ClientExit::from_code(code))
        }
    }

    fn doc(content: &str) -> Document {
        Document::parse(content).unwrap()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_single_environment() {
        let d = doc("[dev]\nos_username = a\n");
        let plan = plan(&d, "dev", &args(&["image-list"])).unwrap();
        assert_eq!(plan.environments, vec!["dev"]);
    }

    #[test]
    fn test_plan_invalid_environment_lists_valid_ones() {
        let d = doc("[dev]\n[prod]\n");
        match plan(&d, "qa", &args(&["image-list"])) {
            Err(RunError::InvalidEnvironment { name, valid }) => {
                assert_eq!(name, "qa");
                assert_eq!(valid, vec!["dev", "prod"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_plan_invalid_group_member() {
        let d = doc("[all]\ngroup = dev, gone\n[dev]\n");
        assert!(matches!(
            plan(&d, "all", &args(&["image-list"])),
            Err(RunError::InvalidEnvironment { ref name, .. }) if name == "gone"
        ));
    }

    #[test]
    fn test_plan_environment_checked_before_args() {
        let d = doc("[dev]\n");
        assert!(matches!(
            plan(&d, "qa", &[]),
            Err(RunError::InvalidEnvironment { .. })
        ));
        assert!(matches!(plan(&d, "dev", &[]), Err(RunError::NoClientArgs)));
    }

    #[tokio::test]
    async fn test_execute_group_in_order() {
        let d = doc("[prod]\ngroup = [east,west]\n[east]\nos_username = e\n[west]\nos_username = w\n");
        let launcher = Recorder::default();
        let plan = plan(&d, "prod", &args(&["image-list"])).unwrap();

        let summary = execute(&d, &MemoryStore::new(), &launcher, &plan, true)
            .await
            .unwrap();

        assert!(summary.success());
        assert_eq!(summary.exit_code(), 0);
        let calls = launcher.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                ("east".to_string(), args(&["-k", "--debug", "image-list"])),
                ("west".to_string(), args(&["-k", "--debug", "image-list"])),
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_continues_after_client_failure() {
        let d = doc("[all]\ngroup = a, broken, b\n[a]\n[broken]\n[b]\n");
        let launcher = Recorder {
            codes: vec![("a".to_string(), 2)],
            ..Default::default()
        };
        let plan = plan(&d, "all", &args(&["image-list"])).unwrap();

        let summary = execute(&d, &MemoryStore::new(), &launcher, &plan, false)
            .await
            .unwrap();

        assert_eq!(launcher.calls.lock().unwrap().len(), 3);
        assert!(!summary.success());
        // Last failure is the spawn failure in "broken"
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_execute_exit_code_from_last_failure() {
        let d = doc("[all]\ngroup = a, b\n[a]\n[b]\n");
        let launcher = Recorder {
            codes: vec![("a".to_string(), 2), ("b".to_string(), 4)],
            ..Default::default()
        };
        let plan = plan(&d, "all", &args(&["x"])).unwrap();
        let summary = execute(&d, &MemoryStore::new(), &launcher, &plan, false)
            .await
            .unwrap();
        assert_eq!(summary.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_execute_stops_on_missing_credential() {
        let d = doc("[all]\ngroup = a, b\n[a]\nos_password = USE_KEYRING\n[b]\n");
        let launcher = Recorder::default();
        let plan = plan(&d, "all", &args(&["image-list"])).unwrap();

        let err = execute(&d, &MemoryStore::new(), &launcher, &plan, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunError::Resolve {
                source: ResolveError::MissingCredential { .. },
                ..
            }
        ));
        assert!(launcher.calls.lock().unwrap().is_empty());
    }
}
