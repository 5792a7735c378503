//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an envseal command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - API endpoints pointed at `self.api_url`
    /// - Current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envseal").expect("failed to find envseal binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("ENVSEAL_API_URL", &self.api_url);
        cmd.env("ENVSEAL_GRAPHQL_URL", format!("{}/graphql", self.api_url));
        cmd.env("ENVSEAL_AUTH_URL", format!("{}/auth", self.api_url));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENVSEAL_LOG");
        cmd.env_remove("ENVSEAL_CONFIG");
        cmd.env_remove("ENVSEAL_CREDENTIALS_DIR");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `envseal pull`.
    pub fn pull(&self, secret_id: &str, format: &str) -> Output {
        self.cmd()
            .args(["pull", secret_id, "--format", format])
            .output()
            .expect("failed to run envseal pull")
    }

    /// Shortcut for `envseal push`.
    pub fn push(&self, secret_id: &str, file: &str, exposable: &[&str]) -> Output {
        let mut cmd = self.cmd();
        cmd.args(["push", secret_id, "--file", file]);
        if !exposable.is_empty() {
            cmd.arg("--exposable").args(exposable);
        }
        cmd.output().expect("failed to run envseal push")
    }

    /// Shortcut for `envseal whoami`.
    pub fn whoami(&self) -> Output {
        self.cmd()
            .arg("whoami")
            .output()
            .expect("failed to run envseal whoami")
    }

    /// Shortcut for `envseal logout`.
    pub fn logout(&self) -> Output {
        self.cmd()
            .arg("logout")
            .output()
            .expect("failed to run envseal logout")
    }
}
