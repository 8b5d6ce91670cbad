#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Runs the `baches` binary with config and data directories isolated in a
/// temp dir, pointed at `base_url`.
pub struct BachesTest {
    pub temp_dir: TempDir,
    base_url: String,
    token: Option<String>,
    binary_path: &'static str,
}

impl BachesTest {
    pub fn new(base_url: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        BachesTest {
            temp_dir,
            base_url: base_url.to_string(),
            token: None,
            binary_path: env!("CARGO_BIN_EXE_baches"),
        }
    }

    /// Export `BACHES_TOKEN` for every command
    pub fn with_env_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("BACHES_CONFIG_DIR", self.config_dir())
            .env("BACHES_DATA_DIR", self.data_dir())
            .env("BACHES_BASE_URL", &self.base_url)
            .env("NO_COLOR", "1")
            .env_remove("BACHES_TIMEOUT_MS")
            .env_remove("BACHES_LOG")
            .stdin(Stdio::null());
        match &self.token {
            Some(token) => cmd.env("BACHES_TOKEN", token),
            None => cmd.env_remove("BACHES_TOKEN"),
        };
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute baches command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {args:?}: {e}\n{stdout}"))
    }

    pub fn write_token_storage(&self, token: &str) {
        let dir = self.data_dir();
        fs::create_dir_all(&dir).expect("Failed to create data directory");
        fs::write(
            dir.join("storage.json"),
            json!({ "token": token }).to_string(),
        )
        .expect("Failed to write token storage");
    }

    pub fn read_token_storage(&self) -> Option<Value> {
        let content = fs::read_to_string(self.data_dir().join("storage.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.config_dir();
        fs::create_dir_all(&dir).expect("Failed to create config directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.config_dir().join("config.yaml")).ok()
    }
}

/// Backend JSON for report 42 with no repair assigned yet
pub fn unassigned_report_json() -> Value {
    json!({
        "potholeId": 42,
        "citizenName": "Ana López",
        "dateReported": "2025-03-01T09:30:00",
        "streetName": "Av. Juárez",
        "betweenStreets": "Madero y 5 de Mayo",
        "repairId": null,
        "squadId": null,
        "startDate": null,
        "endDate": null,
        "statusId": null
    })
}

/// Backend JSON for report 42 after repair 7 was created
pub fn assigned_report_json() -> Value {
    json!({
        "potholeId": 42,
        "citizenName": "Ana López",
        "dateReported": "2025-03-01T09:30:00",
        "streetName": "Av. Juárez",
        "betweenStreets": "Madero y 5 de Mayo",
        "repairId": 7,
        "squadId": 1,
        "startDate": "2025-03-03",
        "endDate": null,
        "statusId": 2
    })
}

pub fn catalogs_json() -> Value {
    json!({
        "squads": [
            { "squadId": 1, "squadName": "Cuadrilla Norte" },
            { "squadId": 2, "squadName": "Cuadrilla Sur" }
        ],
        "statuses": [
            { "statusId": 1, "statusName": "Pendiente" },
            { "statusId": 2, "statusName": "En proceso" },
            { "statusId": 3, "statusName": "Terminado" }
        ]
    })
}
