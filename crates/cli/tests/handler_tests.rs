use std::cell::RefCell;
use std::io::Cursor;

use clap::Parser;
use hyperlab_cli::cli_args::Args;
use hyperlab_cli::handlers::Session;
use hyperlab_core::error::{Error, Result};
use hyperlab_core::host_definitions::{HostDefinition, HostsConfig};
use hyperlab_core::operations::HostQuery;
use hyperlab_core::remote::{RawOutput, RemoteExecutor};

const VM_LISTING: &str = "Name   State   CPUUsage Status
----   -----   -------- ------
web-01 Running 3        Operating normally
db-01  Off     0        Operating normally";

const NETWORK_JSON: &str = r#"{"InterfaceAlias": "Ethernet", "IPAddress": "192.168.1.20", "PrefixLength": 24}"#;

#[derive(Default)]
struct FakeHost {
    calls: RefCell<Vec<(String, String)>>,
}

impl FakeHost {
    fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }

    fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, command)| command).collect()
    }
}

impl RemoteExecutor for FakeHost {
    fn run(&self, host: &HostDefinition, command: &str) -> Result<RawOutput> {
        self.calls
            .borrow_mut()
            .push((host.id.clone(), command.to_string()));

        let stdout = if command == HostQuery::VmListing.command() {
            VM_LISTING.to_string()
        } else if command == HostQuery::Connectivity.command() {
            format!("{}\\operator\r\n", host.id)
        } else if command == HostQuery::Network.command() {
            NETWORK_JSON.to_string()
        } else {
            String::new()
        };

        Ok(RawOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

fn two_hosts() -> HostsConfig {
    let mut config = HostsConfig::single_host("atlas");
    config.hosts.push(HostDefinition::new("hermes"));
    config
}

fn run(
    argv: &[&str],
    config: &HostsConfig,
    executor: &FakeHost,
    answers: &str,
) -> (Result<()>, String) {
    let args = Args::parse_from(argv);
    let mut output = Vec::new();

    let result = Session {
        args: &args,
        config,
        executor,
        input: Cursor::new(answers.as_bytes().to_vec()),
        output: &mut output,
    }
    .run();

    (result, String::from_utf8(output).unwrap())
}

#[test]
fn test_check_connectivity_runs_on_every_host() {
    let executor = FakeHost::default();
    let (result, output) = run(
        &["hlab", "check-connectivity"],
        &two_hosts(),
        &executor,
        "",
    );

    result.unwrap();
    let hosts: Vec<String> = executor.calls().into_iter().map(|(host, _)| host).collect();
    assert_eq!(hosts, vec!["atlas", "hermes"]);
    assert!(output.contains("Connected to atlas as atlas\\operator"));
    assert!(output.contains("Connected to hermes as hermes\\operator"));
}

#[test]
fn test_check_all_restricted_to_one_host() {
    let executor = FakeHost::default();
    let (result, _) = run(
        &["hlab", "--host", "hermes", "check-all"],
        &two_hosts(),
        &executor,
        "",
    );

    result.unwrap();
    assert_eq!(
        executor.commands(),
        vec![
            HostQuery::Connectivity.command(),
            HostQuery::DiskSpace.command(),
            HostQuery::Uptime.command(),
        ]
    );
    assert!(executor.calls().iter().all(|(host, _)| host == "hermes"));
}

#[test]
fn test_unknown_host_is_error() {
    let executor = FakeHost::default();
    let (result, _) = run(&["hlab", "-H", "zeus", "check-uptime"], &two_hosts(), &executor, "");
    assert!(matches!(result, Err(Error::HostNotFound(_))));
    assert!(executor.calls().is_empty());
}

#[test]
fn test_list_vms_renders_table() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, output) = run(&["hlab", "list-vms"], &config, &executor, "");

    result.unwrap();
    assert!(output.contains("Index  Name    State    CPUUsage  Status"));
    assert!(output.contains("    1  web-01  Running  3         OK"));
    assert!(output.contains("    2  db-01   Off      0         OK"));
}

#[test]
fn test_network_report() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");

    let (result, output) = run(&["hlab", "network"], &config, &executor, "");
    result.unwrap();
    assert!(output.contains("Ethernet  192.168.1.20/24"));

    let (result, output) = run(&["hlab", "network", "--json"], &config, &executor, "");
    result.unwrap();
    assert!(output.contains("\"interface\": \"Ethernet\""));
}

#[test]
fn test_start_selected_vm() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, output) = run(&["hlab", "start"], &config, &executor, "2\n");

    result.unwrap();
    assert_eq!(
        executor.commands(),
        vec![
            HostQuery::VmListing.command(),
            "powershell -Command \"Start-VM -Name 'db-01'\"".to_string(),
        ]
    );
    assert!(output.contains("Start `db-01` on atlas"));
}

#[test]
fn test_start_named_vm_skips_listing() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, _) = run(&["hlab", "start", "web-01"], &config, &executor, "");

    result.unwrap();
    assert_eq!(
        executor.commands(),
        vec!["powershell -Command \"Start-VM -Name 'web-01'\"".to_string()]
    );
}

#[test]
fn test_invalid_selection_aborts_without_acting() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");

    let (result, _) = run(&["hlab", "save"], &config, &executor, "web-01\n");
    assert!(matches!(result, Err(Error::Input(_))));

    let (result, _) = run(&["hlab", "save"], &config, &executor, "3\n");
    assert!(matches!(result, Err(Error::Index { index: 3, len: 2 })));

    assert!(executor
        .commands()
        .iter()
        .all(|command| *command == HostQuery::VmListing.command()));
}

#[test]
fn test_attempts_allow_reprompt() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, _) = run(
        &["hlab", "--attempts", "2", "save"],
        &config,
        &executor,
        "7\n1\n",
    );

    result.unwrap();
    assert_eq!(
        executor.commands().last().unwrap(),
        "powershell -Command \"Save-VM -Name 'web-01'\""
    );
}

#[test]
fn test_vm_action_needs_single_host() {
    let executor = FakeHost::default();
    let (result, _) = run(&["hlab", "start"], &two_hosts(), &executor, "1\n");
    assert!(matches!(result, Err(Error::AmbiguousHost(_))));
    assert!(executor.calls().is_empty());
}

#[test]
fn test_stop_asks_for_confirmation() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");

    let (result, output) = run(&["hlab", "stop", "web-01"], &config, &executor, "n\n");
    result.unwrap();
    assert!(output.contains("Stop `web-01` on atlas. Are you sure?"));
    assert!(output.contains("Cancelled."));
    assert!(executor.calls().is_empty());

    let (result, _) = run(&["hlab", "stop", "web-01"], &config, &executor, "y\n");
    result.unwrap();
    assert_eq!(
        executor.commands(),
        vec!["powershell -Command \"Stop-VM -Name 'web-01'\"".to_string()]
    );
}

#[test]
fn test_force_skips_confirmation() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, output) = run(&["hlab", "-f", "restart"], &config, &executor, "");

    result.unwrap();
    assert!(!output.contains("Are you sure?"));
    assert_eq!(
        executor.commands(),
        vec!["powershell -Command \"Restart-Computer -Force\"".to_string()]
    );
}

#[test]
fn test_dry_run_does_not_change_state() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");

    let (result, output) = run(
        &["hlab", "--dry-run", "checkpoint", "-s", "pre-upgrade"],
        &config,
        &executor,
        "1\n",
    );
    result.unwrap();
    assert!(output.contains(
        "powershell -Command \"Checkpoint-VM -Name 'web-01' -SnapshotName 'pre-upgrade'\""
    ));

    let (result, output) = run(&["hlab", "-d", "shutdown"], &config, &executor, "");
    result.unwrap();
    assert!(output.contains("Stop-Computer -Force"));

    assert_eq!(executor.commands(), vec![HostQuery::VmListing.command()]);
}

#[test]
fn test_wake_requires_mac_address() {
    let executor = FakeHost::default();
    let config = HostsConfig::single_host("atlas");
    let (result, _) = run(&["hlab", "wake"], &config, &executor, "");
    assert!(matches!(result, Err(Error::MissingMacAddress(_))));

    let (result, output) = run(&["hlab", "--dry-run", "wake"], &config, &executor, "");
    assert!(matches!(result, Err(Error::MissingMacAddress(_))));
    assert!(!output.contains("Would send"));
}

#[test]
fn test_wake_dry_run() {
    let executor = FakeHost::default();
    let mut config = HostsConfig::single_host("atlas");
    config.hosts[0].mac_address = Some("aa:bb:cc:dd:ee:ff".to_string());

    let (result, output) = run(&["hlab", "--dry-run", "wake"], &config, &executor, "");
    result.unwrap();
    assert!(output.contains("Would send a magic packet for atlas (aa:bb:cc:dd:ee:ff) to 255.255.255.255:9"));
}
