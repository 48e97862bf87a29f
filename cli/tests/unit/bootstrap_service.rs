//! Tests for the `bootstrap` application service.
//!
//! Every collaborator is mocked; these verify ordering, the produced config
//! and launch requests, rollback, and the final link.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use argoboot::application::services::bootstrap::{BootstrapOutcome, BootstrapPorts, bootstrap};
use argoboot::application::services::discovery::PollingDiscoverer;
use argoboot::domain::{BootstrapConfig, BootstrapError, OutputPolicy, PollSettings};

use crate::mocks::{
    FakeInstaller, MemoryFs, RecordingFetcher, RecordingLauncher, RecordingReporter, SeededLog,
};

const UUID: &str = "792c9cd6-9ece-4ebc-ff02-86eaf8bf7e73";
const BANNER: &str = "2024-05-01T10:00:00Z INF Requesting new quick Tunnel on trycloudflare.com...\n\
2024-05-01T10:00:02Z INF +--------------------------------------------------------------------------------------------+\n\
2024-05-01T10:00:02Z INF |  Your quick Tunnel has been created! Visit it at (it may take some time to be reachable):  |\n\
2024-05-01T10:00:02Z INF |  https://pink-river-lamp-oak.trycloudflare.com                                             |\n";

fn config() -> BootstrapConfig {
    let mut cfg = BootstrapConfig::new(UUID, Path::new("/srv/argo")).expect("valid config");
    cfg.poll = PollSettings {
        attempts: 20,
        interval: Duration::from_millis(1),
    };
    cfg
}

fn discoverer(hidden_reads: u32, text: &str) -> PollingDiscoverer<SeededLog> {
    PollingDiscoverer::new(SeededLog::new(hidden_reads, text), config().poll)
}

#[tokio::test]
async fn end_to_end_produces_exact_link() {
    let cfg = config();
    let fetcher = RecordingFetcher::default();
    let installer = FakeInstaller::default();
    let fs = MemoryFs::default();
    let launcher = RecordingLauncher::default();
    let discoverer = discoverer(2, BANNER);
    let reporter = RecordingReporter::default();

    let outcome = bootstrap(
        BootstrapPorts {
            fetcher: &fetcher,
            installer: &installer,
            local_fs: &fs,
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &reporter,
    )
    .await
    .expect("bootstrap");

    // Both artifacts fetched, archive installed.
    let mut downloads: Vec<PathBuf> = fetcher.downloads().into_iter().map(|(_, d)| d).collect();
    downloads.sort();
    assert_eq!(
        downloads,
        vec![
            PathBuf::from("/srv/argo/cloudflared"),
            PathBuf::from("/srv/argo/sing-box.tar.gz"),
        ]
    );
    assert_eq!(
        *installer.installs.lock().expect("lock"),
        vec![PathBuf::from("/srv/argo/sing-box.tar.gz")]
    );

    // Config written with the expected schema.
    let doc = fs
        .read(Path::new("/srv/argo/config.json"))
        .expect("config written");
    let value: serde_json::Value = serde_json::from_str(&doc).expect("json");
    assert_eq!(value["log"]["level"], "error");
    assert_eq!(value["inbounds"][0]["type"], "vless");
    assert_eq!(value["inbounds"][0]["listen"], "::");
    assert_eq!(value["inbounds"][0]["listen_port"], 8080);
    assert_eq!(value["inbounds"][0]["users"][0]["uuid"], UUID);
    assert_eq!(value["inbounds"][0]["transport"]["type"], "ws");
    assert_eq!(value["inbounds"][0]["transport"]["path"], format!("/{UUID}"));
    assert_eq!(value["inbounds"][0]["transport"]["max_early_data"], 2048);
    assert_eq!(value["outbounds"], serde_json::json!([{ "type": "direct" }]));

    // Proxy first, then tunnel.
    let launches = launcher.launches();
    assert_eq!(launches.len(), 2);
    assert_eq!(launches[0].program, PathBuf::from("/srv/argo/sing-box"));
    assert_eq!(launches[0].args, vec!["run", "-c", "/srv/argo/config.json"]);
    assert_eq!(launches[0].output, OutputPolicy::Discard);
    assert_eq!(launches[1].program, PathBuf::from("/srv/argo/cloudflared"));
    assert_eq!(
        launches[1].args,
        vec!["tunnel", "--url", "http://localhost:8080", "--loglevel", "info"]
    );
    assert_eq!(
        launches[1].output,
        OutputPolicy::AppendTo(PathBuf::from("/srv/argo/argo.log"))
    );
    assert!(launcher.terminations().is_empty());

    // Found on the third read, after two empty polls.
    assert_eq!(discoverer.source().read_count(), 3);
    let BootstrapOutcome::Ready { link } = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    let host = "pink-river-lamp-oak.trycloudflare.com";
    assert_eq!(
        link.to_string(),
        format!(
            "vless://{UUID}@{host}:443?encryption=none&security=tls&type=ws&host={host}&path=%2F{UUID}#Argo-VLESS"
        )
    );
}

#[tokio::test]
async fn present_artifacts_are_not_downloaded_but_archive_is_installed() {
    let cfg = config();
    let fetcher = RecordingFetcher {
        present: [
            PathBuf::from("/srv/argo/cloudflared"),
            PathBuf::from("/srv/argo/sing-box.tar.gz"),
        ]
        .into_iter()
        .collect(),
        ..RecordingFetcher::default()
    };
    let installer = FakeInstaller::default();
    let launcher = RecordingLauncher::default();
    let discoverer = discoverer(0, BANNER);

    let outcome = bootstrap(
        BootstrapPorts {
            fetcher: &fetcher,
            installer: &installer,
            local_fs: &MemoryFs::default(),
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &RecordingReporter::default(),
    )
    .await
    .expect("bootstrap");

    assert!(fetcher.downloads().is_empty());
    assert_eq!(installer.installs.lock().expect("lock").len(), 1);
    assert!(matches!(outcome, BootstrapOutcome::Ready { .. }));
}

#[tokio::test]
async fn download_failure_aborts_before_any_launch() {
    let cfg = config();
    let fetcher = RecordingFetcher {
        failing: [cfg.cloudflared_url.clone()].into_iter().collect(),
        ..RecordingFetcher::default()
    };
    let fs = MemoryFs::default();
    let launcher = RecordingLauncher::default();
    let discoverer = discoverer(0, BANNER);

    let err = bootstrap(
        BootstrapPorts {
            fetcher: &fetcher,
            installer: &FakeInstaller::default(),
            local_fs: &fs,
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &RecordingReporter::default(),
    )
    .await
    .expect_err("download failure is fatal");

    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::DownloadFailed { url, .. }) => assert_eq!(url, &cfg.cloudflared_url),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(launcher.launches().is_empty());
    assert!(fs.read(Path::new("/srv/argo/config.json")).is_none());
    assert_eq!(discoverer.source().read_count(), 0);
}

#[tokio::test]
async fn missing_binary_in_archive_aborts_before_config_is_written() {
    let cfg = config();
    let fs = MemoryFs::default();
    let launcher = RecordingLauncher::default();
    let discoverer = discoverer(0, BANNER);

    let err = bootstrap(
        BootstrapPorts {
            fetcher: &RecordingFetcher::default(),
            installer: &FakeInstaller {
                missing: true,
                ..FakeInstaller::default()
            },
            local_fs: &fs,
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &RecordingReporter::default(),
    )
    .await
    .expect_err("missing binary is fatal");

    assert!(matches!(
        err.downcast_ref::<BootstrapError>(),
        Some(BootstrapError::BinaryNotFound { .. })
    ));
    assert!(fs.read(Path::new("/srv/argo/config.json")).is_none());
    assert!(launcher.launches().is_empty());
}

#[tokio::test]
async fn tunnel_launch_failure_stops_the_proxy() {
    let cfg = config();
    let launcher = RecordingLauncher {
        refuse: ["cloudflared".to_string()].into_iter().collect(),
        ..RecordingLauncher::default()
    };
    let discoverer = discoverer(0, BANNER);

    let err = bootstrap(
        BootstrapPorts {
            fetcher: &RecordingFetcher::default(),
            installer: &FakeInstaller::default(),
            local_fs: &MemoryFs::default(),
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &RecordingReporter::default(),
    )
    .await
    .expect_err("launch failure is fatal");

    assert!(matches!(
        err.downcast_ref::<BootstrapError>(),
        Some(BootstrapError::LaunchFailed { .. })
    ));
    assert_eq!(launcher.launches().len(), 1, "only sing-box started");
    assert_eq!(launcher.terminations(), vec![1001], "sing-box rolled back");
    assert_eq!(discoverer.source().read_count(), 0);
}

#[tokio::test]
async fn no_hostname_degrades_to_host_not_found() {
    let mut cfg = config();
    cfg.poll = PollSettings {
        attempts: 3,
        interval: Duration::from_millis(1),
    };
    let discoverer = PollingDiscoverer::new(SeededLog::new(0, "INF starting tunnel\n"), cfg.poll);
    let launcher = RecordingLauncher::default();
    let reporter = RecordingReporter::default();

    let outcome = bootstrap(
        BootstrapPorts {
            fetcher: &RecordingFetcher::default(),
            installer: &FakeInstaller::default(),
            local_fs: &MemoryFs::default(),
            launcher: &launcher,
            discoverer: &discoverer,
        },
        &cfg,
        &reporter,
    )
    .await
    .expect("not finding a host is not an error");

    match outcome {
        BootstrapOutcome::HostNotFound { log, attempts } => {
            assert_eq!(log, PathBuf::from("/srv/argo/argo.log"));
            assert_eq!(attempts, 3);
        }
        BootstrapOutcome::Ready { .. } => panic!("no host was seeded"),
    }
    assert_eq!(launcher.launches().len(), 2, "both services stay running");
    assert!(launcher.terminations().is_empty());
}

#[tokio::test]
async fn config_is_rewritten_on_every_run() {
    let fs = MemoryFs::default();
    fs.files.lock().expect("lock").insert(
        PathBuf::from("/srv/argo/config.json"),
        r#"{"stale":true}"#.to_string(),
    );

    let mut cfg = config();
    cfg.listen_port = 9090;
    bootstrap(
        BootstrapPorts {
            fetcher: &RecordingFetcher::default(),
            installer: &FakeInstaller::default(),
            local_fs: &fs,
            launcher: &RecordingLauncher::default(),
            discoverer: &discoverer(0, BANNER),
        },
        &cfg,
        &RecordingReporter::default(),
    )
    .await
    .expect("bootstrap");

    let doc = fs
        .read(Path::new("/srv/argo/config.json"))
        .expect("config written");
    assert!(!doc.contains("stale"));
    assert!(doc.contains("9090"));
}
