//! Command dispatch.

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{info, warn};

use spa_deploy::{DeployEvent, DeployOrchestrator, RunResult, UploadRequest};
use spa_deploy_admin_client::Client;

use crate::commands::{CliCommand, Commands, UploadArg};
use crate::config::Config;

/// Runs one parsed command against the configured admin server.
pub async fn run(command: CliCommand, config: Config) -> anyhow::Result<()> {
    let client = Client::new(
        &config.server.address,
        &config.server.auth_token,
        config.timeout(),
    )
    .context("cannot create admin client")?;
    info!(address = client.address(), "connecting to admin server");

    match command.commands {
        Commands::Info { domain } => {
            let domains = client.get_domain_info(domain).await?;
            println!("{}", serde_json::to_string_pretty(&domains)?);
        }
        Commands::Upload(arg) => {
            let result = upload(&client, &config, arg).await?;
            println!(
                "{}:{} uploaded {} files, {} unchanged",
                result.domain,
                result.version(),
                result.uploaded.len(),
                result.unchanged
            );
        }
        Commands::Release { domain, version } => {
            let answer = client.release_version(&domain, version).await?;
            println!("{answer}");
        }
        Commands::Revoke { domain, version } => {
            client.revoke_version(&domain, version).await?;
            println!("{domain}:{version} revoked");
        }
    }
    Ok(())
}

async fn upload(client: &Client, config: &Config, arg: UploadArg) -> anyhow::Result<RunResult> {
    let options = config.upload_options(arg.parallel, arg.retry);
    let request = UploadRequest {
        path: arg.path,
        domain: arg.domain,
        version: arg.version,
    };

    let mut orchestrator = DeployOrchestrator::new(options);
    let reporter = orchestrator.take_events().map(|rx| tokio::spawn(report(rx)));

    let result = orchestrator.upload(client, &request).await;
    // Closing the sender ends the reporter.
    drop(orchestrator);
    if let Some(reporter) = reporter {
        let _ = reporter.await;
    }

    Ok(result?.into_result()?)
}

async fn report(mut rx: mpsc::UnboundedReceiver<DeployEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            DeployEvent::Scanned { files } => info!(files, "bundle scanned"),
            DeployEvent::Resolved(resolved) => {
                info!(version = resolved.version, origin = ?resolved.origin, "version")
            }
            DeployEvent::ManifestFetched { files } => info!(files, "server manifest"),
            DeployEvent::Planned { upload, unchanged } => info!(upload, unchanged, "plan"),
            DeployEvent::StatusChanged { version, status } => {
                info!(version, status = ?status, "status")
            }
            DeployEvent::AttemptFailed {
                key,
                attempt,
                error,
            } => warn!(%key, attempt, %error, "retrying"),
            DeployEvent::FileUploaded { key } => info!(%key, "uploaded"),
            DeployEvent::FileFailed { key, error } => warn!(%key, %error, "gave up"),
        }
    }
}
