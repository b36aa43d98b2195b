//! Enumerate all resources, entitlements and grants and emit them as JSON lines.
use std::io::Write;

use anyhow::Result;
use futures_util::future;
use serde::Serialize;

use dogsync_conf::Conf;
use dogsync_connector::ResourceSyncer;
use dogsync_context::Context;
use dogsync_models::Entitlement;
use dogsync_models::Grant;
use dogsync_models::Resource;

use crate::init;

/// One record of the sync output stream.
#[derive(Debug, Serialize)]
#[serde(tag = "record", rename_all = "lowercase")]
enum Record<'a> {
    Resource(&'a Resource),
    Entitlement(&'a Entitlement),
    Grant(&'a Grant),
}

/// Everything enumerated for one resource kind during a pass.
#[derive(Debug, Default)]
struct KindReport {
    resources: Vec<Resource>,
    entitlements: Vec<Entitlement>,
    grants: Vec<Grant>,
}

/// Run one full sync pass and emit the graph as JSON lines on stdout.
pub async fn run(conf: Conf) -> Result<()> {
    let context = init::context(&conf);
    let connector = init::connector(&conf)?;

    // Credentials are checked once, before any sync work begins.
    connector.validate(&context).await?;

    // Resource kinds hold fully independent state and sync concurrently;
    // pages within one kind stay strictly sequential.
    let syncers = connector.syncers();
    let reports = future::try_join_all(
        syncers
            .iter()
            .map(|syncer| sync_kind(&context, syncer.as_ref())),
    )
    .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in &reports {
        emit(&mut out, report)?;
    }
    Ok(())
}

/// Drive one resource kind to exhaustion, page by page.
async fn sync_kind(context: &Context, syncer: &dyn ResourceSyncer) -> Result<KindReport> {
    let resource_type = syncer.resource_type();
    let context = context.derive_with(|builder| {
        builder.log_values(slog::o!("kind" => resource_type.kind.as_str()))
    });
    let skip_detail = resource_type.annotations.skips_entitlements_and_grants();
    let mut report = KindReport::default();

    let mut token: Option<String> = None;
    loop {
        let page = syncer.list(&context, None, token.as_deref()).await?;
        if !skip_detail {
            for resource in &page.items {
                let entitlements = drain_entitlements(&context, syncer, resource).await?;
                report.entitlements.extend(entitlements);
                let grants = drain_grants(&context, syncer, resource).await?;
                report.grants.extend(grants);
            }
        }
        report.resources.extend(page.items);
        token = page.next_token;
        if token.is_none() {
            break;
        }
    }

    slog::info!(
        context.logger, "Resource kind synced";
        "resources" => report.resources.len(),
        "entitlements" => report.entitlements.len(),
        "grants" => report.grants.len(),
    );
    Ok(report)
}

async fn drain_entitlements(
    context: &Context,
    syncer: &dyn ResourceSyncer,
    resource: &Resource,
) -> Result<Vec<Entitlement>> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = syncer
            .entitlements(context, resource, token.as_deref())
            .await?;
        items.extend(page.items);
        token = page.next_token;
        if token.is_none() {
            break;
        }
    }
    Ok(items)
}

async fn drain_grants(
    context: &Context,
    syncer: &dyn ResourceSyncer,
    resource: &Resource,
) -> Result<Vec<Grant>> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = syncer.grants(context, resource, token.as_deref()).await?;
        items.extend(page.items);
        token = page.next_token;
        if token.is_none() {
            break;
        }
    }
    Ok(items)
}

/// Write every record of a kind report, resources first.
fn emit<W>(out: &mut W, report: &KindReport) -> Result<()>
where
    W: Write,
{
    for resource in &report.resources {
        write_record(out, &Record::Resource(resource))?;
    }
    for entitlement in &report.entitlements {
        write_record(out, &Record::Entitlement(entitlement))?;
    }
    for grant in &report.grants {
        write_record(out, &Record::Grant(grant))?;
    }
    Ok(())
}

fn write_record<W>(out: &mut W, record: &Record) -> Result<()>
where
    W: Write,
{
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}
