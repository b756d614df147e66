//! Catalog tools. All four answer `{configured: false}` without touching the
//! network when the Airtable credentials are absent.

use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::info;

use super::{
    media_error, not_configured_result, optional_integer, optional_str, required_str,
    success_result,
};
use crate::artifact::materialize;
use crate::catalog::{AirtableClient, CatalogError, CatalogRecord, ListQuery, NewAsset};
use crate::error::MediaError;
use crate::mcp::contracts::{
    TOOL_CATALOG_ADD_ASSET, TOOL_CATALOG_DOWNLOAD_ASSET, TOOL_CATALOG_GET_ASSET,
    TOOL_CATALOG_LIST_ASSETS,
};
use crate::media::{ContentKind, mime_from_path, sanitize_file_stem};
use crate::orchestrator::Orchestrator;

/// Largest file the upload endpoint accepts.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_PAGE_SIZE: u64 = 20;

pub async fn add_asset(orch: &Orchestrator, args: &Value) -> Value {
    let Some(catalog) = orch.catalog() else {
        return not_configured_result(TOOL_CATALOG_ADD_ASSET);
    };
    match run_add(catalog, args).await {
        Ok(value) => value,
        Err(err) => media_error(TOOL_CATALOG_ADD_ASSET, &err),
    }
}

pub async fn list_assets(orch: &Orchestrator, args: &Value) -> Value {
    let Some(catalog) = orch.catalog() else {
        return not_configured_result(TOOL_CATALOG_LIST_ASSETS);
    };
    match run_list(catalog, args).await {
        Ok(value) => value,
        Err(err) => media_error(TOOL_CATALOG_LIST_ASSETS, &err),
    }
}

pub async fn get_asset(orch: &Orchestrator, args: &Value) -> Value {
    let Some(catalog) = orch.catalog() else {
        return not_configured_result(TOOL_CATALOG_GET_ASSET);
    };
    match run_get(catalog, args).await {
        Ok(value) => value,
        Err(err) => media_error(TOOL_CATALOG_GET_ASSET, &err),
    }
}

pub async fn download_asset(orch: &Orchestrator, args: &Value) -> Value {
    let Some(catalog) = orch.catalog() else {
        return not_configured_result(TOOL_CATALOG_DOWNLOAD_ASSET);
    };
    match run_download(orch, catalog, args).await {
        Ok(value) => value,
        Err(err) => media_error(TOOL_CATALOG_DOWNLOAD_ASSET, &err),
    }
}

async fn run_add(catalog: &AirtableClient, args: &Value) -> Result<Value, MediaError> {
    let path = PathBuf::from(required_str(args, "file_path")?);
    let description = optional_str(args, "description")?.unwrap_or_default();

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| MediaError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(MediaError::InvalidInput(format!(
            "{} is not a file",
            path.display()
        )));
    }
    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(MediaError::InvalidInput(format!(
            "{} is {} bytes; uploads are limited to {MAX_UPLOAD_BYTES}",
            path.display(),
            metadata.len()
        )));
    }
    let bytes = tokio::fs::read(&path).await?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = ContentKind::from_path(&path);

    let created = catalog
        .create_record(&NewAsset {
            filename: filename.clone(),
            description,
            content_type: content_type.to_string(),
            attachment_url: None,
        })
        .await?;
    let uploaded = catalog
        .upload_attachment(&created.record_id, &bytes, &filename, mime_from_path(&path))
        .await?;
    info!(record_id = %created.record_id, code = ?created.code, uploaded, "asset added to catalog");

    let code = created.code.clone().unwrap_or_else(|| "(pending)".to_string());
    let mut text = format!("Added {filename} to the catalog as {code}");
    if !uploaded {
        text.push_str(" (record created, file upload failed)");
    }

    Ok(success_result(
        text,
        json!({
            "configured": true,
            "record_id": created.record_id,
            "code": created.code,
            "filename": filename,
            "content_type": content_type,
            "bytes": bytes.len(),
            "uploaded": uploaded,
        }),
    ))
}

async fn run_list(catalog: &AirtableClient, args: &Value) -> Result<Value, MediaError> {
    let content_type = optional_str(args, "content_type")?;
    let filter_formula = match (optional_str(args, "filter_formula")?, content_type) {
        (Some(formula), _) => Some(formula),
        (None, Some(kind)) => Some(format!("{{Type}}='{}'", kind.replace('\'', "\\'"))),
        (None, None) => None,
    };
    let page_size = optional_integer(args, "page_size", 1, 100)?.unwrap_or(DEFAULT_PAGE_SIZE);

    let page = catalog
        .list_records(&ListQuery {
            filter_formula,
            page_size: Some(page_size as u32),
            offset: optional_str(args, "offset")?,
        })
        .await?;

    let mut text = format!("{} asset(s)", page.records.len());
    for record in &page.records {
        text.push_str(&format!("\n{}", summary_line(record)));
    }
    if let Some(offset) = &page.offset {
        text.push_str(&format!("\nMore results: pass offset {offset}"));
    }

    Ok(success_result(
        text,
        json!({
            "configured": true,
            "count": page.records.len(),
            "records": page.records,
            "offset": page.offset,
        }),
    ))
}

async fn run_get(catalog: &AirtableClient, args: &Value) -> Result<Value, MediaError> {
    let code = required_str(args, "code")?;
    let record = find(catalog, &code).await?;

    Ok(success_result(
        summary_line(&record),
        json!({
            "configured": true,
            "record": record,
        }),
    ))
}

async fn run_download(
    orch: &Orchestrator,
    catalog: &AirtableClient,
    args: &Value,
) -> Result<Value, MediaError> {
    let code = required_str(args, "code")?;
    let record = find(catalog, &code).await?;
    let attachment = record
        .attachments
        .first()
        .ok_or_else(|| CatalogError::NoAttachment(code.clone()))?;

    let filename = match optional_str(args, "output_name")? {
        Some(name) => sanitize_file_stem(&name),
        None => attachment
            .filename
            .as_deref()
            .or(record.filename.as_deref())
            .map(sanitize_file_stem)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| sanitize_file_stem(&code)),
    };
    let dest = orch.config().catalog_download_dir.join(&filename);

    let bytes = materialize(orch.http(), &attachment.url, &dest).await?;
    info!(%code, dest = %dest.display(), bytes, "catalog asset downloaded");

    Ok(success_result(
        format!("Downloaded {code} to {} ({bytes} bytes)", dest.display()),
        json!({
            "configured": true,
            "code": code,
            "record_id": record.id,
            "local_path": dest,
            "bytes": bytes,
        }),
    ))
}

async fn find(catalog: &AirtableClient, code: &str) -> Result<CatalogRecord, MediaError> {
    catalog
        .find_by_code(code)
        .await?
        .ok_or_else(|| CatalogError::NotFound(code.to_string()).into())
}

fn summary_line(record: &CatalogRecord) -> String {
    format!(
        "{} {} [{}] {}",
        record.code.as_deref().unwrap_or("-"),
        record.filename.as_deref().unwrap_or("(unnamed)"),
        record.content_type.as_deref().unwrap_or("other"),
        record.description.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string()
}
