//! Command implementations.

use std::path::PathBuf;

use chrono::DateTime;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::fs::{PublicUrlCdn, StorageEntry};

use super::command_context::CommandContext;
use super::Result;

pub async fn ls(ctx: &CommandContext, path: &str, deep: bool) -> Result<()> {
    let entries = ctx.fs.list_contents(path, deep).await?.collect().await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        match entry {
            StorageEntry::Directory(dir) => println!("{:>10}  {}/", "-", dir.path),
            StorageEntry::File(file) => {
                println!("{:>10}  {}", file.size.unwrap_or(0), file.path)
            }
        }
    }
    Ok(())
}

pub async fn cat(ctx: &CommandContext, path: &str) -> Result<()> {
    let contents = ctx.fs.read(path).await?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&contents).await?;
    stdout.flush().await?;
    Ok(())
}

pub async fn put(ctx: &CommandContext, path: &str, input: Option<&PathBuf>) -> Result<()> {
    let contents = match input {
        Some(file) => tokio::fs::read(file).await?,
        None => {
            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            buffer
        }
    };

    ctx.fs.write(path, &contents).await?;
    eprintln!("wrote {} bytes to {}", contents.len(), path);
    Ok(())
}

pub async fn rm(ctx: &CommandContext, path: &str) -> Result<()> {
    ctx.fs.delete(path).await?;
    Ok(())
}

pub async fn mkdir(ctx: &CommandContext, path: &str) -> Result<()> {
    ctx.fs.create_directory(path).await?;
    Ok(())
}

pub async fn rmdir(ctx: &CommandContext, path: &str) -> Result<()> {
    ctx.fs.delete_directory(path).await?;
    Ok(())
}

pub async fn mv(ctx: &CommandContext, source: &str, destination: &str) -> Result<()> {
    ctx.fs.move_file(source, destination).await?;
    Ok(())
}

pub async fn cp(ctx: &CommandContext, source: &str, destination: &str) -> Result<()> {
    ctx.fs.copy_file(source, destination).await?;
    Ok(())
}

pub async fn stat(ctx: &CommandContext, path: &str) -> Result<()> {
    let size = ctx.fs.file_size(path).await?;
    let modified = ctx.fs.last_modified(path).await?;

    if ctx.json {
        let value = serde_json::json!({
            "path": path,
            "size": size.size,
            "last_modified": modified.last_modified,
            "mime_type": size.mime_type,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("path:          {}", path);
    println!("size:          {}", size.size.unwrap_or(0));
    if let Some(ts) = modified.last_modified {
        let rendered = DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| ts.to_string());
        println!("last modified: {}", rendered);
    }
    if let Some(mime) = &size.mime_type {
        println!("mime type:     {}", mime);
    }
    Ok(())
}

pub async fn exists(ctx: &CommandContext, path: &str, directory: bool) -> Result<()> {
    let found = if directory {
        ctx.fs.directory_exists(path).await?
    } else {
        ctx.fs.file_exists(path).await?
    };

    println!("{}", found);
    Ok(())
}

pub fn url(ctx: &CommandContext, path: &str, cdn: PublicUrlCdn) -> Result<()> {
    println!("{}", ctx.fs.public_url(path, cdn)?);
    Ok(())
}

pub async fn rate_limit(ctx: &CommandContext) -> Result<()> {
    let status = ctx.fs.rate_limits().await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    for (name, resource) in &status.resources {
        println!(
            "{}: {}/{} used, {} remaining, resets at {}",
            name, resource.used, resource.limit, resource.remaining, resource.reset
        );
    }
    Ok(())
}
