use crate::bootstrap::AppContext;
use crate::render;
use anyhow::{Result, bail};
use colored::Colorize;

pub async fn list(ctx: &AppContext) {
    render::history(&ctx.history_service().entries().await);
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let entry = ctx.history_service().entry(id).await?;
    render::report(&entry.data);
    Ok(())
}

pub async fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    if !ctx.history_service().remove(id).await? {
        bail!("No cached analysis with id {id}");
    }
    println!("{}", format!("Removed {id}").bright_green());
    Ok(())
}

pub async fn clear(ctx: &AppContext) -> Result<()> {
    let removed = ctx.history_service().clear().await?;
    println!("{}", format!("Removed {removed} cached analyses").bright_green());
    Ok(())
}
