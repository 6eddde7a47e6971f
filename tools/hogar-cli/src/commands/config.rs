//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Configuración actual");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("archivo", &path.display().to_string()),
        None => ctx.output.kv("archivo", "(valores por defecto)"),
    }

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());

    ctx.output.info("");
    ctx.output.info("[shop]");
    ctx.output.kv("whatsapp_phone", &ctx.config.shop.whatsapp_phone);
    ctx.output.kv("page_size", &ctx.config.shop.page_size.to_string());
    ctx.output.kv("currency_locale", &ctx.config.shop.currency_locale);

    ctx.output.info("");
    ctx.output.info("[remote]");
    if ctx.config.remote.is_configured() {
        ctx.output.kv("url", &ctx.config.remote.url);
        ctx.output.kv("api_key", "********");
    } else {
        ctx.output.kv("url", "(sin configurar)");
    }
    ctx.output.kv("table", &ctx.config.remote.table);

    ctx.output.info("");
    ctx.output.info("[contact]");
    ctx.output.kv("endpoint", &ctx.config.contact.endpoint);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("hogar.toml");

    if config_path.exists() && !force {
        bail!(
            "El archivo de configuración ya existe: {}. Usa --force para sobrescribirlo.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Creado {}", config_path.display()));
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let problems = ctx.config.validate();
    if problems.is_empty() {
        ctx.output.success("La configuración es válida");
        return Ok(());
    }
    for problem in &problems {
        ctx.output.list_item(problem);
    }
    bail!("La configuración tiene {} problema(s)", problems.len());
}
