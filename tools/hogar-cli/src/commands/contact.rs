//! Contact form submission.

use std::path::Path;

use anyhow::{Context as _, Result};
use hogar_remote::contact::{FAILED_MESSAGE, SENT_MESSAGE};
use hogar_remote::{Attachment, ContactForm};

use super::ContactArgs;
use crate::context::Context;

/// Run the contact command.
pub async fn run(args: ContactArgs, ctx: &Context) -> Result<()> {
    let mut form = ContactForm::new(args.name, args.email, args.message)
        .with_phone(args.phone.unwrap_or_default());

    for file in &args.attach {
        let path = ctx.resolve_path(file);
        let data = std::fs::read(&path)
            .with_context(|| format!("No se pudo leer el adjunto {}", path.display()))?;
        form = form.with_attachment(Attachment::new(
            file_name(&path),
            content_type_for(&path),
            data,
        ));
    }
    form.validate()?;

    let relay = ctx.form_relay();
    ctx.output.debug(&format!("Enviando a {}", relay.endpoint()));

    let spinner = ctx.output.spinner("Enviando...");
    let result = relay.submit(&form).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            ctx.output.success(SENT_MESSAGE);
            Ok(())
        }
        Err(e) => {
            ctx.output.debug(&e.to_string());
            Err(e).context(FAILED_MESSAGE)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "adjunto".to_string())
}

/// Content type guessed from the extension.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("living.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("plano.pdf")), "application/pdf");
        assert_eq!(content_type_for(Path::new("notas")), "application/octet-stream");
    }
}
