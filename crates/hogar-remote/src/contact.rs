//! Contact form relay.
//!
//! Messages are posted to a third-party form service. Without attachments
//! the body is JSON; with attachments it is multipart.

use hogar_data::{FetchClient, Multipart};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// Most files a single message may carry.
pub const MAX_ATTACHMENTS: usize = 5;

/// Placeholder sent when the phone field is left blank.
pub const NO_PHONE: &str = "No proporcionado";

pub const SENT_MESSAGE: &str = "Mensaje enviado correctamente!";
pub const FAILED_MESSAGE: &str = "Error al enviar el mensaje";

/// A file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// The fields of the contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

/// Wire body; a blank phone becomes [`NO_PHONE`].
#[derive(Serialize)]
struct ContactPayload<'a> {
    nombre: &'a str,
    email: &'a str,
    telefono: &'a str,
    mensaje: &'a str,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Name, email and message are required; the email needs an `@`.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.name.trim().is_empty() {
            return Err(GatewayError::InvalidContact("nombre es obligatorio".into()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(GatewayError::InvalidContact("email no es valido".into()));
        }
        if self.message.trim().is_empty() {
            return Err(GatewayError::InvalidContact("mensaje es obligatorio".into()));
        }
        if self.attachments.len() > MAX_ATTACHMENTS {
            return Err(GatewayError::TooManyAttachments {
                max: MAX_ATTACHMENTS,
                count: self.attachments.len(),
            });
        }
        Ok(())
    }

    fn phone_or_placeholder(&self) -> &str {
        let phone = self.phone.trim();
        if phone.is_empty() {
            NO_PHONE
        } else {
            phone
        }
    }

    fn payload(&self) -> ContactPayload<'_> {
        ContactPayload {
            nombre: &self.name,
            email: &self.email,
            telefono: self.phone_or_placeholder(),
            mensaje: &self.message,
        }
    }

    fn multipart(&self) -> Multipart {
        let mut form = Multipart::new()
            .text("nombre", self.name.clone())
            .text("email", self.email.clone())
            .text("telefono", self.phone_or_placeholder())
            .text("mensaje", self.message.clone());
        for attachment in &self.attachments {
            form = form.file(
                "attachment",
                attachment.filename.clone(),
                attachment.content_type.clone(),
                attachment.data.clone(),
            );
        }
        form
    }
}

/// Posts contact forms to the relay endpoint.
#[derive(Debug, Clone)]
pub struct FormRelay {
    client: FetchClient,
    endpoint: String,
}

impl FormRelay {
    pub fn new(client: FetchClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Validate and send. Any non-2xx answer is an error.
    pub async fn submit(&self, form: &ContactForm) -> GatewayResult<()> {
        form.validate()?;

        let request = self
            .client
            .post(self.endpoint.clone())
            .accept("application/json");
        let request = if form.attachments.is_empty() {
            request.json(&form.payload())?
        } else {
            request.multipart(form.multipart())
        };

        let response = request.send().await?;
        if let Err(e) = response.error_for_status() {
            let e = GatewayError::from_fetch(e);
            tracing::warn!(error = %e, "contact form rejected");
            return Err(e);
        }
        tracing::info!(attachments = form.attachments.len(), "contact form sent");
        Ok(())
    }

    /// [`submit`](Self::submit) reduced to the message shown to the visitor.
    pub async fn submit_for_notice(&self, form: &ContactForm) -> Result<&'static str, &'static str> {
        match self.submit(form).await {
            Ok(()) => Ok(SENT_MESSAGE),
            Err(_) => Err(FAILED_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_data::MockTransport;
    use std::sync::Arc;

    fn form() -> ContactForm {
        ContactForm::new("Ana", "ana@example.cl", "Quisiera cotizar un sofa")
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(form().validate().is_ok());
        assert!(ContactForm::new("", "ana@example.cl", "hola").validate().is_err());
        assert!(ContactForm::new("Ana", "ana", "hola").validate().is_err());
        assert!(ContactForm::new("Ana", "ana@example.cl", " ").validate().is_err());
    }

    #[test]
    fn test_attachment_limit() {
        let mut many = form();
        for i in 0..=MAX_ATTACHMENTS {
            many = many.with_attachment(Attachment::new(format!("{i}.jpg"), "image/jpeg", vec![0u8]));
        }
        assert!(matches!(
            many.validate(),
            Err(GatewayError::TooManyAttachments { max: 5, count: 6 })
        ));
    }

    #[tokio::test]
    async fn test_json_body_fills_missing_phone() {
        let mock = Arc::new(MockTransport::new());
        mock.push_json(200, &serde_json::json!({"ok": true}));
        let relay = FormRelay::new(FetchClient::new(mock.clone()), "https://formspree.io/f/test");

        relay.submit(&form()).await.unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.header("accept"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(sent.body_text().unwrap()).unwrap();
        assert_eq!(body["nombre"], "Ana");
        assert_eq!(body["telefono"], NO_PHONE);
    }

    #[tokio::test]
    async fn test_attachments_switch_to_form_body() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(200);
        let relay = FormRelay::new(FetchClient::new(mock.clone()), "https://formspree.io/f/test");

        let with_files = form()
            .with_attachment(Attachment::new("a.jpg", "image/jpeg", vec![1]))
            .with_attachment(Attachment::new("b.pdf", "application/pdf", vec![2]));
        relay.submit(&with_files).await.unwrap();

        let sent = &mock.requests()[0];
        assert!(sent.body_text().is_none());
        let form = sent.form.as_ref().unwrap();
        assert_eq!(form.text_value("telefono"), Some(NO_PHONE));
        assert_eq!(form.filenames(), vec!["a.jpg", "b.pdf"]);
    }

    #[tokio::test]
    async fn test_rejected_submission_maps_to_notice() {
        let mock = Arc::new(MockTransport::new());
        mock.push_status(422);
        let relay = FormRelay::new(FetchClient::new(mock.clone()), "https://formspree.io/f/test");
        assert_eq!(relay.submit_for_notice(&form()).await, Err(FAILED_MESSAGE));
    }
}
