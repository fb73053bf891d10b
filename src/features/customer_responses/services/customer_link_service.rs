use std::collections::HashMap;
use std::sync::Arc;

use minijinja::Value;

use crate::core::error::{AppError, Result};
use crate::features::customer_responses::dtos::{CustomerLinkDto, InvitationEmailDto};
use crate::features::customer_responses::services::LinkTokenService;
use crate::modules::store::InMemoryStore;
use crate::shared::i18n::{t, Locale};
use crate::shared::templates::render_localized;

/// Issues customer response links for staff
pub struct CustomerLinkService {
    store: Arc<InMemoryStore>,
    tokens: Arc<LinkTokenService>,
    frontend_url: String,
}

impl CustomerLinkService {
    pub fn new(store: Arc<InMemoryStore>, tokens: Arc<LinkTokenService>, frontend_url: String) -> Self {
        Self {
            store,
            tokens,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sign a link for the case and render the invitation e-mail.
    /// Closed cases cannot be sent out for responses.
    pub async fn issue_link(
        &self,
        case_id: i64,
        locale: Locale,
        sender_name: &str,
    ) -> Result<CustomerLinkDto> {
        let doc = self
            .store
            .case(case_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Case {} not found", case_id)))?;
        doc.ensure_editable()?;

        let customer = self.store.customer(doc.case.customer_id).ok_or_else(|| {
            AppError::Internal(format!(
                "Case {} references unknown customer {}",
                case_id, doc.case.customer_id
            ))
        })?;
        let location_name = self
            .store
            .location(&doc.case.location_id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| doc.case.location_id.clone());

        let issued = self.tokens.issue(case_id)?;
        let url = format!(
            "{}/customer-report/{}?token={}",
            self.frontend_url,
            case_id,
            urlencoding::encode(&issued.token)
        );

        let mut ctx: HashMap<&str, Value> = HashMap::new();
        ctx.insert("customer_name", Value::from(customer.name.clone()));
        ctx.insert("report_title", Value::from(doc.report.title.clone()));
        ctx.insert("location_name", Value::from(location_name));
        ctx.insert("suggestion_count", Value::from(doc.report.suggestions.len()));
        ctx.insert("link_url", Value::from(url.clone()));
        ctx.insert(
            "expires_at",
            Value::from(issued.expires_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        );
        ctx.insert("sender_name", Value::from(sender_name.to_string()));

        let body = render_localized("emails/customer_link", locale, &ctx).map_err(|e| {
            tracing::error!("Failed to render invitation for case {}: {}", case_id, e);
            AppError::Internal(format!("Failed to render invitation: {}", e))
        })?;

        tracing::info!(
            "Customer link {} issued for case {} by {}",
            issued.link_id,
            case_id,
            sender_name
        );

        Ok(CustomerLinkDto {
            case_id,
            url,
            token: issued.token,
            expires_at: issued.expires_at,
            email: InvitationEmailDto {
                to: customer.email.clone(),
                subject: t(locale, "link.email_subject").to_string(),
                body,
            },
        })
    }
}
