//! Mastodon account statuses

use std::sync::Arc;

use async_stream::try_stream;
use futures::Stream;
use serde_json::Value;
use tracing::{debug, info};

use super::{log_ingesting, LoaderSettings};
use crate::domain::remote::MastodonApi;
use crate::domain::retry::retry_on_rate_limit;
use crate::domain::status::{Platform, StatusRecord};
use crate::domain::watermark::Watermark;
use crate::domain::DomainError;
use crate::infrastructure::mastodon::add_content_text;

/// Fill in `account.fqn` from `acct`, which omits the instance for local
/// accounts
pub(crate) fn qualify_account(status: &mut Value, instance_host: Option<&str>) {
    let Some(account) = status.get_mut("account").and_then(Value::as_object_mut) else {
        return;
    };

    if account
        .get("fqn")
        .and_then(Value::as_str)
        .is_some_and(|fqn| !fqn.is_empty())
    {
        return;
    }

    let Some(acct) = account.get("acct").and_then(Value::as_str) else {
        return;
    };

    let fqn = match (acct.contains('@'), instance_host) {
        (true, _) => acct.to_string(),
        (false, Some(host)) => format!("{}@{}", acct, host),
        (false, None) => return,
    };

    account.insert("fqn".to_string(), Value::String(fqn));
}

/// Walk an account's statuses from the newest backward.
///
/// Stops on an empty page or at the first status not newer than the
/// watermark; no page after that one is requested.
pub fn account_statuses(
    api: Arc<dyn MastodonApi>,
    account: String,
    watermark: Watermark,
    settings: LoaderSettings,
) -> impl Stream<Item = Result<StatusRecord, DomainError>> + Send + 'static {
    try_stream! {
        let api = api.as_ref();
        let account_id = {
            let account = account.as_str();
            retry_on_rate_limit(&settings.retry, settings.sleeper.as_ref(), "account_lookup", || async move {
                api.lookup_account(account).await
            })
            .await?
        };
        info!(account = %account, account_id = %account_id, "Resolved Mastodon account");

        let host = api.instance_host().map(str::to_string);
        let mut max_id: Option<String> = None;

        'pages: loop {
            let page = {
                let account_id = account_id.as_str();
                let cursor = max_id.as_deref();
                retry_on_rate_limit(&settings.retry, settings.sleeper.as_ref(), "account_statuses", || async move {
                    api.account_statuses(account_id, cursor).await
                })
                .await?
            };

            if page.is_empty() {
                break;
            }

            let mut last_id = None;
            for mut status in page {
                add_content_text(&mut status);
                qualify_account(&mut status, host.as_deref());

                let record = StatusRecord::new(Platform::Mastodon, status)?;
                let id = record.id()?;
                if !watermark.admits(id) {
                    debug!(status_id = %id, "Reached last ingested status");
                    break 'pages;
                }

                last_id = Some(record.document_id()?);
                log_ingesting(id, &record);
                yield record;
            }

            max_id = last_id;
        }
    }
}
