//! `audit` command handler.

use chrono::Utc;
use clap::Args;
use workfix_audit::{run_live_audit, run_mock_audit};
use workfix_core::{AppConfig, AuditError, AuditRequest, AuditSession, Handle, OfferPrice};
use workfix_instagram::{InstagramClient, ThrottlePolicy};

#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Instagram handle to audit, with or without a leading `@`
    #[arg(long)]
    pub handle: Option<String>,
    /// Dollar value of one converted lead (500-10000)
    #[arg(long)]
    pub offer_price: Option<i64>,
    /// Fabricate a demo audit instead of fetching live data
    #[arg(long)]
    pub mock: bool,
    /// Print the session as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}

/// Resolve the request from flags, falling back to configured defaults.
pub(crate) fn build_request(
    config: &AppConfig,
    args: &AuditArgs,
) -> Result<AuditRequest, AuditError> {
    let handle = match args.handle.as_deref() {
        Some(raw) => Handle::parse(raw)?,
        None => config.default_handle.clone(),
    };
    let offer_price = match args.offer_price {
        Some(raw) => OfferPrice::new(raw)?,
        None => config.default_offer_price,
    };
    Ok(AuditRequest {
        handle,
        offer_price,
    })
}

async fn execute(config: &AppConfig, args: &AuditArgs) -> Result<AuditSession, AuditError> {
    let request = build_request(config, args)?;
    tracing::debug!(handle = %request.handle, mock = args.mock, "running audit");

    if args.mock {
        return run_mock_audit(rand::rng(), &request, Utc::now().date_naive());
    }

    let client = InstagramClient::from_config(config).map_err(AuditError::from)?;
    let mut throttle = ThrottlePolicy::from_config(config);
    run_live_audit(&client, &mut throttle, &request).await
}

/// Run one audit and print it.
///
/// Audit failures are printed with operator guidance before being returned,
/// so the process exits non-zero without a report.
///
/// # Errors
///
/// Returns an error if the audit fails or the output cannot be written.
pub(crate) async fn run_audit(config: &AppConfig, args: &AuditArgs) -> anyhow::Result<()> {
    let session = match execute(config, args).await {
        Ok(session) => session,
        Err(err) => {
            if let Some(hint) = err.guidance() {
                eprintln!("hint: {hint}");
            }
            return Err(err.into());
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &session)?;
        std::io::Write::write_all(&mut out, b"\n")?;
    } else {
        crate::report::write_report(&mut out, &session)?;
    }
    Ok(())
}
