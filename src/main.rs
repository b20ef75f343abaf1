use std::process::ExitCode;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use signal_starter::adapters::auth::{SupabaseConfig, SupabaseIdentityProvider};
use signal_starter::adapters::checkout::HttpCheckoutGateway;
use signal_starter::adapters::stripe::{
    LoggingNavigator, StripeCheckoutRedirect, StripeRedirectConfig,
};
use signal_starter::application::{CheckoutOrchestrator, SessionTracker};
use signal_starter::config::AppConfig;
use signal_starter::domain::checkout::{CheckoutOutcome, PlanCatalog};
use signal_starter::domain::foundation::{PriceId, ValidationError};
use signal_starter::domain::session::SessionView;

const ACCESS_TOKEN_VAR: &str = "SIGNAL_STARTER_ACCESS_TOKEN";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("signal-starter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.app.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!(
        environment = ?config.app.environment,
        test_mode = config.payment.is_test_mode(),
        "Signal starter starting"
    );

    match run(config, std::env::args().nth(1)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!(%message, "Signal starter failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig, price_arg: Option<String>) -> Result<(), String> {
    let environment = config.app.environment;
    let timeout = config.payment.request_timeout();

    // Session
    let project_url = config.auth.project_url(environment).map_err(|e| e.to_string())?;
    let supabase = SupabaseConfig::new(
        project_url,
        config.auth.supabase_anon_key.expose_secret().as_str(),
    )
    .with_request_timeout(timeout);
    let mut provider = SupabaseIdentityProvider::new(supabase).map_err(|e| e.to_string())?;
    if let Ok(token) = std::env::var(ACCESS_TOKEN_VAR) {
        provider = provider.with_access_token(token);
    }

    let tracker = SessionTracker::mount(Arc::new(provider));
    let session = tracker.wait_until_resolved().await;
    match SessionView::derive(&session) {
        SessionView::Splash => println!("Loading..."),
        SessionView::SignIn => println!("Not signed in."),
        SessionView::Main {
            display_name, email, ..
        } => match email {
            Some(email) => println!("Signed in as {} <{}>", display_name, email),
            None => println!("Signed in as {}", display_name),
        },
    }

    // Pricing
    let gateway_url = config
        .payment
        .checkout_session_url(environment)
        .map_err(|e| e.to_string())?;
    let gateway = HttpCheckoutGateway::new(gateway_url, timeout).map_err(|e| e.to_string())?;
    let hosted_url = config
        .payment
        .hosted_checkout_url(environment)
        .map_err(|e| e.to_string())?;
    let redirect = StripeCheckoutRedirect::new(
        StripeRedirectConfig::new(
            config.payment.stripe_publishable_key.expose_secret().as_str(),
            hosted_url,
        ),
        Arc::new(LoggingNavigator::new()),
    );
    let orchestrator = CheckoutOrchestrator::new(
        PlanCatalog::default_catalog().clone(),
        Arc::new(gateway),
        Arc::new(redirect),
    );

    for (plan, control) in orchestrator.catalog().iter().zip(orchestrator.controls()) {
        println!(
            "{:<10} {:<10} [{}]  {}",
            plan.name,
            plan.price_label(),
            control.label,
            plan.price_id
        );
        for feature in &plan.features {
            println!("    - {}", feature);
        }
    }

    let Some(price_arg) = price_arg else {
        return Ok(());
    };
    let price_id: PriceId = price_arg.parse().map_err(|e: ValidationError| e.to_string())?;
    match orchestrator.initiate(&price_id).await {
        CheckoutOutcome::Redirected { session_id } => {
            println!("Redirected to checkout session {}", session_id);
            Ok(())
        }
        CheckoutOutcome::Failed(err) => Err(err.to_string()),
        CheckoutOutcome::Ignored { active } => {
            Err(format!("checkout for {} already in progress", active))
        }
    }
}
