use std::process::ExitCode;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use smtp_probe::config::SmtpTestConfig;
use smtp_probe::mail::SmtpMailer;
use smtp_probe::runner::run_test;

#[tokio::main]
async fn main() -> ExitCode {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    log::info!("📦 Loading configuration from environment variables...");
    let config = match SmtpTestConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("✅ Configuration loaded.");
    log::info!("   Host   : {}", config.host);
    log::info!("   Port   : {}", config.port);
    log::info!("   Secure : {}", config.secure);
    log::info!("   From   : {}", config.from);
    log::info!("   To     : {}", config.to);

    log::info!("🚀 Creating SMTP transport...");
    let mailer = match SmtpMailer::from_config(&config) {
        Ok(mailer) => mailer,
        Err(e) => {
            log::error!("failed to create SMTP transport: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_test(&config, &mailer).await {
        Ok(report) => {
            log::info!("   Message ID: {}", report.message_id);
            if let Some(response) = &report.response {
                log::info!("   Response  : {response}");
            }
            log::info!("🎉 Test completed successfully!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            log::error!("{}", e.hint());
            log::error!("❌ SMTP test failed. See details above.");
            ExitCode::FAILURE
        }
    }
}
