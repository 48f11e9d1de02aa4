use clap::Parser;
use rice_check::app::Session;
use rice_check::domain::ports::{ConfigProvider, PermissionGate, PermissionStatus};
use rice_check::utils::error::ErrorSeverity;
use rice_check::utils::logger;
use rice_check::{
    CaptureAndClassifyFlow, CliConfig, HttpRecognizer, RiceError, Settings, SourceCamera,
    SourcePermission, StaticPermission,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::info!("Starting rice-check");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("settings: {:?}", settings);

    let outcome = if cli.assume_granted {
        run(&cli, &settings, StaticPermission(PermissionStatus::Granted)).await
    } else {
        run(&cli, &settings, SourcePermission::from_config(&settings)).await
    };

    if let Err(e) = outcome {
        exit_with(&e);
    }
    Ok(())
}

async fn run<P: PermissionGate>(cli: &CliConfig, settings: &Settings, permission: P) -> rice_check::Result<()> {
    let recognizer = HttpRecognizer::new(settings)?;
    tracing::info!("recognition endpoint: {}", recognizer.url());

    let flow = CaptureAndClassifyFlow::new(
        SourceCamera::from_config(settings),
        recognizer,
        permission,
        settings.multi_face_policy(),
        settings.initial_facing(),
    );

    let mut session = Session::new(flow, settings.locale);
    if cli.once {
        session.run_once(tokio::io::stdout()).await?;
    } else {
        session
            .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
    }
    Ok(())
}

fn exit_with(e: &RiceError) -> ! {
    tracing::error!(
        "❌ rice-check failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
