use anyhow::Context;
use clap::Parser;
use nf_stepper::app::text_renderer;
use nf_stepper::domain::ports::DatasetSource;
use nf_stepper::utils::{logger, validation::Validate};
use nf_stepper::{CliConfig, CsvOptions, CsvSource, StepResult, Stepper, StepperConfig};

fn emit(result: &StepResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(result)?);
    } else {
        println!("{}", text_renderer::render(result));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting nf-stepper");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 載入 TOML 配置（未指定時使用醫療範例預設值）
    let config = match &cli.config {
        Some(path) => StepperConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => StepperConfig::default(),
    };

    let csv_options = CsvOptions::from_config(&config);
    let mut stepper = match Stepper::new(config) {
        Ok(stepper) => stepper,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let initial = match &cli.data {
        Some(path) => {
            let source = CsvSource::new(path, csv_options);
            let loaded = match source.read_dataset().await {
                Ok(dataset) => stepper.load(dataset),
                Err(e) => Err(e),
            };
            match loaded {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(
                        "❌ Upload rejected: {} (Category: {:?}, Severity: {:?})",
                        e,
                        e.category(),
                        e.severity()
                    );
                    emit(&stepper.report_failure(&e.to_string()), cli.json)?;
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            }
        }
        None => stepper.current().clone(),
    };

    emit(&initial, cli.json)?;
    for _ in 0..cli.steps {
        let result = stepper.advance();
        emit(&result, cli.json)?;
        if result.level.is_terminal() {
            break;
        }
    }

    tracing::info!(
        "✅ Finished at {} with redundancy {}",
        stepper.level(),
        stepper.redundancy()
    );
    Ok(())
}
