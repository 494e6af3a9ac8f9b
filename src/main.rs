use clap::Parser;
use dog_house::core::ConfigProvider;
use dog_house::utils::error::DogHouseError;
use dog_house::utils::{logger, validation::Validate};
use dog_house::{ApiClient, CliConfig, DogHousePipeline, EtlEngine, LocalStorage, RunReport, TomlConfig};

fn fail(e: &DogHouseError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn run<C: ConfigProvider + Validate>(config: C, monitor: bool) -> Result<RunReport, DogHouseError> {
    config.validate()?;

    let api = ApiClient::with_timeout(config.base_url(), config.timeout())?;
    let storage = config.output_path().map(LocalStorage::new);
    let pipeline = DogHousePipeline::new(api, storage, config);

    EtlEngine::new_with_monitoring(pipeline, monitor).run().await
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting dog-house CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut toml = match TomlConfig::from_file(&path) {
                Ok(toml) => toml,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    fail(&e);
                }
            };
            toml.merge_cli(&cli);
            let monitor = toml.monitoring_enabled();
            run(toml, monitor).await
        }
        None => {
            let monitor = cli.monitor;
            run(cli, monitor).await
        }
    };

    match result {
        Ok(report) => {
            let answer = &report.answer;
            tracing::info!("✅ Run completed successfully!");
            println!("total_dogs: {}", answer.total_dogs);
            println!("total_breeds: {}", answer.total_breeds);
            println!("common_breed: {}", answer.common_breed);
            println!("common_dog_name: {}", answer.common_dog_name);

            match &report.response {
                Some(response) => println!("📨 Server response: {}", response),
                None => println!("🔍 Dry run: answer not submitted"),
            }
            if let Some(path) = &report.report_path {
                println!("📁 Report saved to: {}", path);
            }
        }
        Err(e) => fail(&e),
    }
}
