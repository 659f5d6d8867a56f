use anyhow::Context;
use clap::Parser;
use conversations_address_webhook::domain::schema::ADDRESS_CONFIGURATION_WEBHOOK;
use conversations_address_webhook::utils::error::ErrorSeverity;
use conversations_address_webhook::utils::{logger, validation::Validate};
use conversations_address_webhook::{
    AddressConfigurationWebhook, CliConfig, Command, LocalStorage, ResourceError, ResourceFile,
    ResourceRunner, TwilioConversationsClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Command::Schema = config.command {
        let schema = serde_json::to_string_pretty(&ADDRESS_CONFIGURATION_WEBHOOK)
            .context("serializing schema")?;
        println!("{}", schema);
        return Ok(());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Invalid command line: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let resource_file = ResourceFile::from_file(&config.config)
        .with_context(|| format!("loading {}", config.config.display()))?;

    // 驗證配置
    if let Err(e) = resource_file.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let client = TwilioConversationsClient::with_base_url(
        resource_file.provider.credentials()?,
        resource_file.provider.base_url(),
        resource_file.provider.request_timeout(),
    )?;
    let resource = AddressConfigurationWebhook::new(client).with_timeouts(resource_file.timeouts());
    let runner = ResourceRunner::new(
        resource,
        LocalStorage::new(config.state_dir.clone()),
        resource_file.resource.clone(),
    );

    if let Err(e) = run(&runner, &config.command).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(
    runner: &ResourceRunner<TwilioConversationsClient, LocalStorage>,
    command: &Command,
) -> Result<(), ResourceError> {
    match command {
        Command::Plan => {
            let plan = runner.plan().await?;
            println!("📋 Plan: {}", plan);
        }
        Command::Apply => {
            let (plan, state) = runner.apply().await?;
            println!("✅ Apply complete: {}", plan);
            if let Some(state) = state {
                println!("🆔 {}", state.id());
            }
        }
        Command::Refresh => match runner.refresh().await? {
            Some(state) => println!("🔄 Refreshed {}", state.id()),
            None => println!("⚠️ Address configuration no longer exists, state cleared"),
        },
        Command::Destroy => {
            let plan = runner.destroy().await?;
            println!("🗑️ Destroy complete: {}", plan);
        }
        Command::Import { id } => {
            let state = runner.import(id).await?;
            println!("📥 Imported {}", state.id());
        }
        Command::Schema => {}
    }
    Ok(())
}
