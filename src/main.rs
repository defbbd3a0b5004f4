use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use voiceup::api::{Achievement, Credentials, NewIssue, SignupRequest, VoiceUpClient};
use voiceup::cli::{Cli, Command};
use voiceup::config::VoiceUpConfig;
use voiceup::dashboard::{AutoConfirm, Confirmer, Dashboard};
use voiceup::priority::Priority;
use voiceup::progression::stage;
use voiceup::{telemetry, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs, telemetry::level_for(cli.verbose));

    let config = VoiceUpConfig::load()
        .context("loading voiceup.toml")?
        .with_overrides(cli.api_url.clone(), cli.token.clone());
    let client = VoiceUpClient::from_config(&config)?;
    tracing::debug!(api = client.base_url(), "using API");

    let confirmer: Box<dyn Confirmer> = match &cli.command {
        Command::Advance { yes: true, .. } => Box::new(AutoConfirm),
        _ => Box::new(ui::TerminalConfirm::new()),
    };
    let dashboard = Dashboard::new(client, config, confirmer);

    run(&dashboard, cli.command).await
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<()> {
    let placeholders = &dashboard.config().placeholder_images;

    match command {
        Command::Stats => {
            let spinner = ui::Spinner::start("Fetching dashboard stats");
            let stats = dashboard.stats().await;
            spinner.finish();
            ui::print_stats(&stats?);
        }
        Command::List {
            status,
            limit,
            skip,
        } => {
            let spinner = ui::Spinner::start("Fetching issues");
            let issues = dashboard.list(status.as_deref(), limit, skip).await;
            spinner.finish();
            ui::print_issue_list(&issues?, placeholders);
        }
        Command::Reposted { limit, skip } => {
            let spinner = ui::Spinner::start("Fetching reposted issues");
            let issues = dashboard.reposted(limit, skip).await;
            spinner.finish();
            ui::print_issue_list(&issues?, placeholders);
        }
        Command::Show { id } => {
            let spinner = ui::Spinner::start("Fetching issue");
            let details = dashboard.show(&id).await;
            spinner.finish();
            ui::print_issue_details(&details?, placeholders);
        }
        Command::Search { query } => {
            let spinner = ui::Spinner::start("Searching");
            let issues = dashboard.search(&query).await;
            spinner.finish();
            ui::print_issue_list(&issues?, placeholders);
        }
        Command::Create {
            title,
            description,
            category,
            location,
            priority,
            user_name,
            user_mobile,
            images,
        } => {
            let issue = NewIssue {
                title,
                description,
                category,
                location,
                status: stage::STATUS_STAGES[0].name.to_string(),
                priority: Priority::parse(&priority),
                user_name,
                user_mobile,
                user_upload_images: images,
                matching_posts: Vec::new(),
            };
            let created = dashboard.create(&issue).await?;
            println!(
                "{}",
                created
                    .message
                    .unwrap_or_else(|| "Issue created".to_string())
            );
            if let Some(id) = created.issue_id {
                println!("  ID: {id}");
            }
        }
        Command::Advance { id, to, .. } => {
            let outcome = dashboard.advance(&id, to.as_deref()).await?;
            ui::print_advance_outcome(&outcome);
        }
        Command::Achievement {
            id,
            official,
            designation,
            meeting_date,
            action,
            issue_status,
            document,
        } => {
            let meeting_date = meeting_date
                .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
            let achievement = Achievement {
                government_official_name: official,
                designation,
                meeting_date,
                issue_status,
                action_taken: action,
                document_path: document,
            };
            dashboard.record_achievement(&id, &achievement).await?;
            println!("Achievement saved for {id}");
        }
        Command::Report { output } => {
            let report = dashboard.achievement_report(Local::now().date_naive()).await?;
            let path = output.unwrap_or_else(|| report.file_name().into());
            report
                .write_to(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            ui::print_report_written(&report, &path);
        }
        Command::Stages => ui::print_stages(),
        Command::Login { email, password } => {
            let response = dashboard.login(&Credentials { email, password }).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Signup {
            email,
            password,
            name,
        } => {
            let response = dashboard
                .signup(&SignupRequest {
                    email,
                    password,
                    name,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
