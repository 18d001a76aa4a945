//! vocalis: Vocalis 文字转语音服务的命令行客户端
//!
//! Usage:
//!   vocalis login <email> <password>
//!   vocalis generate <text...> [--out <file>]
//!   vocalis slideshow <image> <image> [<image>] [--duration 2|3|4] [--transition <name>]
//!   vocalis help

use anyhow::{anyhow, bail, Context};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vocalis::payment::PaymentStatus;
use vocalis::video::{ImageUpload, SlideDuration, Transition};
use vocalis::views::{
    Dashboard, LoginForm, PricingPage, RegisterForm, SlideshowForm, UpgradeOutcome,
    VoiceGenerator,
};
use vocalis::session::TracingSessionListener;
use vocalis::{ApiClient, ClientConfig, Notice, Plan, Session, SessionState, TokenStoreKind};

struct GlobalOptions {
    config: Option<PathBuf>,
    ephemeral: bool,
    rest: Vec<String>,
}

fn split_global_options(args: Vec<String>) -> anyhow::Result<GlobalOptions> {
    let mut config = None;
    let mut ephemeral = false;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            "--ephemeral" => ephemeral = true,
            _ => rest.push(arg),
        }
    }
    Ok(GlobalOptions {
        config,
        ephemeral,
        rest,
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vocalis=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let options = split_global_options(std::env::args().skip(1).collect())?;
    let Some((command, args)) = options.rest.split_first() else {
        print_usage();
        std::process::exit(1);
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        "version" | "--version" | "-V" => {
            println!("vocalis {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "plans" => {
            cmd_plans(None);
            return Ok(());
        }
        _ => {}
    }

    let mut config = match &options.config {
        Some(path) => ClientConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::from_env(),
    };
    if options.ephemeral {
        config = config.with_token_store(TokenStoreKind::Memory);
    }

    let api = ApiClient::new(&config)?;
    let mut session = Session::new(api)?;
    session.subscribe(Arc::new(TracingSessionListener));
    if session.state() == SessionState::Loading {
        session.refresh().await;
    }

    match command.as_str() {
        "login" => cmd_login(&mut session, args).await,
        "register" => cmd_register(&mut session, args).await,
        "logout" => {
            session.logout();
            println!("Logged out.");
            Ok(())
        }
        "whoami" => cmd_whoami(&session),
        "generate" => cmd_generate(&mut session, args).await,
        "dashboard" => cmd_dashboard(&mut session).await,
        "upgrade" => cmd_upgrade(&mut session, args).await,
        "payments" => cmd_payments(&mut session).await,
        "pay" => cmd_pay(&mut session, args).await,
        "subscribe" => cmd_subscribe(&mut session, args).await,
        "slideshow" => cmd_slideshow(&mut session, args).await,
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"vocalis: Vocalis text-to-speech client

USAGE:
    vocalis [--config <file.yaml>] [--ephemeral] <COMMAND> [ARGS]

COMMANDS:
    login <email> <password>            Log in and remember the session
    register <name> <email> <password>  Create an account
    logout                              Forget the session
    whoami                              Show the signed-in user
    generate <text...> [--out <file>]   Generate speech (download needs a paid plan)
    dashboard                           Plan status, features and voice history
    plans                               Show the plan catalogue
    upgrade <starter|pro>               Start a plan upgrade payment
    pay <starter|pro> <amount>          Create a payment for a plan
    payments                            Payment history
    subscribe <amount> <transaction-id> Submit a manual subscription payment
    slideshow <images...> [--duration 2|3|4] [--transition none|slide|kenburns|zoom_in|zoom_out]
              [--no-slide-effect]       Turn 2-3 images into a video
    version                             Show version information
    help                                Show this help message

ENVIRONMENT:
    VOCALIS_API_URL             Backend base URL (default http://localhost:8000)
    VOCALIS_HTTP_TIMEOUT_SECS   Request deadline in seconds (default none)
    VOCALIS_PROXY_URL           Proxy for all requests
    VOCALIS_TOKEN_STORE         keyring | file | memory
    VOCALIS_TOKEN_FILE          Token file when VOCALIS_TOKEN_STORE=file
    RUST_LOG                    Log filter (default vocalis=info)"#
    );
}

fn show(notice: &Notice) -> anyhow::Result<()> {
    if notice.is_error() {
        bail!("{}", notice.message);
    }
    println!("{}", notice);
    Ok(())
}

fn require_user(session: &Session) -> anyhow::Result<()> {
    if session.user().is_none() {
        bail!("Not logged in. Run `vocalis login <email> <password>` first.");
    }
    Ok(())
}

async fn cmd_login(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    let [email, password] = args else {
        bail!("usage: vocalis login <email> <password>");
    };
    let mut form = LoginForm::new(email.as_str(), password.as_str());
    let notice = form.submit(session).await;
    show(&notice)?;
    cmd_whoami(session)
}

async fn cmd_register(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    let [name, email, password] = args else {
        bail!("usage: vocalis register <name> <email> <password>");
    };
    let mut form = RegisterForm::new(name.as_str(), email.as_str(), password.as_str());
    let notice = form.submit(session).await;
    show(&notice)
}

fn cmd_whoami(session: &Session) -> anyhow::Result<()> {
    require_user(session)?;
    if let Some(user) = session.user() {
        println!("{} <{}>", user.name, user.email);
        println!("Plan: {}", user.plan);
        if let Some(remaining) = Dashboard::remaining_today(user) {
            println!("{} generations remaining today", remaining);
        }
    }
    Ok(())
}

async fn cmd_generate(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    require_user(session)?;
    let mut out = None;
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--out" {
            out = Some(PathBuf::from(
                iter.next().ok_or_else(|| anyhow!("--out needs a path"))?,
            ));
        } else {
            words.push(arg.as_str());
        }
    }

    let mut generator = VoiceGenerator::new();
    generator.set_text(words.join(" "));
    let notice = generator.generate(session).await;
    show(&notice)?;

    if let Some(path) = out {
        generator.download(session, &path).await?;
        println!("Saved audio to {}", path.display());
    } else if let Some(vocalis::tts::AudioSource::Remote(url)) = generator.audio() {
        println!("Audio: {}", url);
    }
    cmd_whoami(session)
}

async fn cmd_dashboard(session: &mut Session) -> anyhow::Result<()> {
    require_user(session)?;
    let mut dashboard = Dashboard::new();
    dashboard.load(session).await;
    cmd_whoami(session)?;

    if !dashboard.features().is_empty() {
        println!("\nFeatures:");
        for feature in dashboard.features() {
            println!("  - {}", feature);
        }
    }

    println!("\nVoice history:");
    if dashboard.history().is_empty() {
        println!("  (none yet)");
    }
    for entry in dashboard.history() {
        println!(
            "  #{} {}  {}",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.text
        );
        if let Some(url) = &entry.audio_url {
            println!("      {}", url);
        }
    }

    if session.user().map(Dashboard::shows_upgrade).unwrap_or(false) {
        println!("\nUpgrade with `vocalis upgrade starter` for unlimited generations.");
    }
    Ok(())
}

fn cmd_plans(session: Option<&Session>) {
    let page = PricingPage::new();
    let user = session.and_then(|s| s.user());
    for offer in page.offers() {
        let (label, disabled) = offer.button(user);
        println!(
            "{}{}: {} {}{}",
            offer.name,
            if offer.popular { " (popular)" } else { "" },
            offer.price,
            offer.currency,
            offer.period
        );
        println!("  {}", offer.description);
        for feature in offer.features {
            println!("  + {}", feature);
        }
        for limitation in offer.limitations {
            println!("  - {}", limitation);
        }
        println!("  [{}{}]\n", label, if disabled { ", unavailable" } else { "" });
    }
}

async fn cmd_upgrade(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    let [plan] = args else {
        bail!("usage: vocalis upgrade <starter|pro>");
    };
    let plan: Plan = plan.parse()?;
    let mut page = PricingPage::new();
    match page.upgrade(session, plan).await {
        UpgradeOutcome::LoginRequired => {
            bail!("Not logged in. Run `vocalis login <email> <password>` first.")
        }
        UpgradeOutcome::Redirect(url) => {
            println!("Complete your payment at:\n  {}", url);
            Ok(())
        }
        UpgradeOutcome::Rejected(notice) => show(&notice),
    }
}

async fn cmd_payments(session: &mut Session) -> anyhow::Result<()> {
    require_user(session)?;
    let result = session.payment().payment_history().await;
    let records = session.guard(result)?;
    if records.is_empty() {
        println!("No payments yet.");
    }
    for record in records {
        let status = match record.status {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Unknown => "unknown",
        };
        let when = record
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "#{} {:>8.2} {:<10} {} {}",
            record.id,
            record.amount,
            status,
            record.transaction_id.as_deref().unwrap_or("-"),
            when
        );
    }
    Ok(())
}

async fn cmd_pay(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    require_user(session)?;
    let [plan, amount] = args else {
        bail!("usage: vocalis pay <starter|pro> <amount>");
    };
    let plan: Plan = plan.parse()?;
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("invalid amount: {}", amount))?;
    let result = session.payment().create_payment(plan, amount).await;
    let receipt = session.guard(result)?;
    match (receipt.success, receipt.payment_url) {
        (true, Some(url)) => println!("Complete your payment at:\n  {}", url),
        (true, None) => println!(
            "Payment created{}",
            receipt
                .transaction_id
                .map(|id| format!(" ({})", id))
                .unwrap_or_default()
        ),
        (false, _) => bail!(
            "{}",
            receipt
                .error
                .unwrap_or_else(|| "Failed to initiate payment".to_string())
        ),
    }
    Ok(())
}

async fn cmd_subscribe(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    require_user(session)?;
    let [amount, transaction_id] = args else {
        bail!("usage: vocalis subscribe <amount> <transaction-id>");
    };
    let amount: f64 = amount
        .parse()
        .with_context(|| format!("invalid amount: {}", amount))?;
    let result = session
        .payment()
        .subscription_request(amount, transaction_id)
        .await;
    let receipt = session.guard(result)?;
    if !receipt.success {
        bail!(
            "{}",
            receipt
                .message
                .unwrap_or_else(|| "Failed to submit subscription request".to_string())
        );
    }
    println!(
        "{}",
        receipt
            .message
            .unwrap_or_else(|| "Subscription request submitted.".to_string())
    );
    Ok(())
}

async fn cmd_slideshow(session: &mut Session, args: &[String]) -> anyhow::Result<()> {
    let mut form = SlideshowForm::new();
    let mut paths = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--duration" => {
                let secs: u32 = iter
                    .next()
                    .ok_or_else(|| anyhow!("--duration needs a value"))?
                    .parse()
                    .context("--duration must be a number")?;
                form.set_duration(SlideDuration::try_from(secs)?);
            }
            "--transition" => {
                let name = iter
                    .next()
                    .ok_or_else(|| anyhow!("--transition needs a value"))?;
                form.set_transition(name.parse::<Transition>()?);
            }
            "--no-slide-effect" => form.set_slide_effect(false),
            _ => paths.push(PathBuf::from(arg)),
        }
    }

    if paths.len() > vocalis::video::MAX_IMAGES {
        tracing::warn!(
            "{} images given; only the first {} are used",
            paths.len(),
            vocalis::video::MAX_IMAGES
        );
    }
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        images.push(
            ImageUpload::from_path(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
        );
    }
    form.select_files(images);

    println!("Generating…");
    let notice = form.submit(session).await;
    show(&notice)?;
    if let Some(url) = form.video_url() {
        println!("Video: {}", url);
    }
    Ok(())
}
