use skip_clicker::args::{Args, Mode};
use skip_clicker::automation::{
    AutomationCommand, AutomationEvent, ButtonMatcher, ClickAutomation, MatchConfig,
    create_automation_channels,
};
use skip_clicker::gui::dioxus_app::{TEMPLATE_PATH_ENV, run_gui};
use skip_clicker::screen::DesktopScreen;
use tokio::time::{Duration, sleep};

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug_mode {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match args.mode {
        Mode::Gui => {
            println!("🚀 Launching Skip Clicker (template: '{}')...", args.template_path);
            unsafe {
                std::env::set_var(TEMPLATE_PATH_ENV, &args.template_path);
            }
            run_gui();
        }
        Mode::Headless => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("❌ Failed to start the async runtime: {e}");
                    return;
                }
            };
            rt.block_on(run_headless(args));
        }
    }
}

async fn run_headless(args: Args) {
    let backend = match DesktopScreen::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            eprintln!("❌ Input driver unavailable: {e}");
            return;
        }
    };

    let matcher = ButtonMatcher::from_file(&args.template_path, MatchConfig::default());
    if !matcher.is_ready() {
        eprintln!(
            "❌ Template image '{}' not found - nothing to detect",
            args.template_path
        );
        eprintln!("   Crop the button tightly, save it as a PNG, and pass --template=PATH");
        return;
    }

    let (cmd_tx, cmd_rx, event_tx, mut event_rx) = create_automation_channels();
    let mut automation = ClickAutomation::new(backend, matcher, cmd_rx, event_tx);
    let worker = tokio::spawn(async move { automation.run().await });

    if cmd_tx.send(AutomationCommand::Start).await.is_err() {
        eprintln!("❌ Automation worker ended before starting");
        return;
    }

    println!(
        "🔍 Scanning for '{}' (Ctrl+C to stop, pointer to top-left corner for emergency stop)",
        args.template_path
    );

    let deadline = async {
        match args.timeout_secs {
            Some(secs) => sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    // Print status transitions only; "Scanning..." repeats every poll and
    // would flood the terminal
    let mut last_status = (String::new(), 0u64);
    loop {
        tokio::select! {
            _ = &mut deadline => {
                println!("⏱️ Timeout reached, stopping");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            event = event_rx.recv() => match event {
                Some(AutomationEvent::Status { text, clicks }) => {
                    let status = (text, clicks);
                    if !status.0.is_empty() && status != last_status {
                        println!("{} [clicks: {}]", status.0, status.1);
                    }
                    last_status = status;
                }
                Some(AutomationEvent::StateChanged(state)) => {
                    log::debug!("Automation state is now {state:?}");
                }
                Some(AutomationEvent::Error(message)) => {
                    eprintln!("❌ {message}");
                    break;
                }
                Some(AutomationEvent::StopRequested) => {
                    println!("🛑 Emergency stop");
                    break;
                }
                None => break,
            }
        }
    }

    let _ = cmd_tx.send(AutomationCommand::Shutdown).await;
    let _ = worker.await;
}
