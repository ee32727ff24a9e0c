use std::env;

#[derive(Debug, Clone)]
pub enum Mode {
    Gui,
    Headless,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub template_path: String,
    pub debug_mode: bool,
    pub timeout_secs: Option<u64>,
}

impl Args {
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().collect();

        let mut mode: Option<Mode> = None;
        let mut template_path = "skip_button.png".to_string();
        let mut debug_mode = false;
        let mut timeout_secs: Option<u64> = None;

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Skip Clicker v{}", env!("APP_VERSION_DISPLAY"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--gui" {
                mode = Some(Mode::Gui);
            } else if arg == "--headless" {
                mode = Some(Mode::Headless);
            } else if let Some(val) = arg.strip_prefix("--template=") {
                if val.is_empty() {
                    eprintln!("❌ --template= needs a file path");
                    return None;
                }
                template_path = val.to_string();
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                match val.parse::<u64>() {
                    Ok(secs) => timeout_secs = Some(secs),
                    Err(_) => {
                        eprintln!("❌ Invalid timeout value: {}", val);
                        return None;
                    }
                }
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        Some(Args {
            mode: mode.unwrap_or(Mode::Gui),
            template_path,
            debug_mode,
            timeout_secs,
        })
    }
}

fn print_help() {
    println!("🖱️ Skip Clicker");
    println!();
    println!("Finds a reference button image on screen and clicks it until stopped.");
    println!();
    println!("USAGE:");
    println!("    skip-clicker [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)          Launch GUI interface");
    println!("    --gui               Launch GUI interface");
    println!("    --headless          Run in the terminal without a window");
    println!("    --template=PATH     Reference button image (default: skip_button.png)");
    println!("    --debug             Enable debug output for automation");
    println!("    --timeout=N         Headless mode: auto-exit after N seconds");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    skip-clicker --gui");
    println!("    skip-clicker --headless --template=my_button.png");
    println!("    skip-clicker --headless --timeout=120 --debug");
}
