use clap::Parser;
use login_forge::cli::commands::{cmd_capture, cmd_generate, cmd_scrape, cmd_validate};
use login_forge::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve the driver script: CLI > config file default
    let driver_script = cli.driver_script.as_deref();

    match cli.command {
        Commands::Scrape {
            url,
            browser,
            rendered,
            json,
        } => {
            cmd_scrape(
                &url,
                browser.as_deref(),
                rendered,
                json,
                driver_script,
                cli.verbose,
                &config,
            )?;
        }
        Commands::Capture { url, browser, json } => {
            cmd_capture(
                &url,
                browser.as_deref(),
                json,
                driver_script,
                cli.verbose,
                &config,
            )?;
        }
        Commands::Generate {
            url,
            browser,
            capture,
            rendered,
            descriptor,
            script,
            emit,
            output_dir,
        } => {
            cmd_generate(
                &url,
                browser.as_deref(),
                capture,
                rendered,
                descriptor.as_deref(),
                script.as_deref(),
                &emit,
                output_dir.as_deref(),
                driver_script,
                cli.verbose,
                &config,
            )?;
        }
        Commands::Validate {
            descriptor,
            url,
            browser,
            username,
            password,
        } => {
            let passed = cmd_validate(
                &descriptor,
                &url,
                browser.as_deref(),
                username.as_deref(),
                password.as_deref(),
                cli.verbose,
                &config,
            )?;
            if !passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
