use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use url::Url;

use crate::cli::config::{AppConfig, build_driver_config, resolve_browser};
use crate::codegen::plan::DescriptorHeader;
use crate::form::form_model::LoginSignature;
use crate::trace::logger::RunLogger;
use crate::validate::{ValidationRequest, run_validation};
use crate::{capture_login_page, generate_artifacts, scrape_login_page};

// ============================================================================
// scrape subcommand
// ============================================================================

pub fn cmd_scrape(
    url: &str,
    browser_flag: Option<&str>,
    rendered: bool,
    json: bool,
    driver_script: Option<&str>,
    verbose: u8,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = resolve_browser(browser_flag, config)?;
    let log = RunLogger::new(&config.general.run_log);

    if verbose > 0 {
        eprintln!(
            "Scraping {} ({})...",
            url,
            if rendered { "rendered" } else { "static" }
        );
    }

    let driver = build_driver_config(driver_script, browser, config);
    let signature = scrape_login_page(url, rendered.then_some(&driver), &log)?;

    print_signature(&signature, json)?;
    Ok(())
}

// ============================================================================
// capture subcommand
// ============================================================================

pub fn cmd_capture(
    url: &str,
    browser_flag: Option<&str>,
    json: bool,
    driver_script: Option<&str>,
    verbose: u8,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = resolve_browser(browser_flag, config)?;
    let log = RunLogger::new(&config.general.run_log);
    let driver = build_driver_config(driver_script, browser, config);

    if verbose > 0 {
        eprintln!("Launching capture session for {}...", url);
    }

    let mut resume = operator_resume;
    let signature = capture_login_page(url, &driver, &mut resume, &log)?;

    print_signature(&signature, json)?;
    Ok(())
}

/// Block until the operator signals the form is filled.
fn operator_resume() -> io::Result<()> {
    println!("Fill the login form in the browser window (placeholder values are fine),");
    println!("then press ENTER here to capture it.");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(
    url: &str,
    browser_flag: Option<&str>,
    capture: bool,
    rendered: bool,
    descriptor: Option<&str>,
    script: Option<&str>,
    emit: &str,
    output_dir: Option<&str>,
    driver_script: Option<&str>,
    verbose: u8,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = resolve_browser(browser_flag, config)?;
    let log = RunLogger::new(&config.general.run_log);

    let (want_descriptor, want_script) = match emit {
        "ini" => (true, false),
        "au3" => (false, true),
        "both" => (true, true),
        other => {
            return Err(format!("Unknown emit target '{}' (expected ini, au3, or both)", other).into());
        }
    };

    let driver = build_driver_config(driver_script, browser, config);
    let signature = if capture {
        if verbose > 0 {
            eprintln!("Capturing {} interactively...", url);
        }
        let mut resume = operator_resume;
        capture_login_page(url, &driver, &mut resume, &log)?
    } else {
        if verbose > 0 {
            eprintln!("Scraping {}...", url);
        }
        scrape_login_page(url, rendered.then_some(&driver), &log)?
    };

    if verbose > 0 {
        eprintln!("Detected roles: {}", signature.role_summary());
    }

    let out_dir = output_dir.unwrap_or(&config.general.output_dir);
    std::fs::create_dir_all(out_dir)?;

    let descriptor_path = if want_descriptor {
        Some(artifact_path(out_dir, descriptor, url, "ini"))
    } else {
        None
    };
    let script_path = if want_script {
        Some(artifact_path(out_dir, script, url, "au3"))
    } else {
        None
    };

    let header = DescriptorHeader {
        browser,
        target_url: url.to_string(),
    };
    let artifacts = generate_artifacts(
        &signature,
        &header,
        descriptor_path.as_deref(),
        script_path.as_deref(),
        &log,
    )?;

    if let Some(record) = &artifacts.descriptor {
        println!(
            "Wrote descriptor: {} ({} bytes, sha1 {})",
            record.path.display(),
            record.bytes,
            record.fingerprint
        );
        println!(
            "Replay with: {} ini={} TargetURL={} BrowserName={}",
            config.validator.executable,
            record.path.display(),
            url,
            browser.descriptor_name()
        );
    }
    if let Some(record) = &artifacts.script {
        println!(
            "Wrote script: {} ({} bytes, sha1 {})",
            record.path.display(),
            record.bytes,
            record.fingerprint
        );
    }

    Ok(())
}

// ============================================================================
// validate subcommand
// ============================================================================

/// Replay a descriptor and return whether the engine reported success.
pub fn cmd_validate(
    descriptor: &str,
    url: &str,
    browser_flag: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    verbose: u8,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let browser = resolve_browser(browser_flag, config)?;
    let log = RunLogger::new(&config.general.run_log);

    if verbose > 0 {
        eprintln!("Validating {} against {}...", descriptor, url);
    }

    let request = ValidationRequest {
        executable: config.validator.executable.clone(),
        descriptor: PathBuf::from(descriptor),
        target_url: url.to_string(),
        browser,
        username: username.map(str::to_string),
        password: password.map(str::to_string),
    };
    let outcome = run_validation(&request, &log)?;

    if outcome.passed {
        println!("Validation passed: {}", descriptor);
    } else {
        println!("Validation failed: {}", descriptor);
        if !outcome.diagnostic.is_empty() {
            eprintln!("{}", outcome.diagnostic);
        }
    }

    Ok(outcome.passed)
}

// ============================================================================
// Helpers
// ============================================================================

fn print_signature(
    signature: &LoginSignature,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(signature)?);
        return Ok(());
    }

    println!("Detected roles: {}", signature.role_summary());
    if let Some(field) = &signature.username_field {
        println!("  username: {} via {}", field.element.describe(), field.locator);
    }
    if let Some(field) = &signature.password_field {
        println!("  password: {} via {}", field.element.describe(), field.locator);
    }
    if let Some(field) = &signature.submit_control {
        println!("  submit:   {} via {}", field.element.describe(), field.locator);
    }
    if !signature.form_action.is_empty() {
        println!("  form action: {}", signature.form_action);
    }

    Ok(())
}

fn artifact_path(out_dir: &str, explicit: Option<&str>, url: &str, extension: &str) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => Path::new(out_dir).join(default_artifact_name(url, extension)),
    }
}

/// Default artifact filename derived from the target host:
/// `https://www.example.com/login` becomes `www_example_com_login.ini`.
pub fn default_artifact_name(url: &str, extension: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "site".to_string());
    let stem: String = host
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_login.{}", stem, extension)
}
