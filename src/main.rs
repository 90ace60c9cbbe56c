use anyhow::{anyhow, bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use phishing_detector::{
    samples, AnalyzeRequest, DetectorConfig, ErrorResponse, PhishingDetector, PhishingScore,
    ServiceInfo,
};
use std::collections::BTreeMap;
use std::fs;
use std::process;

fn main() {
    let matches = Command::new("phishing-detector")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Score emails for phishing indicators")
        .long_about(
            "Scores an email on four independent facets (embedded URLs, sender, \
             body text and attachment names), sums the points and maps the total \
             to a risk level of SAFE, LOW, MEDIUM or HIGH.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Detector configuration file (.yaml, .yml or .toml)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration to FILE and exit")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("sender")
                .long("sender")
                .value_name("ADDRESS")
                .help("Sender, e.g. 'PayPal <service@paypal.com>'"),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Subject line"),
        )
        .arg(
            Arg::new("body")
                .long("body")
                .value_name("TEXT")
                .help("Message body")
                .conflicts_with_all(["input", "email", "sample"]),
        )
        .arg(
            Arg::new("attachment")
                .short('a')
                .long("attachment")
                .value_name("FILENAME")
                .help("Attachment filename (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .value_name("FILE")
                .help("Analyze a JSON request with sender, subject, content and attachments")
                .conflicts_with_all(["email", "sample"]),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("FILE")
                .help("Analyze a raw email file; sender and subject default to its headers")
                .conflicts_with("sample"),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .value_name("NAME")
                .help("Analyze a built-in sample (phishing, legitimate, suspicious)"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .help("Print the built-in samples as JSON and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("health")
                .long("health")
                .help("Print service status as JSON and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the full analysis as JSON instead of the text report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging, including per-analyzer scores")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Err(e) = run(&matches) {
        if matches.get_flag("json") {
            let response = match e.downcast_ref::<phishing_detector::DetectorError>() {
                Some(err) => ErrorResponse::from(err),
                None => ErrorResponse {
                    error: format!("{:#}", e),
                },
            };
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(_) => eprintln!("❌ {:#}", e),
            }
        } else {
            eprintln!("❌ {:#}", e);
        }
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        return generate_default_config(generate_path);
    }

    if matches.get_flag("health") {
        println!("{}", serde_json::to_string_pretty(&ServiceInfo::current())?);
        return Ok(());
    }

    if matches.get_flag("samples") {
        let all: BTreeMap<&str, AnalyzeRequest> = samples::test_samples().into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => DetectorConfig::load_or_default(path)
            .with_context(|| format!("Error loading configuration from {}", path))?,
        None => DetectorConfig::default(),
    };
    let detector = PhishingDetector::from_config(&config);

    let score = analyze_from_args(matches, &detector)?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        println!("{}", detector.generate_report(&score));
        println!();
        println!(
            "Quarantine Decision: {}",
            if detector.should_quarantine(&score) {
                "YES"
            } else {
                "NO"
            }
        );
    }

    Ok(())
}

fn analyze_from_args(
    matches: &ArgMatches,
    detector: &PhishingDetector,
) -> anyhow::Result<PhishingScore> {
    let sender = matches.get_one::<String>("sender").map(String::as_str);
    let subject = matches.get_one::<String>("subject").map(String::as_str);
    let attachments: Vec<String> = matches
        .get_many::<String>("attachment")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if let Some(name) = matches.get_one::<String>("sample") {
        let request = samples::sample(name).ok_or_else(|| {
            anyhow!(
                "Unknown sample '{}', expected one of: {}",
                name,
                samples::SAMPLE_NAMES.join(", ")
            )
        })?;
        return Ok(request.analyze(detector)?);
    }

    if let Some(input_file) = matches.get_one::<String>("input") {
        let json = fs::read_to_string(input_file)
            .with_context(|| format!("Error reading request file {}", input_file))?;
        let request = AnalyzeRequest::from_json(&json)?;
        return Ok(request.analyze(detector)?);
    }

    if let Some(email_file) = matches.get_one::<String>("email") {
        let content = fs::read_to_string(email_file)
            .with_context(|| format!("Error reading email file {}", email_file))?;
        return Ok(detector.analyze_email(&content, sender, subject, &attachments));
    }

    if let Some(body) = matches.get_one::<String>("body") {
        let request = AnalyzeRequest {
            sender: sender.unwrap_or_default().to_string(),
            subject: subject.unwrap_or_default().to_string(),
            content: body.clone(),
            attachments,
        };
        return Ok(request.analyze(detector)?);
    }

    bail!("Nothing to analyze: pass --body, --input, --email or --sample (see --help)")
}

fn generate_default_config(path: &str) -> anyhow::Result<()> {
    DetectorConfig::default()
        .to_file(path)
        .with_context(|| format!("Error generating configuration file {}", path))?;
    println!("✅ Default configuration written to: {}", path);
    Ok(())
}
