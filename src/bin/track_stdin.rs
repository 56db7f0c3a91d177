//! Reads a product page from stdin, runs one tracker pass, prints a JSON report.
//!
//! Usage: `track_stdin <page-url> [--layout product-details|buybox] [--lookup] [--html]`

use std::io::{self, Read};
use std::process::ExitCode;

use brand_owner_tracker::{page, NoLookup, Options, TrackReport, Tracker};
use serde::Serialize;

#[derive(Serialize)]
struct Output {
    url: String,
    layout: String,
    #[serde(flatten)]
    report: TrackReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

struct Args {
    url: String,
    layout: Option<String>,
    lookup: bool,
    html: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut url = None;
    let mut layout = None;
    let mut lookup = false;
    let mut html = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--layout" => layout = Some(args.next().ok_or("--layout needs a value")?),
            "--lookup" => lookup = true,
            "--html" => html = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ if url.is_none() => url = Some(arg),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }

    Ok(Args {
        url: url.ok_or("missing page url")?,
        layout,
        lookup,
        html,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: track_stdin <page-url> [--layout product-details|buybox] [--lookup] [--html]");
            return ExitCode::from(2);
        }
    };

    let mut bytes = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut bytes) {
        eprintln!("Failed to read from stdin: {e}");
        return ExitCode::FAILURE;
    }

    let options = Options::default().with_stored_layout(args.layout.as_deref());
    let layout = options.layout_mode;
    let doc = page::parse_bytes(&bytes);

    let report = if args.lookup {
        match Tracker::from_options(options) {
            Ok(tracker) => tracker.process(&doc, &args.url).await,
            Err(e) => Err(e),
        }
    } else {
        Tracker::new(options, NoLookup).process(&doc, &args.url).await
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Tracking failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = Output {
        url: args.url,
        layout: layout.to_string(),
        report,
        html: args.html.then(|| doc.html().to_string()),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize report: {e}");
            ExitCode::FAILURE
        }
    }
}
