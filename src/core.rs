use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::cli::{Args, RequestMethod};
use crate::client::{HttpClient, HttpResult};
use crate::errors::{MwqueryError, Result};
use crate::filter::apply_queries;
use crate::logging::init_logging;
use crate::mime::MediaType;
use crate::oauth::{encode_form_data, load_credentials, sign, SigningRequest};
use crate::oauth::encode::split_pairs;
use crate::output::{assignment, flatten_body};
use crate::status::ExitStatus;
use crate::utils::{load_data_arg, parse_header_arg};

/// Main entry point for the CLI.
///
/// Parses arguments, sets up logging and the async runtime, then runs one
/// request.
pub fn run(args: Vec<String>) -> ExitStatus {
    let debug = args.iter().any(|a| a == "--debug");

    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    init_logging(parsed.logging, parsed.log_format);

    if parsed.target_url().is_none() {
        eprintln!("usage: mwquery [OPTIONS] --url <URL>");
        eprintln!("\nFor more information, run: mwquery --help");
        return ExitStatus::Error;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(e.into(), debug),
    };

    match runtime.block_on(program(parsed)) {
        Ok(status) => status,
        Err(e) => handle_error(e, debug),
    }
}

pub async fn program(args: Args) -> Result<ExitStatus> {
    let url = args
        .target_url()
        .ok_or_else(|| MwqueryError::Argument("a URL is required".to_string()))?
        .to_string();

    let data = args.data.as_deref().map(load_data_arg).transpose()?;
    let mut headers = build_headers(&args.headers)?;

    let has_body = matches!(args.request, RequestMethod::Post | RequestMethod::Put);
    let body = match (has_body, data.as_deref()) {
        (false, _) | (true, None) => String::new(),
        (true, Some(raw)) => match args.media_type {
            MediaType::UrlEncoded => encode_form_data(raw)?,
            MediaType::Json => raw.to_string(),
        },
    };

    if let Some(config) = &args.oauth_config {
        let credentials = load_credentials(config)?;
        let mut params = args.oauth_params.clone();
        if has_body && args.media_type == MediaType::UrlEncoded {
            if let Some(raw) = data.as_deref() {
                params.extend(
                    split_pairs(raw)?
                        .into_iter()
                        .map(|(name, value)| format!("{}={}", name, value)),
                );
            }
        }
        let signed = sign(&SigningRequest::new(args.request.as_str(), &url, &credentials).with_params(&params))?;
        let mut value = HeaderValue::from_str(&signed.header)
            .map_err(|e| MwqueryError::InvalidHeader(format!("Authorization: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        debug!(params = params.len(), "Request signed with OAuth 1.0a");
    }

    let client = HttpClient::new(args.cookie_path.clone())?;
    let result = match args.request {
        RequestMethod::Get => client.get(&url, headers).await?,
        RequestMethod::Head => client.head(&url, headers).await?,
        RequestMethod::Post => client.post(args.media_type, &url, headers, &body).await?,
        RequestMethod::Put => client.put(args.media_type, &url, headers, &body).await?,
    };

    render(&args, &result)?;
    Ok(ExitStatus::from_http_status(result.status(), args.check_status))
}

/// Write the requested views of `result` to stdout (stderr for `--dump`).
fn render(args: &Args, result: &HttpResult) -> Result<()> {
    if args.dump {
        eprintln!("{}", result);
        return Ok(());
    }

    if args.request == RequestMethod::Head {
        println!("{}", result.body());
        return Ok(());
    }

    if args.flatten {
        for line in flatten_body(result.body()) {
            println!("{}", line);
        }
    }

    for (token, value) in apply_queries(result.body(), &args.queries)? {
        println!("{}", assignment(&token, &value));
    }
    Ok(())
}

fn build_headers(items: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for item in items {
        let (name, value) = parse_header_arg(item)?;
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| MwqueryError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| MwqueryError::InvalidHeader(format!("{}: {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn handle_error(error: MwqueryError, debug: bool) -> ExitStatus {
    if debug {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    // All errors return the same exit code (1) following Unix conventions
    ExitStatus::Error
}
