use std::io::Write;
use clap::Parser;
use log::{error, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use crate::config::Settings;
use crate::lookup::{LookupController, LookupResult};
use crate::postal::{PostalApi, PostalClient};
use crate::record::records_to_json;
use crate::render::render_view;

mod config;
mod error;
mod lookup;
mod postal;
mod record;
mod render;
mod repl;

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(e) = color_eyre::install() {
        eprintln!("cannot install error report handler: {e:?}");
    }

    match run(Settings::parse()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// logs go to stderr, `RUST_LOG` overrides the default `warn` level
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

/// returns whether the final lookup state is usable
async fn run(settings: Settings) -> color_eyre::Result<bool> {
    let client = PostalClient::new(settings.base_url.as_str(), settings.timeout())?;
    let mut controller = LookupController::new(client);
    controller.set_filter_input(&settings.filter);

    let Some(pincode) = settings.pincode() else {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        repl::run_prompt(&mut controller, stdin, &mut std::io::stdout()).await?;
        return Ok(true);
    };

    if controller.set_pincode_input(pincode) {
        warn!("pincode [{}] cut to [{}]", pincode, controller.pincode_input());
    }
    controller.submit_lookup().await;
    print_once(&controller, settings.json)?;
    Ok(!matches!(controller.result(), LookupResult::Failure(_)))
}

fn print_once<A: PostalApi + Sync>(controller: &LookupController<A>, json: bool) -> color_eyre::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match controller.result() {
        LookupResult::Success(_) if json => {
            writeln!(stdout, "{}", records_to_json(&controller.filtered_records())?)?;
        }
        LookupResult::Failure(reason) => eprintln!("error: {reason}"),
        _ => write!(stdout, "{}", render_view(controller))?,
    }
    Ok(())
}
